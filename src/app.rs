//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads the sweep plan
//! - opens and tears down the browser session
//! - runs sweeps and writes exports

use std::path::Path;

use clap::Parser;

use crate::cli::{Command, DriverArgs, RunArgs};
use crate::error::AppError;
use crate::io::plan;
use crate::report;
use crate::sim::trebuchet::{SessionConfig, TrebuchetSim};
use crate::sweep::runner::SweepSession;

pub mod pipeline;

/// Entry point for the `treb` binary.
pub fn run() -> Result<(), AppError> {
    // `treb plan.json` should behave like `treb run plan.json`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing. This preserves a clean clap structure
    // while retaining the short invocation.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Run(args) => handle_run(args),
        Command::Template => handle_template(),
        Command::Params => handle_params(),
        Command::Probe(args) => handle_probe(args),
    }
}

fn handle_run(args: RunArgs) -> Result<(), AppError> {
    let plan = plan::read_plan(&args.plan)?;
    let config = session_config(&args.driver);

    std::fs::create_dir_all(&args.out_dir).map_err(|e| {
        AppError::persistence(format!(
            "Failed to create output directory '{}': {e}",
            args.out_dir.display()
        ))
    })?;

    println!(
        "{}",
        report::format_run_header(&args.plan.display().to_string(), plan.sweeps.len())
    );

    let sim = TrebuchetSim::connect(&config)?;
    let mut session = SweepSession::new(sim);
    let outcome = pipeline::run_plan(&mut session, &plan, &args.out_dir);

    // Tear the browser down exactly once, even when the run failed.
    let quit = session.into_sim().quit();
    let reports = outcome?;
    quit?;

    let recorded: usize = reports.iter().map(|r| r.rows_written).sum();
    println!(
        "Done: {} sweep(s), {recorded} row(s) recorded.",
        reports.len()
    );
    Ok(())
}

fn handle_template() -> Result<(), AppError> {
    println!("{}", plan::template_json()?);
    Ok(())
}

fn handle_params() -> Result<(), AppError> {
    println!("{}", report::format_parameter_table());
    Ok(())
}

fn handle_probe(args: DriverArgs) -> Result<(), AppError> {
    let config = session_config(&args);
    let sim = TrebuchetSim::connect(&config)?;
    let fields = sim.field_count();
    sim.quit()?;
    println!("OK: simulator page loaded, {fields} input fields resolved.");
    Ok(())
}

fn session_config(args: &DriverArgs) -> SessionConfig {
    SessionConfig {
        webdriver_url: SessionConfig::resolve_endpoint(args.webdriver_url.clone()),
        page_url: args.page_url.clone(),
        max_wait_secs: args.max_wait,
        headless: args.headless,
    }
}

/// Rewrite argv so a bare plan path runs it.
///
/// Rules:
/// - `treb plan.json`             -> `treb run plan.json`
/// - help/version/subcommands     -> unchanged
/// - anything else                -> unchanged (clap reports it)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        return argv;
    };

    let is_top_level_help_or_version =
        matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "run" | "template" | "params" | "probe");
    if is_subcommand || arg1.starts_with('-') {
        return argv;
    }

    // A bare path argument is shorthand for `run <path>`.
    if arg1.ends_with(".json") || Path::new(&arg1).exists() {
        argv.insert(1, "run".to_string());
    }
    argv
}
