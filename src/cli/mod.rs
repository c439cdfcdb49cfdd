//! Command-line parsing for the sweep driver.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the sweep and session code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::sim::trebuchet::DEFAULT_PAGE_URL;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "treb", version, about = "Virtual Trebuchet parameter sweep driver")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run every sweep in a plan file and write one CSV per sweep.
    Run(RunArgs),
    /// Print a starter plan JSON to stdout.
    Template,
    /// List the sweepable parameters with units and default values.
    Params,
    /// Open a browser session, resolve the simulator form, and close it.
    Probe(DriverArgs),
}

/// Options for `run`.
#[derive(Debug, Parser, Clone)]
pub struct RunArgs {
    /// Plan JSON file (base parameters plus sweeps).
    pub plan: PathBuf,

    /// Directory output CSVs are written to.
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    #[command(flatten)]
    pub driver: DriverArgs,
}

/// Browser session options shared by `run` and `probe`.
#[derive(Debug, Args, Clone)]
pub struct DriverArgs {
    /// WebDriver endpoint (e.g. a local chromedriver). Falls back to the
    /// WEBDRIVER_URL environment variable, then localhost:9515.
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Simulator page URL.
    #[arg(long, default_value = DEFAULT_PAGE_URL)]
    pub page_url: String,

    /// Seconds to wait for results before skipping a combination.
    #[arg(long, default_value_t = 15)]
    pub max_wait: u64,

    /// Run the browser headless.
    #[arg(long)]
    pub headless: bool,
}
