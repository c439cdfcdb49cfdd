//! Operator-facing output formatting.
//!
//! All user-visible strings are built here so the driving loop stays free of
//! formatting noise and output changes are localized.

use chrono::Local;

use crate::domain::{Outcome, Parameter, ParameterSet, SweepStats};

/// Per-combination progress line.
pub fn progress_line(index: usize, total: usize, outcome: &Outcome) -> String {
    format!(
        "[{index}/{total}] distance {:.2} m | energy eff {:.3} | range eff {:.3} | release {:.2} m/s",
        outcome.max_distance,
        outcome.energy_efficiency,
        outcome.range_efficiency,
        outcome.release_velocity
    )
}

/// Per-combination skip line. The point is dropped, not recorded.
pub fn skip_line(index: usize, total: usize, reason: &str) -> String {
    format!("[{index}/{total}] skipped: {reason}")
}

/// Banner printed once per run.
pub fn format_run_header(plan_path: &str, sweep_count: usize) -> String {
    let mut out = String::new();
    out.push_str("=== treb - Virtual Trebuchet sweep driver ===\n");
    out.push_str(&format!("Started: {}\n", Local::now().to_rfc3339()));
    out.push_str(&format!("Plan: {plan_path} ({sweep_count} sweep(s))"));
    out
}

/// Per-sweep wrap-up.
pub fn format_sweep_summary(
    name: &str,
    stats: &SweepStats,
    rows_written: usize,
    path: &str,
) -> String {
    let mut out = String::new();
    out.push_str(&format!("--- {name} ---\n"));
    out.push_str(&format!(
        "Combinations: {} | recorded: {} | timed out: {} | rejected: {}\n",
        stats.combinations, stats.recorded, stats.timed_out, stats.rejected
    ));
    out.push_str(&format!("Wrote {rows_written} row(s) to {path}"));
    out
}

/// Reference table for plan authors: every sweepable parameter with its
/// unit and the value `treb template` starts it at.
pub fn format_parameter_table() -> String {
    let defaults = ParameterSet::default();
    let width = Parameter::ALL
        .iter()
        .map(|p| p.key().len())
        .max()
        .unwrap_or(0);

    let mut out = String::from("Sweepable parameters (metric):\n");
    for param in Parameter::ALL {
        out.push_str(&format!(
            "  {:width$}  [{}]  default {}\n",
            param.key(),
            param.unit_label(),
            defaults.get(param)
        ));
    }
    out.pop();
    out
}
