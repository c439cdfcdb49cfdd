//! CSV export of recorded sweep points.
//!
//! One file per flush: a header row (canonical parameter order, then the
//! four outcome fields) and one row per recorded point, in append order.
//! The export is meant to be easy to consume in spreadsheets or downstream
//! scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::{OUTCOME_KEYS, Parameter, ResultRecord};
use crate::error::AppError;

/// Column names, in the order rows are written.
pub fn column_names() -> Vec<&'static str> {
    Parameter::ALL
        .iter()
        .map(|p| p.key())
        .chain(OUTCOME_KEYS)
        .collect()
}

/// Write `records` to a CSV file at `path` (header always included).
pub fn write_results_csv(path: &Path, records: &[ResultRecord]) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::persistence(format!("Failed to create '{}': {e}", path.display()))
    })?;

    writeln!(file, "{}", column_names().join(",")).map_err(|e| {
        AppError::persistence(format!("Failed to write header to '{}': {e}", path.display()))
    })?;

    for record in records {
        let mut row: Vec<String> = Parameter::ALL
            .iter()
            .map(|p| fmt_cell(record.inputs.get(*p)))
            .collect();
        row.push(fmt_cell(record.outcome.max_distance));
        row.push(fmt_cell(record.outcome.energy_efficiency));
        row.push(fmt_cell(record.outcome.range_efficiency));
        row.push(fmt_cell(record.outcome.release_velocity));

        writeln!(file, "{}", row.join(",")).map_err(|e| {
            AppError::persistence(format!("Failed to write row to '{}': {e}", path.display()))
        })?;
    }

    file.flush()
        .map_err(|e| AppError::persistence(format!("Failed to flush '{}': {e}", path.display())))
}

/// Shortest lossless decimal form; whole numbers print without a fraction.
fn fmt_cell(value: f64) -> String {
    format!("{value}")
}
