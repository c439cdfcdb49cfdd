//! Unit-aware parsing of scraped result texts.
//!
//! The page renders some results with a unit suffix (`123.45 m`) and some as
//! bare numbers. Each field declares what it expects; anything else is
//! format drift and fails loudly instead of mis-stripping characters.

use thiserror::Error;

use super::RawOutcome;
use crate::domain::Outcome;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("result field `{field}`: expected a number suffixed `{unit}`, got \"{raw}\"")]
    MissingUnit {
        field: &'static str,
        unit: &'static str,
        raw: String,
    },
    #[error("result field `{field}`: \"{raw}\" is not a number")]
    NotANumber { field: &'static str, raw: String },
}

/// Convert a scraped [`RawOutcome`] into numeric outcome fields.
pub fn outcome(raw: &RawOutcome) -> Result<Outcome, ParseError> {
    Ok(Outcome {
        max_distance: numeric("maxDistance", &raw.max_distance, Some("m"))?,
        energy_efficiency: numeric("energyEfficiency", &raw.energy_efficiency, None)?,
        range_efficiency: numeric("rangeEfficiency", &raw.range_efficiency, None)?,
        release_velocity: numeric("releaseVelocity", &raw.release_velocity, Some("m/s"))?,
    })
}

/// Parse one field, requiring `unit` (when declared) as a trailing suffix.
fn numeric(field: &'static str, raw: &str, unit: Option<&'static str>) -> Result<f64, ParseError> {
    let text = raw.trim();
    let number = match unit {
        Some(unit) => text
            .strip_suffix(unit)
            .ok_or_else(|| ParseError::MissingUnit {
                field,
                unit,
                raw: raw.to_string(),
            })?
            .trim_end(),
        None => text,
    };
    number.parse::<f64>().map_err(|_| ParseError::NotANumber {
        field,
        raw: raw.to_string(),
    })
}
