//! Sweep plan files.
//!
//! A plan is the JSON replacement for editing a driver script: one base
//! parameter set plus an ordered list of named sweeps. Every sweep expands
//! against the same base, so reordering sweeps never changes their results.

use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{Parameter, ParameterSet, SweepAxis, SweepSpec};
use crate::error::AppError;

/// One named sweep: where its rows go and what varies.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlannedSweep {
    /// Output file stem; rows land in `<out_dir>/<output>.csv`.
    pub output: String,
    pub vary: Vec<SweepAxis>,
}

impl PlannedSweep {
    pub fn spec(&self) -> SweepSpec {
        SweepSpec {
            axes: self.vary.clone(),
        }
    }
}

/// A full plan document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SweepPlan {
    pub base: ParameterSet,
    pub sweeps: Vec<PlannedSweep>,
}

/// Read and validate a plan file.
pub fn read_plan(path: &Path) -> Result<SweepPlan, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::usage(format!("Failed to open plan '{}': {e}", path.display())))?;
    let plan: SweepPlan = serde_json::from_reader(file)
        .map_err(|e| AppError::usage(format!("Invalid plan '{}': {e}", path.display())))?;
    validate(&plan)
        .map_err(|msg| AppError::usage(format!("Invalid plan '{}': {msg}", path.display())))?;
    Ok(plan)
}

fn validate(plan: &SweepPlan) -> Result<(), String> {
    if plan.sweeps.is_empty() {
        return Err("plan declares no sweeps".to_string());
    }
    for (i, sweep) in plan.sweeps.iter().enumerate() {
        if sweep.output.trim().is_empty() {
            return Err(format!("sweep #{} has an empty output name", i + 1));
        }
        if plan.sweeps[..i].iter().any(|s| s.output == sweep.output) {
            return Err(format!(
                "output name `{}` is used by more than one sweep",
                sweep.output
            ));
        }
        sweep
            .spec()
            .validate()
            .map_err(|msg| format!("sweep `{}`: {msg}", sweep.output))?;
    }
    Ok(())
}

/// A starter plan: the default configuration plus one long-arm axis, ready
/// to edit.
pub fn template() -> SweepPlan {
    SweepPlan {
        base: ParameterSet::default(),
        sweeps: vec![PlannedSweep {
            output: "length_long_arm_sweep".to_string(),
            vary: vec![SweepAxis {
                param: Parameter::LengthLongArm,
                values: vec![4.4, 4.5, 4.6, 4.7, 4.8, 4.9, 5.0],
            }],
        }],
    }
}

pub fn template_json() -> Result<String, AppError> {
    serde_json::to_string_pretty(&template())
        .map_err(|e| AppError::usage(format!("Failed to render the template plan: {e}")))
}
