//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - expanded in-memory during sweep generation
//! - carried through a driving session
//! - read from plan JSON and written to result CSVs

use serde::{Deserialize, Serialize};

/// One of the simulator's physical input parameters.
///
/// The order of `ALL` is canonical: it is the CSV column order and the order
/// fields are patched on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parameter {
    LengthShortArm,
    LengthLongArm,
    LengthSling,
    LengthWeight,
    HeightPivot,
    ArmMass,
    WeightMass,
    WeightInertia,
    ProjectileMass,
    ProjectileDiameter,
    WindSpeed,
    ReleaseAngle,
}

impl Parameter {
    pub const ALL: [Parameter; 12] = [
        Parameter::LengthShortArm,
        Parameter::LengthLongArm,
        Parameter::LengthSling,
        Parameter::LengthWeight,
        Parameter::HeightPivot,
        Parameter::ArmMass,
        Parameter::WeightMass,
        Parameter::WeightInertia,
        Parameter::ProjectileMass,
        Parameter::ProjectileDiameter,
        Parameter::WindSpeed,
        Parameter::ReleaseAngle,
    ];

    /// snake_case name used in plan JSON and CSV headers.
    pub fn key(self) -> &'static str {
        match self {
            Parameter::LengthShortArm => "length_short_arm",
            Parameter::LengthLongArm => "length_long_arm",
            Parameter::LengthSling => "length_sling",
            Parameter::LengthWeight => "length_weight",
            Parameter::HeightPivot => "height_pivot",
            Parameter::ArmMass => "arm_mass",
            Parameter::WeightMass => "weight_mass",
            Parameter::WeightInertia => "weight_inertia",
            Parameter::ProjectileMass => "projectile_mass",
            Parameter::ProjectileDiameter => "projectile_diameter",
            Parameter::WindSpeed => "wind_speed",
            Parameter::ReleaseAngle => "release_angle",
        }
    }

    /// HTML id of the corresponding input field on the simulator page.
    pub fn field_id(self) -> &'static str {
        match self {
            Parameter::LengthShortArm => "txt_LengthArmShort",
            Parameter::LengthLongArm => "txt_LengthArmLong",
            Parameter::LengthSling => "txt_LengthSling",
            Parameter::LengthWeight => "txt_LengthWeight",
            Parameter::HeightPivot => "txt_HeightOfPivot",
            Parameter::ArmMass => "txt_MassArm",
            Parameter::WeightMass => "txt_MassWeight",
            Parameter::WeightInertia => "txt_InertiaWeight",
            Parameter::ProjectileMass => "txt_MassProjectile",
            Parameter::ProjectileDiameter => "txt_ProjectileDiameter",
            Parameter::WindSpeed => "txt_WindSpeed",
            Parameter::ReleaseAngle => "txt_ReleaseAngle",
        }
    }

    /// Metric unit label, for help text and summaries.
    pub fn unit_label(self) -> &'static str {
        match self {
            Parameter::LengthShortArm
            | Parameter::LengthLongArm
            | Parameter::LengthSling
            | Parameter::LengthWeight
            | Parameter::HeightPivot
            | Parameter::ProjectileDiameter => "m",
            Parameter::ArmMass | Parameter::WeightMass | Parameter::ProjectileMass => "kg",
            Parameter::WeightInertia => "kg.m^2",
            Parameter::WindSpeed => "m/s",
            Parameter::ReleaseAngle => "deg",
        }
    }
}

/// A complete set of simulator inputs.
///
/// `Copy` is deliberate: every sweep combination is an independent snapshot,
/// so mutating one can never alias another or the base it came from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParameterSet {
    pub length_short_arm: f64,
    pub length_long_arm: f64,
    pub length_sling: f64,
    pub length_weight: f64,
    pub height_pivot: f64,
    pub arm_mass: f64,
    pub weight_mass: f64,
    pub weight_inertia: f64,
    pub projectile_mass: f64,
    pub projectile_diameter: f64,
    pub wind_speed: f64,
    pub release_angle: f64,
}

impl ParameterSet {
    pub fn get(&self, param: Parameter) -> f64 {
        match param {
            Parameter::LengthShortArm => self.length_short_arm,
            Parameter::LengthLongArm => self.length_long_arm,
            Parameter::LengthSling => self.length_sling,
            Parameter::LengthWeight => self.length_weight,
            Parameter::HeightPivot => self.height_pivot,
            Parameter::ArmMass => self.arm_mass,
            Parameter::WeightMass => self.weight_mass,
            Parameter::WeightInertia => self.weight_inertia,
            Parameter::ProjectileMass => self.projectile_mass,
            Parameter::ProjectileDiameter => self.projectile_diameter,
            Parameter::WindSpeed => self.wind_speed,
            Parameter::ReleaseAngle => self.release_angle,
        }
    }

    pub fn set(&mut self, param: Parameter, value: f64) {
        match param {
            Parameter::LengthShortArm => self.length_short_arm = value,
            Parameter::LengthLongArm => self.length_long_arm = value,
            Parameter::LengthSling => self.length_sling = value,
            Parameter::LengthWeight => self.length_weight = value,
            Parameter::HeightPivot => self.height_pivot = value,
            Parameter::ArmMass => self.arm_mass = value,
            Parameter::WeightMass => self.weight_mass = value,
            Parameter::WeightInertia => self.weight_inertia = value,
            Parameter::ProjectileMass => self.projectile_mass = value,
            Parameter::ProjectileDiameter => self.projectile_diameter = value,
            Parameter::WindSpeed => self.wind_speed = value,
            Parameter::ReleaseAngle => self.release_angle = value,
        }
    }
}

impl Default for ParameterSet {
    /// A plausible 300 kg counterweight machine; the starting point that
    /// `treb template` prints.
    fn default() -> Self {
        Self {
            length_short_arm: 0.9,
            length_long_arm: 4.5,
            length_sling: 0.9,
            length_weight: 0.45,
            height_pivot: 1.5,
            arm_mass: 10.0,
            weight_mass: 300.0,
            weight_inertia: 26.25,
            projectile_mass: 7.0,
            projectile_diameter: 0.25,
            wind_speed: 0.0,
            release_angle: 45.0,
        }
    }
}

/// One varying dimension of a sweep: a parameter and its candidate values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SweepAxis {
    pub param: Parameter,
    pub values: Vec<f64>,
}

/// Which parameters a sweep varies.
///
/// Axis declaration order is combination order: the first axis varies
/// slowest, the last fastest. Parameters not listed keep the base value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SweepSpec {
    pub axes: Vec<SweepAxis>,
}

impl SweepSpec {
    /// Number of combinations expansion will produce: the product of the
    /// axis lengths (1 for an empty spec, 0 if any axis has no values).
    pub fn combination_count(&self) -> usize {
        self.axes.iter().map(|a| a.values.len()).product()
    }

    /// Reject duplicate parameters; a duplicated axis would silently let the
    /// later one win every combination.
    pub fn validate(&self) -> Result<(), String> {
        for (i, axis) in self.axes.iter().enumerate() {
            if self.axes[..i].iter().any(|a| a.param == axis.param) {
                return Err(format!(
                    "parameter `{}` appears in more than one axis",
                    axis.param.key()
                ));
            }
        }
        Ok(())
    }
}

/// The four numeric outputs scraped per shot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    /// Distance travelled by the projectile (m).
    pub max_distance: f64,
    pub energy_efficiency: f64,
    pub range_efficiency: f64,
    /// Projectile speed at release (m/s).
    pub release_velocity: f64,
}

/// Outcome CSV column names, in row order.
pub const OUTCOME_KEYS: [&str; 4] = [
    "max_distance",
    "energy_efficiency",
    "range_efficiency",
    "release_velocity",
];

/// One recorded sweep point: the inputs alongside what they produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResultRecord {
    pub inputs: ParameterSet,
    pub outcome: Outcome,
}

/// Per-sweep bookkeeping: how many combinations ran and how each ended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepStats {
    pub combinations: usize,
    pub recorded: usize,
    pub timed_out: usize,
    pub rejected: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_and_set_cover_every_parameter() {
        let mut set = ParameterSet::default();
        for (i, param) in Parameter::ALL.into_iter().enumerate() {
            set.set(param, i as f64 + 0.5);
        }
        for (i, param) in Parameter::ALL.into_iter().enumerate() {
            assert_eq!(set.get(param), i as f64 + 0.5, "{}", param.key());
        }
    }

    #[test]
    fn parameter_keys_round_trip_through_serde() {
        for param in Parameter::ALL {
            let json = serde_json::to_string(&param).unwrap();
            assert_eq!(json, format!("\"{}\"", param.key()));
            let back: Parameter = serde_json::from_str(&json).unwrap();
            assert_eq!(back, param);
        }
    }

    #[test]
    fn combination_count_multiplies_axis_lengths() {
        let spec = SweepSpec {
            axes: vec![
                SweepAxis {
                    param: Parameter::LengthLongArm,
                    values: vec![4.4, 4.5, 4.6],
                },
                SweepAxis {
                    param: Parameter::ArmMass,
                    values: vec![7.0, 10.0],
                },
            ],
        };
        assert_eq!(spec.combination_count(), 6);
        assert_eq!(SweepSpec::default().combination_count(), 1);
    }

    #[test]
    fn empty_axis_means_zero_combinations() {
        let spec = SweepSpec {
            axes: vec![SweepAxis {
                param: Parameter::WindSpeed,
                values: vec![],
            }],
        };
        assert_eq!(spec.combination_count(), 0);
    }

    #[test]
    fn duplicate_axis_is_rejected() {
        let spec = SweepSpec {
            axes: vec![
                SweepAxis {
                    param: Parameter::ArmMass,
                    values: vec![7.0],
                },
                SweepAxis {
                    param: Parameter::ArmMass,
                    values: vec![10.0],
                },
            ],
        };
        let err = spec.validate().unwrap_err();
        assert!(err.contains("arm_mass"), "{err}");
    }
}
