//! The run pipeline shared by the CLI front-end and tests.
//!
//! One session drives every sweep in the plan in order; each sweep is
//! expanded against the plan's base, run, and flushed to its own CSV before
//! the next begins.

use std::path::{Path, PathBuf};

use crate::domain::SweepStats;
use crate::error::AppError;
use crate::io::plan::SweepPlan;
use crate::report;
use crate::sim::Simulator;
use crate::sweep::runner::SweepSession;

/// What one sweep of a plan execution produced.
#[derive(Debug, Clone)]
pub struct SweepReport {
    pub name: String,
    pub stats: SweepStats,
    pub rows_written: usize,
    pub path: PathBuf,
}

/// Run every sweep in the plan on the given session.
///
/// The session is borrowed, not consumed: the caller owns simulator teardown
/// and performs it exactly once whether or not this returns an error.
pub fn run_plan<S: Simulator>(
    session: &mut SweepSession<S>,
    plan: &SweepPlan,
    out_dir: &Path,
) -> Result<Vec<SweepReport>, AppError> {
    let mut reports = Vec::with_capacity(plan.sweeps.len());

    for sweep in &plan.sweeps {
        let spec = sweep.spec();
        let stats = session.run_sweep(&plan.base, &spec)?;

        let path = out_dir.join(format!("{}.csv", sweep.output));
        let rows_written = session.flush(&path)?;

        println!(
            "{}",
            report::format_sweep_summary(
                &sweep.output,
                &stats,
                rows_written,
                &path.display().to_string()
            )
        );
        reports.push(SweepReport {
            name: sweep.output.clone(),
            stats,
            rows_written,
            path,
        });
    }

    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Parameter, ParameterSet, SweepAxis};
    use crate::io::plan::PlannedSweep;
    use crate::sim::{RawOutcome, SimError};

    /// Always-successful stand-in; distance grows with each submission.
    struct CountingSim {
        shots: usize,
    }

    impl Simulator for CountingSim {
        fn submit(&mut self, _inputs: &ParameterSet) -> Result<RawOutcome, SimError> {
            self.shots += 1;
            Ok(RawOutcome {
                max_distance: format!("{} m", 100 + self.shots),
                energy_efficiency: "0.4".to_string(),
                range_efficiency: "0.6".to_string(),
                release_velocity: "20 m/s".to_string(),
            })
        }
    }

    fn two_sweep_plan() -> SweepPlan {
        SweepPlan {
            base: ParameterSet::default(),
            sweeps: vec![
                PlannedSweep {
                    output: "arm".to_string(),
                    vary: vec![SweepAxis {
                        param: Parameter::LengthLongArm,
                        values: vec![4.4, 4.6],
                    }],
                },
                PlannedSweep {
                    output: "mass".to_string(),
                    vary: vec![SweepAxis {
                        param: Parameter::ProjectileMass,
                        values: vec![3.0, 5.0, 7.0],
                    }],
                },
            ],
        }
    }

    #[test]
    fn each_sweep_gets_its_own_file_and_report() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = SweepSession::new(CountingSim { shots: 0 });

        let reports = run_plan(&mut session, &two_sweep_plan(), dir.path()).unwrap();

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].rows_written, 2);
        assert_eq!(reports[1].rows_written, 3);
        assert!(dir.path().join("arm.csv").exists());
        assert!(dir.path().join("mass.csv").exists());

        // The second file only holds the second sweep's rows: the flush in
        // between cleared the collection.
        let mass = std::fs::read_to_string(dir.path().join("mass.csv")).unwrap();
        assert_eq!(mass.lines().count(), 4);
    }

    #[test]
    fn sweeps_share_one_session_but_not_state() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = SweepSession::new(CountingSim { shots: 0 });

        run_plan(&mut session, &two_sweep_plan(), dir.path()).unwrap();

        // Both sweeps expanded against the same base: the mass sweep's rows
        // carry the default long arm, not the arm sweep's last value.
        let mass = std::fs::read_to_string(dir.path().join("mass.csv")).unwrap();
        let row: Vec<&str> = mass.lines().nth(1).unwrap().split(',').collect();
        assert_eq!(row[1], "4.5"); // length_long_arm column
    }
}
