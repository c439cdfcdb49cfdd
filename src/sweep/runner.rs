//! Drives a sweep against the simulator and accumulates results.
//!
//! Skip policy: a timeout or a simulator rejection costs exactly the one
//! combination it hit, and the run continues with the next. Driver failures
//! and result-format drift abort instead, because nothing after them can be
//! trusted.

use std::path::Path;

use crate::domain::{ParameterSet, ResultRecord, SweepSpec, SweepStats};
use crate::error::AppError;
use crate::io::export;
use crate::report;
use crate::sim::{SimError, Simulator, parse};

use super::expand;

/// A driving session: the simulator plus the not-yet-flushed results.
pub struct SweepSession<S: Simulator> {
    sim: S,
    results: Vec<ResultRecord>,
}

impl<S: Simulator> SweepSession<S> {
    pub fn new(sim: S) -> Self {
        Self {
            sim,
            results: Vec::new(),
        }
    }

    /// Results recorded since the last flush.
    pub fn results(&self) -> &[ResultRecord] {
        &self.results
    }

    /// Run every combination of `spec` against `base`, appending one record
    /// per successful point. Prints a progress line per combination.
    pub fn run_sweep(
        &mut self,
        base: &ParameterSet,
        spec: &SweepSpec,
    ) -> Result<SweepStats, AppError> {
        let combinations = expand(base, spec);
        let total = combinations.len();
        let mut stats = SweepStats {
            combinations: total,
            ..SweepStats::default()
        };

        for (idx, inputs) in combinations.into_iter().enumerate() {
            match self.sim.submit(&inputs) {
                Ok(raw) => {
                    let outcome = parse::outcome(&raw)
                        .map_err(|e| AppError::driver(format!("Result format drift: {e}")))?;
                    println!("{}", report::progress_line(idx + 1, total, &outcome));
                    self.results.push(ResultRecord { inputs, outcome });
                    stats.recorded += 1;
                }
                Err(SimError::Driver(text)) => {
                    return Err(AppError::driver(format!(
                        "Session failed on combination {}/{total}: {text}",
                        idx + 1
                    )));
                }
                Err(err) => {
                    match err {
                        SimError::Timeout(_) => stats.timed_out += 1,
                        _ => stats.rejected += 1,
                    }
                    println!("{}", report::skip_line(idx + 1, total, &err.to_string()));
                }
            }
        }

        Ok(stats)
    }

    /// Write everything recorded so far to `path`, then forget it.
    ///
    /// On a write failure the records stay in memory and the error
    /// propagates; nothing is dropped silently.
    pub fn flush(&mut self, path: &Path) -> Result<usize, AppError> {
        export::write_results_csv(path, &self.results)?;
        let written = self.results.len();
        self.results.clear();
        Ok(written)
    }

    /// Hand the simulator back for teardown.
    pub fn into_sim(self) -> S {
        self.sim
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::domain::{Parameter, SweepAxis};
    use crate::sim::RawOutcome;

    /// Scripted stand-in for the live page: pops one reply per submission
    /// and remembers what was submitted.
    struct ScriptedSim {
        replies: VecDeque<Result<RawOutcome, SimError>>,
        submitted: Vec<ParameterSet>,
    }

    impl ScriptedSim {
        fn new(replies: Vec<Result<RawOutcome, SimError>>) -> Self {
            Self {
                replies: replies.into(),
                submitted: Vec::new(),
            }
        }
    }

    impl Simulator for ScriptedSim {
        fn submit(&mut self, inputs: &ParameterSet) -> Result<RawOutcome, SimError> {
            self.submitted.push(*inputs);
            self.replies
                .pop_front()
                .unwrap_or_else(|| Err(SimError::Driver("script exhausted".to_string())))
        }
    }

    fn ok_raw(distance: f64) -> Result<RawOutcome, SimError> {
        Ok(RawOutcome {
            max_distance: format!("{distance} m"),
            energy_efficiency: "0.4".to_string(),
            range_efficiency: "0.6".to_string(),
            release_velocity: "21.5 m/s".to_string(),
        })
    }

    fn arm_mass_spec(values: &[f64]) -> SweepSpec {
        SweepSpec {
            axes: vec![SweepAxis {
                param: Parameter::ArmMass,
                values: values.to_vec(),
            }],
        }
    }

    #[test]
    fn records_every_successful_combination_in_order() {
        let sim = ScriptedSim::new(vec![ok_raw(100.0), ok_raw(110.0), ok_raw(120.0)]);
        let mut session = SweepSession::new(sim);
        let base = ParameterSet::default();

        let stats = session
            .run_sweep(&base, &arm_mass_spec(&[7.0, 10.0, 13.0]))
            .unwrap();

        assert_eq!(
            stats,
            SweepStats {
                combinations: 3,
                recorded: 3,
                timed_out: 0,
                rejected: 0
            }
        );
        let recorded: Vec<(f64, f64)> = session
            .results()
            .iter()
            .map(|r| (r.inputs.arm_mass, r.outcome.max_distance))
            .collect();
        assert_eq!(recorded, vec![(7.0, 100.0), (10.0, 110.0), (13.0, 120.0)]);
    }

    #[test]
    fn merged_record_carries_inputs_and_outcome() {
        let sim = ScriptedSim::new(vec![ok_raw(123.4)]);
        let mut session = SweepSession::new(sim);
        let base = ParameterSet::default();

        session.run_sweep(&base, &arm_mass_spec(&[10.0])).unwrap();

        let record = session.results()[0];
        assert_eq!(record.inputs.arm_mass, 10.0);
        assert_eq!(record.inputs.weight_mass, base.weight_mass);
        assert_eq!(record.outcome.max_distance, 123.4);
        assert_eq!(record.outcome.release_velocity, 21.5);
    }

    #[test]
    fn timeout_skips_exactly_that_combination() {
        // Timeout on combination #2 of 3: records for #1 and #3 remain.
        let sim = ScriptedSim::new(vec![ok_raw(100.0), Err(SimError::Timeout(15)), ok_raw(120.0)]);
        let mut session = SweepSession::new(sim);
        let base = ParameterSet::default();

        let stats = session
            .run_sweep(&base, &arm_mass_spec(&[7.0, 10.0, 13.0]))
            .unwrap();

        assert_eq!(stats.recorded, 2);
        assert_eq!(stats.timed_out, 1);
        let masses: Vec<f64> = session.results().iter().map(|r| r.inputs.arm_mass).collect();
        assert_eq!(masses, vec![7.0, 13.0]);
    }

    #[test]
    fn rejection_skips_without_aborting() {
        let sim = ScriptedSim::new(vec![
            Err(SimError::Rejected("sling is too long".to_string())),
            ok_raw(120.0),
        ]);
        let mut session = SweepSession::new(sim);
        let base = ParameterSet::default();

        let stats = session
            .run_sweep(&base, &arm_mass_spec(&[7.0, 10.0]))
            .unwrap();

        assert_eq!(stats.recorded, 1);
        assert_eq!(stats.rejected, 1);
        assert_eq!(session.results().len(), 1);
    }

    #[test]
    fn driver_failure_aborts_the_run() {
        let sim = ScriptedSim::new(vec![
            ok_raw(100.0),
            Err(SimError::Driver("session gone".to_string())),
        ]);
        let mut session = SweepSession::new(sim);
        let base = ParameterSet::default();

        let err = session
            .run_sweep(&base, &arm_mass_spec(&[7.0, 10.0, 13.0]))
            .unwrap_err();

        assert_eq!(err.exit_code(), 4);
        // The successful point before the failure is still held for a flush.
        assert_eq!(session.results().len(), 1);
    }

    #[test]
    fn format_drift_aborts_the_run() {
        let sim = ScriptedSim::new(vec![Ok(RawOutcome {
            max_distance: "123.4".to_string(), // unit suffix missing
            energy_efficiency: "0.4".to_string(),
            range_efficiency: "0.6".to_string(),
            release_velocity: "21.5 m/s".to_string(),
        })]);
        let mut session = SweepSession::new(sim);
        let base = ParameterSet::default();

        let err = session.run_sweep(&base, &arm_mass_spec(&[7.0])).unwrap_err();
        assert_eq!(err.exit_code(), 4);
        assert!(session.results().is_empty());
    }

    #[test]
    fn never_more_records_than_combinations() {
        let sim = ScriptedSim::new(vec![ok_raw(1.0), ok_raw(2.0)]);
        let mut session = SweepSession::new(sim);
        let base = ParameterSet::default();

        let stats = session
            .run_sweep(&base, &arm_mass_spec(&[7.0, 10.0]))
            .unwrap();
        assert!(stats.recorded <= stats.combinations);
        assert!(session.results().len() <= stats.combinations);
    }

    #[test]
    fn flush_writes_then_clears() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let sim = ScriptedSim::new(vec![ok_raw(100.0), ok_raw(110.0)]);
        let mut session = SweepSession::new(sim);
        let base = ParameterSet::default();
        session.run_sweep(&base, &arm_mass_spec(&[7.0, 10.0])).unwrap();

        let written = session.flush(&path).unwrap();
        assert_eq!(written, 2);
        assert!(session.results().is_empty());

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 3); // header + 2 rows

        // A second flush with nothing recorded writes a header-only file.
        let path2 = dir.path().join("empty.csv");
        let written = session.flush(&path2).unwrap();
        assert_eq!(written, 0);
        let contents = std::fs::read_to_string(&path2).unwrap();
        assert_eq!(contents.lines().count(), 1);
    }

    #[test]
    fn failed_flush_keeps_the_records() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no_such_dir").join("out.csv");

        let sim = ScriptedSim::new(vec![ok_raw(100.0)]);
        let mut session = SweepSession::new(sim);
        let base = ParameterSet::default();
        session.run_sweep(&base, &arm_mass_spec(&[7.0])).unwrap();

        let err = session.flush(&missing).unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert_eq!(session.results().len(), 1);
    }
}
