//! Sweep expansion.
//!
//! A sweep is a deterministic cartesian product over per-parameter candidate
//! lists. Expansion happens up front so the driving loop is a flat walk over
//! fully specified input sets.

use crate::domain::{ParameterSet, SweepSpec};

pub mod runner;

/// Expand `spec` against `base` into the ordered list of combinations.
///
/// The first axis varies slowest and the last fastest. An empty spec yields
/// exactly the base; any axis with no values yields no combinations (a no-op
/// sweep, not an error). Every element is an independent copy of `base` with
/// exactly the spec's parameters overridden.
pub fn expand(base: &ParameterSet, spec: &SweepSpec) -> Vec<ParameterSet> {
    let total = spec.combination_count();
    let mut out = Vec::with_capacity(total);

    for index in 0..total {
        let mut inputs = *base;
        // Mixed-radix decode: the last axis is the least significant digit.
        let mut rem = index;
        for axis in spec.axes.iter().rev() {
            let n = axis.values.len();
            inputs.set(axis.param, axis.values[rem % n]);
            rem /= n;
        }
        out.push(inputs);
    }

    out
}
