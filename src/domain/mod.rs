//! Domain types used throughout the driver.
//!
//! This module defines:
//!
//! - the simulator's input parameters (`Parameter`, `ParameterSet`)
//! - sweep declarations (`SweepAxis`, `SweepSpec`)
//! - recorded outputs (`Outcome`, `ResultRecord`, `SweepStats`)

pub mod types;

pub use types::*;
