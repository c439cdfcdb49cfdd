//! Input/output helpers.
//!
//! - sweep plan JSON (`plan`)
//! - result CSV export (`export`)

pub mod export;
pub mod plan;

pub use export::*;
pub use plan::*;
