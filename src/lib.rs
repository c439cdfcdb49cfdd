//! `treb-sweep` library crate.
//!
//! The binary (`treb`) is a thin wrapper around this library so that:
//!
//! - sweep/aggregation logic is testable without a live browser
//! - the page binding stays isolated from everything else
//! - modules are easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod io;
pub mod report;
pub mod sim;
pub mod sweep;
pub mod webdriver;
