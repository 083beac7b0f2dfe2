//! `ideal-fit` library crate.
//!
//! The binary (`ideal`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the matching core (`domain` + `fit`) is usable without the CSV/CLI layers
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod plot;
pub mod report;
