//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the curve data model (`Curve`, `Sample`, `CurveSet`)
//! - matching outputs (`SelectionResult`, `ChosenIdeal`, `ClassificationRecord`)
//! - run configuration and the portable run file schema

pub mod curve;
pub mod types;

pub use curve::*;
pub use types::*;
