//! Input/output helpers.
//!
//! - CSV ingest into curve sets (`ingest`)
//! - curve table + mapping CSV exports (`export`)
//! - run summary JSON read/write (`summary`)

pub mod export;
pub mod ingest;
pub mod summary;

pub use export::*;
pub use ingest::*;
pub use summary::*;
