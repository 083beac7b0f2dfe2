//! Curve matching.
//!
//! Responsibilities:
//!
//! - positional residual metrics (`loss`)
//! - best-of-N ideal selection per training curve (`selection`)
//! - acceptance tolerance per selection (`tolerance`)
//! - test point classification (`classify`)

pub mod classify;
pub mod loss;
pub mod selection;
pub mod tolerance;

pub use classify::*;
pub use loss::*;
pub use selection::*;
pub use tolerance::*;
