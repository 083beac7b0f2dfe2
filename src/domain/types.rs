//! Shared domain types.
//!
//! These types are intentionally kept lightweight so they can be:
//!
//! - produced by selection / classification
//! - exported to CSV / JSON
//! - reloaded later for plotting

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::curve::{Curve, Sample};

/// Default multiplier applied to the largest training deviation.
pub const DEFAULT_TOLERANCE_FACTOR: f64 = 1.0;

/// What classification does when a candidate has no sample at the test point's `x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MissingSamplePolicy {
    /// Treat the candidate as not applicable and keep evaluating the others.
    #[default]
    Skip,
    /// Fail the whole classification call.
    Abort,
}

/// Outcome of matching one training curve against the candidate set.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionResult {
    pub training: Curve,
    pub chosen: Curve,
    /// Position of `chosen` in the candidate sequence.
    pub chosen_index: usize,
    /// Sum of squared errors between `training` and `chosen`.
    pub error: f64,
}

/// A selected ideal curve together with its acceptance tolerance.
#[derive(Debug, Clone, PartialEq)]
pub struct ChosenIdeal {
    pub selection: SelectionResult,
    pub largest_deviation: f64,
    pub tolerance_factor: f64,
    pub tolerance: f64,
}

impl ChosenIdeal {
    pub fn ideal(&self) -> &Curve {
        &self.selection.chosen
    }

    pub fn training(&self) -> &Curve {
        &self.selection.training
    }

    pub fn as_candidate(&self) -> Candidate<'_> {
        Candidate {
            curve: &self.selection.chosen,
            tolerance: self.tolerance,
        }
    }
}

/// A curve a test point may be assigned to, with its acceptance radius.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub curve: &'a Curve,
    pub tolerance: f64,
}

/// Assignment of a test point to a candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub candidate_index: usize,
    pub ideal: String,
    /// `|y_ideal(x) - y|`, always strictly below the candidate's tolerance.
    pub distance: f64,
}

/// Classification of one test sample; `assignment` is `None` when unclassified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationRecord {
    pub point: Sample,
    pub assignment: Option<Match>,
    /// Candidates with no sample at `point.x` (only non-zero under `Skip`).
    #[serde(default)]
    pub skipped_candidates: usize,
}

impl ClassificationRecord {
    pub fn is_classified(&self) -> bool {
        self.assignment.is_some()
    }

    pub fn ideal_name(&self) -> Option<&str> {
        self.assignment.as_ref().map(|m| m.ideal.as_str())
    }

    pub fn distance(&self) -> Option<f64> {
        self.assignment.as_ref().map(|m| m.distance)
    }
}

/// Run configuration, resolved from CLI arguments and the environment.
#[derive(Debug, Clone)]
pub struct MatchConfig {
    pub ideal_path: PathBuf,
    pub train_path: PathBuf,
    /// Absent for selection-only runs.
    pub test_path: Option<PathBuf>,

    pub tolerance_factor: f64,
    pub on_missing: MissingSamplePolicy,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    /// Directory for the CSV tables (`training.csv`, `ideal.csv`, `mapping.csv`).
    pub export_dir: Option<PathBuf>,
    /// Portable run file (JSON).
    pub export_summary: Option<PathBuf>,
}

/// Per-curve grid as stored in the run file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveGrid {
    pub name: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl From<&Curve> for CurveGrid {
    fn from(curve: &Curve) -> Self {
        Self {
            name: curve.name().to_string(),
            x: curve.xs().collect(),
            y: curve.ys().collect(),
        }
    }
}

impl From<&CurveGrid> for Curve {
    fn from(grid: &CurveGrid) -> Self {
        Curve::from_xy(grid.name.clone(), &grid.x, &grid.y)
    }
}

/// One training -> ideal selection as stored in the run file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionRecord {
    pub training: CurveGrid,
    pub ideal: CurveGrid,
    /// Position of `ideal` in the ideal set of the run.
    pub chosen_index: usize,
    pub error: f64,
    pub largest_deviation: f64,
    pub tolerance: f64,
}

/// Portable JSON representation of a complete run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummaryFile {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub tolerance_factor: f64,
    pub on_missing: MissingSamplePolicy,
    pub selections: Vec<SelectionRecord>,
    pub classifications: Vec<ClassificationRecord>,
}
