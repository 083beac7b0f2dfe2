//! Error types.
//!
//! - `CurveError`: typed failures raised by the matching core (lookup, alignment, selection)
//! - `AppError`: what the binary reports, carrying the process exit code

/// Failures raised by the curve-matching core.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CurveError {
    /// Exact x lookup found no sample on the curve.
    #[error("curve `{curve}` has no sample at x={x}")]
    MissingSample { curve: String, x: f64 },

    /// Positional comparison between curves of different length.
    #[error(
        "cannot compare `{reference}` ({reference_len} samples) with `{candidate}` ({candidate_len} samples)"
    )]
    DimensionMismatch {
        reference: String,
        candidate: String,
        reference_len: usize,
        candidate_len: usize,
    },

    /// Two curves of equal length sampled on different x-grids.
    #[error("curve `{candidate}` is not on the grid of `{reference}`: x={candidate_x} where x={reference_x} was expected")]
    GridMismatch {
        reference: String,
        candidate: String,
        reference_x: f64,
        candidate_x: f64,
    },

    /// Selection was asked to choose from nothing.
    #[error("no candidate curves to match against `{reference}`")]
    EmptyCandidateSet { reference: String },
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<CurveError> for AppError {
    fn from(err: CurveError) -> Self {
        AppError::new(4, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curve_errors_map_to_exit_code_4() {
        let err: AppError = CurveError::EmptyCandidateSet {
            reference: "y1".to_string(),
        }
        .into();
        assert_eq!(err.exit_code(), 4);
        assert!(err.to_string().contains("y1"));
    }

    #[test]
    fn missing_sample_message_names_curve_and_x() {
        let err = CurveError::MissingSample {
            curve: "y7".to_string(),
            x: 2.5,
        };
        assert_eq!(err.to_string(), "curve `y7` has no sample at x=2.5");
    }
}
