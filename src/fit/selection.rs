//! Best-of-N selection of an ideal curve for each training curve.
//!
//! For one training curve we compute the squared error against every
//! candidate and keep the minimum. Loss evaluation runs in parallel, but the
//! minimum is taken with a sequential strict `<` scan over candidate order,
//! so on equal error the earliest candidate always wins.

use rayon::prelude::*;

use crate::domain::{Curve, SelectionResult};
use crate::error::CurveError;
use crate::fit::loss::squared_error;

/// Pick the candidate with the lowest squared error against `reference`.
///
/// Samples are expected to be finite. A NaN error never beats a non-NaN one,
/// so the result is the minimum over the comparable errors.
pub fn select_best(reference: &Curve, candidates: &[Curve]) -> Result<SelectionResult, CurveError> {
    if candidates.is_empty() {
        return Err(CurveError::EmptyCandidateSet {
            reference: reference.name().to_string(),
        });
    }

    // Evaluate each candidate independently (parallel). Results keep input order.
    let errors: Vec<Result<f64, CurveError>> = candidates
        .par_iter()
        .map(|candidate| squared_error(reference, candidate))
        .collect();

    let mut best: Option<(usize, f64)> = None;
    for (idx, error) in errors.into_iter().enumerate() {
        let error = error?;
        let improves = match best {
            None => true,
            Some((_, best_error)) => error < best_error || (best_error.is_nan() && !error.is_nan()),
        };
        if improves {
            best = Some((idx, error));
        }
    }

    let Some((chosen_index, error)) = best else {
        return Err(CurveError::EmptyCandidateSet {
            reference: reference.name().to_string(),
        });
    };

    tracing::trace!(
        training = reference.name(),
        ideal = candidates[chosen_index].name(),
        error,
        "selected candidate"
    );

    Ok(SelectionResult {
        training: reference.clone(),
        chosen: candidates[chosen_index].clone(),
        chosen_index,
        error,
    })
}

/// Run `select_best` for every training curve, in parallel.
///
/// Output order follows `training`. If several training curves fail, the
/// error of the first one (in input order) is returned.
pub fn select_all(training: &[Curve], candidates: &[Curve]) -> Result<Vec<SelectionResult>, CurveError> {
    let results: Vec<Result<SelectionResult, CurveError>> = training
        .par_iter()
        .map(|reference| select_best(reference, candidates))
        .collect();
    results.into_iter().collect()
}
