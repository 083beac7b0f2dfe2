//! Assign test points to at most one chosen ideal curve.
//!
//! A candidate qualifies when `|y_ideal(x) - y| < tolerance` (strict). The
//! closest qualifying candidate wins; on equal distance the earlier candidate
//! in the input sequence is kept.

use rayon::prelude::*;

use crate::domain::{Candidate, ClassificationRecord, Match, MissingSamplePolicy, Sample};
use crate::error::CurveError;

/// Classify a single sample against `candidates`.
///
/// Returns `Ok(None)` when no candidate qualifies. A candidate without a
/// sample at `point.x` is skipped or aborts the call, depending on `policy`.
pub fn classify(
    point: Sample,
    candidates: &[Candidate<'_>],
    policy: MissingSamplePolicy,
) -> Result<Option<Match>, CurveError> {
    classify_record(point, candidates, policy).map(|record| record.assignment)
}

/// Like [`classify`], but keeps the point and the number of skipped candidates.
pub fn classify_record(
    point: Sample,
    candidates: &[Candidate<'_>],
    policy: MissingSamplePolicy,
) -> Result<ClassificationRecord, CurveError> {
    let mut best: Option<Match> = None;
    let mut skipped_candidates = 0;

    for (candidate_index, candidate) in candidates.iter().enumerate() {
        let y_ideal = match candidate.curve.value_at(point.x) {
            Ok(y) => y,
            Err(err) => match policy {
                MissingSamplePolicy::Abort => return Err(err),
                MissingSamplePolicy::Skip => {
                    tracing::debug!(
                        ideal = candidate.curve.name(),
                        x = point.x,
                        "no ideal sample at test x; candidate skipped"
                    );
                    skipped_candidates += 1;
                    continue;
                }
            },
        };

        let distance = (y_ideal - point.y).abs();
        let qualifies = distance < candidate.tolerance;
        if !qualifies {
            continue;
        }

        let closer = best.as_ref().is_none_or(|b| distance < b.distance);
        if closer {
            best = Some(Match {
                candidate_index,
                ideal: candidate.curve.name().to_string(),
                distance,
            });
        }
    }

    Ok(ClassificationRecord {
        point,
        assignment: best,
        skipped_candidates,
    })
}

/// Classify every sample in parallel, returning records in input order.
///
/// Under `MissingSamplePolicy::Abort` the error of the first failing sample
/// (in input order) is returned.
pub fn classify_all(
    points: &[Sample],
    candidates: &[Candidate<'_>],
    policy: MissingSamplePolicy,
) -> Result<Vec<ClassificationRecord>, CurveError> {
    let results: Vec<Result<ClassificationRecord, CurveError>> = points
        .par_iter()
        .map(|&point| classify_record(point, candidates, policy))
        .collect();
    results.into_iter().collect()
}
