//! Shared matching pipeline used by the `run` and `select` commands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! ingest -> selection -> tolerance -> classification
//!
//! The commands can then focus on presentation (printing, plotting, exports).

use std::path::Path;

use crate::domain::{Candidate, ChosenIdeal, ClassificationRecord, Curve, CurveSet, MatchConfig, MissingSamplePolicy};
use crate::error::{AppError, CurveError};
use crate::fit::{classify_all, select_all, with_tolerances};
use crate::io::ingest::{IngestedSet, load_curve_set, test_samples};

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub ideal: IngestedSet,
    pub training: IngestedSet,
    /// `None` for selection-only runs.
    pub test: Option<IngestedSet>,
    pub chosen: Vec<ChosenIdeal>,
    pub classifications: Vec<ClassificationRecord>,
}

/// Execute the full pipeline from the files named in `config`.
pub fn run_match(config: &MatchConfig) -> Result<RunOutput, AppError> {
    let ideal = load_curve_set(&config.ideal_path)?;
    let training = load_curve_set(&config.train_path)?;
    let test = config.test_path.as_deref().map(load_curve_set).transpose()?;

    run_match_with_data(ideal, training, test, config.tolerance_factor, config.on_missing)
}

/// Execute the pipeline on already ingested data.
pub fn run_match_with_data(
    ideal: IngestedSet,
    training: IngestedSet,
    test: Option<IngestedSet>,
    tolerance_factor: f64,
    on_missing: MissingSamplePolicy,
) -> Result<RunOutput, AppError> {
    // 1) One ideal per training curve. Loss compares by position, so both
    //    files must have kept the same rows.
    ensure_shared_grid(&ideal.set, &training.set)?;
    let selections = select_all(training.set.curves(), ideal.set.curves())?;

    // 2) Tolerance per selection.
    let chosen = with_tolerances(selections, tolerance_factor)?;
    for c in &chosen {
        tracing::info!(
            training = c.training().name(),
            ideal = c.ideal().name(),
            sse = c.selection.error,
            largest_deviation = c.largest_deviation,
            tolerance = c.tolerance,
            "selected ideal function"
        );
    }

    // 3) Classify test points against the chosen ideals.
    let classifications = match &test {
        Some(test) => {
            let points = test_samples(&test.set);
            let candidates: Vec<Candidate<'_>> = chosen.iter().map(ChosenIdeal::as_candidate).collect();
            let records = classify_all(&points, &candidates, on_missing)?;

            let classified = records.iter().filter(|r| r.is_classified()).count();
            tracing::info!(
                points = records.len(),
                classified,
                unclassified = records.len() - classified,
                "classified test points"
            );
            let skipped = skipped_lookups(&records);
            if skipped > 0 {
                tracing::warn!(
                    skipped,
                    points = records.iter().filter(|r| r.skipped_candidates > 0).count(),
                    "test x-values missing from chosen ideal curves; those candidates were skipped"
                );
            }
            records
        }
        None => Vec::new(),
    };

    Ok(RunOutput {
        ideal,
        training,
        test,
        chosen,
        classifications,
    })
}

/// Total candidate lookups skipped for lack of a sample at the test x.
pub fn skipped_lookups(records: &[ClassificationRecord]) -> usize {
    records.iter().map(|r| r.skipped_candidates).sum()
}

/// Every training curve must sit on the ideal set's x-grid.
///
/// Length differences are left to selection, which reports them as
/// `DimensionMismatch`.
fn ensure_shared_grid(ideal: &CurveSet, training: &CurveSet) -> Result<(), CurveError> {
    let Some(reference) = ideal.first() else {
        return Ok(());
    };
    for curve in training.iter() {
        check_grid(reference, curve)?;
    }
    Ok(())
}

fn check_grid(reference: &Curve, candidate: &Curve) -> Result<(), CurveError> {
    let mismatch = reference
        .iter()
        .zip(candidate.iter())
        .find(|(r, c)| r.x != c.x);
    match mismatch {
        Some((r, c)) => Err(CurveError::GridMismatch {
            reference: reference.name().to_string(),
            candidate: candidate.name().to_string(),
            reference_x: r.x,
            candidate_x: c.x,
        }),
        None => Ok(()),
    }
}

/// Validate user-supplied configuration before any work is done.
pub fn validate_config(config: &MatchConfig) -> Result<(), AppError> {
    if !(config.tolerance_factor.is_finite() && config.tolerance_factor > 0.0) {
        return Err(AppError::new(
            2,
            format!(
                "Invalid tolerance factor {} (must be finite and > 0).",
                config.tolerance_factor
            ),
        ));
    }
    if config.plot && (config.plot_width == 0 || config.plot_height == 0) {
        return Err(AppError::new(2, "Plot width and height must be > 0."));
    }
    Ok(())
}

/// Create the export directory. Called only once there is something to write.
pub fn ensure_export_dir(dir: &Path) -> Result<(), AppError> {
    std::fs::create_dir_all(dir)
        .map_err(|e| AppError::new(2, format!("Failed to create export dir '{}': {e}", dir.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::ingest::read_curve_set;
    use std::path::PathBuf;

    fn ingest(csv: &str) -> IngestedSet {
        read_curve_set(csv.as_bytes()).unwrap()
    }

    fn config(factor: f64) -> MatchConfig {
        MatchConfig {
            ideal_path: PathBuf::from("ideal.csv"),
            train_path: PathBuf::from("train.csv"),
            test_path: None,
            tolerance_factor: factor,
            on_missing: MissingSamplePolicy::Skip,
            plot: false,
            plot_width: 72,
            plot_height: 18,
            export_dir: None,
            export_summary: None,
        }
    }

    #[test]
    fn end_to_end_on_small_grid() {
        let ideal = ingest("x,y1,y2,y3\n1,2,1,0\n2,4,3,0\n3,5.9,5,0\n");
        let training = ingest("x,y1,y2\n1,2,0.1\n2,4,0\n3,6,-0.1\n");
        let test = ingest("x,y\n3,5.95\n3,7.0\n1,0.05\n2.5,1\n");

        let run = run_match_with_data(
            ideal,
            training,
            Some(test),
            std::f64::consts::SQRT_2,
            MissingSamplePolicy::Skip,
        )
        .unwrap();

        let picks: Vec<(&str, &str)> = run
            .chosen
            .iter()
            .map(|c| (c.training().name(), c.ideal().name()))
            .collect();
        assert_eq!(picks, vec![("y1", "y1"), ("y2", "y3")]);
        assert!((run.chosen[0].tolerance - 0.1 * std::f64::consts::SQRT_2).abs() < 1e-9);

        let r = &run.classifications;
        assert_eq!(r.len(), 4);
        assert_eq!(r[0].ideal_name(), Some("y1"));
        assert!((r[0].distance().unwrap() - 0.05).abs() < 1e-9);
        assert!(!r[1].is_classified());
        assert_eq!(r[2].ideal_name(), Some("y3"));
        // Off-grid x: every candidate skipped -> unclassified.
        assert!(!r[3].is_classified());
    }

    #[test]
    fn off_grid_test_point_aborts_under_abort_policy() {
        let ideal = ingest("x,y1\n1,2\n2,4\n");
        let training = ingest("x,y1\n1,2\n2,4.5\n");
        let test = ingest("x,y\n1.5,3\n");

        let err = run_match_with_data(ideal, training, Some(test), 1.0, MissingSamplePolicy::Abort).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn mismatched_grids_fail_selection() {
        let ideal = ingest("x,y1\n1,2\n2,4\n3,6\n");
        let training = ingest("x,y1\n1,2\n2,4\n");
        let err = run_match_with_data(ideal, training, None, 1.0, MissingSamplePolicy::Skip).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn selection_only_run_has_no_classifications() {
        let ideal = ingest("x,y1\n1,2\n2,4\n");
        let training = ingest("x,y1\n1,2\n2,4\n");
        let run = run_match_with_data(ideal, training, None, 1.0, MissingSamplePolicy::Skip).unwrap();
        assert_eq!(run.chosen.len(), 1);
        assert!(run.classifications.is_empty());
        assert!(run.test.is_none());
    }

    #[test]
    fn non_positive_tolerance_factor_is_rejected() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert_eq!(validate_config(&config(bad)).unwrap_err().exit_code(), 2);
        }
        assert!(validate_config(&config(std::f64::consts::SQRT_2)).is_ok());
    }

    #[test]
    fn rows_dropped_at_different_x_fail_instead_of_misaligning() {
        let ideal = ingest("x,y1,y2\n1,1,0\n2,oops,0\n3,3,0\n4,4,0\n");
        let training = ingest("x,y1\n1,1\n2,2\n3,bad\n4,4\n");
        assert_eq!(ideal.rows_used, 3);
        assert_eq!(training.rows_used, 3);

        let err = run_match_with_data(ideal, training, None, 1.0, MissingSamplePolicy::Skip).unwrap_err();
        assert_eq!(err.exit_code(), 4);
        assert!(err.to_string().contains("x=2"), "{err}");
    }

    #[test]
    fn off_grid_test_points_are_counted_as_skipped() {
        let ideal = ingest("x,y1\n1,2\n2,4\n");
        let training = ingest("x,y1\n1,2\n2,4.5\n");
        let test = ingest("x,y\n1,2\n1.5,3\n7,0\n");

        let run = run_match_with_data(ideal, training, Some(test), 1.0, MissingSamplePolicy::Skip).unwrap();
        assert_eq!(skipped_lookups(&run.classifications), 2);
        assert_eq!(run.classifications[0].skipped_candidates, 0);
        assert_eq!(run.classifications[0].ideal_name(), Some("y1"));
    }

    #[test]
    fn validation_does_not_touch_the_export_dir() {
        let dir = std::env::temp_dir().join(format!("ideal_export_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        let mut cfg = config(1.0);
        cfg.export_dir = Some(dir.clone());

        validate_config(&cfg).unwrap();
        assert!(!dir.exists());

        ensure_export_dir(&dir).unwrap();
        assert!(dir.is_dir());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
