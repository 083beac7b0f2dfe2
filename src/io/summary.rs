//! Read/write run summary JSON files.
//!
//! The run file is the "portable" record of a matching run:
//! - tolerance factor and missing-sample policy in effect
//! - every training -> ideal selection with its grids and tolerance
//! - every classified test point
//!
//! The schema is defined by `domain::RunSummaryFile`.

use std::fs::File;
use std::path::Path;

use chrono::Utc;

use crate::domain::{
    ChosenIdeal, ClassificationRecord, Curve, CurveGrid, MissingSamplePolicy, RunSummaryFile, SelectionRecord,
    SelectionResult,
};
use crate::error::AppError;

/// Assemble the run file from in-memory results.
pub fn build_run_summary(
    chosen: &[ChosenIdeal],
    classifications: &[ClassificationRecord],
    tolerance_factor: f64,
    on_missing: MissingSamplePolicy,
) -> RunSummaryFile {
    RunSummaryFile {
        tool: "ideal".to_string(),
        generated_at: Utc::now(),
        tolerance_factor,
        on_missing,
        selections: chosen
            .iter()
            .map(|c| SelectionRecord {
                training: CurveGrid::from(c.training()),
                ideal: CurveGrid::from(c.ideal()),
                chosen_index: c.selection.chosen_index,
                error: c.selection.error,
                largest_deviation: c.largest_deviation,
                tolerance: c.tolerance,
            })
            .collect(),
        classifications: classifications.to_vec(),
    }
}

/// Rebuild the chosen ideals from the stored grids; nothing is recomputed.
pub fn chosen_from_summary(summary: &RunSummaryFile) -> Vec<ChosenIdeal> {
    summary
        .selections
        .iter()
        .map(|s| ChosenIdeal {
            selection: SelectionResult {
                training: Curve::from(&s.training),
                chosen: Curve::from(&s.ideal),
                chosen_index: s.chosen_index,
                error: s.error,
            },
            largest_deviation: s.largest_deviation,
            tolerance_factor: summary.tolerance_factor,
            tolerance: s.tolerance,
        })
        .collect()
}

/// Write a run summary JSON file.
pub fn write_run_summary_json(path: &Path, summary: &RunSummaryFile) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create summary JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, summary)
        .map_err(|e| AppError::new(2, format!("Failed to write summary JSON: {e}")))?;
    Ok(())
}

/// Read a run summary JSON file.
pub fn read_run_summary_json(path: &Path) -> Result<RunSummaryFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open summary JSON '{}': {e}", path.display())))?;
    let summary: RunSummaryFile =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid summary JSON: {e}")))?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Match, Sample};
    use crate::fit::{select_best, with_tolerance};

    #[test]
    fn summary_file_survives_disk() {
        let train = Curve::from_xy("y1", &[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]);
        let ideal = Curve::from_xy("y9", &[1.0, 2.0, 3.0], &[2.0, 4.0, 5.9]);
        let decoy = Curve::from_xy("y2", &[1.0, 2.0, 3.0], &[-5.0, -5.0, -5.0]);
        let selection = select_best(&train, &[decoy, ideal.clone()]).unwrap();
        let chosen = vec![with_tolerance(selection, std::f64::consts::SQRT_2).unwrap()];
        let records = vec![ClassificationRecord {
            point: Sample::new(3.0, 5.95),
            assignment: Some(Match {
                candidate_index: 0,
                ideal: "y9".to_string(),
                distance: 0.05,
            }),
            skipped_candidates: 0,
        }];

        let summary = build_run_summary(&chosen, &records, std::f64::consts::SQRT_2, MissingSamplePolicy::Skip);
        assert_eq!(summary.selections[0].ideal.name, "y9");
        assert_eq!(summary.selections[0].training.y, vec![2.0, 4.0, 6.0]);

        let path = std::env::temp_dir().join(format!("ideal_summary_{}.json", std::process::id()));
        write_run_summary_json(&path, &summary).unwrap();
        let loaded = read_run_summary_json(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded.tool, "ideal");
        assert_eq!(loaded.on_missing, MissingSamplePolicy::Skip);
        assert_eq!(loaded.selections.len(), 1);
        assert_eq!(loaded.classifications[0].ideal_name(), Some("y9"));
        assert_eq!(Curve::from(&loaded.selections[0].ideal), ideal);

        let rebuilt = chosen_from_summary(&loaded);
        assert_eq!(rebuilt[0].selection.chosen_index, 1);
        assert_eq!(rebuilt[0].ideal(), &ideal);
        assert_eq!(rebuilt[0].tolerance, chosen[0].tolerance);
    }

    #[test]
    fn missing_file_is_config_error() {
        let err = read_run_summary_json(Path::new("/definitely/not/here.json")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
