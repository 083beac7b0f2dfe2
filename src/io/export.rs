//! Export input tables and the test-point mapping to CSV.
//!
//! Column naming follows the results database layout the tool has always
//! produced, so downstream spreadsheets keep working:
//!
//! - curve tables: `X (training function)`, `Y1 (training function)`, ...
//! - mapping: `X (test function)`, `Y (test function)`, `Delta Y (test function)`,
//!   `Number of ideal function`

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::{ClassificationRecord, CurveSet};
use crate::error::AppError;

pub const MAPPING_HEADER: [&str; 4] = [
    "X (test function)",
    "Y (test function)",
    "Delta Y (test function)",
    "Number of ideal function",
];

/// Marker written in the ideal-name column for unclassified points.
pub const UNCLASSIFIED: &str = "-";

/// Write a curve set back out with suffixed column names.
///
/// All curves of the set are expected to share one x-grid (as produced by ingest).
pub fn write_curve_table_csv(path: &Path, set: &CurveSet, suffix: &str) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create CSV '{}': {e}", path.display())))?;
    write_curve_table(file, set, suffix)
}

pub fn write_curve_table<W: Write>(out: W, set: &CurveSet, suffix: &str) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(out);

    let mut header = vec![format!("{}{suffix}", capitalize("x"))];
    header.extend(set.iter().map(|c| format!("{}{suffix}", capitalize(c.name()))));
    writer
        .write_record(&header)
        .map_err(|e| AppError::new(2, format!("Failed to write CSV header: {e}")))?;

    let Some(grid) = set.first() else {
        return flush(writer);
    };
    for (row, sample) in grid.iter().enumerate() {
        let mut record = vec![sample.x.to_string()];
        for curve in set {
            let y = curve.samples().get(row).map(|s| s.y.to_string()).unwrap_or_default();
            record.push(y);
        }
        writer
            .write_record(&record)
            .map_err(|e| AppError::new(2, format!("Failed to write CSV row: {e}")))?;
    }

    flush(writer)
}

/// Write one row per classified test point.
pub fn write_mapping_csv(path: &Path, records: &[ClassificationRecord]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create mapping CSV '{}': {e}", path.display())))?;
    write_mapping(file, records)
}

pub fn write_mapping<W: Write>(out: W, records: &[ClassificationRecord]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(out);
    writer
        .write_record(MAPPING_HEADER)
        .map_err(|e| AppError::new(2, format!("Failed to write mapping CSV header: {e}")))?;

    for r in records {
        let (delta, ideal) = match &r.assignment {
            Some(m) => (m.distance.to_string(), ideal_number(&m.ideal)),
            None => (String::new(), UNCLASSIFIED.to_string()),
        };
        writer
            .write_record([r.point.x.to_string(), r.point.y.to_string(), delta, ideal])
            .map_err(|e| AppError::new(2, format!("Failed to write mapping CSV row: {e}")))?;
    }

    flush(writer)
}

/// `y42` -> `N42`.
pub fn ideal_number(name: &str) -> String {
    name.replace('y', "N")
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn flush<W: Write>(mut writer: csv::Writer<W>) -> Result<(), AppError> {
    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush CSV: {e}")))
}
