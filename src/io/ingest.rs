//! CSV ingest into named curves.
//!
//! Input files use the "wide" layout: one `x` column plus one column per
//! curve, e.g. `x,y1,y2,y3,y4`. Every curve of a file shares that file's
//! x-grid, which is what the positional loss relies on.
//!
//! Design goals:
//! - **Strict schema** (missing `x` or curve columns -> exit code 2)
//! - **Row-level validation** (a bad cell skips the whole row for every curve,
//!   so grids stay aligned; the problem is reported, not hidden)
//! - **Deterministic behavior**: curve order = column order

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::domain::{Curve, CurveSet, Sample};
use crate::error::AppError;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub line: usize,
    pub column: Option<String>,
    pub message: String,
}

/// Ingest output: curves + row-level diagnostics.
#[derive(Debug, Clone)]
pub struct IngestedSet {
    pub set: CurveSet,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

/// Load a wide-format CSV file into a `CurveSet`.
pub fn load_curve_set(path: &Path) -> Result<IngestedSet, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    let ingested = read_curve_set(file).map_err(|e| {
        AppError::new(e.exit_code(), format!("{}: {e}", path.display()))
    })?;

    tracing::info!(
        path = %path.display(),
        curves = ingested.set.len(),
        rows_read = ingested.rows_read,
        rows_used = ingested.rows_used,
        "loaded curve set"
    );
    for err in &ingested.row_errors {
        tracing::warn!(
            path = %path.display(),
            line = err.line,
            column = err.column.as_deref().unwrap_or("-"),
            "{}",
            err.message
        );
    }

    Ok(ingested)
}

/// Parse a wide-format CSV stream into a `CurveSet`.
pub fn read_curve_set<R: Read>(reader: R) -> Result<IngestedSet, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();

    let layout = resolve_layout(&headers)?;

    let mut xs = Vec::new();
    let mut ys: Vec<Vec<f64>> = vec![Vec::new(); layout.curves.len()];
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: records() starts after the header, CSV lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    column: None,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, &layout) {
            Ok((x, row_ys)) => {
                xs.push(x);
                for (column, y) in ys.iter_mut().zip(row_ys) {
                    column.push(y);
                }
            }
            Err(e) => row_errors.push(RowError { line, ..e }),
        }
    }

    let rows_used = xs.len();
    if rows_used == 0 {
        return Err(AppError::new(3, "No valid rows remain after parsing."));
    }

    let curves = layout
        .curves
        .iter()
        .zip(ys)
        .map(|((_, name), y)| Curve::from_xy(name.clone(), &xs, &y))
        .collect();

    Ok(IngestedSet {
        set: CurveSet::new(curves),
        row_errors,
        rows_read,
        rows_used,
    })
}

/// Column positions resolved from the header row.
#[derive(Debug)]
struct Layout {
    x: usize,
    /// `(column index, curve name)` in header order.
    curves: Vec<(usize, String)>,
}

fn resolve_layout(headers: &StringRecord) -> Result<Layout, AppError> {
    let x = headers
        .iter()
        .position(|h| normalize_header_name(h) == "x")
        .ok_or_else(|| AppError::new(2, "Missing required column: `x`"))?;

    let mut curves: Vec<(usize, String)> = Vec::new();
    for (idx, name) in headers.iter().enumerate() {
        if idx == x {
            continue;
        }
        let name = name.trim().trim_start_matches('\u{feff}').to_string();
        if name.is_empty() {
            return Err(AppError::new(2, format!("Column {} has an empty header.", idx + 1)));
        }
        if curves.iter().any(|(_, existing)| *existing == name) {
            return Err(AppError::new(2, format!("Duplicate curve column: `{name}`")));
        }
        curves.push((idx, name));
    }

    if curves.is_empty() {
        return Err(AppError::new(2, "No curve columns found next to `x`."));
    }

    Ok(Layout { x, curves })
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header. If we don't strip it, `x` would not be found.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn parse_row(record: &StringRecord, layout: &Layout) -> Result<(f64, Vec<f64>), RowError> {
    let x = parse_cell(record, layout.x, "x")?;
    let ys = layout
        .curves
        .iter()
        .map(|(idx, name)| parse_cell(record, *idx, name))
        .collect::<Result<Vec<f64>, RowError>>()?;
    Ok((x, ys))
}

fn parse_cell(record: &StringRecord, idx: usize, column: &str) -> Result<f64, RowError> {
    let row_error = |message: String| RowError {
        line: 0,
        column: Some(column.to_string()),
        message,
    };

    let raw = record
        .get(idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| row_error(format!("Missing value for `{column}`.")))?;
    let v = raw
        .parse::<f64>()
        .map_err(|_| row_error(format!("Invalid number '{raw}' for `{column}`.")))?;
    if !v.is_finite() {
        return Err(row_error(format!("Non-finite value '{raw}' for `{column}`.")));
    }
    Ok(v)
}

/// Test samples are read from the first curve column of a test file.
pub fn test_samples(set: &CurveSet) -> Vec<Sample> {
    set.first().map(|c| c.samples().to_vec()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_wide_layout_in_column_order() {
        let data = "x,y1,y2\n1,2,3\n2,4,5\n3,6,7\n";
        let ingested = read_curve_set(data.as_bytes()).unwrap();

        assert_eq!(ingested.rows_read, 3);
        assert_eq!(ingested.rows_used, 3);
        let names: Vec<&str> = ingested.set.iter().map(Curve::name).collect();
        assert_eq!(names, vec!["y1", "y2"]);

        let y2 = ingested.set.get("y2").unwrap();
        assert_eq!(y2.value_at(2.0).unwrap(), 5.0);
        assert_eq!(y2.xs().collect::<Vec<_>>(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn x_column_may_be_anywhere_and_have_a_bom() {
        let data = "y1,\u{feff}X\n10,1\n20,2\n";
        let ingested = read_curve_set(data.as_bytes()).unwrap();
        let y1 = ingested.set.get("y1").unwrap();
        assert_eq!(y1.value_at(2.0).unwrap(), 20.0);
    }

    #[test]
    fn bad_cell_skips_row_for_all_curves() {
        let data = "x,y1,y2\n1,2,3\n2,oops,5\n3,6,\n4,8,9\n";
        let ingested = read_curve_set(data.as_bytes()).unwrap();

        assert_eq!(ingested.rows_read, 4);
        assert_eq!(ingested.rows_used, 2);
        assert_eq!(ingested.row_errors.len(), 2);
        assert_eq!(ingested.row_errors[0].line, 3);
        assert_eq!(ingested.row_errors[0].column.as_deref(), Some("y1"));
        assert_eq!(ingested.row_errors[1].line, 4);
        assert_eq!(ingested.row_errors[1].column.as_deref(), Some("y2"));

        for curve in &ingested.set {
            assert_eq!(curve.xs().collect::<Vec<_>>(), vec![1.0, 4.0]);
        }
    }

    #[test]
    fn non_finite_values_are_row_errors() {
        let data = "x,y\n1,inf\n2,NaN\n3,1\n";
        let ingested = read_curve_set(data.as_bytes()).unwrap();
        assert_eq!(ingested.rows_used, 1);
        assert_eq!(ingested.row_errors.len(), 2);
    }

    #[test]
    fn missing_x_column_is_schema_error() {
        let err = read_curve_set("a,b\n1,2\n".as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn only_x_column_is_schema_error() {
        let err = read_curve_set("x\n1\n".as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn duplicate_curve_names_are_rejected() {
        let err = read_curve_set("x,y,y\n1,2,3\n".as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn no_usable_rows_is_empty_dataset() {
        let err = read_curve_set("x,y\n1,a\n".as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_samples_come_from_first_curve() {
        let ingested = read_curve_set("x,y\n1.5,2\n-3,4\n".as_bytes()).unwrap();
        let samples = test_samples(&ingested.set);
        assert_eq!(samples, vec![Sample::new(1.5, 2.0), Sample::new(-3.0, 4.0)]);
        assert!(test_samples(&CurveSet::default()).is_empty());
    }
}
