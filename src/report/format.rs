//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the matching code stays clean and testable
//! - output changes are localized

use crate::app::pipeline::RunOutput;
use crate::domain::{ChosenIdeal, ClassificationRecord, MatchConfig};
use crate::io::ingest::IngestedSet;
use crate::report::ClassificationTally;

/// Format the full run header (datasets + configuration).
pub fn format_run_summary(run: &RunOutput, config: &MatchConfig) -> String {
    let mut out = String::new();

    out.push_str("=== ideal - training curve matching ===\n");
    out.push_str(&format!("Tolerance factor: {:.6}\n", config.tolerance_factor));
    out.push_str(&format!("Missing ideal sample: {:?}\n", config.on_missing));
    out.push_str(&format_dataset_line("Ideal", &run.ideal));
    out.push_str(&format_dataset_line("Training", &run.training));
    if let Some(test) = &run.test {
        out.push_str(&format_dataset_line("Test", test));
    }
    out.push('\n');

    out
}

fn format_dataset_line(label: &str, ingest: &IngestedSet) -> String {
    let mut line = format!(
        "{label}: curves={} | rows={}/{}",
        ingest.set.len(),
        ingest.rows_used,
        ingest.rows_read
    );
    if !ingest.row_errors.is_empty() {
        line.push_str(&format!(" | skipped rows={}", ingest.row_errors.len()));
    }
    line.push('\n');
    line
}

/// Format the training -> ideal selection table.
pub fn format_selections(chosen: &[ChosenIdeal]) -> String {
    let mut out = String::new();
    out.push_str("Selected ideal functions:\n");
    out.push_str(
        format!(
            "{:<12} {:<12} {:>14} {:>14} {:>14}\n",
            "training", "ideal", "sse", "max_dev", "tolerance"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!("{:-<12} {:-<12} {:-<14} {:-<14} {:-<14}\n", "", "", "", "", "").trim_end(),
    );
    out.push('\n');

    for c in chosen {
        out.push_str(
            format!(
                "{:<12} {:<12} {:>14.6} {:>14.6} {:>14.6}\n",
                truncate(c.training().name(), 12),
                truncate(c.ideal().name(), 12),
                c.selection.error,
                c.largest_deviation,
                c.tolerance,
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// Format the per-point mapping table (`-` marks unclassified points).
pub fn format_classifications(records: &[ClassificationRecord]) -> String {
    let mut out = String::new();
    out.push_str("Test point mapping:\n");
    out.push_str(format!("{:>12} {:>12} {:>12} {:<12}\n", "x", "y", "delta_y", "ideal").trim_end());
    out.push('\n');
    out.push_str(format!("{:-<12} {:-<12} {:-<12} {:-<12}\n", "", "", "", "").trim_end());
    out.push('\n');

    for r in records {
        let delta = r.distance().map(|d| format!("{d:.6}")).unwrap_or_else(|| "-".to_string());
        out.push_str(
            format!(
                "{:>12.4} {:>12.4} {:>12} {:<12}\n",
                r.point.x,
                r.point.y,
                delta,
                truncate(r.ideal_name().unwrap_or("-"), 12),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// Format assignment counts per ideal.
pub fn format_tally(tally: &ClassificationTally) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Classified {}/{} test points ({} unclassified)\n",
        tally.total - tally.unclassified,
        tally.total,
        tally.unclassified
    ));
    for (name, count) in &tally.per_ideal {
        out.push_str(&format!("- {name}: {count}\n"));
    }
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
