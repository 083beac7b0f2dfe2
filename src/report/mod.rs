//! Reporting utilities: classification tallies and formatted terminal output.

pub mod format;

pub use format::*;

use crate::domain::{ChosenIdeal, ClassificationRecord};

/// How many test points each chosen ideal received.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationTally {
    /// `(ideal name, assigned points)` in chosen-ideal order; an ideal chosen
    /// by several training curves is listed once.
    pub per_ideal: Vec<(String, usize)>,
    pub unclassified: usize,
    pub total: usize,
}

/// Count assignments per chosen ideal.
pub fn tally_classifications(chosen: &[ChosenIdeal], records: &[ClassificationRecord]) -> ClassificationTally {
    let mut per_ideal: Vec<(String, usize)> = Vec::new();
    for c in chosen {
        let name = c.ideal().name();
        if !per_ideal.iter().any(|(n, _)| n == name) {
            per_ideal.push((name.to_string(), 0));
        }
    }

    let mut unclassified = 0usize;
    for r in records {
        match r.ideal_name() {
            Some(name) => match per_ideal.iter_mut().find(|(n, _)| n == name) {
                Some((_, count)) => *count += 1,
                None => per_ideal.push((name.to_string(), 1)),
            },
            None => unclassified += 1,
        }
    }

    ClassificationTally {
        per_ideal,
        unclassified,
        total: records.len(),
    }
}
