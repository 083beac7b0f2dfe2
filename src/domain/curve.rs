//! `Curve` and `CurveSet`: the data units every other module works on.
//!
//! A curve is a named, ordered list of `(x, y)` samples that never changes
//! after construction. Alongside the samples we keep an exact-match index
//! keyed by `x` so `value_at` is a map lookup rather than a scan.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::CurveError;

/// A single `(x, y)` observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub x: f64,
    pub y: f64,
}

impl Sample {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Sample {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Immutable named sequence of samples.
#[derive(Debug, Clone)]
pub struct Curve {
    name: String,
    samples: Vec<Sample>,
    /// `x` bit pattern -> position of the first sample with that `x`.
    index: HashMap<u64, usize>,
}

impl Curve {
    pub fn new(name: impl Into<String>, samples: Vec<Sample>) -> Self {
        let mut index = HashMap::with_capacity(samples.len());
        for (i, s) in samples.iter().enumerate() {
            if let Some(key) = x_key(s.x) {
                index.entry(key).or_insert(i);
            }
        }
        Self {
            name: name.into(),
            samples,
            index,
        }
    }

    /// Build a curve from parallel x / y columns.
    ///
    /// Extra values in the longer column are ignored.
    pub fn from_xy(name: impl Into<String>, x: &[f64], y: &[f64]) -> Self {
        let samples = x.iter().zip(y).map(|(&x, &y)| Sample { x, y }).collect();
        Self::new(name, samples)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Restartable forward traversal over the samples in stored order.
    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    pub fn xs(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.x)
    }

    pub fn ys(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.y)
    }

    /// Exact lookup of `y` at `x`.
    ///
    /// No interpolation or nearest-neighbour fallback: the queried `x` must be
    /// one of the curve's own grid points (compared with `==`).
    pub fn value_at(&self, x: f64) -> Result<f64, CurveError> {
        x_key(x)
            .and_then(|key| self.index.get(&key))
            .map(|&i| self.samples[i].y)
            .ok_or_else(|| CurveError::MissingSample {
                curve: self.name.clone(),
                x,
            })
    }
}

impl PartialEq for Curve {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.samples == other.samples
    }
}

impl<'a> IntoIterator for &'a Curve {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

/// Hash key for exact float equality: `-0.0` folds onto `0.0`, NaN has no key.
fn x_key(x: f64) -> Option<u64> {
    if x.is_nan() {
        return None;
    }
    if x == 0.0 {
        return Some(0.0_f64.to_bits());
    }
    Some(x.to_bits())
}

/// Ordered collection of curves with unique names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurveSet {
    curves: Vec<Curve>,
}

impl CurveSet {
    pub fn new(curves: Vec<Curve>) -> Self {
        Self { curves }
    }

    pub fn curves(&self) -> &[Curve] {
        &self.curves
    }

    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Curve> {
        self.curves.iter().find(|c| c.name() == name)
    }

    pub fn first(&self) -> Option<&Curve> {
        self.curves.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Curve> {
        self.curves.iter()
    }
}

impl<'a> IntoIterator for &'a CurveSet {
    type Item = &'a Curve;
    type IntoIter = std::slice::Iter<'a, Curve>;

    fn into_iter(self) -> Self::IntoIter {
        self.curves.iter()
    }
}
