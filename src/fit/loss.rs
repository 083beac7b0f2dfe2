//! Positional residual metrics between two curves on the same grid.
//!
//! Both metrics compare samples by index, not by `x`. Callers are trusted to
//! pass curves sharing one ordered x-grid; only the sample counts are checked.

use crate::domain::Curve;
use crate::error::CurveError;

/// Sum of squared residuals: `Σ (candidate.y[i] - reference.y[i])²`.
pub fn squared_error(reference: &Curve, candidate: &Curve) -> Result<f64, CurveError> {
    Ok(residuals(reference, candidate)?.map(|r| r * r).sum())
}

/// Largest absolute residual: `max |candidate.y[i] - reference.y[i]|`.
///
/// Two empty curves have a largest deviation of `0.0`.
pub fn largest_deviation(reference: &Curve, candidate: &Curve) -> Result<f64, CurveError> {
    Ok(residuals(reference, candidate)?
        .map(f64::abs)
        .fold(0.0, f64::max))
}

fn residuals<'a>(
    reference: &'a Curve,
    candidate: &'a Curve,
) -> Result<impl Iterator<Item = f64> + 'a, CurveError> {
    ensure_aligned(reference, candidate)?;
    Ok(reference
        .iter()
        .zip(candidate.iter())
        .map(|(r, c)| c.y - r.y))
}

fn ensure_aligned(reference: &Curve, candidate: &Curve) -> Result<(), CurveError> {
    if reference.len() != candidate.len() {
        return Err(CurveError::DimensionMismatch {
            reference: reference.name().to_string(),
            candidate: candidate.name().to_string(),
            reference_len: reference.len(),
            candidate_len: candidate.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn curve(name: &str, y: &[f64]) -> Curve {
        let x: Vec<f64> = (1..=y.len()).map(|i| i as f64).collect();
        Curve::from_xy(name, &x, y)
    }

    #[test]
    fn squared_error_known_value() {
        // Residuals 3, 3, 3 regardless of x-values (positional comparison).
        let a = Curve::from_xy("a", &[5.0, 7.0, 9.0], &[10.0, 11.0, 12.0]);
        let b = Curve::from_xy("b", &[1.0, 2.0, 3.0], &[7.0, 8.0, 9.0]);
        assert_eq!(squared_error(&a, &b).unwrap(), 27.0);
    }

    #[test]
    fn squared_error_self_is_zero() {
        let a = curve("a", &[0.3, -1.7, 42.0, 1e-9]);
        assert_eq!(squared_error(&a, &a).unwrap(), 0.0);
    }

    #[test]
    fn squared_error_is_symmetric() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let n = rng.gen_range(1..40);
            let ya: Vec<f64> = (0..n).map(|_| rng.gen_range(-100.0..100.0)).collect();
            let yb: Vec<f64> = (0..n).map(|_| rng.gen_range(-100.0..100.0)).collect();
            let a = curve("a", &ya);
            let b = curve("b", &yb);
            assert_eq!(squared_error(&a, &b).unwrap(), squared_error(&b, &a).unwrap());
        }
    }

    #[test]
    fn length_mismatch_is_dimension_error() {
        let a = curve("a", &[1.0, 2.0, 3.0]);
        let b = curve("b", &[1.0, 2.0]);
        let err = squared_error(&a, &b).unwrap_err();
        assert_eq!(
            err,
            CurveError::DimensionMismatch {
                reference: "a".to_string(),
                candidate: "b".to_string(),
                reference_len: 3,
                candidate_len: 2,
            }
        );
        assert!(largest_deviation(&a, &b).is_err());
    }

    #[test]
    fn largest_deviation_picks_max_abs_residual() {
        let train = curve("train", &[2.0, 4.0, 6.0]);
        let ideal = curve("ideal", &[2.5, 3.0, 6.2]);
        assert!((largest_deviation(&train, &ideal).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn largest_deviation_of_empty_curves_is_zero() {
        let a = curve("a", &[]);
        assert_eq!(largest_deviation(&a, &a).unwrap(), 0.0);
        assert_eq!(squared_error(&a, &a).unwrap(), 0.0);
    }
}
