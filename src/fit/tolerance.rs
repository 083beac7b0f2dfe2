//! Acceptance tolerance for a selected ideal curve.
//!
//! `tolerance = factor * max_i |ideal.y[i] - training.y[i]|`
//!
//! The factor is always passed explicitly; changing it means calling again.

use rayon::prelude::*;

use crate::domain::{ChosenIdeal, Curve, SelectionResult};
use crate::error::CurveError;
use crate::fit::loss::largest_deviation;

/// Scale the worst training residual of `chosen` by `factor`.
pub fn compute_tolerance(training: &Curve, chosen: &Curve, factor: f64) -> Result<f64, CurveError> {
    Ok(factor * largest_deviation(training, chosen)?)
}

/// Attach the deviation and tolerance to a selection.
pub fn with_tolerance(selection: SelectionResult, factor: f64) -> Result<ChosenIdeal, CurveError> {
    let largest_deviation = largest_deviation(&selection.training, &selection.chosen)?;
    Ok(ChosenIdeal {
        selection,
        largest_deviation,
        tolerance_factor: factor,
        tolerance: factor * largest_deviation,
    })
}

/// `with_tolerance` over every selection, keeping order.
pub fn with_tolerances(selections: Vec<SelectionResult>, factor: f64) -> Result<Vec<ChosenIdeal>, CurveError> {
    let results: Vec<Result<ChosenIdeal, CurveError>> = selections
        .into_par_iter()
        .map(|s| with_tolerance(s, factor))
        .collect();
    results.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fit::selection::select_best;

    fn curve(name: &str, y: &[f64]) -> Curve {
        let x: Vec<f64> = (1..=y.len()).map(|i| i as f64).collect();
        Curve::from_xy(name, &x, y)
    }

    #[test]
    fn sqrt2_factor_on_small_deviation() {
        let train = curve("y1", &[2.0, 4.0, 6.0]);
        let ideal = curve("A", &[2.0, 4.0, 5.9]);

        let dev = largest_deviation(&train, &ideal).unwrap();
        assert!((dev - 0.1).abs() < 1e-12);

        let tol = compute_tolerance(&train, &ideal, std::f64::consts::SQRT_2).unwrap();
        assert!((tol - 0.141_421_356).abs() < 1e-6);
    }

    #[test]
    fn tolerance_is_linear_in_factor() {
        let train = curve("t", &[0.0, 1.0, -3.0, 2.5]);
        let ideal = curve("i", &[0.4, 0.2, -2.0, 2.0]);
        let base = compute_tolerance(&train, &ideal, 1.0).unwrap();
        for factor in [0.5, 2.0, 3.7, 10.0] {
            let scaled = compute_tolerance(&train, &ideal, factor).unwrap();
            assert!((scaled - factor * base).abs() < 1e-12);
        }
        let doubled = compute_tolerance(&train, &ideal, 2.0).unwrap();
        assert_eq!(doubled, 2.0 * base);
    }

    #[test]
    fn with_tolerance_keeps_selection_and_factor() {
        let train = curve("y1", &[2.0, 4.0, 6.0]);
        let candidates = vec![curve("A", &[2.0, 4.0, 5.9]), curve("B", &[0.0, 0.0, 0.0])];
        let selection = select_best(&train, &candidates).unwrap();

        let chosen = with_tolerance(selection, 2.0).unwrap();
        assert_eq!(chosen.ideal().name(), "A");
        assert_eq!(chosen.training().name(), "y1");
        assert_eq!(chosen.tolerance_factor, 2.0);
        assert!((chosen.tolerance - 0.2).abs() < 1e-12);
        assert_eq!(chosen.as_candidate().tolerance, chosen.tolerance);
    }

    #[test]
    fn misaligned_pair_is_rejected() {
        let train = curve("t", &[1.0, 2.0]);
        let ideal = curve("i", &[1.0]);
        assert!(compute_tolerance(&train, &ideal, 1.0).is_err());
    }
}
