//! Custom evaluation metrics for the income and expense predictors.

use crate::Error;

/// The default relative tolerance for [preciness].
pub const DEFAULT_PRECINESS_THRESHOLD: f64 = 0.2;

/// The fraction of predictions within a relative tolerance of the truth.
///
/// A prediction counts as correct when it falls inside
/// `[truth * (1 - threshold), truth * (1 + threshold)]`.
///
/// Returns `Error::EmptyMetricInput` for empty inputs: an accuracy over
/// nothing is undefined, not zero. Returns `Error::MetricLengthMismatch`
/// when the arrays differ in length.
pub fn preciness(y_true: &[f64], y_pred: &[f64], threshold: f64) -> Result<f64, Error> {
    if y_true.is_empty() {
        return Err(Error::EmptyMetricInput);
    }
    if y_true.len() != y_pred.len() {
        return Err(Error::MetricLengthMismatch(y_true.len(), y_pred.len()));
    }

    let correct = y_true
        .iter()
        .zip(y_pred)
        .filter(|&(&truth, &prediction)| {
            let lower = truth - truth * threshold;
            let upper = truth + truth * threshold;
            prediction >= lower && prediction <= upper
        })
        .count();

    Ok(correct as f64 / y_true.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_PRECINESS_THRESHOLD, preciness};
    use crate::Error;

    #[test]
    fn exact_predictions_are_always_correct() {
        let y = vec![100.0, 250.0, 0.0, 13.37];

        let score = preciness(&y, &y, DEFAULT_PRECINESS_THRESHOLD).unwrap();

        assert_eq!(score, 1.0);

        let score = preciness(&y, &y, 0.0).unwrap();

        assert_eq!(score, 1.0);
    }

    #[test]
    fn counts_predictions_inside_the_tolerance_band() {
        let y_true = vec![100.0, 100.0, 100.0, 100.0];
        // 80 and 120 sit exactly on the band edges; 79 and 121 fall outside.
        let y_pred = vec![80.0, 120.0, 79.0, 121.0];

        let score = preciness(&y_true, &y_pred, 0.2).unwrap();

        assert_eq!(score, 0.5);
    }

    #[test]
    fn empty_input_is_an_error_not_zero() {
        let result = preciness(&[], &[], DEFAULT_PRECINESS_THRESHOLD);

        assert_eq!(result, Err(Error::EmptyMetricInput));
    }

    #[test]
    fn mismatched_lengths_are_an_error() {
        let result = preciness(&[1.0, 2.0], &[1.0], DEFAULT_PRECINESS_THRESHOLD);

        assert_eq!(result, Err(Error::MetricLengthMismatch(2, 1)));
    }
}
