//! Elementary statistics over already-filtered samples.
//!
//! Callers drop missing values before getting here; every function returns
//! `None` instead of NaN or infinity when its inputs cannot support a result.

use statrs::statistics::Statistics;

/// Arithmetic mean, `None` for an empty sample.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().mean()).filter(|m| m.is_finite())
}

/// Sample standard deviation (Bessel-corrected).
///
/// `None` with fewer than `min_observations` values (never fewer than 2).
pub fn sample_std_dev(values: &[f64], min_observations: usize) -> Option<f64> {
    if values.len() < min_observations.max(2) {
        return None;
    }
    Some(values.iter().std_dev()).filter(|s| s.is_finite())
}

/// Pearson correlation of two aligned samples.
///
/// `None` when the samples differ in length, hold fewer than
/// `min_observations` points, or either side has a standard deviation at or
/// below `zero_epsilon`. The result is clamped to [-1, 1].
pub fn pearson(xs: &[f64], ys: &[f64], min_observations: usize, zero_epsilon: f64) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < min_observations.max(2) {
        return None;
    }

    let sx = xs.iter().std_dev();
    let sy = ys.iter().std_dev();
    if sx <= zero_epsilon || sy <= zero_epsilon {
        return None;
    }

    let cov = xs.iter().covariance(ys.iter());
    Some((cov / (sx * sy)).clamp(-1.0, 1.0)).filter(|r| r.is_finite())
}
