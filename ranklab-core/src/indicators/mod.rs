//! Technical indicator primitives.
//!
//! Pure functions over `&[f64]` price series: values are NaN until the
//! indicator has enough history, and the caller decides what NaN means
//! (signal evaluators treat it as "condition not met" or "indeterminate").
//!
//! The indicator columns attached to every loaded series are fixed by the
//! signal set: EMA 50/100/200, MACD(12,26,9), Bollinger(20, 2).

mod bollinger;
mod ema;
mod macd;
mod rsi;

pub use bollinger::{bollinger_bands, rolling_mean, BollingerBands};
pub use ema::ema;
pub use macd::{macd, Macd};
pub use rsi::wilder_rsi;

/// Linear-interpolation percentile of the non-NaN values in `values`.
///
/// `q` is in percent (0–100). Matches the default interpolation of the
/// reference analytics stack, so thresholds derived offline line up with
/// thresholds computed here. Returns NaN for an empty (or all-NaN) input.
pub fn percentile(values: &[f64], q: f64) -> f64 {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if sorted.is_empty() {
        return f64::NAN;
    }
    sorted.sort_by(|a, b| a.partial_cmp(b).expect("NaN filtered above"));

    let q = q.clamp(0.0, 100.0);
    let pos = q / 100.0 * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

#[cfg(test)]
pub(crate) const DEFAULT_EPSILON: f64 = 1e-9;

#[cfg(test)]
pub(crate) fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "expected {expected}, got {actual}"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentile_interpolates() {
        let values = [1.0, 2.0, 3.0, 4.0];
        // pos = 0.25 * 3 = 0.75 → 1 + 0.75 * (2 - 1) = 1.75
        assert_approx(percentile(&values, 25.0), 1.75, DEFAULT_EPSILON);
        assert_approx(percentile(&values, 0.0), 1.0, DEFAULT_EPSILON);
        assert_approx(percentile(&values, 100.0), 4.0, DEFAULT_EPSILON);
    }

    #[test]
    fn percentile_single_value() {
        assert_approx(percentile(&[5.0], 50.0), 5.0, DEFAULT_EPSILON);
    }

    #[test]
    fn percentile_skips_nan() {
        let values = [f64::NAN, 1.0, f64::NAN, 3.0];
        assert_approx(percentile(&values, 50.0), 2.0, DEFAULT_EPSILON);
    }

    #[test]
    fn percentile_empty_is_nan() {
        assert!(percentile(&[], 50.0).is_nan());
        assert!(percentile(&[f64::NAN], 50.0).is_nan());
    }
}
