//! Wilder RSI.
//!
//! Gains and losses are smoothed with alpha = 1/period, seeded with the
//! first delta (adjust=false recursion). RSI[0] is NaN (no delta yet).

/// Compute Wilder RSI over `values` with the given period.
pub fn wilder_rsi(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if n < 2 || period == 0 {
        return result;
    }

    let alpha = 1.0 / period as f64;
    let mut avg_gain = f64::NAN;
    let mut avg_loss = f64::NAN;

    for i in 1..n {
        let delta = values[i] - values[i - 1];
        if delta.is_nan() {
            continue;
        }
        let gain = delta.max(0.0);
        let loss = (-delta).max(0.0);

        if avg_gain.is_nan() {
            avg_gain = gain;
            avg_loss = loss;
        } else {
            avg_gain = alpha * gain + (1.0 - alpha) * avg_gain;
            avg_loss = alpha * loss + (1.0 - alpha) * avg_loss;
        }

        result[i] = if avg_loss == 0.0 && avg_gain == 0.0 {
            f64::NAN // flat series: 0/0, undefined
        } else if avg_loss == 0.0 {
            100.0
        } else {
            let rs = avg_gain / avg_loss;
            100.0 - 100.0 / (1.0 + rs)
        };
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn rsi_first_value_is_nan() {
        let result = wilder_rsi(&[10.0, 11.0, 12.0], 14);
        assert!(result[0].is_nan());
        assert!(!result[1].is_nan());
    }

    #[test]
    fn rsi_pure_uptrend_is_100() {
        let values: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let result = wilder_rsi(&values, 14);
        assert_approx(result[19], 100.0, DEFAULT_EPSILON);
    }

    #[test]
    fn rsi_pure_downtrend_is_0() {
        let values: Vec<f64> = (0..20).map(|i| 100.0 - i as f64).collect();
        let result = wilder_rsi(&values, 14);
        assert_approx(result[19], 0.0, DEFAULT_EPSILON);
    }

    #[test]
    fn rsi_flat_series_is_nan() {
        let result = wilder_rsi(&[10.0; 10], 14);
        assert!(result.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn rsi_bounded_0_100() {
        let values = [10.0, 12.0, 9.0, 14.0, 13.0, 15.0, 11.0, 16.0];
        for v in wilder_rsi(&values, 3).iter().skip(1) {
            assert!(*v >= 0.0 && *v <= 100.0);
        }
    }
}
