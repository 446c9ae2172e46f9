//! MACD: fast EMA − slow EMA, with a signal-line EMA and histogram.

use super::ema::ema;

/// Output columns of a MACD computation.
#[derive(Debug, Clone)]
pub struct Macd {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

/// Compute MACD with the given fast/slow/signal spans (12, 26, 9 classic).
pub fn macd(values: &[f64], fast: usize, slow: usize, signal_span: usize) -> Macd {
    let fast_ema = ema(values, fast);
    let slow_ema = ema(values, slow);

    let macd_line: Vec<f64> = fast_ema
        .iter()
        .zip(&slow_ema)
        .map(|(f, s)| f - s)
        .collect();

    let signal = ema(&macd_line, signal_span);
    let histogram: Vec<f64> = macd_line.iter().zip(&signal).map(|(m, s)| m - s).collect();

    Macd {
        macd: macd_line,
        signal,
        histogram,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn macd_of_constant_series_is_zero() {
        let result = macd(&[10.0; 40], 12, 26, 9);
        assert_approx(result.macd[39], 0.0, DEFAULT_EPSILON);
        assert_approx(result.signal[39], 0.0, DEFAULT_EPSILON);
        assert_approx(result.histogram[39], 0.0, DEFAULT_EPSILON);
    }

    #[test]
    fn macd_positive_in_uptrend() {
        let values: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let result = macd(&values, 12, 26, 9);
        // Fast EMA tracks the rise more closely than slow EMA.
        assert!(result.macd[59] > 0.0);
        assert!(result.histogram[59].abs() < result.macd[59].abs());
    }

    #[test]
    fn macd_lengths_match_input() {
        let result = macd(&[1.0, 2.0, 3.0], 12, 26, 9);
        assert_eq!(result.macd.len(), 3);
        assert_eq!(result.signal.len(), 3);
        assert_eq!(result.histogram.len(), 3);
    }
}
