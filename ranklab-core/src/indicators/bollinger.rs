//! Bollinger bands: rolling mean ± k standard deviations.
//!
//! Standard deviation is population (ddof = 0), matching the tables the
//! band-breakout signal was calibrated against. NaN until `period - 1`.

/// Output columns of a Bollinger computation.
#[derive(Debug, Clone)]
pub struct BollingerBands {
    pub middle: Vec<f64>,
    pub upper: Vec<f64>,
    pub lower: Vec<f64>,
}

/// Simple rolling mean over a window. NaN until the window is full; a NaN
/// inside the window makes that output NaN.
pub fn rolling_mean(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if period == 0 || n < period {
        return result;
    }
    for i in (period - 1)..n {
        let window = &values[i + 1 - period..=i];
        if window.iter().any(|v| v.is_nan()) {
            continue;
        }
        result[i] = window.iter().sum::<f64>() / period as f64;
    }
    result
}

/// Compute Bollinger bands with the given window and band width.
pub fn bollinger_bands(values: &[f64], period: usize, k: f64) -> BollingerBands {
    let n = values.len();
    let middle = rolling_mean(values, period);
    let mut upper = vec![f64::NAN; n];
    let mut lower = vec![f64::NAN; n];

    if period > 0 && n >= period {
        for i in (period - 1)..n {
            let mean = middle[i];
            if mean.is_nan() {
                continue;
            }
            let window = &values[i + 1 - period..=i];
            let var =
                window.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / period as f64;
            let std = var.sqrt();
            upper[i] = mean + k * std;
            lower[i] = mean - k * std;
        }
    }

    BollingerBands {
        middle,
        upper,
        lower,
    }
}
