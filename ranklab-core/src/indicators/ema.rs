//! Exponential Moving Average (EMA).
//!
//! Span-parameterized, seeded with the first value:
//!   alpha = 2 / (span + 1)
//!   EMA[0] = x[0]
//!   EMA[t] = alpha * x[t] + (1 - alpha) * EMA[t-1]
//!
//! This is the adjust=false recursion the original indicator tables were
//! built with, so EMA values match from the very first bar (no NaN warmup).

/// Compute the EMA of `values` with the given span.
///
/// Leading NaNs are passed through; the first non-NaN value seeds the
/// recursion. A NaN after the seed taints the remainder of the series.
pub fn ema(values: &[f64], span: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if n == 0 || span == 0 {
        return result;
    }

    let alpha = 2.0 / (span as f64 + 1.0);
    let mut prev: Option<f64> = None;

    for (i, &v) in values.iter().enumerate() {
        match prev {
            None => {
                if !v.is_nan() {
                    result[i] = v;
                    prev = Some(v);
                }
            }
            Some(p) => {
                if v.is_nan() {
                    // Tainted: everything after stays NaN.
                    return result;
                }
                let e = alpha * v + (1.0 - alpha) * p;
                result[i] = e;
                prev = Some(e);
            }
        }
    }

    result
}
