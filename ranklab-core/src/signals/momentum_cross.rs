//! Low-momentum-crossover entry: a MACD golden cross while the MACD sits in
//! its historically low band, confirmed by price above a rising long EMA.

use chrono::NaiveDate;

use crate::data::IndicatorStore;
use crate::indicators::percentile;

use super::{BuySignal, SignalCheck};

#[derive(Debug, Clone)]
pub struct MomentumCross {
    /// Window the |MACD| percentile threshold is computed over.
    pub macd_history_days: usize,
    /// Span of the long trend EMA (one of the precomputed 50/100/200).
    pub ema_length: usize,
    /// Percentile (0..=100) defining the "low MACD" band.
    pub macd_low_percentile: f64,
}

impl Default for MomentumCross {
    fn default() -> Self {
        Self {
            macd_history_days: 250,
            ema_length: 50,
            macd_low_percentile: 25.0,
        }
    }
}

impl BuySignal for MomentumCross {
    fn name(&self) -> &'static str {
        "momentum_cross"
    }

    fn evaluate(
        &self,
        store: &IndicatorStore,
        security: &str,
        date: NaiveDate,
    ) -> Option<SignalCheck> {
        let series = store.series(security)?;
        let n = series.len_upto(date);
        if n < self.ema_length.max(5) {
            return None;
        }

        let macd = series.column("macd")?;
        let signal = series.column("macd_signal")?;
        let ema = series.column(&format!("ema_{}", self.ema_length))?;

        let macd_t = macd[n - 1];
        let signal_t = signal[n - 1];
        let macd_prev = macd[n - 2];
        let signal_prev = signal[n - 2];
        let close_t = series.close[n - 1];
        let ema_t = ema[n - 1];

        let history = &macd[n.saturating_sub(self.macd_history_days)..n];
        let abs_history: Vec<f64> = history.iter().map(|v| v.abs()).collect();
        let threshold = percentile(&abs_history, self.macd_low_percentile);

        let low_golden_cross = macd_t > 0.0
            && macd_t < threshold
            && macd_t > signal_t
            && macd_prev <= signal_prev;

        // Rising trend: price above the EMA and the EMA above its own value
        // five bars back.
        let above_rising_ema = close_t > ema_t && ema_t > ema[n - 5];

        let fires = low_golden_cross && above_rising_ema;
        Some(
            SignalCheck::verdict(fires)
                .with_detail("macd", macd_t)
                .with_detail("macd_signal", signal_t)
                .with_detail("macd_threshold", threshold)
                .with_detail("close", close_t)
                .with_detail("ema", ema_t),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::test_support::*;

    /// Uptrend, then a plateau that lets MACD decay below its signal line,
    /// then a resumed rise that crosses MACD back above while it is still
    /// small and positive.
    fn stall_and_resume_closes() -> Vec<f64> {
        let mut closes: Vec<f64> = (0..200).map(|i| 100.0 + 0.2 * i as f64).collect();
        let plateau = *closes.last().unwrap();
        closes.extend(std::iter::repeat(plateau).take(30));
        closes.extend((1..=30).map(|i| plateau + 0.2 * i as f64));
        closes
    }

    #[test]
    fn indeterminate_on_short_history() {
        let series = series_from_closes("00001", d(2024, 1, 1), &[10.0; 30]);
        let store = store_with(market_from_closes(d(2024, 1, 1), &[20000.0]), vec![series]);
        let sig = MomentumCross::default();
        assert!(sig.evaluate(&store, "00001", d(2024, 2, 15)).is_none());
    }

    #[test]
    fn indeterminate_for_unknown_security() {
        let store = store_with(market_from_closes(d(2024, 1, 1), &[20000.0]), vec![]);
        let sig = MomentumCross::default();
        assert!(sig.evaluate(&store, "00001", d(2024, 6, 1)).is_none());
    }

    #[test]
    fn flat_series_does_not_fire() {
        let series = series_from_closes("00001", d(2023, 1, 1), &[50.0; 120]);
        let store = store_with(market_from_closes(d(2023, 1, 1), &[20000.0]), vec![series]);
        let sig = MomentumCross::default();
        let query = d(2023, 1, 1) + chrono::Days::new(119);
        let check = sig.evaluate(&store, "00001", query).unwrap();
        // MACD of a flat series is zero, never strictly positive.
        assert!(!check.fires);
    }

    #[test]
    fn quiet_during_macd_decay() {
        let start = d(2023, 1, 1);
        let closes = stall_and_resume_closes();
        let series = series_from_closes("00001", start, &closes);
        let store = store_with(market_from_closes(start, &[20000.0]), vec![series]);
        let sig = MomentumCross::default();

        // Mid-plateau: MACD is below its signal line, no cross yet.
        let check = sig
            .evaluate(&store, "00001", start + chrono::Days::new(215))
            .unwrap();
        assert!(!check.fires);
    }

    #[test]
    fn fires_on_low_golden_cross_in_rising_trend() {
        let start = d(2023, 1, 1);
        let closes = stall_and_resume_closes();
        let total = closes.len() as u64;
        let series = series_from_closes("00001", start, &closes);
        let store = store_with(market_from_closes(start, &[20000.0]), vec![series]);
        let sig = MomentumCross::default();

        // The cross lands somewhere early in the resumed rise.
        let fired = (230..total)
            .map(|i| start + chrono::Days::new(i))
            .filter_map(|day| sig.evaluate(&store, "00001", day))
            .any(|check| check.fires);
        assert!(fired);
    }

    #[test]
    fn indeterminate_when_ema_column_not_precomputed() {
        let series = series_from_closes("00001", d(2023, 1, 1), &[50.0; 120]);
        let store = store_with(market_from_closes(d(2023, 1, 1), &[20000.0]), vec![series]);
        let sig = MomentumCross {
            ema_length: 70,
            ..MomentumCross::default()
        };
        let query = d(2023, 1, 1) + chrono::Days::new(119);
        assert!(sig.evaluate(&store, "00001", query).is_none());
    }
}
