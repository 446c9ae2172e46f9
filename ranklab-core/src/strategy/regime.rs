//! Regime-gated strategy: the index's position against its MA200 selects
//! which entry rule runs; the stored entry name selects the exit rule.

use chrono::NaiveDate;

use crate::data::IndicatorStore;
use crate::domain::Position;
use crate::signals::{
    BandBreakout, BuySignal, MomentumCross, OversoldRecovery, SellSignal, TrailingStop, TrendBreak,
};

use super::{Decision, Strategy};

/// The production composition.
///
/// Entry dispatch: index close below MA200 selects the oversold-recovery
/// rule, otherwise the band-breakout rule. Exit dispatch routes both of
/// those entry names to the trailing stop.
///
/// `momentum_cross` and `trend_break` are constructed and configurable but
/// currently unrouted; positions whose entry name has no exit mapping are
/// held until the run ends.
pub struct RegimeStrategy {
    pub oversold_recovery: OversoldRecovery,
    pub momentum_cross: MomentumCross,
    pub band_breakout: BandBreakout,
    pub trailing_stop: TrailingStop,
    pub trend_break: TrendBreak,
}

impl Default for RegimeStrategy {
    fn default() -> Self {
        Self {
            oversold_recovery: OversoldRecovery::default(),
            momentum_cross: MomentumCross::default(),
            band_breakout: BandBreakout::default(),
            trailing_stop: TrailingStop::default(),
            trend_break: TrendBreak::default(),
        }
    }
}

impl RegimeStrategy {
    fn dispatch_buy(
        &self,
        signal: &dyn BuySignal,
        store: &IndicatorStore,
        security: &str,
        date: NaiveDate,
    ) -> Decision {
        match signal.evaluate(store, security, date) {
            Some(check) if check.fires => Decision::fired(signal.name(), check),
            _ => Decision::hold(),
        }
    }
}

impl Strategy for RegimeStrategy {
    fn check_buy(
        &self,
        store: &IndicatorStore,
        security: &str,
        date: NaiveDate,
    ) -> Option<Decision> {
        let market = store.market();
        let pos = market.at_or_before(date)?;
        let close = market.close[pos];
        let ma = market.ma[pos];
        let rsi = market.rsi[pos];
        if ma.is_nan() || rsi.is_nan() {
            return None;
        }

        let decision = if close < ma {
            self.dispatch_buy(&self.oversold_recovery, store, security, date)
        } else {
            self.dispatch_buy(&self.band_breakout, store, security, date)
        };
        Some(decision)
    }

    fn check_sell(
        &self,
        store: &IndicatorStore,
        security: &str,
        date: NaiveDate,
        position: &Position,
    ) -> Option<Decision> {
        let routed: Option<&dyn SellSignal> = match position.buy_signal.as_str() {
            "oversold_recovery" | "band_breakout" => Some(&self.trailing_stop),
            _ => None,
        };
        let Some(signal) = routed else {
            log::debug!(
                "no exit rule for entry '{}' on {security}; position held",
                position.buy_signal
            );
            return Some(Decision::hold());
        };

        match signal.evaluate(store, security, date, position) {
            Some(check) if check.fires => Some(Decision::fired(signal.name(), check)),
            _ => Some(Decision::hold()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::test_support::*;

    fn position(signal: &str, buy_date: NaiveDate) -> Position {
        Position {
            security: "00001".into(),
            buy_date,
            buy_price: 10.0,
            buy_signal: signal.into(),
        }
    }

    #[test]
    fn indeterminate_before_regime_inputs_warm_up() {
        // 10 index bars: MA200 and even RSI coverage are not there yet.
        let closes: Vec<f64> = (0..10).map(|i| 20000.0 + i as f64).collect();
        let store = store_with(market_from_closes(d(2024, 1, 1), &closes), vec![]);
        let strategy = RegimeStrategy::default();
        assert!(strategy
            .check_buy(&store, "00001", d(2024, 1, 10))
            .is_none());
    }

    #[test]
    fn above_ma_regime_routes_to_band_breakout() {
        let start = d(2023, 1, 1);
        // Rising index: regime is "above MA200".
        let index: Vec<f64> = (0..250).map(|i| 20000.0 + 10.0 * i as f64).collect();
        let market = market_from_closes(start, &index);

        // Dip-under-band-and-recover pattern aligned to the query date.
        let mut closes: Vec<f64> = (0..40)
            .map(|i| if i % 2 == 0 { 99.0 } else { 101.0 })
            .collect();
        closes.push(80.0);
        closes.push(99.5);
        let query = start + chrono::Days::new(249);
        let stock_start = query - chrono::Days::new(closes.len() as u64 - 1);
        let stock = series_from_closes("00001", stock_start, &closes);

        let store = store_with(market, vec![stock]);
        let strategy = RegimeStrategy::default();
        let decision = strategy.check_buy(&store, "00001", query).unwrap();
        assert!(decision.fires);
        assert_eq!(decision.signal.as_deref(), Some("band_breakout"));
    }

    #[test]
    fn below_ma_regime_never_reports_band_breakout() {
        let start = d(2023, 1, 1);
        // Falling index: regime is "below MA200"; the oversold-recovery rule
        // runs and (with RSI pinned at zero) cannot fire.
        let index: Vec<f64> = (0..250).map(|i| 25000.0 - 10.0 * i as f64).collect();
        let market = market_from_closes(start, &index);

        let mut closes: Vec<f64> = (0..40)
            .map(|i| if i % 2 == 0 { 99.0 } else { 101.0 })
            .collect();
        closes.push(80.0);
        closes.push(99.5);
        let query = start + chrono::Days::new(249);
        let stock_start = query - chrono::Days::new(closes.len() as u64 - 1);
        let stock = series_from_closes("00001", stock_start, &closes);

        let store = store_with(market, vec![stock]);
        let strategy = RegimeStrategy::default();
        let decision = strategy.check_buy(&store, "00001", query).unwrap();
        assert!(!decision.fires);
    }

    #[test]
    fn recognized_entries_route_to_trailing_stop() {
        let start = d(2024, 1, 1);
        let closes = [10.0, 10.5, 11.0, 10.8, 10.01];
        let stock = series_from_closes("00001", start, &closes);
        let store = store_with(market_from_closes(start, &[20000.0]), vec![stock]);
        let strategy = RegimeStrategy::default();
        let query = start + chrono::Days::new(4);

        for entry in ["oversold_recovery", "band_breakout"] {
            let decision = strategy
                .check_sell(&store, "00001", query, &position(entry, start))
                .unwrap();
            assert!(decision.fires, "entry {entry}");
            assert_eq!(decision.signal.as_deref(), Some("trailing_stop"));
        }
    }

    #[test]
    fn unmapped_entry_name_has_no_exit() {
        let start = d(2024, 1, 1);
        // Same drawdown that trips the trailing stop above.
        let closes = [10.0, 10.5, 11.0, 10.8, 10.01];
        let stock = series_from_closes("00001", start, &closes);
        let store = store_with(market_from_closes(start, &[20000.0]), vec![stock]);
        let strategy = RegimeStrategy::default();

        let decision = strategy
            .check_sell(
                &store,
                "00001",
                start + chrono::Days::new(4),
                &position("momentum_cross", start),
            )
            .unwrap();
        assert!(!decision.fires);
    }
}
