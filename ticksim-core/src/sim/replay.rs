//! Replay simulator: walk observed ticks forward from an aligned entry.

use crate::domain::{ExitReason, PriceSeries, RiskParams, TradeRecord};

/// Simulate one long position opened at `series.ticks[start]`.
///
/// `entry_px_obs` is the observed quote the exit thresholds anchor to
/// (normally the price at `start`; execution slippage never shifts them).
/// The caller guarantees `start` is in range — the not-found case is the
/// index lookup's contract and is not re-checked here.
///
/// The scan covers at most `max_bars` samples. Non-positive prices are bad
/// ticks: they consume a bar of the window but trigger nothing. Exit rules
/// are evaluated in fixed priority order per sample — take-profit, late
/// take-profit, trailing stop, stop-loss — and the first hit wins. No hit
/// within the window times the position out at `min(start + max_bars,
/// len - 1)`.
pub fn simulate(
    series: &PriceSeries,
    start: usize,
    entry_px_obs: f64,
    params: &RiskParams,
) -> TradeRecord {
    let ticks = &series.ticks;
    let entry_ts = ticks[start].ts;

    let tp_px = params.take_profit_price(entry_px_obs);
    let sl_px = params.stop_loss_price(entry_px_obs);

    let mut high_water = entry_px_obs;
    let mut late_armed = false;

    let mut exit = ExitReason::Timeout;
    let mut exit_idx = (start + params.max_bars).min(ticks.len() - 1);

    let scan_end = (start + params.max_bars).min(ticks.len());
    for i in start..scan_end {
        let px = ticks[i].price;
        if px <= 0.0 {
            continue;
        }

        if px > high_water {
            high_water = px;
        }

        // arming is monotonic: once reached, the late rule stays live
        if !late_armed
            && params.late_tp_after_frac > 0.0
            && high_water >= entry_px_obs * (1.0 + params.late_tp_after_frac)
        {
            late_armed = true;
        }

        if px >= tp_px {
            exit = ExitReason::Tp;
            exit_idx = i;
            break;
        }

        if late_armed
            && params.late_tp_frac > 0.0
            && high_water > 0.0
            && (high_water - px) / high_water >= params.late_tp_frac
        {
            exit = ExitReason::LateTp;
            exit_idx = i;
            break;
        }

        if params.trail_frac > 0.0 && high_water > 0.0 && px <= high_water * (1.0 - params.trail_frac)
        {
            exit = ExitReason::Trail;
            exit_idx = i;
            break;
        }

        if px <= sl_px {
            exit = ExitReason::Sl;
            exit_idx = i;
            break;
        }
    }

    let exit_tick = ticks[exit_idx];
    let bars_held = exit_idx - start + 1;

    super::build_record(
        &series.pair,
        entry_ts,
        exit_tick.ts,
        entry_px_obs,
        exit_tick.price,
        bars_held,
        exit,
        params,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PriceTick;
    use chrono::{NaiveDate, NaiveDateTime};

    fn ts(minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(0, minute, 0)
            .unwrap()
    }

    fn series(prices: &[f64]) -> PriceSeries {
        PriceSeries::new(
            "SOL_USDC",
            prices
                .iter()
                .enumerate()
                .map(|(i, &price)| PriceTick {
                    ts: ts(i as u32),
                    price,
                })
                .collect(),
        )
    }

    fn no_cost_params() -> RiskParams {
        RiskParams::default()
    }

    #[test]
    fn bad_ticks_consume_bars_without_triggering() {
        let s = series(&[1.0, -1.0, 0.0, 1.025]);
        let rec = simulate(&s, 0, 1.0, &no_cost_params());
        assert_eq!(rec.exit, ExitReason::Tp);
        assert_eq!(rec.exit_px, 1.025);
        assert_eq!(rec.bars_held, 4);
    }

    #[test]
    fn late_tp_requires_arming_first() {
        let params = RiskParams {
            tp_mult: 1.5,
            sl_pct: 0.5,
            late_tp_after_frac: 0.05,
            late_tp_frac: 0.02,
            ..Default::default()
        };
        // high never reaches 1.05, so the 2.9% retracement is ignored
        let unarmed = simulate(&series(&[1.0, 1.04, 1.01]), 0, 1.0, &params);
        assert_eq!(unarmed.exit, ExitReason::Timeout);

        // high 1.06 arms the rule; the retracement to 1.03 (2.8%) fires it
        let armed = simulate(&series(&[1.0, 1.06, 1.03]), 0, 1.0, &params);
        assert_eq!(armed.exit, ExitReason::LateTp);
        assert_eq!(armed.bars_held, 3);
    }

    #[test]
    fn arming_never_disarms() {
        let params = RiskParams {
            tp_mult: 1.5,
            sl_pct: 0.5,
            late_tp_after_frac: 0.05,
            late_tp_frac: 0.10,
            ..Default::default()
        };
        // armed at 1.06, drifts below the arming line, then retraces 10%
        let rec = simulate(&series(&[1.0, 1.06, 1.02, 0.95]), 0, 1.0, &params);
        assert_eq!(rec.exit, ExitReason::LateTp);
        assert_eq!(rec.bars_held, 4);
    }

    #[test]
    fn timeout_exit_lands_one_past_the_window() {
        let params = RiskParams {
            max_bars: 2,
            tp_mult: 2.0,
            sl_pct: 0.5,
            ..Default::default()
        };
        let rec = simulate(&series(&[1.0, 1.0, 1.0, 1.0, 1.0]), 0, 1.0, &params);
        assert_eq!(rec.exit, ExitReason::Timeout);
        // exit sample is min(start + max_bars, len - 1)
        assert_eq!(rec.exit_ts, ts(2));
        assert_eq!(rec.bars_held, 3);
    }

    #[test]
    fn timeout_exit_clamps_to_series_end() {
        let params = RiskParams {
            max_bars: 10,
            tp_mult: 2.0,
            sl_pct: 0.5,
            ..Default::default()
        };
        let rec = simulate(&series(&[1.0, 1.0, 1.0]), 0, 1.0, &params);
        assert_eq!(rec.exit, ExitReason::Timeout);
        assert_eq!(rec.exit_ts, ts(2));
        assert_eq!(rec.bars_held, 3);
    }

    #[test]
    fn slippage_and_fees_reduce_pnl() {
        let params = RiskParams {
            slippage_bps: 100.0,
            fee_bps: 10.0,
            ..Default::default()
        };
        let rec = simulate(&series(&[1.0, 1.025]), 0, 1.0, &params);
        assert_eq!(rec.exit, ExitReason::Tp);

        // entry fills at 1.01, exit at 1.025 * 0.99 = 1.014750
        let units = 200.0 / 1.01;
        let gross = units * (1.025 * 0.99 - 1.01);
        let fees = 200.0 * 0.001 * 2.0;
        let net = gross - fees;
        assert!((rec.fees_usd - 0.4).abs() < 1e-9);
        assert!((rec.pnl_usd - net).abs() < 0.005 + 1e-9);
        assert!((rec.pnl_pct - net / 200.0 * 100.0).abs() < 0.0005 + 1e-9);
    }

    #[test]
    fn zero_notional_yields_zero_pnl() {
        let params = RiskParams {
            base_size_usd: 0.0,
            ..Default::default()
        };
        let rec = simulate(&series(&[1.0, 1.025]), 0, 1.0, &params);
        assert_eq!(rec.pnl_usd, 0.0);
        assert_eq!(rec.pnl_pct, 0.0);
        assert_eq!(rec.size_usd, 0.0);
    }
}
