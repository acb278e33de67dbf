//! Trade simulation: replay over observed ticks, or a seeded synthetic path.
//!
//! Both modes are pure functions over their arguments and end in the same
//! `TradeRecord` shape, so the driver can swap them behind one signature.
//! Any function of shape `(entry event, risk params) -> TradeRecord` is a
//! valid simulator variant; selection happens at the driver boundary.

pub mod costs;
pub mod replay;
pub mod synthetic;

use chrono::NaiveDateTime;

use crate::domain::{ExitReason, RiskParams, TradeRecord};

use self::costs::round_dp;

/// Assemble a trade record from observed entry/exit quotes: apply the cost
/// model to both legs, compute P&L against notional, and round once.
pub(crate) fn build_record(
    pair: &str,
    entry_ts: NaiveDateTime,
    exit_ts: NaiveDateTime,
    entry_px_obs: f64,
    exit_px_obs: f64,
    bars_held: usize,
    exit: ExitReason,
    params: &RiskParams,
) -> TradeRecord {
    let entry_exec = costs::entry_execution_price(entry_px_obs, params.slippage_bps);
    let exit_exec = costs::exit_execution_price(exit_px_obs, params.slippage_bps);

    let units = if entry_exec > 0.0 {
        params.base_size_usd / entry_exec
    } else {
        0.0
    };

    let gross = units * (exit_exec - entry_exec);
    let fees = costs::round_trip_fees(params.base_size_usd, params.fee_bps);
    let net = gross - fees;
    let pnl_pct = if params.base_size_usd > 0.0 {
        net / params.base_size_usd * 100.0
    } else {
        0.0
    };

    TradeRecord {
        pair: pair.to_string(),
        entry_ts,
        exit_ts,
        entry_px: round_dp(entry_px_obs, 8),
        exit_px: round_dp(exit_px_obs, 8),
        bars_held,
        exit,
        pnl_pct: round_dp(pnl_pct, 3),
        size_usd: round_dp(params.base_size_usd, 2),
        pnl_usd: round_dp(net, 2),
        fees_usd: round_dp(fees, 4),
        params: *params,
    }
}
