//! Trade-log summary statistics — pure functions over loaded rows.
//!
//! Every figure is computed from the trade log alone; the aggregator never
//! sees the simulator or the data pipeline.

use std::path::Path;

use serde::{Deserialize, Serialize};

use ticksim_core::sim::costs::round_dp;

use crate::export::{load_trade_log, LoggedTrade};

/// Aggregate summary for one trade log.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub trades: usize,
    /// Percentage of trades with positive pnl_pct.
    pub winrate: f64,
    pub avg_roi_pct: f64,
    /// Same figure as `avg_roi_pct` — two call sites, one statistic.
    pub expectancy_pct: f64,
    /// Drawdown over the running SUM of per-trade percentages: percentage
    /// points, not a compounding equity curve.
    pub mdd_pct: f64,
    /// Per-trade Sharpe: mean over population standard deviation.
    pub sharpe: f64,
    pub total_pnl_usd: f64,
    pub avg_pnl_usd: f64,
}

impl Summary {
    pub fn zero() -> Self {
        Self {
            trades: 0,
            winrate: 0.0,
            avg_roi_pct: 0.0,
            expectancy_pct: 0.0,
            mdd_pct: 0.0,
            sharpe: 0.0,
            total_pnl_usd: 0.0,
            avg_pnl_usd: 0.0,
        }
    }
}

const STD_EPSILON: f64 = 1e-12;

/// Summarize a trade log. Empty input yields the all-zero summary.
pub fn summarize(trades: &[LoggedTrade]) -> Summary {
    let n = trades.len();
    if n == 0 {
        return Summary::zero();
    }

    let wins = trades.iter().filter(|t| t.pnl_pct > 0.0).count();
    let winrate = wins as f64 * 100.0 / n as f64;

    let avg_roi = trades.iter().map(|t| t.pnl_pct).sum::<f64>() / n as f64;

    let mut cum = 0.0;
    let mut peak = f64::NEG_INFINITY;
    let mut mdd = 0.0_f64;
    for t in trades {
        cum += t.pnl_pct;
        if cum > peak {
            peak = cum;
        }
        mdd = mdd.max(peak - cum);
    }

    let variance = trades
        .iter()
        .map(|t| (t.pnl_pct - avg_roi).powi(2))
        .sum::<f64>()
        / n as f64;
    let std = variance.sqrt();
    let sharpe = if std > STD_EPSILON { avg_roi / std } else { 0.0 };

    let total_pnl_usd = trades.iter().map(|t| t.pnl_usd).sum::<f64>();
    let avg_pnl_usd = total_pnl_usd / n as f64;

    Summary {
        trades: n,
        winrate: round_dp(winrate, 2),
        avg_roi_pct: round_dp(avg_roi, 3),
        expectancy_pct: round_dp(avg_roi, 3),
        mdd_pct: round_dp(mdd, 2),
        sharpe: round_dp(sharpe, 3),
        total_pnl_usd: round_dp(total_pnl_usd, 2),
        avg_pnl_usd: round_dp(avg_pnl_usd, 2),
    }
}

/// Load and summarize a trade-log file.
pub fn summarize_file(path: &Path) -> anyhow::Result<Summary> {
    Ok(summarize(&load_trade_log(path)?))
}

/// Render the summary block the CLI prints.
pub fn render_summary(name: &str, s: &Summary) -> String {
    let mut out = String::with_capacity(256);
    out.push_str(&format!("=== Summary for {name} ===\n"));
    out.push_str(&format!("trades         : {}\n", s.trades));
    out.push_str(&format!("winrate        : {}\n", s.winrate));
    out.push_str(&format!("avg_roi_pct    : {}\n", s.avg_roi_pct));
    out.push_str(&format!("expectancy_pct : {}\n", s.expectancy_pct));
    out.push_str(&format!("mdd_pct        : {}\n", s.mdd_pct));
    out.push_str(&format!("sharpe         : {}\n", s.sharpe));
    out.push_str(&format!("total_pnl_usd  : {}\n", s.total_pnl_usd));
    out.push_str(&format!("avg_pnl_usd    : {}\n", s.avg_pnl_usd));
    out
}
