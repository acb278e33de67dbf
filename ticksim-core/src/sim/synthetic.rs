//! Synthetic-path simulator: a seeded random walk instead of observed data.
//!
//! Stands in for the replay simulator when only the entry event itself is
//! available. The walk is deterministic per `(pair, timestamp)` — the seed
//! is a BLAKE3 hash of both — so identical inputs reproduce identical
//! records on any machine.

use chrono::{Duration, NaiveDateTime};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::{ExitReason, RiskParams, TradeRecord};
use crate::seed;

/// Knobs specific to the synthetic walk.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SyntheticConfig {
    /// Uniform step amplitude: each step multiplies price by 1 ± step_frac.
    pub step_frac: f64,
    /// Breakeven arming threshold: once price reaches
    /// entry × (1 + be_arm_frac), the stop moves up to the entry price.
    /// Zero disables arming. Monotonic — the stop never moves back down.
    pub be_arm_frac: f64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            step_frac: 0.015,
            be_arm_frac: 0.0,
        }
    }
}

/// Simulate one long position on a synthetic path.
///
/// Steps advance one minute each, up to `max_bars`. Only take-profit and
/// the (possibly breakeven-raised) stop are evaluated; trailing and late
/// exits do not apply to synthetic paths. A stop hit reports the stop-loss
/// exit reason wherever the stop sits.
pub fn simulate(
    pair: &str,
    entry_ts: NaiveDateTime,
    entry_px: f64,
    params: &RiskParams,
    synth: &SyntheticConfig,
) -> TradeRecord {
    let mut rng = seed::path_rng(pair, entry_ts);

    let tp_px = params.take_profit_price(entry_px);
    let mut stop_px = params.stop_loss_price(entry_px);
    let mut be_armed = false;

    let mut px = entry_px;
    let mut exit = ExitReason::Timeout;
    let mut steps = 0usize;

    for step in 1..=params.max_bars {
        let drift: f64 = rng.gen_range(-synth.step_frac..=synth.step_frac);
        px *= 1.0 + drift;
        steps = step;

        if !be_armed && synth.be_arm_frac > 0.0 && px >= entry_px * (1.0 + synth.be_arm_frac) {
            be_armed = true;
            stop_px = stop_px.max(entry_px);
        }

        if px >= tp_px {
            exit = ExitReason::Tp;
            break;
        }
        if px <= stop_px {
            exit = ExitReason::Sl;
            break;
        }
    }

    let exit_ts = entry_ts + Duration::minutes(steps as i64);
    super::build_record(pair, entry_ts, exit_ts, entry_px, px, steps, exit, params)
}
