//! Engine entry points and the candidate registry.
//!
//! Every engine shares one signature — `fn(&RunConfig) -> Result<i32>` —
//! so callers select a variant by explicit name (or take the first
//! candidate) without caring which simulation mode backs it. Adding an
//! engine means adding a function and a registry row, nothing else.

use anyhow::{bail, Result};

use ticksim_core::data::events::read_events_file;

use crate::config::RunConfig;
use crate::driver::{run_events, run_events_synthetic, SeriesCache};
use crate::export::write_trade_log;

pub type EngineFn = fn(&RunConfig) -> Result<i32>;

/// Known engines, in probe order.
pub const ENGINE_CANDIDATES: &[(&str, EngineFn)] = &[
    ("replay", run_replay_backtest),
    ("synthetic", run_synthetic_backtest),
];

/// Resolve an engine by explicit name, falling back to the first candidate.
pub fn resolve_engine(name: Option<&str>) -> Result<(&'static str, EngineFn)> {
    match name {
        Some(wanted) => {
            for (id, engine) in ENGINE_CANDIDATES {
                if *id == wanted {
                    return Ok((*id, *engine));
                }
            }
            bail!("unknown engine '{wanted}'. Valid: replay, synthetic");
        }
        None => Ok(ENGINE_CANDIDATES[0]),
    }
}

/// Replay engine: align each event to its tick series and walk it forward.
pub fn run_replay_backtest(config: &RunConfig) -> Result<i32> {
    let events = read_events_file(&config.dataset.events_path())?;
    let params = config.risk_params();

    let mut cache = SeriesCache::new(config.dataset.ticks_dir_path());
    let records = run_events(&events, &mut cache, &params);

    write_trade_log(&config.trade_log_path(), &records)?;
    Ok(0)
}

/// Synthetic engine: one seeded walk per event, no tick data required.
pub fn run_synthetic_backtest(config: &RunConfig) -> Result<i32> {
    let events = read_events_file(&config.dataset.events_path())?;
    let params = config.risk_params();
    let synth = config.synthetic_config();

    let records = run_events_synthetic(&events, &params, &synth);

    write_trade_log(&config.trade_log_path(), &records)?;
    Ok(0)
}
