//! ticksim runner — configuration, backtest driver, trade-log export,
//! metrics aggregation, and the engine registry.

pub mod config;
pub mod driver;
pub mod export;
pub mod metrics;
pub mod runner;

pub use config::{ConfigError, RunConfig};
pub use driver::{run_events, run_events_synthetic, SeriesCache};
pub use export::{load_trade_log, write_trade_log, TRADE_LOG_COLUMNS};
pub use metrics::{render_summary, summarize, summarize_file, Summary};
pub use runner::{resolve_engine, run_replay_backtest, run_synthetic_backtest, EngineFn};
