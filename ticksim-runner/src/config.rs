//! Layered TOML configuration for backtest runs.
//!
//! Every strategy key may appear in any of the `params`, `backtest`, `sim`,
//! or `risk` sections; resolution picks the most specific layer per key:
//! params > backtest > sim > risk > built-in default. A missing or
//! unreadable config file is fatal — no partial progress is meaningful
//! without one.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use ticksim_core::domain::RiskParams;
use ticksim_core::sim::synthetic::SyntheticConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// One section's worth of overrides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ParamOverlay {
    pub tp_mult: Option<f64>,
    pub sl_pct: Option<f64>,
    pub max_bars: Option<usize>,
    pub trail_frac: Option<f64>,
    pub late_tp_after_frac: Option<f64>,
    pub late_tp_frac: Option<f64>,
    pub slippage_bps: Option<f64>,
    pub fee_bps: Option<f64>,
    pub base_size_usd: Option<f64>,
    pub step_frac: Option<f64>,
    pub be_arm_frac: Option<f64>,
}

/// Data source locations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetSection {
    pub events_jsonl: Option<PathBuf>,
    pub ticks_dir: Option<PathBuf>,
}

impl DatasetSection {
    pub fn events_path(&self) -> PathBuf {
        self.events_jsonl
            .clone()
            .unwrap_or_else(|| PathBuf::from("data/raw/events.jsonl"))
    }

    pub fn ticks_dir_path(&self) -> PathBuf {
        self.ticks_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("data/real/ticks"))
    }
}

/// Full run configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default)]
    pub dataset: DatasetSection,
    #[serde(default)]
    pub params: ParamOverlay,
    #[serde(default)]
    pub backtest: ParamOverlay,
    #[serde(default)]
    pub sim: ParamOverlay,
    #[serde(default)]
    pub risk: ParamOverlay,
    /// Output path for the trade log.
    pub trade_log_csv: Option<PathBuf>,
    /// Engine to run; the first registry candidate when absent.
    pub engine: Option<String>,
}

impl RunConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self::from_toml(&text)?)
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    fn pick<T: Copy>(&self, get: impl Fn(&ParamOverlay) -> Option<T>, default: T) -> T {
        [&self.params, &self.backtest, &self.sim, &self.risk]
            .into_iter()
            .find_map(get)
            .unwrap_or(default)
    }

    /// Resolve the risk parameter bundle across sections.
    pub fn risk_params(&self) -> RiskParams {
        let d = RiskParams::default();
        RiskParams {
            tp_mult: self.pick(|l| l.tp_mult, d.tp_mult),
            sl_pct: self.pick(|l| l.sl_pct, d.sl_pct),
            trail_frac: self.pick(|l| l.trail_frac, d.trail_frac),
            late_tp_after_frac: self.pick(|l| l.late_tp_after_frac, d.late_tp_after_frac),
            late_tp_frac: self.pick(|l| l.late_tp_frac, d.late_tp_frac),
            max_bars: self.pick(|l| l.max_bars, d.max_bars),
            slippage_bps: self.pick(|l| l.slippage_bps, d.slippage_bps),
            fee_bps: self.pick(|l| l.fee_bps, d.fee_bps),
            base_size_usd: self.pick(|l| l.base_size_usd, d.base_size_usd),
        }
    }

    /// Resolve the synthetic-walk knobs across the same sections.
    pub fn synthetic_config(&self) -> SyntheticConfig {
        let d = SyntheticConfig::default();
        SyntheticConfig {
            step_frac: self.pick(|l| l.step_frac, d.step_frac),
            be_arm_frac: self.pick(|l| l.be_arm_frac, d.be_arm_frac),
        }
    }

    pub fn trade_log_path(&self) -> PathBuf {
        self.trade_log_csv
            .clone()
            .unwrap_or_else(|| PathBuf::from("artifacts/trades.engine.csv"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_sections_are_empty() {
        let config = RunConfig::from_toml("").unwrap();
        let params = config.risk_params();
        assert_eq!(params, RiskParams::default());
        assert_eq!(config.synthetic_config(), SyntheticConfig::default());
        assert_eq!(
            config.trade_log_path(),
            PathBuf::from("artifacts/trades.engine.csv")
        );
        assert_eq!(
            config.dataset.events_path(),
            PathBuf::from("data/raw/events.jsonl")
        );
    }

    #[test]
    fn params_win_over_backtest_over_sim() {
        let toml = r#"
trade_log_csv = "artifacts/out.csv"

[params]
tp_mult = 1.05

[backtest]
tp_mult = 1.03
sl_pct = 0.03

[sim]
tp_mult = 1.01
sl_pct = 0.01
slippage_bps = 8.0
late_tp_frac = 0.015
"#;
        let config = RunConfig::from_toml(toml).unwrap();
        let params = config.risk_params();

        assert_eq!(params.tp_mult, 1.05); // params beats backtest and sim
        assert_eq!(params.sl_pct, 0.03); // backtest beats sim
        assert_eq!(params.slippage_bps, 8.0); // sim is the only layer set
        assert_eq!(params.late_tp_frac, 0.015);
        assert_eq!(config.trade_log_path(), PathBuf::from("artifacts/out.csv"));
    }

    #[test]
    fn risk_section_provides_sizing_and_fees() {
        let toml = r#"
[risk]
base_size_usd = 500.0
fee_bps = 12.5
"#;
        let config = RunConfig::from_toml(toml).unwrap();
        let params = config.risk_params();
        assert_eq!(params.base_size_usd, 500.0);
        assert_eq!(params.fee_bps, 12.5);
    }

    #[test]
    fn synthetic_knobs_resolve_like_any_other_key() {
        let toml = r#"
[params]
be_arm_frac = 0.02

[sim]
step_frac = 0.01
be_arm_frac = 0.005
"#;
        let config = RunConfig::from_toml(toml).unwrap();
        let synth = config.synthetic_config();
        assert_eq!(synth.step_frac, 0.01);
        assert_eq!(synth.be_arm_frac, 0.02);
    }

    #[test]
    fn unknown_keys_are_tolerated() {
        let toml = r#"
future_flag = true

[dataset]
events_jsonl = "data/events.jsonl"
comment = "scratch"
"#;
        let config = RunConfig::from_toml(toml);
        assert!(config.is_ok());
        assert_eq!(
            config.unwrap().dataset.events_path(),
            PathBuf::from("data/events.jsonl")
        );
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = RunConfig::from_file(Path::new("/nonexistent/run.toml"));
        assert!(matches!(err, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let err = RunConfig::from_toml("params = \"not-a-table\"");
        assert!(err.is_err());
    }
}
