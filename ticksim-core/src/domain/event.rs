//! EntryEvent — a signal instructing the simulator to open a hypothetical long.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Direction of an entry event. Only buys are simulated; anything else
/// survives parsing and is skipped by the driver, not rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Unsupported,
}

impl<'de> Deserialize<'de> for Side {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.as_str() {
            "buy" => Side::Buy,
            _ => Side::Unsupported,
        })
    }
}

impl Side {
    pub fn is_buy(self) -> bool {
        matches!(self, Side::Buy)
    }
}

/// An entry signal: open a hypothetical long position on `pair` at `t`.
///
/// Immutable once read. `pair` is held in the slash-free internal form
/// (`SOL_USDC`); the display form (`SOL/USDC`) only appears in files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryEvent {
    pub pair: String,
    pub t: NaiveDateTime,
    pub price: f64,
    pub side: Side,
}

/// `SOL/USDC` → `SOL_USDC`.
pub fn internal_pair(pair: &str) -> String {
    pair.replace('/', "_")
}

/// `SOL_USDC` → `SOL/USDC`.
pub fn display_pair(pair: &str) -> String {
    pair.replace('_', "/")
}
