//! TradeRecord — the simulator's sole output unit.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::params::RiskParams;

/// Why a simulated position closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    Tp,
    LateTp,
    Trail,
    Sl,
    Timeout,
}

impl ExitReason {
    pub fn as_str(self) -> &'static str {
        match self {
            ExitReason::Tp => "tp",
            ExitReason::LateTp => "late_tp",
            ExitReason::Trail => "trail",
            ExitReason::Sl => "sl",
            ExitReason::Timeout => "timeout",
        }
    }
}

/// One completed simulated trade.
///
/// Created exactly once per aligned entry event, never mutated afterwards,
/// appended to the trade log. Numeric fields are rounded at creation so
/// identical inputs serialize byte-identically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub pair: String,
    pub entry_ts: NaiveDateTime,
    pub exit_ts: NaiveDateTime,
    pub entry_px: f64,
    pub exit_px: f64,
    pub bars_held: usize,
    pub exit: ExitReason,
    pub pnl_pct: f64,
    pub size_usd: f64,
    pub pnl_usd: f64,
    pub fees_usd: f64,
    /// The risk parameters the trade was simulated under.
    pub params: RiskParams,
}

impl TradeRecord {
    pub fn is_winner(&self) -> bool {
        self.pnl_pct > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_reason_labels() {
        assert_eq!(ExitReason::Tp.as_str(), "tp");
        assert_eq!(ExitReason::LateTp.as_str(), "late_tp");
        assert_eq!(ExitReason::Trail.as_str(), "trail");
        assert_eq!(ExitReason::Sl.as_str(), "sl");
        assert_eq!(ExitReason::Timeout.as_str(), "timeout");
    }

    #[test]
    fn exit_reason_serde_matches_labels() {
        for reason in [
            ExitReason::Tp,
            ExitReason::LateTp,
            ExitReason::Trail,
            ExitReason::Sl,
            ExitReason::Timeout,
        ] {
            let json = serde_json::to_string(&reason).unwrap();
            assert_eq!(json, format!("\"{}\"", reason.as_str()));
            assert_eq!(serde_json::from_str::<ExitReason>(&json).unwrap(), reason);
        }
    }
}
