//! Polling tick collector.
//!
//! Appends at most one tick per pair per minute. The per-pair dedupe state
//! lives on the session object and nowhere else — two sessions never share
//! it, and a caller can inspect or rebuild it explicitly.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::domain::PriceTick;

use super::provider::PriceProvider;
use super::writer::append_tick;

const MINUTE_KEY: &str = "%Y-%m-%dT%H:%M";

/// One collection run's output state: target directory plus the per-pair
/// last-written-minute map.
pub struct CollectorSession {
    out_dir: PathBuf,
    last_written: HashMap<String, String>,
}

/// Outcome of one polling round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectRound {
    pub written: usize,
    pub errors: usize,
}

impl CollectorSession {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            last_written: HashMap::new(),
        }
    }

    /// Record one observation, at most once per pair per minute.
    /// Returns whether a row was written.
    pub fn record(&mut self, pair: &str, tick: &PriceTick) -> std::io::Result<bool> {
        let minute_key = tick.ts.format(MINUTE_KEY).to_string();
        if self.last_written.get(pair) == Some(&minute_key) {
            return Ok(false);
        }
        append_tick(&self.out_dir, pair, tick)?;
        self.last_written.insert(pair.to_string(), minute_key);
        Ok(true)
    }

    /// Minute key of the last written tick for `pair`, if any.
    pub fn last_written_minute(&self, pair: &str) -> Option<&str> {
        self.last_written.get(pair).map(String::as_str)
    }
}

/// Poll every pair once. Fetch and write failures are reported to stderr
/// and skipped; the round never aborts.
pub fn collect_once(
    provider: &dyn PriceProvider,
    session: &mut CollectorSession,
    pairs: &[String],
) -> CollectRound {
    let mut round = CollectRound::default();
    for pair in pairs {
        match provider.fetch_latest(pair) {
            Ok(tick) => match session.record(pair, &tick) {
                Ok(true) => round.written += 1,
                Ok(false) => {}
                Err(err) => {
                    eprintln!("[collector] write failed for {pair}: {err}");
                    round.errors += 1;
                }
            },
            Err(err) => {
                eprintln!("[collector] fetch failed for {pair}: {err}");
                round.errors += 1;
            }
        }
    }
    round
}

/// Poll until `stop` is set.
///
/// A round where every pair failed backs off exponentially (2s doubling to
/// 60s); any successful round resets to `interval`.
pub fn run_collector(
    provider: &dyn PriceProvider,
    session: &mut CollectorSession,
    pairs: &[String],
    interval: Duration,
    stop: &AtomicBool,
) {
    let mut backoff = Duration::from_secs(2);
    while !stop.load(Ordering::Relaxed) {
        let round = collect_once(provider, session, pairs);
        let sleep = if !pairs.is_empty() && round.errors == pairs.len() {
            let current = backoff;
            backoff = (backoff * 2).min(Duration::from_secs(60));
            current
        } else {
            backoff = Duration::from_secs(2);
            interval
        };
        std::thread::sleep(sleep);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::provider::ProviderError;
    use crate::data::ticks::read_series_file;
    use chrono::{NaiveDate, NaiveDateTime};
    use std::cell::RefCell;
    use std::sync::atomic::AtomicU64;

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn temp_dir() -> std::path::PathBuf {
        let id = TEST_COUNTER.fetch_add(1, Ordering::Relaxed);
        let dir = std::env::temp_dir()
            .join(format!("ticksim_collector_test_{}_{id}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    fn ts(minute: u32, second: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(0, minute, second)
            .unwrap()
    }

    /// Replays a scripted tick sequence; errors once the script runs dry.
    struct ScriptedProvider {
        ticks: RefCell<Vec<PriceTick>>,
    }

    impl ScriptedProvider {
        fn new(mut ticks: Vec<PriceTick>) -> Self {
            ticks.reverse();
            Self {
                ticks: RefCell::new(ticks),
            }
        }
    }

    impl PriceProvider for ScriptedProvider {
        fn fetch_latest(&self, pair: &str) -> Result<PriceTick, ProviderError> {
            self.ticks
                .borrow_mut()
                .pop()
                .ok_or_else(|| ProviderError::Malformed {
                    pair: pair.to_string(),
                    reason: "script exhausted".into(),
                })
        }
    }

    #[test]
    fn dedupes_within_a_minute() {
        let dir = temp_dir();
        let mut session = CollectorSession::new(&dir);

        let tick_a = PriceTick {
            ts: ts(0, 10),
            price: 1.0,
        };
        let tick_b = PriceTick {
            ts: ts(0, 40),
            price: 1.1,
        };
        let tick_c = PriceTick {
            ts: ts(1, 0),
            price: 1.2,
        };

        assert!(session.record("SOL_USDC", &tick_a).unwrap());
        // same minute: dropped
        assert!(!session.record("SOL_USDC", &tick_b).unwrap());
        // next minute: written
        assert!(session.record("SOL_USDC", &tick_c).unwrap());
        assert_eq!(session.last_written_minute("SOL_USDC"), Some("2024-05-01T00:01"));

        let series = read_series_file(&dir, "SOL_USDC").unwrap();
        assert_eq!(series.len(), 2);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn dedupe_state_is_per_pair() {
        let dir = temp_dir();
        let mut session = CollectorSession::new(&dir);
        let tick = PriceTick {
            ts: ts(0, 0),
            price: 1.0,
        };

        assert!(session.record("SOL_USDC", &tick).unwrap());
        assert!(session.record("JUP_USDC", &tick).unwrap());
        assert_eq!(session.last_written_minute("BONK_USDC"), None);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn collect_once_counts_writes_and_errors() {
        let dir = temp_dir();
        let mut session = CollectorSession::new(&dir);
        let provider = ScriptedProvider::new(vec![PriceTick {
            ts: ts(0, 0),
            price: 1.0,
        }]);

        let pairs = vec!["SOL_USDC".to_string(), "JUP_USDC".to_string()];
        let round = collect_once(&provider, &mut session, &pairs);
        // one scripted tick, then the script runs dry
        assert_eq!(round, CollectRound { written: 1, errors: 1 });

        let _ = std::fs::remove_dir_all(&dir);
    }
}
