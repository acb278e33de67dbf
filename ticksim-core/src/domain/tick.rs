//! Price samples and per-pair series, with the entry-index lookup.

use chrono::NaiveDateTime;

/// One observed price at a point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceTick {
    pub ts: NaiveDateTime,
    pub price: f64,
}

/// A time-ordered tick series for one pair, held for the lifetime of a run.
///
/// Sorted ascending by timestamp at load time; duplicate timestamps keep
/// insertion order. The index lookup relies on that ordering and does not
/// re-validate it.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    pub pair: String,
    pub ticks: Vec<PriceTick>,
}

impl PriceSeries {
    pub fn new(pair: impl Into<String>, ticks: Vec<PriceTick>) -> Self {
        Self {
            pair: pair.into(),
            ticks,
        }
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    /// Index of the first tick at or after `at`, or `None` when the event
    /// falls past the end of the data (the caller skips that event).
    pub fn entry_index(&self, at: NaiveDateTime) -> Option<usize> {
        let idx = self.ticks.partition_point(|t| t.ts < at);
        (idx < self.ticks.len()).then_some(idx)
    }
}
