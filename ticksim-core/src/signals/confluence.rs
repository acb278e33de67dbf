//! MA-confluence entry signals: price crossing up through its moving
//! average with positive momentum and a minimum recent return.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::domain::{EntryEvent, PriceSeries, Side};
use crate::sim::costs::round_dp;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfluenceParams {
    pub ma_len: usize,
    pub momentum_len: usize,
    pub roi_len: usize,
    /// Minimum fractional move over `roi_len` bars.
    pub roi_min: f64,
    /// Minimum bars between emitted signals.
    pub dedupe_bars: usize,
}

impl Default for ConfluenceParams {
    fn default() -> Self {
        Self {
            ma_len: 20,
            momentum_len: 5,
            roi_len: 3,
            roi_min: 0.01,
            dedupe_bars: 10,
        }
    }
}

/// Simple moving average with a growing warmup window: the first `k < n`
/// outputs average everything seen so far.
pub fn sma(values: &[f64], n: usize) -> Vec<f64> {
    if n == 0 {
        return vec![0.0; values.len()];
    }
    let mut out = Vec::with_capacity(values.len());
    let mut window: VecDeque<f64> = VecDeque::with_capacity(n + 1);
    let mut sum = 0.0;
    for &v in values {
        window.push_back(v);
        sum += v;
        if window.len() > n {
            if let Some(oldest) = window.pop_front() {
                sum -= oldest;
            }
        }
        out.push(sum / window.len() as f64);
    }
    out
}

/// Scan one series and emit deduplicated buy events where the cross-up,
/// momentum, and recent-return conditions line up on the same bar.
///
/// Non-positive prices are dropped before scanning. A series shorter than
/// `max(ma_len, momentum_len, roi_len) + 2` produces no events.
pub fn confluence_events(series: &PriceSeries, params: &ConfluenceParams) -> Vec<EntryEvent> {
    let ticks: Vec<_> = series.ticks.iter().filter(|t| t.price > 0.0).collect();

    let min_len = params.ma_len.max(params.momentum_len).max(params.roi_len) + 2;
    if ticks.len() < min_len {
        return Vec::new();
    }

    let px: Vec<f64> = ticks.iter().map(|t| t.price).collect();
    let ma = sma(&px, params.ma_len);

    let mut events = Vec::new();
    let mut last_signal: Option<usize> = None;

    for i in 1..px.len() {
        let cross_up = px[i - 1] <= ma[i - 1] && px[i] > ma[i];
        let mom_ok =
            i >= params.momentum_len && px[i] / px[i - params.momentum_len] - 1.0 > 0.0;
        let roi_ok = i >= params.roi_len && px[i] / px[i - params.roi_len] - 1.0 >= params.roi_min;
        let spaced = last_signal.map_or(true, |j| i - j >= params.dedupe_bars);

        if cross_up && mom_ok && roi_ok && spaced {
            events.push(EntryEvent {
                pair: series.pair.clone(),
                t: ticks[i].ts,
                price: round_dp(px[i], 8),
                side: Side::Buy,
            });
            last_signal = Some(i);
        }
    }
    events
}
