//! Entry-event streams: one JSON object per line.
//!
//! Malformed lines are skipped, never fatal — a missing file is the only
//! hard error, because a run without an event source is meaningless.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::domain::{display_pair, internal_pair, EntryEvent, Side};
use crate::time::{format_instant, parse_instant};

#[derive(Debug, Error)]
pub enum EventsError {
    #[error("cannot read events file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Wire shape of one JSONL line. Unknown fields (e.g. signal feature
/// blobs) are ignored.
#[derive(Debug, Deserialize)]
struct RawEvent {
    pair: String,
    t: String,
    price: f64,
    #[serde(default)]
    side: Option<Side>,
}

fn parse_line(line: &str) -> Option<EntryEvent> {
    if line.is_empty() {
        return None;
    }
    let raw: RawEvent = serde_json::from_str(line).ok()?;
    let t = parse_instant(&raw.t)?;
    if !raw.price.is_finite() || raw.price <= 0.0 {
        return None;
    }
    Some(EntryEvent {
        pair: internal_pair(&raw.pair),
        t,
        price: raw.price,
        side: raw.side.unwrap_or(Side::Buy),
    })
}

/// Parse an event stream, skipping malformed lines, sorted ascending by
/// timestamp (stable for ties).
pub fn read_events<R: BufRead>(reader: R) -> Vec<EntryEvent> {
    let mut events: Vec<EntryEvent> = reader
        .lines()
        .map_while(Result::ok)
        .filter_map(|line| parse_line(line.trim()))
        .collect();
    events.sort_by_key(|e| e.t);
    events
}

/// Read events from a JSONL file.
pub fn read_events_file(path: &Path) -> Result<Vec<EntryEvent>, EventsError> {
    let file = File::open(path).map_err(|source| EventsError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(read_events(BufReader::new(file)))
}

/// Serialize events as JSONL, pair in display form.
pub fn write_events<W: Write>(mut writer: W, events: &[EntryEvent]) -> io::Result<()> {
    for event in events {
        let line = serde_json::json!({
            "t": format_instant(event.t),
            "pair": display_pair(&event.pair),
            "price": event.price,
            "side": event.side,
        });
        writeln!(writer, "{line}")?;
    }
    Ok(())
}
