//! Tick-series CSV loading.
//!
//! One file per pair, header row with `ts`/`time` and `price`/`px` column
//! aliases. Rows missing a timestamp or with an unparseable price are
//! dropped; survivors are sorted ascending by timestamp (stable, so
//! duplicate timestamps keep file order).

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::domain::{PriceSeries, PriceTick};
use crate::time::parse_instant;

/// Path of the tick file for one (internal-form) pair.
pub fn series_path(dir: &Path, pair: &str) -> PathBuf {
    dir.join(format!("{pair}.csv"))
}

fn find_column(headers: &csv::StringRecord, names: &[&str]) -> Option<usize> {
    names
        .iter()
        .find_map(|name| headers.iter().position(|h| h.trim() == *name))
}

/// Parse a tick CSV into a sorted series.
pub fn read_series<R: Read>(pair: &str, reader: R) -> PriceSeries {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let columns = rdr
        .headers()
        .ok()
        .map(|h| (find_column(h, &["ts", "time"]), find_column(h, &["price", "px"])));

    let mut ticks = Vec::new();
    if let Some((Some(ts_col), Some(px_col))) = columns {
        for record in rdr.records().flatten() {
            let ts = record.get(ts_col).and_then(parse_instant);
            let price = record
                .get(px_col)
                .and_then(|s| s.trim().parse::<f64>().ok());
            if let (Some(ts), Some(price)) = (ts, price) {
                ticks.push(PriceTick { ts, price });
            }
        }
    }
    ticks.sort_by_key(|t| t.ts);
    PriceSeries::new(pair, ticks)
}

/// Load the series for `pair` from `dir`, or `None` when the file does not
/// exist or cannot be opened — a resolution miss, not an error.
pub fn read_series_file(dir: &Path, pair: &str) -> Option<PriceSeries> {
    let file = File::open(series_path(dir, pair)).ok()?;
    Some(read_series(pair, file))
}
