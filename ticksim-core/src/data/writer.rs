//! Tick-file appending: one `ts,price` row per observation.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::domain::PriceTick;
use crate::time::format_instant;

use super::ticks::series_path;

/// Append one tick to `<dir>/<PAIR>.csv`, writing the header when the file
/// is first created.
pub fn append_tick(dir: &Path, pair: &str, tick: &PriceTick) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)?;
    let path = series_path(dir, pair);
    let is_new = !path.exists();
    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
    if is_new {
        writeln!(file, "ts,price")?;
    }
    writeln!(file, "{},{}", format_instant(tick.ts), tick.price)?;
    Ok(())
}
