//! Trade-log CSV export and the lenient loader the metrics layer uses.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

use ticksim_core::domain::TradeRecord;
use ticksim_core::time::format_instant;

/// Fixed column set, identical for empty and non-empty logs, so downstream
/// consumers never see a missing or shape-shifting file.
pub const TRADE_LOG_COLUMNS: [&str; 19] = [
    "pair",
    "entry_ts",
    "exit_ts",
    "entry_px",
    "exit_px",
    "bars_held",
    "exit",
    "pnl_pct",
    "size_usd",
    "pnl_usd",
    "fees_usd",
    "tp_mult",
    "sl_pct",
    "trail_frac",
    "late_tp_after_frac",
    "late_tp_frac",
    "slippage_bps",
    "fee_bps",
    "max_bars",
];

fn record_row(r: &TradeRecord) -> [String; 19] {
    let p = &r.params;
    [
        r.pair.clone(),
        format_instant(r.entry_ts),
        format_instant(r.exit_ts),
        r.entry_px.to_string(),
        r.exit_px.to_string(),
        r.bars_held.to_string(),
        r.exit.as_str().to_string(),
        r.pnl_pct.to_string(),
        r.size_usd.to_string(),
        r.pnl_usd.to_string(),
        r.fees_usd.to_string(),
        p.tp_mult.to_string(),
        p.sl_pct.to_string(),
        p.trail_frac.to_string(),
        p.late_tp_after_frac.to_string(),
        p.late_tp_frac.to_string(),
        p.slippage_bps.to_string(),
        p.fee_bps.to_string(),
        p.max_bars.to_string(),
    ]
}

/// Serialize a trade log as CSV. The header row is always present.
pub fn export_trade_log(records: &[TradeRecord]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(TRADE_LOG_COLUMNS)?;
    for record in records {
        wtr.write_record(&record_row(record))?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Write the trade log to `path`, creating parent directories as needed.
pub fn write_trade_log(path: &Path, records: &[TradeRecord]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create '{}'", parent.display()))?;
        }
    }
    let csv = export_trade_log(records)?;
    std::fs::write(path, csv).with_context(|| format!("failed to write '{}'", path.display()))
}

/// One loaded row, reduced to what the metrics layer reads. Unparseable
/// numbers degrade to zero rather than dropping the row.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoggedTrade {
    pub pnl_pct: f64,
    pub pnl_usd: f64,
}

/// Parse a trade log leniently: rows that cannot be read are skipped, and
/// missing or malformed numeric cells default to zero.
pub fn read_trade_log<R: Read>(reader: R) -> Result<Vec<LoggedTrade>> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = rdr.headers().context("trade log has no header")?.clone();
    let pnl_pct_col = headers.iter().position(|h| h == "pnl_pct");
    let pnl_usd_col = headers.iter().position(|h| h == "pnl_usd");

    let cell = |record: &csv::StringRecord, col: Option<usize>| -> f64 {
        col.and_then(|c| record.get(c))
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(0.0)
    };

    let mut out = Vec::new();
    for record in rdr.records().flatten() {
        out.push(LoggedTrade {
            pnl_pct: cell(&record, pnl_pct_col),
            pnl_usd: cell(&record, pnl_usd_col),
        });
    }
    Ok(out)
}

/// Load a trade log from disk.
pub fn load_trade_log(path: &Path) -> Result<Vec<LoggedTrade>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open '{}'", path.display()))?;
    read_trade_log(file)
}
