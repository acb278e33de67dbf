//! ticksim CLI — run backtests, generate signals, summarize trade logs,
//! and collect live ticks.
//!
//! Commands:
//! - `run` — execute a backtest from a TOML config file
//! - `signals` — scan tick CSVs and emit confluence entry events
//! - `report` — summarize a trade-log CSV
//! - `collect` — poll a REST price source and append tick rows

use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use ticksim_core::data::{
    read_series_file, run_collector, write_events, CollectorSession, RestPriceProvider,
};
use ticksim_core::signals::{confluence_events, ConfluenceParams};
use ticksim_runner::{render_summary, resolve_engine, summarize_file, RunConfig};

#[derive(Parser)]
#[command(name = "ticksim", about = "ticksim CLI — tick-replay trade simulation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a backtest from a TOML config file.
    Run {
        /// Path to a TOML config file.
        #[arg(short, long)]
        config: PathBuf,

        /// Trade-log output path (overrides the config).
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Engine name: replay, synthetic. Defaults to the config's choice,
        /// then the first candidate.
        #[arg(long)]
        engine: Option<String>,
    },
    /// Generate confluence entry events from a directory of tick CSVs.
    Signals {
        /// Directory of per-pair tick CSVs.
        #[arg(long, default_value = "data/real/ticks")]
        ticks_dir: PathBuf,

        /// Output events file (JSONL).
        #[arg(long, default_value = "data/raw/events.jsonl")]
        out: PathBuf,

        /// Moving-average window.
        #[arg(long, default_value_t = 20)]
        ma: usize,

        /// Momentum lookback in bars.
        #[arg(long, default_value_t = 5)]
        mom: usize,

        /// Return lookback in bars.
        #[arg(long, default_value_t = 3)]
        roi_len: usize,

        /// Minimum fractional move over the return lookback.
        #[arg(long, default_value_t = 0.01)]
        roi_min: f64,

        /// Minimum bars between signals per pair.
        #[arg(long, default_value_t = 10)]
        dedupe_bars: usize,

        /// Stop after this many tick files.
        #[arg(long, default_value_t = 1000)]
        max_pairs: usize,
    },
    /// Summarize a trade-log CSV.
    Report {
        /// Path to the trade log.
        path: PathBuf,
    },
    /// Poll a REST price source and append tick rows per pair.
    Collect {
        /// Pairs to poll (internal form, e.g. SOL_USDC).
        #[arg(required = true)]
        pairs: Vec<String>,

        /// Output directory for tick CSVs.
        #[arg(long, default_value = "data/real/ticks")]
        out_dir: PathBuf,

        /// Quote endpoint base URL.
        #[arg(long)]
        base_url: String,

        /// API key; falls back to the TICKSIM_API_KEY environment variable.
        #[arg(long)]
        api_key: Option<String>,

        /// Seconds between polling rounds.
        #[arg(long, default_value_t = 60)]
        interval_secs: u64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            out,
            engine,
        } => cmd_run(&config, out, engine),
        Commands::Signals {
            ticks_dir,
            out,
            ma,
            mom,
            roi_len,
            roi_min,
            dedupe_bars,
            max_pairs,
        } => cmd_signals(
            &ticks_dir,
            &out,
            ConfluenceParams {
                ma_len: ma,
                momentum_len: mom,
                roi_len,
                roi_min,
                dedupe_bars,
            },
            max_pairs,
        ),
        Commands::Report { path } => cmd_report(&path),
        Commands::Collect {
            pairs,
            out_dir,
            base_url,
            api_key,
            interval_secs,
        } => cmd_collect(pairs, out_dir, base_url, api_key, interval_secs),
    }
}

fn cmd_run(config_path: &Path, out: Option<PathBuf>, engine: Option<String>) -> Result<()> {
    let mut config = RunConfig::from_file(config_path)?;
    if let Some(out) = out {
        config.trade_log_csv = Some(out);
    }

    let name = engine.or_else(|| config.engine.clone());
    let (tag, engine_fn) = resolve_engine(name.as_deref())?;

    let code = engine_fn(&config)?;
    println!("[entry] {tag}");
    println!("[wrote] {}", config.trade_log_path().display());

    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}

fn cmd_signals(
    ticks_dir: &Path,
    out: &Path,
    params: ConfluenceParams,
    max_pairs: usize,
) -> Result<()> {
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut pairs: Vec<String> = std::fs::read_dir(ticks_dir)
        .with_context(|| format!("cannot read ticks dir '{}'", ticks_dir.display()))?
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            let is_csv = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
            if !is_csv {
                return None;
            }
            Some(path.file_stem()?.to_string_lossy().into_owned())
        })
        .collect();
    pairs.sort();

    let file = std::fs::File::create(out)
        .with_context(|| format!("cannot create events file '{}'", out.display()))?;
    let mut writer = BufWriter::new(file);

    let mut total = 0;
    for pair in pairs.iter().take(max_pairs) {
        let Some(series) = read_series_file(ticks_dir, pair) else {
            continue;
        };
        let events = confluence_events(&series, &params);
        write_events(&mut writer, &events)?;
        total += events.len();
    }
    writer.flush()?;

    println!("[signals] wrote {total} events to {}", out.display());
    Ok(())
}

fn cmd_report(path: &Path) -> Result<()> {
    let summary = summarize_file(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    print!("{}", render_summary(&name, &summary));
    Ok(())
}

fn cmd_collect(
    pairs: Vec<String>,
    out_dir: PathBuf,
    base_url: String,
    api_key: Option<String>,
    interval_secs: u64,
) -> Result<()> {
    let api_key = api_key
        .or_else(|| std::env::var("TICKSIM_API_KEY").ok())
        .context("an API key is required (--api-key or TICKSIM_API_KEY)")?;

    let provider = RestPriceProvider::new(base_url, api_key);
    let mut session = CollectorSession::new(&out_dir);

    println!(
        "[collector] polling {} pair(s) every {interval_secs}s into {}",
        pairs.len(),
        out_dir.display()
    );

    // runs until the process is killed
    let stop = AtomicBool::new(false);
    run_collector(
        &provider,
        &mut session,
        &pairs,
        Duration::from_secs(interval_secs),
        &stop,
    );
    Ok(())
}
