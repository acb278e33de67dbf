//! ticksim core — trade simulation over tick series.
//!
//! This crate contains the heart of the backtester:
//! - Domain types (entry events, price ticks and series, risk parameters,
//!   trade records)
//! - Price-series index: nearest-at-or-after entry alignment
//! - Replay simulator with take-profit, late take-profit, trailing, and
//!   stop-loss exits over observed ticks
//! - Synthetic simulator: a seeded random walk with breakeven arming
//! - Cost model (basis-point slippage and fees on both legs)
//! - Confluence signal generation
//! - Data I/O: events JSONL, tick CSVs, and the polling collector

pub mod data;
pub mod domain;
pub mod seed;
pub mod signals;
pub mod sim;
pub mod time;
