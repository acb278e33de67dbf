//! Entry-signal generation — glue around the simulation core.
//!
//! Signal generators are producers of `EntryEvent` streams; the simulator
//! never depends on them. Swap or add generators freely.

pub mod confluence;

pub use confluence::{confluence_events, sma, ConfluenceParams};
