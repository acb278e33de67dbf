//! File formats and feeds around the core: entry events (JSONL), tick
//! series (CSV), tick appending, and the polling collector.

pub mod collector;
pub mod events;
pub mod provider;
pub mod ticks;
pub mod writer;

pub use collector::{collect_once, run_collector, CollectorSession};
pub use events::{read_events, read_events_file, write_events, EventsError};
pub use provider::{PriceProvider, ProviderError, RestPriceProvider};
pub use ticks::{read_series, read_series_file, series_path};
pub use writer::append_tick;
