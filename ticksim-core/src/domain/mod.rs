//! Domain types for ticksim.

pub mod event;
pub mod params;
pub mod tick;
pub mod trade;

pub use event::{display_pair, internal_pair, EntryEvent, Side};
pub use params::RiskParams;
pub use tick::{PriceSeries, PriceTick};
pub use trade::{ExitReason, TradeRecord};

/// Pair identifier alias (slash-free internal form, e.g. `SOL_USDC`).
pub type Pair = String;
