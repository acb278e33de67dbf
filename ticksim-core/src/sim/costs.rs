//! Cost model: basis-point conversions applied to both legs of a trade.

/// 1 bp = 0.01%.
pub fn fraction_from_bps(bps: f64) -> f64 {
    bps / 10_000.0
}

/// Entry fill price: slippage works against the buyer.
pub fn entry_execution_price(observed: f64, slippage_bps: f64) -> f64 {
    observed * (1.0 + fraction_from_bps(slippage_bps))
}

/// Exit fill price: slippage works against the seller.
pub fn exit_execution_price(observed: f64, slippage_bps: f64) -> f64 {
    observed * (1.0 - fraction_from_bps(slippage_bps))
}

/// Flat fee on notional, charged on both legs regardless of realized size.
pub fn round_trip_fees(notional_usd: f64, fee_bps: f64) -> f64 {
    notional_usd * fraction_from_bps(fee_bps) * 2.0
}

/// Round to `dp` decimal places.
pub fn round_dp(v: f64, dp: i32) -> f64 {
    let scale = 10f64.powi(dp);
    (v * scale).round() / scale
}
