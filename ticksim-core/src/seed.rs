//! Deterministic path seeding.
//!
//! The synthetic simulator must reproduce the same walk for the same
//! `(pair, timestamp)` on every run, process, and machine, so the seed is a
//! BLAKE3 hash over both — a fixed-width well-distributed hash, never the
//! process-randomized hasher the standard library uses.

use chrono::NaiveDateTime;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::time::format_instant;

/// Derive the walk seed for one `(pair, timestamp)`.
pub fn path_seed(pair: &str, ts: NaiveDateTime) -> u64 {
    let mut hasher = blake3::Hasher::new();
    hasher.update(pair.as_bytes());
    hasher.update(b"|");
    hasher.update(format_instant(ts).as_bytes());
    let hash = hasher.finalize();
    u64::from_le_bytes(hash.as_bytes()[..8].try_into().unwrap())
}

/// Seeded RNG for one synthetic path.
pub fn path_rng(pair: &str, ts: NaiveDateTime) -> StdRng {
    StdRng::seed_from_u64(path_seed(pair, ts))
}
