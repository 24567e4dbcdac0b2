//! Synthetic price generation for exhausted fallback chains.
//!
//! When every real adapter for a retailer comes up empty, the estimator
//! produces a placeholder price so the retailer still appears in results
//! (where the retailer opts in). With an anchor from another retailer the
//! estimate sits within ±5% of it; without one it is derived from a stable
//! hash of the query, so the same query always shows the same estimate and
//! prices don't jump around on refresh.

use rand::{Rng, RngExt};

/// Relative spread applied around an anchor price.
const ANCHOR_SPREAD: f64 = 0.05;

/// Range for anchorless estimates: 10_000 + hash % 90_000.
const HASHED_FLOOR: u64 = 10_000;
const HASHED_SPAN: u64 = 90_000;

/// Produces a synthetic price for a query.
///
/// With `anchor` set, returns `anchor * (1 + v)` for `v` uniform in
/// `[-0.05, 0.05]`, truncated to an integer. Without an anchor, returns a
/// deterministic pseudo-price in `[10_000, 99_999]`.
pub fn estimate(anchor: Option<u64>, query: &str) -> u64 {
    estimate_with_rng(&mut rand::rng(), anchor, query)
}

/// Like [`estimate`], with a caller-supplied random source for testing.
pub fn estimate_with_rng<R: Rng>(rng: &mut R, anchor: Option<u64>, query: &str) -> u64 {
    match anchor {
        Some(anchor) => {
            let v: f64 = rng.random_range(-ANCHOR_SPREAD..=ANCHOR_SPREAD);
            (anchor as f64 * (1.0 + v)).trunc() as u64
        }
        None => HASHED_FLOOR + fnv1a(query) % HASHED_SPAN,
    }
}

/// FNV-1a over the query bytes. `DefaultHasher` makes no cross-release
/// stability promise, and the anchorless estimate must stay identical
/// across processes.
fn fnv1a(input: &str) -> u64 {
    const OFFSET: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;

    let mut hash = OFFSET;
    for byte in input.as_bytes() {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(PRIME);
    }
    hash
}
