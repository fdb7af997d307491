//! Split optimizer (C9): picks an ordered set of `(route, fraction)` pairs
//! whose fractions sum to 100, maximizing (exact-in) or minimizing
//! (exact-out) the gas-adjusted aggregate quote, via bounded subset-sum
//! dynamic programming over already-quoted candidates. No RPC, no
//! candidate-pool selection — everything it touches is already resolved by
//! C5-C8; this crate is pure computation.

mod dp;
mod types;

pub use dp::optimize;
pub use types::SplitResult;
