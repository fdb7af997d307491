//! Batched read-only contract-call transport (C1). Packs many `eth_call`s
//! into as few RPC round-trips as practical and degrades gracefully — by
//! halving the batch and retrying — when a batch as a whole fails.

mod batching;
mod transport;

pub use batching::{BatchConfig, CallOutcome, Multicall};
pub use transport::{Call, CallResult, ChainTransport, TransportError};
