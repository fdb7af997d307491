//! Token metadata resolution (C4): symbol/decimals lookup with on-chain
//! fallback decoding, a well-known seed table, and an indefinite cache.

mod cache;
mod error;
mod onchain;
mod provider;
mod selectors;
mod well_known;

pub use cache::CachingTokenProvider;
pub use error::TokenListError;
pub use onchain::OnChainTokenMetadataProvider;
pub use provider::{TokenMap, TokenMetadataProvider};
pub use well_known::seed_tokens;
