//! Pool metadata providers (C2). Fetches live on-chain state for pools
//! described by a [`PoolRequest`], via batched calls through `multicall`,
//! dropping any pool whose metadata call fails rather than erroring the
//! whole batch.

mod address;
mod cache;
mod provider;
mod requests;
mod selectors;

pub use address::{derive_v2_pool_address, derive_v3_pool_address};
pub use cache::{CachingPoolMetadataProvider, SharedPoolMetadataProvider};
pub use provider::{ContractAddresses, OnChainPoolMetadataProvider, PoolMetadataProvider};
pub use requests::PoolRequest;
