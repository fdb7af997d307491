//! Shared data model for the smart order router: currencies, amounts,
//! pools, routes, quotes and the final plan. No I/O and no business logic
//! lives here — every other crate depends on `model` and builds on top of
//! it.

pub mod amount;
pub mod chain;
pub mod config;
pub mod currency;
pub mod error;
pub mod plan;
pub mod pool;
pub mod quote;
pub mod route;
pub mod subgraph;
pub mod u256_decimal;

pub use amount::Amount;
pub use chain::{BlockId, ChainId};
pub use config::{PoolSelectionConfig, RoutingConfig, SwapConfig, SwapRouterVersion};
pub use currency::{Currency, Token};
pub use error::DataError;
pub use plan::Plan;
pub use pool::{FeeTier, Pool, PoolAddress, Protocol, StablePool, StableWrapperPool, V2Pool, V3Pool};
pub use quote::{GasEstimate, RouteWithQuote, TradeType};
pub use route::{Route, RouteError};
pub use subgraph::{SubgraphPool, SubgraphPoolExtra};
