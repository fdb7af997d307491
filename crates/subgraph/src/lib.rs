//! Subgraph providers (C3). List all known pools with coarse TVL, used only
//! for candidate selection — never for swap math.

mod error;
mod fallback;
mod provider;
mod remote;
mod static_provider;
mod uri;

pub use error::SubgraphError;
pub use fallback::WithFallbackProvider;
pub use provider::SubgraphProvider;
pub use remote::{RemoteSubgraphProvider, SubgraphKind};
pub use static_provider::StaticSubgraphProvider;
pub use uri::UriSubgraphProvider;
