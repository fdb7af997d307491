use thiserror::Error;

/// Error surface shared by every component that reads on-chain or subgraph
/// state (§7). Component-specific errors (route construction, DP
/// infeasibility, ...) live next to the type they describe and convert into
/// this via `#[from]` at the boundary that needs to unify them.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("rpc call failed: {0}")]
    Rpc(String),
    #[error("request timed out")]
    Timeout,
    #[error("{0} is not well-formed on-chain data and was dropped")]
    Malformed(String),
}
