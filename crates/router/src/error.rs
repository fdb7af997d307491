use model::ChainId;
use thiserror::Error;

/// The router's public error surface (§6). Every per-component error
/// (`model::DataError`, `subgraph::SubgraphError`, `model::RouteError`, ...)
/// gets folded into one of these at the orchestrator boundary rather than
/// leaking the component's own type to callers.
#[derive(Debug, Error)]
pub enum RouterError {
    #[error("chain {0} is not supported")]
    UnsupportedChain(ChainId),
    #[error("trade type is not supported for the configured protocol set")]
    UnsupportedTradeType,
    #[error("no valid route found")]
    NoRouteFound,
    #[error("rpc call failed: {0}")]
    RpcFailure(String),
    #[error("request timed out")]
    Timeout,
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl From<model::DataError> for RouterError {
    fn from(err: model::DataError) -> Self {
        match err {
            model::DataError::Rpc(reason) => RouterError::RpcFailure(reason),
            model::DataError::Timeout => RouterError::Timeout,
            model::DataError::Malformed(reason) => RouterError::RpcFailure(reason),
        }
    }
}

impl From<subgraph::SubgraphError> for RouterError {
    fn from(err: subgraph::SubgraphError) -> Self {
        match err {
            subgraph::SubgraphError::Http(reason) => RouterError::RpcFailure(reason),
            subgraph::SubgraphError::Malformed(reason) => RouterError::RpcFailure(reason),
            subgraph::SubgraphError::IndexingBehind { requested, indexed } => {
                RouterError::RpcFailure(format!("indexer behind: requested {requested}, indexed {indexed}"))
            }
            subgraph::SubgraphError::AllProvidersFailed => {
                RouterError::RpcFailure("all subgraph providers failed".to_string())
            }
        }
    }
}

impl From<token_list::TokenListError> for RouterError {
    fn from(err: token_list::TokenListError) -> Self {
        match err {
            token_list::TokenListError::Rpc(reason) => RouterError::RpcFailure(reason),
        }
    }
}
