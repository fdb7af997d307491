use thiserror::Error;

#[derive(Debug, Error)]
pub enum SubgraphError {
    #[error("subgraph http error: {0}")]
    Http(String),
    #[error("subgraph response malformed: {0}")]
    Malformed(String),
    #[error("subgraph indexer has not caught up (requested {requested}, indexed up to {indexed})")]
    IndexingBehind { requested: u64, indexed: u64 },
    #[error("all subgraph providers in the fallback chain failed")]
    AllProvidersFailed,
}
