use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenListError {
    #[error("rpc error resolving token metadata: {0}")]
    Rpc(String),
}
