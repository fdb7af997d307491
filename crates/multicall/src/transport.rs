use async_trait::async_trait;
use model::BlockId;
use primitive_types::H160;
use thiserror::Error;

/// A single read-only call, pre-encoded by the caller (C2/C7 know the ABI
/// for the contract they are calling; this crate only knows how to batch
/// and retry opaque byte strings).
#[derive(Debug, Clone)]
pub struct Call {
    pub target: H160,
    pub calldata: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct CallResult {
    pub success: bool,
    pub return_data: Vec<u8>,
    pub gas_used: u64,
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("rpc error: {0}")]
    Rpc(String),
    #[error("batch ran out of gas")]
    OutOfGas,
    #[error("request timed out")]
    Timeout,
}

/// One RPC round-trip executing a batch of calls against a multicall
/// contract. Implementations own the ABI-encoding of the multicall
/// contract's own `aggregate`/`tryAggregate` function; this crate only
/// orchestrates batching, halving, and retry on top of it.
#[async_trait]
pub trait ChainTransport: Send + Sync {
    async fn execute_batch(
        &self,
        calls: &[Call],
        block: BlockId,
        gas_limit_per_call: u64,
    ) -> Result<Vec<CallResult>, TransportError>;
}
