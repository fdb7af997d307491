use crate::transport::{Call, ChainTransport, TransportError};
use futures::stream::{self, StreamExt};
use model::BlockId;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub initial_batch_size: usize,
    pub gas_limit_per_call: u64,
    pub concurrency: usize,
    pub max_halvings: u32,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            initial_batch_size: 150,
            gas_limit_per_call: 1_000_000,
            concurrency: 8,
            max_halvings: 4,
        }
    }
}

/// Outcome of one originally-submitted call after batching, halving and
/// retry have all played out.
#[derive(Debug, Clone)]
pub enum CallOutcome {
    Success { return_data: Vec<u8>, gas_used: u64 },
    Failed { reason: String },
    /// The batch containing this call exceeded `max_halvings` — the caller
    /// decides how to react (§4.1: "the caller decides how to react").
    Fatal,
}

pub struct Multicall<T: ChainTransport> {
    transport: Arc<T>,
    config: BatchConfig,
}

impl<T: ChainTransport + 'static> Multicall<T> {
    pub fn new(transport: T, config: BatchConfig) -> Self {
        Self {
            transport: Arc::new(transport),
            config,
        }
    }

    /// Executes `calls` in input order, preserving that order in the
    /// returned vector even though batches may internally be halved and
    /// resubmitted out of order.
    pub async fn aggregate(&self, calls: Vec<Call>, block: BlockId) -> Vec<CallOutcome> {
        let indexed: Vec<(usize, Call)> = calls.into_iter().enumerate().collect();
        let chunks: Vec<Vec<(usize, Call)>> = indexed
            .chunks(self.config.initial_batch_size.max(1))
            .map(|chunk| chunk.to_vec())
            .collect();

        let results = stream::iter(chunks)
            .map(|chunk| {
                let transport = self.transport.clone();
                let config = self.config.clone();
                let block = block;
                async move { run_batch(transport, config, chunk, block, 0).await }
            })
            .buffer_unordered(self.config.concurrency.max(1))
            .collect::<Vec<_>>()
            .await;

        let mut flat: Vec<(usize, CallOutcome)> = results.into_iter().flatten().collect();
        flat.sort_by_key(|(i, _)| *i);
        flat.into_iter().map(|(_, outcome)| outcome).collect()
    }

    /// Same function call against many contracts — convenience wrapper used
    /// heavily by C2 to fetch per-pool metadata.
    pub async fn aggregate_same_function_many_contracts(
        &self,
        targets_and_calldata: Vec<(primitive_types::H160, Vec<u8>)>,
        block: BlockId,
    ) -> Vec<CallOutcome> {
        let calls = targets_and_calldata
            .into_iter()
            .map(|(target, calldata)| Call { target, calldata })
            .collect();
        self.aggregate(calls, block).await
    }

    /// Same contract, same function, many parameter sets — used by C7 to
    /// quote one route at every `distributionPercent` fraction.
    pub async fn aggregate_same_function_one_contract_many_params(
        &self,
        target: primitive_types::H160,
        calldatas: Vec<Vec<u8>>,
        block: BlockId,
    ) -> Vec<CallOutcome> {
        let calls = calldatas
            .into_iter()
            .map(|calldata| Call { target, calldata })
            .collect();
        self.aggregate(calls, block).await
    }
}

fn run_batch<T: ChainTransport + 'static>(
    transport: Arc<T>,
    config: BatchConfig,
    chunk: Vec<(usize, Call)>,
    block: BlockId,
    halvings: u32,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Vec<(usize, CallOutcome)>> + Send>> {
    Box::pin(async move {
        if chunk.is_empty() {
            return Vec::new();
        }

        if halvings > config.max_halvings {
            return chunk
                .into_iter()
                .map(|(i, _)| (i, CallOutcome::Fatal))
                .collect();
        }

        let calls: Vec<Call> = chunk.iter().map(|(_, call)| call.clone()).collect();
        match transport
            .execute_batch(&calls, block, config.gas_limit_per_call)
            .await
        {
            Ok(results) if results.len() == chunk.len() => chunk
                .into_iter()
                .zip(results)
                .map(|((i, _), result)| {
                    let outcome = if result.success {
                        CallOutcome::Success {
                            return_data: result.return_data,
                            gas_used: result.gas_used,
                        }
                    } else {
                        CallOutcome::Failed {
                            reason: "call reverted".to_string(),
                        }
                    };
                    (i, outcome)
                })
                .collect(),
            Ok(_) => {
                // Malformed response: treat like any other batch failure and
                // retry with a smaller batch rather than trust partial data.
                retry_halved(transport, config, chunk, block, halvings).await
            }
            Err(TransportError::OutOfGas) | Err(TransportError::Timeout) | Err(TransportError::Rpc(_))
                if chunk.len() > 1 =>
            {
                retry_halved(transport, config, chunk, block, halvings).await
            }
            Err(err) => {
                tracing::warn!(?err, calls = chunk.len(), "single call failed in multicall batch");
                chunk
                    .into_iter()
                    .map(|(i, _)| {
                        (
                            i,
                            CallOutcome::Failed {
                                reason: err.to_string(),
                            },
                        )
                    })
                    .collect()
            }
        }
    })
}

async fn retry_halved<T: ChainTransport + 'static>(
    transport: Arc<T>,
    config: BatchConfig,
    chunk: Vec<(usize, Call)>,
    block: BlockId,
    halvings: u32,
) -> Vec<(usize, CallOutcome)> {
    let mid = chunk.len() / 2;
    let (left, right) = chunk.split_at(mid);
    let (left, right) = (left.to_vec(), right.to_vec());
    let (left_results, right_results) = futures::future::join(
        run_batch(transport.clone(), config.clone(), left, block, halvings + 1),
        run_batch(transport, config, right, block, halvings + 1),
    )
    .await;
    left_results.into_iter().chain(right_results).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FlakyTransport {
        fail_batches_larger_than: usize,
        attempts: AtomicUsize,
    }

    #[async_trait]
    impl ChainTransport for FlakyTransport {
        async fn execute_batch(
            &self,
            calls: &[Call],
            _block: BlockId,
            _gas_limit_per_call: u64,
        ) -> Result<Vec<crate::transport::CallResult>, TransportError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            if calls.len() > self.fail_batches_larger_than {
                return Err(TransportError::OutOfGas);
            }
            Ok(calls
                .iter()
                .map(|c| crate::transport::CallResult {
                    success: true,
                    return_data: c.calldata.clone(),
                    gas_used: 21_000,
                })
                .collect())
        }
    }

    fn call(tag: u8) -> Call {
        Call {
            target: primitive_types::H160::zero(),
            calldata: vec![tag],
        }
    }

    #[tokio::test]
    async fn halves_on_batch_failure_and_preserves_order() {
        let transport = FlakyTransport {
            fail_batches_larger_than: 2,
            attempts: AtomicUsize::new(0),
        };
        let multicall = Multicall::new(
            transport,
            BatchConfig {
                initial_batch_size: 8,
                ..Default::default()
            },
        );
        let calls: Vec<Call> = (0..8).map(call).collect();
        let outcomes = multicall.aggregate(calls, BlockId::Latest).await;
        assert_eq!(outcomes.len(), 8);
        for (i, outcome) in outcomes.iter().enumerate() {
            match outcome {
                CallOutcome::Success { return_data, .. } => assert_eq!(return_data, &vec![i as u8]),
                other => panic!("expected success, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn exceeding_max_halvings_is_fatal() {
        let transport = FlakyTransport {
            fail_batches_larger_than: 0,
            attempts: AtomicUsize::new(0),
        };
        let multicall = Multicall::new(
            transport,
            BatchConfig {
                initial_batch_size: 4,
                max_halvings: 1,
                ..Default::default()
            },
        );
        let calls: Vec<Call> = (0..4).map(call).collect();
        let outcomes = multicall.aggregate(calls, BlockId::Latest).await;
        assert!(outcomes.iter().all(|o| matches!(o, CallOutcome::Fatal)));
    }

    #[tokio::test]
    async fn single_call_failure_does_not_abort_batch() {
        struct OneCallFails;
        #[async_trait]
        impl ChainTransport for OneCallFails {
            async fn execute_batch(
                &self,
                calls: &[Call],
                _block: BlockId,
                _gas_limit_per_call: u64,
            ) -> Result<Vec<crate::transport::CallResult>, TransportError> {
                Ok(calls
                    .iter()
                    .map(|c| crate::transport::CallResult {
                        success: c.calldata != vec![2u8],
                        return_data: c.calldata.clone(),
                        gas_used: 21_000,
                    })
                    .collect())
            }
        }
        let multicall = Multicall::new(OneCallFails, BatchConfig::default());
        let calls: Vec<Call> = (0..4).map(call).collect();
        let outcomes = multicall.aggregate(calls, BlockId::Latest).await;
        assert!(matches!(outcomes[2], CallOutcome::Failed { .. }));
        assert!(matches!(outcomes[0], CallOutcome::Success { .. }));
    }
}
