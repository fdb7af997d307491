use crate::requests::PoolRequest;
use crate::selectors::encode_no_args;
use async_trait::async_trait;
use ethabi::{ParamType, Token as AbiToken};
use model::{BlockId, ChainId, FeeTier, Pool, StablePool, StableWrapperPool, Token, V2Pool, V3Pool};
use multicall::{CallOutcome, ChainTransport, Multicall};
use primitive_types::{H160, H256, U256};

/// Fetches live on-chain state for a batch of pool requests, dropping any
/// pool whose call fails rather than erroring the whole batch (§4.2).
#[async_trait]
pub trait PoolMetadataProvider: Send + Sync {
    async fn fetch(&self, requests: Vec<PoolRequest>, block: BlockId) -> Vec<Pool>;
}

/// Addresses of the on-chain contracts this provider needs beyond what a
/// `PoolRequest` already carries.
#[derive(Debug, Clone, Copy)]
pub struct ContractAddresses {
    pub v3_factory: H160,
    pub v3_init_code_hash: [u8; 32],
    pub stable_vault: H160,
}

/// Fetches V2/V3/Stable pool state via batched `eth_call`s through C1.
///
/// Stable pool contract addresses are derived from the pool id's first 20
/// bytes, matching the upstream vault convention where a pool id embeds its
/// own pool's address.
pub struct OnChainPoolMetadataProvider<T: ChainTransport> {
    chain: ChainId,
    multicall: Multicall<T>,
    addresses: ContractAddresses,
}

impl<T: ChainTransport + 'static> OnChainPoolMetadataProvider<T> {
    pub fn new(
        chain: ChainId,
        transport: T,
        config: multicall::BatchConfig,
        addresses: ContractAddresses,
    ) -> Self {
        Self {
            chain,
            multicall: Multicall::new(transport, config),
            addresses,
        }
    }

    async fn fetch_v2(&self, token0: Token, token1: Token, block: BlockId) -> Option<Pool> {
        let address = crate::address::derive_v2_pool_address(token0.address, token1.address);
        let outcomes = self
            .multicall
            .aggregate_same_function_many_contracts(
                vec![(address, encode_no_args("getReserves()"))],
                block,
            )
            .await;
        let return_data = success_data(outcomes.into_iter().next()?)?;
        let decoded = ethabi::decode(
            &[ParamType::Uint(112), ParamType::Uint(112), ParamType::Uint(32)],
            &return_data,
        )
        .ok()?;
        let reserve0 = as_u256(&decoded[0])?;
        let reserve1 = as_u256(&decoded[1])?;
        Some(Pool::V2(V2Pool::canonical(
            self.chain, address, token0, token1, reserve0, reserve1,
        )))
    }

    async fn fetch_v3(&self, token0: Token, token1: Token, fee: FeeTier, block: BlockId) -> Option<Pool> {
        let address = crate::address::derive_v3_pool_address(
            self.addresses.v3_factory,
            token0.address,
            token1.address,
            fee.pips(),
            self.addresses.v3_init_code_hash,
        );
        let calls = vec![
            (address, encode_no_args("liquidity()")),
            (address, encode_no_args("slot0()")),
        ];
        let outcomes = self.multicall.aggregate_same_function_many_contracts(calls, block).await;
        if outcomes.len() != 2 {
            return None;
        }
        let mut results = Vec::with_capacity(2);
        for outcome in outcomes {
            results.push(success_data(outcome)?);
        }

        let decoded = ethabi::decode(&[ParamType::Uint(128)], &results[0]).ok()?;
        let liquidity = as_u256(&decoded[0])?.as_u128();

        let slot0 = ethabi::decode(
            &[
                ParamType::Uint(160),
                ParamType::Int(24),
                ParamType::Uint(16),
                ParamType::Uint(16),
                ParamType::Uint(16),
                ParamType::Uint(8),
                ParamType::Bool,
            ],
            &results[1],
        )
        .ok()?;
        let sqrt_price_x96 = as_u256(&slot0[0])?;

        Some(Pool::V3(V3Pool::canonical(
            self.chain, address, token0, token1, fee, liquidity, sqrt_price_x96,
        )))
    }

    async fn fetch_stable(&self, id: H256, tokens: Vec<Token>, block: BlockId) -> Option<Pool> {
        let pool_address = H160::from_slice(&id.as_bytes()[0..20]);
        let mut get_pool_tokens = encode_no_args("getPoolTokens(bytes32)");
        get_pool_tokens.extend_from_slice(id.as_bytes());
        let calls = vec![
            (self.addresses.stable_vault, get_pool_tokens),
            (pool_address, encode_no_args("getAmplificationParameter()")),
            (pool_address, encode_no_args("getSwapFeePercentage()")),
            (pool_address, encode_no_args("totalSupply()")),
            (pool_address, encode_no_args("getScalingFactors()")),
        ];
        let outcomes = self
            .multicall
            .aggregate_same_function_many_contracts(calls, block)
            .await;
        if outcomes.len() != 5 {
            return None;
        }
        let mut results = Vec::with_capacity(5);
        for outcome in outcomes {
            results.push(success_data(outcome)?);
        }

        let pool_tokens = ethabi::decode(
            &[
                ParamType::Array(Box::new(ParamType::Address)),
                ParamType::Array(Box::new(ParamType::Uint(256))),
                ParamType::Uint(256),
            ],
            &results[0],
        )
        .ok()?;
        let balances = match &pool_tokens[1] {
            AbiToken::Array(items) => items.iter().map(as_u256).collect::<Option<Vec<_>>>()?,
            _ => return None,
        };
        if balances.len() != tokens.len() {
            return None;
        }

        let amp = ethabi::decode(
            &[ParamType::Uint(256), ParamType::Bool, ParamType::Uint(256)],
            &results[1],
        )
        .ok()?;
        let amplification_parameter = as_u256(&amp[0])?;

        let fee = ethabi::decode(&[ParamType::Uint(256)], &results[2]).ok()?;
        let swap_fee_raw = as_u256(&fee[0])?;
        // 18-decimal fixed point percentage -> basis points.
        let swap_fee_bps = (swap_fee_raw / U256::from(10u64).pow(U256::from(14u64))).as_u32();

        let supply = ethabi::decode(&[ParamType::Uint(256)], &results[3]).ok()?;
        let total_shares = as_u256(&supply[0])?;

        let scaling = ethabi::decode(&[ParamType::Array(Box::new(ParamType::Uint(256)))], &results[4]).ok()?;
        let scaling_factors = match &scaling[0] {
            AbiToken::Array(items) => items.iter().map(as_u256).collect::<Option<Vec<_>>>()?,
            _ => return None,
        };

        Some(Pool::Stable(StablePool {
            chain: self.chain,
            id,
            tokens,
            amplification_parameter,
            swap_fee_bps,
            total_shares,
            balances,
            scaling_factors,
        }))
    }

    async fn fetch_wrapper(&self, underlying: H256, share_token: Token, vault_token: Token, block: BlockId) -> Option<Pool> {
        let outcomes = self
            .multicall
            .aggregate_same_function_many_contracts(
                vec![(vault_token.address, encode_no_args("getRate()"))],
                block,
            )
            .await;
        let return_data = success_data(outcomes.into_iter().next()?)?;
        let decoded = ethabi::decode(&[ParamType::Uint(256)], &return_data).ok()?;
        let rate = as_u256(&decoded[0])?;
        Some(Pool::StableWrapper(StableWrapperPool {
            chain: self.chain,
            underlying,
            share_token,
            vault_token,
            rate,
        }))
    }
}

#[async_trait]
impl<T: ChainTransport + 'static> PoolMetadataProvider for OnChainPoolMetadataProvider<T> {
    async fn fetch(&self, requests: Vec<PoolRequest>, block: BlockId) -> Vec<Pool> {
        let mut pools = Vec::with_capacity(requests.len());
        for request in requests {
            let kind = request_kind(&request);
            let fetched: Vec<Option<Pool>> = match request {
                PoolRequest::V2 { token0, token1 } => vec![self.fetch_v2(token0, token1, block).await],
                PoolRequest::V3 { token0, token1, fee } => vec![self.fetch_v3(token0, token1, fee, block).await],
                PoolRequest::Stable { id, tokens, wrapper } => {
                    let stable = self.fetch_stable(id, tokens.clone(), block).await;
                    match (stable, wrapper) {
                        (Some(stable_pool), Some(vault_token)) => {
                            let share_token = tokens.first().cloned();
                            let wrapper_pool = match share_token {
                                Some(share_token) => self.fetch_wrapper(id, share_token, vault_token, block).await,
                                None => None,
                            };
                            vec![Some(stable_pool), wrapper_pool]
                        }
                        (stable, _) => vec![stable],
                    }
                }
            };
            let mut any = false;
            for pool in fetched.into_iter().flatten() {
                pools.push(pool);
                any = true;
            }
            if !any {
                tracing::info!(kind, "pool metadata call failed, dropping pool");
            }
        }
        pools
    }
}

fn request_kind(request: &PoolRequest) -> &'static str {
    match request {
        PoolRequest::V2 { .. } => "v2",
        PoolRequest::V3 { .. } => "v3",
        PoolRequest::Stable { .. } => "stable",
    }
}

fn success_data(outcome: CallOutcome) -> Option<Vec<u8>> {
    match outcome {
        CallOutcome::Success { return_data, .. } => Some(return_data),
        _ => None,
    }
}

fn as_u256(token: &AbiToken) -> Option<U256> {
    match token {
        AbiToken::Uint(value) => {
            let mut bytes = [0u8; 32];
            value.to_big_endian(&mut bytes);
            Some(U256::from_big_endian(&bytes))
        }
        _ => None,
    }
}
