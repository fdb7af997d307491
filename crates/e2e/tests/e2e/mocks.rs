//! In-process stand-ins for every collaborator trait [`router::Router`]
//! depends on. None of these talk to a network or a node — each scenario
//! wires up exactly the pools/quotes it needs and nothing more, matching
//! the router's own "never used for swap math, never trust the subgraph"
//! boundaries.

use async_trait::async_trait;
use gas::{L1GasData, L1GasDataProvider};
use model::{
    Amount, BlockId, ChainId, Currency, FeeTier, Pool, Route, StablePool, SubgraphPool, Token,
    TradeType, V2Pool, V3Pool,
};
use num_bigint::BigInt;
use num_rational::BigRational;
use pool_metadata::{PoolMetadataProvider, PoolRequest};
use primitive_types::{H160, H256};
use quoting::{AmountQuote, QuoteFetcher, RouteQuoteResult, RouteQuotes};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use token_list::{TokenListError, TokenMap, TokenMetadataProvider};

pub fn token(chain: ChainId, n: u64, decimals: u8, symbol: &str) -> Token {
    Token::new(chain, H160::from_low_u64_be(n), decimals, Some(symbol.to_string()))
}

fn sorted_pair(a: H160, b: H160) -> (H160, H160) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// A fixed-universe, filter-honoring [`subgraph::SubgraphProvider`]. Mirrors
/// `RemoteSubgraphProvider`'s own post-fetch filtering so candidate
/// selection behaves the same as it would against a live indexer.
pub struct FakeSubgraph {
    pools: Vec<SubgraphPool>,
}

impl FakeSubgraph {
    pub fn new(pools: Vec<SubgraphPool>) -> Self {
        Self { pools }
    }

    pub fn empty() -> Self {
        Self { pools: Vec::new() }
    }
}

#[async_trait]
impl subgraph::SubgraphProvider for FakeSubgraph {
    async fn list_pools(
        &self,
        token_in: Option<H160>,
        token_out: Option<H160>,
        _block: BlockId,
    ) -> Result<Vec<SubgraphPool>, subgraph::SubgraphError> {
        Ok(self
            .pools
            .iter()
            .filter(|p| token_in.map_or(true, |t| p.involves(t)) && token_out.map_or(true, |t| p.involves(t)))
            .cloned()
            .collect())
    }
}

/// Simulates the indexer-rollback scenario (§8 scenario 4) without a real
/// HTTP round-trip: the first call for a block higher than `catches_up_at`
/// reports `IndexingBehind`, matching `RemoteSubgraphProvider`'s own
/// roll-back-by-10 retry loop; once the requested block reaches
/// `catches_up_at` the canned pool set is returned.
pub struct RollbackSubgraph {
    pools: Vec<SubgraphPool>,
    catches_up_at: u64,
    calls: AtomicU32,
}

impl RollbackSubgraph {
    pub fn new(pools: Vec<SubgraphPool>, catches_up_at: u64) -> Self {
        Self {
            pools,
            catches_up_at,
            calls: AtomicU32::new(0),
        }
    }

    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl subgraph::SubgraphProvider for RollbackSubgraph {
    async fn list_pools(
        &self,
        token_in: Option<H160>,
        token_out: Option<H160>,
        block: BlockId,
    ) -> Result<Vec<SubgraphPool>, subgraph::SubgraphError> {
        let mut block = block;
        let mut retries_left = 3u32;
        loop {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let requested = block.pinned().unwrap_or(self.catches_up_at + 11);
            if requested > self.catches_up_at {
                if retries_left == 0 {
                    return Err(subgraph::SubgraphError::IndexingBehind {
                        requested,
                        indexed: self.catches_up_at,
                    });
                }
                retries_left -= 1;
                block = BlockId::Number(requested.saturating_sub(10));
                continue;
            }
            return Ok(self
                .pools
                .iter()
                .filter(|p| token_in.map_or(true, |t| p.involves(t)) && token_out.map_or(true, |t| p.involves(t)))
                .cloned()
                .collect());
        }
    }
}

/// Per-protocol lookup table standing in for live on-chain pool state.
/// Absent keys are silently dropped from the result, matching
/// `OnChainPoolMetadataProvider`'s drop-on-failed-call behavior (§4.2) — a
/// request for a pool that doesn't actually exist on-chain simply yields
/// nothing.
#[derive(Default)]
pub struct FakePoolMetadata {
    pub v2: HashMap<(H160, H160), Pool>,
    pub v3: HashMap<(H160, H160, FeeTier), Pool>,
    pub stable: HashMap<H256, Pool>,
}

impl FakePoolMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_v2(mut self, pool: V2Pool) -> Self {
        let key = sorted_pair(pool.token0.address, pool.token1.address);
        self.v2.insert(key, Pool::V2(pool));
        self
    }

    pub fn with_v3(mut self, pool: V3Pool) -> Self {
        let (a, b) = sorted_pair(pool.token0.address, pool.token1.address);
        self.v3.insert((a, b, pool.fee), Pool::V3(pool));
        self
    }

    pub fn with_stable(mut self, pool: StablePool) -> Self {
        self.stable.insert(pool.id, Pool::Stable(pool));
        self
    }
}

#[async_trait]
impl PoolMetadataProvider for FakePoolMetadata {
    async fn fetch(&self, requests: Vec<PoolRequest>, _block: BlockId) -> Vec<Pool> {
        requests
            .into_iter()
            .filter_map(|request| match request {
                PoolRequest::V2 { token0, token1 } => {
                    let key = sorted_pair(token0.address, token1.address);
                    self.v2.get(&key).cloned()
                }
                PoolRequest::V3 { token0, token1, fee } => {
                    let (a, b) = sorted_pair(token0.address, token1.address);
                    self.v3.get(&(a, b, fee)).cloned()
                }
                PoolRequest::Stable { id, .. } => self.stable.get(&id).cloned(),
            })
            .collect()
    }
}

/// Resolves any requested address to a token already in the registry, or to
/// a generic 18-decimal token of the configured chain otherwise — standing
/// in for the real provider's symbol/decimals RPC round trip.
pub struct FakeTokenMetadata {
    chain: ChainId,
    registry: HashMap<H160, Token>,
}

impl FakeTokenMetadata {
    pub fn new(chain: ChainId, tokens: Vec<Token>) -> Self {
        let registry = tokens.into_iter().map(|t| (t.address, t)).collect();
        Self { chain, registry }
    }
}

#[async_trait]
impl TokenMetadataProvider for FakeTokenMetadata {
    async fn get_tokens(&self, addresses: Vec<H160>, _block: BlockId) -> Result<TokenMap, TokenListError> {
        let tokens = addresses
            .into_iter()
            .map(|address| {
                self.registry
                    .get(&address)
                    .cloned()
                    .unwrap_or_else(|| Token::new(self.chain, address, 18, None))
            })
            .collect();
        Ok(TokenMap::from_tokens(tokens))
    }
}

/// Quotes every route by a fixed exchange rate rather than simulating a
/// swap — enough to exercise route selection, gas adjustment and split
/// optimization without an RPC transport.
pub struct FakeQuoteFetcher {
    rate: BigRational,
}

impl FakeQuoteFetcher {
    pub fn new(rate_numer: i64, rate_denom: i64) -> Self {
        Self {
            rate: BigRational::new(BigInt::from(rate_numer), BigInt::from(rate_denom)),
        }
    }
}

#[async_trait]
impl QuoteFetcher for FakeQuoteFetcher {
    async fn fetch_quotes(
        &self,
        routes: &[Route],
        trade_type: TradeType,
        fractions: &[(u8, Amount)],
        _block: BlockId,
    ) -> Vec<RouteQuotes> {
        routes
            .iter()
            .map(|route| {
                let amounts = fractions
                    .iter()
                    .map(|(percent, amount)| {
                        let (result_value, result_currency) = match trade_type {
                            TradeType::ExactInput => (&amount.value * &self.rate, Currency::Token(route.output().clone())),
                            TradeType::ExactOutput => (&amount.value / &self.rate, Currency::Token(route.input().clone())),
                        };
                        AmountQuote {
                            fraction_percent: *percent,
                            amount: amount.clone(),
                            quote: Some(RouteQuoteResult {
                                amount: Amount::new(result_currency, result_value),
                                sqrt_price_after_x96: None,
                                initialized_ticks_crossed: None,
                            }),
                        }
                    })
                    .collect();
                RouteQuotes {
                    route: route.clone(),
                    amounts,
                }
            })
            .collect()
    }
}

pub struct FixedL1GasData(pub L1GasData);

#[async_trait]
impl L1GasDataProvider for FixedL1GasData {
    async fn fetch(&self) -> Option<L1GasData> {
        Some(self.0)
    }
}
