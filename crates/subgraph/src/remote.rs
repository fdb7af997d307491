use crate::error::SubgraphError;
use crate::provider::SubgraphProvider;
use async_trait::async_trait;
use model::{BlockId, FeeTier, SubgraphPool, SubgraphPoolExtra};
use primitive_types::{H160, H256, U256};
use serde::{Deserialize, Serialize};
use url::Url;

/// Which protocol's subgraph schema to query. Each variant knows its own
/// GraphQL selection set and how to decode the response into [`SubgraphPool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubgraphKind {
    V2,
    V3,
    Stable,
}

/// Paginated GraphQL subgraph provider with retry and the "indexed up to N"
/// rollback rule from §4.3: on that error, roll the requested block back by
/// 10 and retry.
pub struct RemoteSubgraphProvider {
    client: reqwest::Client,
    endpoint: Url,
    kind: SubgraphKind,
    page_size: usize,
    max_retries: u32,
    response_size_limit: usize,
}

impl RemoteSubgraphProvider {
    pub fn new(client: reqwest::Client, endpoint: Url, kind: SubgraphKind) -> Self {
        Self {
            client,
            endpoint,
            kind,
            page_size: 1000,
            max_retries: 3,
            response_size_limit: 10 * 1024 * 1024,
        }
    }

    /// Overrides the default 10 MiB response body cap, e.g. from
    /// [`shared::RouterSettings::http_response_size_limit_bytes`].
    pub fn with_response_size_limit(mut self, limit: usize) -> Self {
        self.response_size_limit = limit;
        self
    }

    async fn query_page(
        &self,
        skip: usize,
        block: BlockId,
    ) -> Result<Vec<SubgraphPool>, SubgraphError> {
        let query = build_query(self.kind, self.page_size, skip, block);
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&GraphQuery { query })
            .send()
            .await
            .map_err(|e| SubgraphError::Http(e.to_string()))?;
        let bytes = shared::response_body_with_size_limit(response, self.response_size_limit)
            .await
            .map_err(|e| SubgraphError::Http(e.to_string()))?;
        let body: GraphResponse =
            serde_json::from_slice(&bytes).map_err(|e| SubgraphError::Malformed(e.to_string()))?;

        if let Some(errors) = body.errors {
            let message = errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; ");
            if let Some((requested, indexed)) = parse_indexing_behind(&message, block) {
                return Err(SubgraphError::IndexingBehind { requested, indexed });
            }
            return Err(SubgraphError::Malformed(message));
        }

        let data = body.data.ok_or_else(|| {
            SubgraphError::Malformed("subgraph response had neither data nor errors".to_string())
        })?;
        data.pools
            .into_iter()
            .map(|pool| decode_pool(self.kind, pool))
            .collect()
    }
}

#[async_trait]
impl SubgraphProvider for RemoteSubgraphProvider {
    async fn list_pools(
        &self,
        token_in: Option<H160>,
        token_out: Option<H160>,
        block: BlockId,
    ) -> Result<Vec<SubgraphPool>, SubgraphError> {
        let mut block = block;
        let mut retries_left = self.max_retries;
        loop {
            let mut pools = Vec::new();
            let mut skip = 0usize;
            let result = loop {
                match self.query_page(skip, block).await {
                    Ok(page) => {
                        let page_len = page.len();
                        pools.extend(page);
                        if page_len < self.page_size {
                            break Ok(());
                        }
                        skip += self.page_size;
                    }
                    Err(err) => break Err(err),
                }
            };

            match result {
                Ok(()) => {
                    let filtered = pools
                        .into_iter()
                        .filter(|pool| {
                            token_in.map_or(true, |t| pool.involves(t))
                                && token_out.map_or(true, |t| pool.involves(t))
                        })
                        .collect();
                    return Ok(filtered);
                }
                Err(SubgraphError::IndexingBehind { requested, .. }) if retries_left > 0 => {
                    retries_left -= 1;
                    let rolled_back = requested.saturating_sub(10);
                    tracing::warn!(requested, rolled_back, "subgraph indexer behind, rolling back");
                    block = BlockId::Number(rolled_back);
                }
                Err(err) => return Err(err),
            }
        }
    }
}

fn parse_indexing_behind(message: &str, requested: BlockId) -> Option<(u64, u64)> {
    if !message.to_lowercase().contains("indexed up to block number") {
        return None;
    }
    let indexed = message
        .split_whitespace()
        .filter_map(|token| token.trim_matches(|c: char| !c.is_ascii_digit()).parse::<u64>().ok())
        .last()?;
    let requested = requested.pinned().unwrap_or(indexed + 1);
    Some((requested, indexed))
}

fn build_query(kind: SubgraphKind, first: usize, skip: usize, block: BlockId) -> String {
    let block_filter = match block.pinned() {
        Some(n) => format!(", block: {{ number: {n} }}"),
        None => String::new(),
    };
    let selection = match kind {
        SubgraphKind::V2 => {
            "id token0 { id } token1 { id } reserveUSD reserveETH reserve0 reserve1"
        }
        SubgraphKind::V3 => "id token0 { id } token1 { id } feeTier totalValueLockedUSD totalValueLockedETH",
        SubgraphKind::Stable => {
            "id tokensList totalShares totalLiquidity wrapper { id }"
        }
    };
    format!(
        "{{ pools(first: {first}, skip: {skip}{block_filter}) {{ {selection} }} }}"
    )
}

fn decode_pool(kind: SubgraphKind, raw: RawPool) -> Result<SubgraphPool, SubgraphError> {
    let malformed = |field: &str| SubgraphError::Malformed(format!("missing field {field}"));
    // Resolve the id-derived fields before moving any other field out of
    // `raw` — a partial move would make `&raw` (needed by `id_address`)
    // unavailable afterwards.
    let address = raw.id_address();
    let pool_id = raw.id_bytes32();

    let RawPool {
        token0,
        token1,
        reserve_usd,
        reserve_eth,
        reserve0,
        fee_tier,
        total_value_locked_usd,
        total_value_locked_eth,
        tokens_list,
        total_shares,
        total_liquidity,
        wrapper,
        ..
    } = raw;

    match kind {
        SubgraphKind::V2 => {
            let token0 = token0.ok_or_else(|| malformed("token0"))?.id;
            let token1 = token1.ok_or_else(|| malformed("token1"))?.id;
            Ok(SubgraphPool {
                id: model::PoolAddress::Address(address?),
                tokens: vec![token0, token1],
                tvl_native: reserve_eth.unwrap_or(0.0),
                tvl_usd: reserve_usd.unwrap_or(0.0),
                extra: SubgraphPoolExtra::V2 {
                    reserve: reserve0.as_deref().map(parse_decimal_to_u256).unwrap_or_default(),
                },
            })
        }
        SubgraphKind::V3 => {
            let token0 = token0.ok_or_else(|| malformed("token0"))?.id;
            let token1 = token1.ok_or_else(|| malformed("token1"))?.id;
            let fee = fee_tier
                .and_then(fee_tier_from_pips)
                .ok_or_else(|| malformed("feeTier"))?;
            Ok(SubgraphPool {
                id: model::PoolAddress::Address(address?),
                tokens: vec![token0, token1],
                tvl_native: total_value_locked_eth.unwrap_or(0.0),
                tvl_usd: total_value_locked_usd.unwrap_or(0.0),
                extra: SubgraphPoolExtra::V3 { fee },
            })
        }
        SubgraphKind::Stable => {
            let tokens_list = tokens_list.unwrap_or_default();
            let wrapper = wrapper.map(|w| w.id);
            Ok(SubgraphPool {
                id: model::PoolAddress::PoolId(pool_id?),
                tokens: tokens_list.clone(),
                tvl_native: 0.0,
                tvl_usd: total_liquidity.unwrap_or(0.0),
                extra: SubgraphPoolExtra::Stable {
                    total_shares: total_shares
                        .as_deref()
                        .map(parse_decimal_to_u256)
                        .unwrap_or_default(),
                    tokens_list,
                    wrapper,
                },
            })
        }
    }
}

fn fee_tier_from_pips(pips: String) -> Option<FeeTier> {
    let pips: u32 = pips.parse().ok()?;
    FeeTier::ALL.into_iter().find(|tier| tier.pips() == pips)
}

fn parse_decimal_to_u256(value: &str) -> U256 {
    // Subgraph decimals are human-readable floats; truncate to an integer
    // wei-ish magnitude for the coarse selection heuristic only (§3: "used
    // only for selection, never for math").
    value
        .split('.')
        .next()
        .and_then(|whole| U256::from_dec_str(whole).ok())
        .unwrap_or_default()
}

#[derive(Debug, Serialize)]
struct GraphQuery {
    query: String,
}

#[derive(Debug, Deserialize)]
struct GraphResponse {
    data: Option<PoolsData>,
    errors: Option<Vec<GraphErrorMessage>>,
}

#[derive(Debug, Deserialize)]
struct GraphErrorMessage {
    message: String,
}

#[derive(Debug, Deserialize)]
struct PoolsData {
    pools: Vec<RawPool>,
}

#[derive(Debug, Deserialize)]
struct RawToken {
    id: H160,
}

#[derive(Debug, Deserialize, Default)]
struct RawPool {
    id: Option<String>,
    token0: Option<RawToken>,
    token1: Option<RawToken>,
    #[serde(rename = "reserveUSD")]
    reserve_usd: Option<f64>,
    #[serde(rename = "reserveETH")]
    reserve_eth: Option<f64>,
    reserve0: Option<String>,
    #[serde(rename = "feeTier")]
    fee_tier: Option<String>,
    #[serde(rename = "totalValueLockedUSD")]
    total_value_locked_usd: Option<f64>,
    #[serde(rename = "totalValueLockedETH")]
    total_value_locked_eth: Option<f64>,
    #[serde(rename = "tokensList")]
    tokens_list: Option<Vec<H160>>,
    #[serde(rename = "totalShares")]
    total_shares: Option<String>,
    #[serde(rename = "totalLiquidity")]
    total_liquidity: Option<f64>,
    wrapper: Option<RawToken>,
}

impl RawPool {
    fn id_address(&self) -> Result<H160, SubgraphError> {
        self.id
            .as_deref()
            .ok_or_else(|| SubgraphError::Malformed("missing id".to_string()))?
            .parse()
            .map_err(|_| SubgraphError::Malformed("id not a valid address".to_string()))
    }

    fn id_bytes32(&self) -> Result<H256, SubgraphError> {
        self.id
            .as_deref()
            .ok_or_else(|| SubgraphError::Malformed("missing id".to_string()))?
            .parse()
            .map_err(|_| SubgraphError::Malformed("id not a valid pool id".to_string()))
    }
}
