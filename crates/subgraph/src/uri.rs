use crate::error::SubgraphError;
use crate::provider::SubgraphProvider;
use async_trait::async_trait;
use model::{BlockId, PoolAddress, SubgraphPool, SubgraphPoolExtra};
use primitive_types::{H160, H256, U256};
use serde::Deserialize;
use url::Url;

/// Pulls a pre-built snapshot from a URI (e.g. a CDN-hosted JSON file) and
/// serves it exactly like a live subgraph (§4.3 `URI` variant).
pub struct UriSubgraphProvider {
    client: reqwest::Client,
    url: Url,
}

impl UriSubgraphProvider {
    pub fn new(client: reqwest::Client, url: Url) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl SubgraphProvider for UriSubgraphProvider {
    async fn list_pools(
        &self,
        token_in: Option<H160>,
        token_out: Option<H160>,
        _block: BlockId,
    ) -> Result<Vec<SubgraphPool>, SubgraphError> {
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| SubgraphError::Http(e.to_string()))?;
        let snapshot: Vec<SnapshotPool> = response
            .json()
            .await
            .map_err(|e| SubgraphError::Http(e.to_string()))?;
        Ok(snapshot
            .into_iter()
            .map(SubgraphPool::from)
            .filter(|pool| {
                token_in.map_or(true, |t| pool.involves(t)) && token_out.map_or(true, |t| pool.involves(t))
            })
            .collect())
    }
}

/// Serializable mirror of [`SubgraphPool`] — the domain type itself stays
/// free of `serde` derives since it's never round-tripped except here.
#[derive(Debug, Deserialize)]
struct SnapshotPool {
    id: SnapshotPoolId,
    tokens: Vec<H160>,
    tvl_native: f64,
    tvl_usd: f64,
    extra: SnapshotExtra,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind")]
enum SnapshotPoolId {
    Address { value: H160 },
    PoolId { value: H256 },
}

#[derive(Debug, Deserialize)]
#[serde(tag = "protocol")]
enum SnapshotExtra {
    V3 { fee_pips: u32 },
    V2 { reserve: U256 },
    Stable {
        total_shares: U256,
        tokens_list: Vec<H160>,
        wrapper: Option<H160>,
    },
}

impl From<SnapshotPool> for SubgraphPool {
    fn from(snapshot: SnapshotPool) -> Self {
        let id = match snapshot.id {
            SnapshotPoolId::Address { value } => PoolAddress::Address(value),
            SnapshotPoolId::PoolId { value } => PoolAddress::PoolId(value),
        };
        let extra = match snapshot.extra {
            SnapshotExtra::V3 { fee_pips } => SubgraphPoolExtra::V3 {
                fee: model::FeeTier::ALL
                    .into_iter()
                    .find(|tier| tier.pips() == fee_pips)
                    .unwrap_or(model::FeeTier::Medium),
            },
            SnapshotExtra::V2 { reserve } => SubgraphPoolExtra::V2 { reserve },
            SnapshotExtra::Stable {
                total_shares,
                tokens_list,
                wrapper,
            } => SubgraphPoolExtra::Stable {
                total_shares,
                tokens_list,
                wrapper,
            },
        };
        SubgraphPool {
            id,
            tokens: snapshot.tokens,
            tvl_native: snapshot.tvl_native,
            tvl_usd: snapshot.tvl_usd,
            extra,
        }
    }
}
