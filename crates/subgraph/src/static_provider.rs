use crate::error::SubgraphError;
use crate::provider::SubgraphProvider;
use async_trait::async_trait;
use model::{BlockId, SubgraphPool};
use primitive_types::H160;

/// A hardcoded seed set of well-known pools, used as a fallback when the
/// remote subgraph is unreachable (§4.3). Ignores `block` — the seed set is
/// a point-in-time snapshot baked in at construction.
pub struct StaticSubgraphProvider {
    pools: Vec<SubgraphPool>,
}

impl StaticSubgraphProvider {
    pub fn new(pools: Vec<SubgraphPool>) -> Self {
        Self { pools }
    }
}

#[async_trait]
impl SubgraphProvider for StaticSubgraphProvider {
    async fn list_pools(
        &self,
        token_in: Option<H160>,
        token_out: Option<H160>,
        _block: BlockId,
    ) -> Result<Vec<SubgraphPool>, SubgraphError> {
        Ok(self
            .pools
            .iter()
            .filter(|pool| {
                token_in.map_or(true, |t| pool.involves(t)) && token_out.map_or(true, |t| pool.involves(t))
            })
            .cloned()
            .collect())
    }
}
