use crate::error::SubgraphError;
use async_trait::async_trait;
use model::{BlockId, SubgraphPool};
use primitive_types::H160;

/// Lists known pools with coarse TVL, for candidate selection only (C3).
/// Never used for swap math — §4.2 always refetches pool state fresh.
#[async_trait]
pub trait SubgraphProvider: Send + Sync {
    async fn list_pools(
        &self,
        token_in: Option<H160>,
        token_out: Option<H160>,
        block: BlockId,
    ) -> Result<Vec<SubgraphPool>, SubgraphError>;
}
