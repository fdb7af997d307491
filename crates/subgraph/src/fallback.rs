use crate::error::SubgraphError;
use crate::provider::SubgraphProvider;
use async_trait::async_trait;
use model::{BlockId, SubgraphPool};
use primitive_types::H160;

/// Chain-of-responsibility over an ordered list of providers: tries each in
/// order, returning the first success (§4.3, §9 "sum of providers").
pub struct WithFallbackProvider {
    providers: Vec<Box<dyn SubgraphProvider>>,
}

impl WithFallbackProvider {
    pub fn new(providers: Vec<Box<dyn SubgraphProvider>>) -> Self {
        Self { providers }
    }
}

#[async_trait]
impl SubgraphProvider for WithFallbackProvider {
    async fn list_pools(
        &self,
        token_in: Option<H160>,
        token_out: Option<H160>,
        block: BlockId,
    ) -> Result<Vec<SubgraphPool>, SubgraphError> {
        let mut last_error = SubgraphError::AllProvidersFailed;
        for provider in &self.providers {
            match provider.list_pools(token_in, token_out, block).await {
                Ok(pools) => return Ok(pools),
                Err(err) => {
                    tracing::warn!(%err, "subgraph provider failed, trying next fallback");
                    last_error = err;
                }
            }
        }
        Err(last_error)
    }
}
