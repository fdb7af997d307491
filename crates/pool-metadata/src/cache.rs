use crate::provider::PoolMetadataProvider;
use crate::requests::PoolRequest;
use async_trait::async_trait;
use model::{BlockId, ChainId, Pool};
use moka::future::Cache;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Wraps a concrete [`PoolMetadataProvider`] with a `(chain, pool, block)`
/// keyed cache. Cache hits never revalidate; entries expire after the
/// configured TTL (§4.2).
pub struct CachingPoolMetadataProvider<P: PoolMetadataProvider> {
    chain: ChainId,
    inner: P,
    cache: Cache<String, Pool>,
}

impl<P: PoolMetadataProvider> CachingPoolMetadataProvider<P> {
    pub fn new(chain: ChainId, inner: P, ttl: Duration, max_capacity: u64) -> Self {
        Self {
            chain,
            inner,
            cache: Cache::builder()
                .time_to_live(ttl)
                .max_capacity(max_capacity)
                .build(),
        }
    }
}

#[async_trait]
impl<P: PoolMetadataProvider + Send + Sync> PoolMetadataProvider for CachingPoolMetadataProvider<P> {
    async fn fetch(&self, requests: Vec<PoolRequest>, block: BlockId) -> Vec<Pool> {
        let mut hits = Vec::new();
        let mut misses = Vec::new();
        // identity (protocol-specific, block-independent) -> full cache key
        let mut miss_keys: HashMap<String, String> = HashMap::new();

        for request in requests {
            let identities = request_identity_keys(&request);
            let mut all_hit = true;
            let mut request_hits = Vec::with_capacity(identities.len());
            for identity in &identities {
                let full_key = full_cache_key(self.chain, identity, block);
                match self.cache.get(&full_key).await {
                    Some(pool) => request_hits.push(pool),
                    None => {
                        all_hit = false;
                        miss_keys.insert(identity.clone(), full_key);
                    }
                }
            }
            if all_hit {
                hits.extend(request_hits);
            } else {
                misses.push(request);
            }
        }

        if misses.is_empty() {
            return hits;
        }

        // `fetch` may drop pools whose on-chain call failed, so the result
        // isn't positionally aligned with `misses` — match each returned
        // pool back to its cache key by identity instead.
        let fetched = self.inner.fetch(misses, block).await;
        for pool in &fetched {
            if let Some(full_key) = miss_keys.get(&pool_identity_key(pool)) {
                self.cache.insert(full_key.clone(), pool.clone()).await;
            }
        }
        hits.extend(fetched);
        hits
    }
}

/// Protocol-specific identities shared by a request and the pool(s) it
/// resolves to, independent of chain and block. A Stable request carrying a
/// wrapper resolves to two pools (the stable pool and its wrapper), so it
/// yields two identities.
fn request_identity_keys(request: &PoolRequest) -> Vec<String> {
    match request {
        PoolRequest::V2 { token0, token1 } => {
            let (a, b) = sorted(token0.address, token1.address);
            vec![format!("v2-{a:#x}-{b:#x}")]
        }
        PoolRequest::V3 { token0, token1, fee } => {
            let (a, b) = sorted(token0.address, token1.address);
            vec![format!("v3-{a:#x}-{b:#x}-{}", fee.pips())]
        }
        PoolRequest::Stable { id, wrapper, .. } => {
            let mut keys = vec![format!("stable-{id:#x}")];
            if wrapper.is_some() {
                keys.push(format!("stable-{id:#x}-wrapper"));
            }
            keys
        }
    }
}

fn pool_identity_key(pool: &Pool) -> String {
    match pool {
        Pool::V2(p) => {
            let (a, b) = sorted(p.token0.address, p.token1.address);
            format!("v2-{a:#x}-{b:#x}")
        }
        Pool::V3(p) => {
            let (a, b) = sorted(p.token0.address, p.token1.address);
            format!("v3-{a:#x}-{b:#x}-{}", p.fee.pips())
        }
        Pool::Stable(p) => format!("stable-{:#x}", p.id),
        Pool::StableWrapper(p) => format!("stable-{:#x}-wrapper", p.underlying),
    }
}

/// Builds the `pool-{chain}-{key}[-{block}]` cache key. `block` is appended
/// only when the caller pinned a specific block — unpinned ("latest") reads
/// share one entry across calls, matching §4.2.
fn full_cache_key(chain: ChainId, identity: &str, block: BlockId) -> String {
    match block {
        BlockId::Latest => format!("pool-{chain}-{identity}"),
        BlockId::Number(n) => format!("pool-{chain}-{identity}-{n}"),
    }
}

fn sorted(a: primitive_types::H160, b: primitive_types::H160) -> (primitive_types::H160, primitive_types::H160) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Convenience alias matching the orchestrator's expected provider shape:
/// an `Arc`-shared, caching, on-chain provider.
pub type SharedPoolMetadataProvider<T> =
    Arc<CachingPoolMetadataProvider<crate::provider::OnChainPoolMetadataProvider<T>>>;
