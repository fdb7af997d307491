use crate::error::TokenListError;
use crate::provider::{TokenMap, TokenMetadataProvider};
use crate::well_known;
use model::{BlockId, ChainId, Token};
use primitive_types::H160;
use std::collections::HashMap;
use std::sync::RwLock;

/// Wraps a primary provider (and an optional secondary fallback) with an
/// indefinite in-memory cache, seeded with the well-known token table at
/// construction (§4.4: token metadata never changes, so there is no TTL
/// here unlike the pool-metadata cache).
pub struct CachingTokenProvider<P: TokenMetadataProvider> {
    chain: ChainId,
    primary: P,
    secondary: Option<Box<dyn TokenMetadataProvider>>,
    cache: RwLock<HashMap<H160, Token>>,
}

impl<P: TokenMetadataProvider> CachingTokenProvider<P> {
    pub fn new(chain: ChainId, primary: P, secondary: Option<Box<dyn TokenMetadataProvider>>) -> Self {
        let seeded = well_known::seed_tokens(chain)
            .into_iter()
            .map(|token| (token.address, token))
            .collect();
        Self {
            chain,
            primary,
            secondary,
            cache: RwLock::new(seeded),
        }
    }

    fn cached(&self, addresses: &[H160]) -> (Vec<Token>, Vec<H160>) {
        let cache = self.cache.read().unwrap();
        let mut hits = Vec::new();
        let mut misses = Vec::new();
        for &address in addresses {
            match cache.get(&address) {
                Some(token) => hits.push(token.clone()),
                None => misses.push(address),
            }
        }
        (hits, misses)
    }

    fn insert_all(&self, tokens: &[Token]) {
        let mut cache = self.cache.write().unwrap();
        for token in tokens {
            cache.insert(token.address, token.clone());
        }
    }
}

#[async_trait::async_trait]
impl<P: TokenMetadataProvider> TokenMetadataProvider for CachingTokenProvider<P> {
    async fn get_tokens(&self, addresses: Vec<H160>, block: BlockId) -> Result<TokenMap, TokenListError> {
        let (mut resolved, misses) = self.cached(&addresses);
        if misses.is_empty() {
            return Ok(TokenMap::from_tokens(resolved));
        }

        let primary_result = self.primary.get_tokens(misses.clone(), block).await?;
        self.insert_all(&primary_result.all);
        let still_missing: Vec<H160> = misses
            .iter()
            .copied()
            .filter(|address| !primary_result.by_address.contains_key(address))
            .collect();
        resolved.extend(primary_result.all);

        if !still_missing.is_empty() {
            if let Some(secondary) = &self.secondary {
                tracing::info!(chain = ?self.chain, count = still_missing.len(), "falling back to secondary token provider");
                let secondary_result = secondary.get_tokens(still_missing, block).await?;
                self.insert_all(&secondary_result.all);
                resolved.extend(secondary_result.all);
            }
        }

        Ok(TokenMap::from_tokens(resolved))
    }
}
