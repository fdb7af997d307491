use crate::error::TokenListError;
use async_trait::async_trait;
use model::{BlockId, Token};
use primitive_types::H160;
use std::collections::HashMap;

/// Resolved token metadata, keyed both ways for cheap lookup (§4.4).
#[derive(Debug, Clone, Default)]
pub struct TokenMap {
    pub by_address: HashMap<H160, Token>,
    pub by_symbol: HashMap<String, Token>,
    pub all: Vec<Token>,
}

impl TokenMap {
    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        let mut by_address = HashMap::with_capacity(tokens.len());
        let mut by_symbol = HashMap::with_capacity(tokens.len());
        for token in &tokens {
            by_address.insert(token.address, token.clone());
            if let Some(symbol) = &token.symbol {
                by_symbol.insert(symbol.clone(), token.clone());
            }
        }
        Self {
            by_address,
            by_symbol,
            all: tokens,
        }
    }
}

/// Resolves address -> (symbol, decimals). Addresses are lowercased and
/// deduped by the caller/cache layer before reaching a concrete provider.
#[async_trait]
pub trait TokenMetadataProvider: Send + Sync {
    async fn get_tokens(&self, addresses: Vec<H160>, block: BlockId) -> Result<TokenMap, TokenListError>;
}
