use model::{ChainId, Token};
use once_cell::sync::Lazy;
use primitive_types::H160;
use std::collections::HashMap;

/// Hardcoded metadata for tokens common enough that resolving them on-chain
/// on every cold start would be wasteful (§4.4). Seeded into
/// `CachingTokenProvider` at construction; never expires.
static WELL_KNOWN: Lazy<HashMap<ChainId, Vec<Token>>> = Lazy::new(|| {
    let mut map: HashMap<ChainId, Vec<Token>> = HashMap::new();
    map.insert(
        ChainId::MAINNET,
        vec![
            token(ChainId::MAINNET, "c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2", 18, "WETH"),
            token(ChainId::MAINNET, "a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48", 6, "USDC"),
            token(ChainId::MAINNET, "dac17f958d2ee523a2206206994597c13d831ec7", 6, "USDT"),
            token(ChainId::MAINNET, "6b175474e89094c44da98b954eedeac495271d0f", 18, "DAI"),
            token(ChainId::MAINNET, "2260fac5e5542a773aa44fbcfedf7c193bc2c599", 8, "WBTC"),
        ],
    );
    map.insert(
        ChainId::ARBITRUM_ONE,
        vec![
            token(ChainId::ARBITRUM_ONE, "82af49447d8a07e3bd95bd0d56f35241523fbab1", 18, "WETH"),
            token(ChainId::ARBITRUM_ONE, "af88d065e77c8cc2239327c5edb3a432268e5831", 6, "USDC"),
        ],
    );
    map
});

fn token(chain: ChainId, hex_address: &str, decimals: u8, symbol: &str) -> Token {
    let address: H160 = hex_address.parse().expect("well-known address must be valid hex");
    Token::new(chain, address, decimals, Some(symbol.to_string()))
}

pub fn seed_tokens(chain: ChainId) -> Vec<Token> {
    WELL_KNOWN.get(&chain).cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mainnet_seed_includes_weth() {
        let tokens = seed_tokens(ChainId::MAINNET);
        assert!(tokens.iter().any(|t| t.symbol.as_deref() == Some("WETH")));
    }

    #[test]
    fn unknown_chain_returns_empty() {
        assert!(seed_tokens(ChainId::from(999_999)).is_empty());
    }
}
