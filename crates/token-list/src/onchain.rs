use crate::error::TokenListError;
use crate::provider::{TokenMap, TokenMetadataProvider};
use async_trait::async_trait;
use ethabi::ParamType;
use model::{BlockId, ChainId, Token};
use multicall::{CallOutcome, ChainTransport, Multicall};
use primitive_types::H160;
use std::collections::HashSet;

/// Resolves symbol/decimals via batched `eth_call`s. Symbol resolution tries
/// the canonical string-returning selector first, then falls back to the
/// bytes32 encoding some older tokens (e.g. MKR) use; a token whose symbol
/// *and* decimals both fail to decode is dropped (§4.4).
pub struct OnChainTokenMetadataProvider<T: ChainTransport> {
    chain: ChainId,
    multicall: Multicall<T>,
}

impl<T: ChainTransport + 'static> OnChainTokenMetadataProvider<T> {
    pub fn new(chain: ChainId, transport: T, config: multicall::BatchConfig) -> Self {
        Self {
            chain,
            multicall: Multicall::new(transport, config),
        }
    }

    async fn resolve_one(&self, address: H160, block: BlockId) -> Option<Token> {
        let selector = |sig: &str| crate::selectors::selector(sig).to_vec();
        let calls = vec![
            (address, selector("symbol()")),
            (address, selector("decimals()")),
        ];
        let outcomes = self
            .multicall
            .aggregate_same_function_many_contracts(calls, block)
            .await;
        if outcomes.len() != 2 {
            return None;
        }
        let symbol = decode_symbol(&outcomes[0]);
        let decimals = decode_decimals(&outcomes[1]);

        match (symbol, decimals) {
            (None, None) => None,
            (symbol, decimals) => Some(Token::new(self.chain, address, decimals.unwrap_or(18), symbol)),
        }
    }
}

#[async_trait]
impl<T: ChainTransport + 'static> TokenMetadataProvider for OnChainTokenMetadataProvider<T> {
    async fn get_tokens(&self, addresses: Vec<H160>, block: BlockId) -> Result<TokenMap, TokenListError> {
        let deduped: HashSet<H160> = addresses.into_iter().collect();
        let mut tokens = Vec::with_capacity(deduped.len());
        for address in deduped {
            if let Some(token) = self.resolve_one(address, block).await {
                tokens.push(token);
            } else {
                tracing::info!(?address, "dropping token: symbol and decimals both unresolvable");
            }
        }
        Ok(TokenMap::from_tokens(tokens))
    }
}

fn decode_symbol(outcome: &CallOutcome) -> Option<String> {
    let data = match outcome {
        CallOutcome::Success { return_data, .. } => return_data,
        _ => return None,
    };
    if let Ok(decoded) = ethabi::decode(&[ParamType::String], data) {
        if let Some(ethabi::Token::String(s)) = decoded.into_iter().next() {
            if !s.is_empty() {
                return Some(s);
            }
        }
    }
    // bytes32 fallback: decode as raw bytes, trim at the first NUL.
    if data.len() >= 32 {
        let raw = &data[0..32];
        let end = raw.iter().position(|&b| b == 0).unwrap_or(32);
        if let Ok(s) = std::str::from_utf8(&raw[..end]) {
            if !s.is_empty() {
                return Some(s.to_string());
            }
        }
    }
    None
}

fn decode_decimals(outcome: &CallOutcome) -> Option<u8> {
    let data = match outcome {
        CallOutcome::Success { return_data, .. } => return_data,
        _ => return None,
    };
    let decoded = ethabi::decode(&[ParamType::Uint(8)], data).ok()?;
    match decoded.into_iter().next()? {
        ethabi::Token::Uint(value) => Some(value.low_u32() as u8),
        _ => None,
    }
}
