use model::{SubgraphPool, SubgraphPoolExtra, Token};
use pool_metadata::PoolRequest;
use primitive_types::H160;
use std::collections::HashMap;

/// Bridges C5's subgraph-pool candidates to C2's `PoolRequest`s (§4.5 step
/// 5: "resolve token metadata for all referenced tokens, and materialize
/// the pool objects via C2"). A pool referencing a token missing from
/// `tokens` is dropped rather than erroring the whole batch, consistent
/// with C2/C4's drop-on-failure convention.
pub fn to_pool_requests(pools: &[SubgraphPool], tokens: &HashMap<H160, Token>) -> Vec<PoolRequest> {
    pools.iter().filter_map(|pool| to_request(pool, tokens)).collect()
}

fn to_request(pool: &SubgraphPool, tokens: &HashMap<H160, Token>) -> Option<PoolRequest> {
    match &pool.extra {
        SubgraphPoolExtra::V3 { fee } => {
            let token0 = tokens.get(pool.tokens.first()?)?.clone();
            let token1 = tokens.get(pool.tokens.get(1)?)?.clone();
            Some(PoolRequest::V3 { token0, token1, fee: *fee })
        }
        SubgraphPoolExtra::V2 { .. } => {
            let token0 = tokens.get(pool.tokens.first()?)?.clone();
            let token1 = tokens.get(pool.tokens.get(1)?)?.clone();
            Some(PoolRequest::V2 { token0, token1 })
        }
        SubgraphPoolExtra::Stable { wrapper, .. } => {
            let id = match pool.id {
                model::PoolAddress::PoolId(id) => id,
                model::PoolAddress::Address(_) => return None,
            };
            let resolved_tokens = pool
                .tokens
                .iter()
                .map(|addr| tokens.get(addr).cloned())
                .collect::<Option<Vec<_>>>()?;
            let wrapper = match wrapper {
                Some(addr) => Some(tokens.get(addr)?.clone()),
                None => None,
            };
            Some(PoolRequest::Stable {
                id,
                tokens: resolved_tokens,
                wrapper,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::{ChainId, FeeTier, PoolAddress};

    fn token(addr: H160) -> Token {
        Token::new(ChainId::MAINNET, addr, 18, None)
    }

    #[test]
    fn drops_pool_when_a_token_is_unresolved() {
        let token_in = H160::from_low_u64_be(1);
        let token_out = H160::from_low_u64_be(2);
        let pool = SubgraphPool {
            id: PoolAddress::Address(H160::from_low_u64_be(3)),
            tokens: vec![token_in, token_out],
            tvl_native: 1.0,
            tvl_usd: 1.0,
            extra: SubgraphPoolExtra::V3 { fee: FeeTier::Medium },
        };
        let mut tokens = HashMap::new();
        tokens.insert(token_in, token(token_in));
        // token_out intentionally missing.
        let requests = to_pool_requests(&[pool], &tokens);
        assert!(requests.is_empty());
    }

    #[test]
    fn builds_v3_request_when_both_tokens_resolve() {
        let token_in = H160::from_low_u64_be(1);
        let token_out = H160::from_low_u64_be(2);
        let pool = SubgraphPool {
            id: PoolAddress::Address(H160::from_low_u64_be(3)),
            tokens: vec![token_in, token_out],
            tvl_native: 1.0,
            tvl_usd: 1.0,
            extra: SubgraphPoolExtra::V3 { fee: FeeTier::Medium },
        };
        let mut tokens = HashMap::new();
        tokens.insert(token_in, token(token_in));
        tokens.insert(token_out, token(token_out));
        let requests = to_pool_requests(&[pool], &tokens);
        assert_eq!(requests.len(), 1);
        assert!(matches!(requests[0], PoolRequest::V3 { .. }));
    }
}
