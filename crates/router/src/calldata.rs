use ethabi::Token as AbiToken;
use model::{PoolAddress, RouteWithQuote, SwapConfig, TradeType};
use primitive_types::H160;

/// Produces the final on-chain call-data for a winning [`model::Plan`]. A
/// small seam by design: the concrete production encoder (building a real
/// settlement-contract call) is a downstream collaborator, per the upstream
/// router's own "calldata is someone else's SDK" boundary. This crate ships
/// only the default, ABI-encoding-a-generic-struct implementation.
pub trait CalldataEncoder: Send + Sync {
    fn encode(&self, routes: &[RouteWithQuote], trade_type: TradeType, swap_config: &SwapConfig) -> Vec<u8>;
}

/// ABI-encodes `((address[],uint256)[] routes, uint8 tradeType, address
/// recipient, uint256 deadline)` — a generic shape any multi-route swap
/// executor could parse, not tied to any one router contract's real
/// calldata layout.
pub struct AbiCalldataEncoder;

impl CalldataEncoder for AbiCalldataEncoder {
    fn encode(&self, routes: &[RouteWithQuote], trade_type: TradeType, swap_config: &SwapConfig) -> Vec<u8> {
        let route_tokens: Vec<AbiToken> = routes
            .iter()
            .map(|route_with_quote| {
                let pool_addresses: Vec<AbiToken> = route_with_quote
                    .route
                    .pools()
                    .iter()
                    .map(|pool| AbiToken::Address(pool_address_as_h160(pool.address())))
                    .collect();
                AbiToken::Tuple(vec![
                    AbiToken::Array(pool_addresses),
                    AbiToken::Uint(route_with_quote.fraction_percent.into()),
                ])
            })
            .collect();

        let trade_type_code: u8 = match trade_type {
            TradeType::ExactInput => 0,
            TradeType::ExactOutput => 1,
        };

        ethabi::encode(&[
            AbiToken::Array(route_tokens),
            AbiToken::Uint(trade_type_code.into()),
            AbiToken::Address(swap_config.recipient),
            AbiToken::Uint(swap_config.deadline_seconds.into()),
        ])
    }
}

/// Stable pools and wrappers are addressed by a 32-byte pool id on-chain;
/// the first 20 bytes are the pool contract's own address, matching the
/// convention `pool_metadata::provider` already relies on to derive a
/// callable address from a pool id.
fn pool_address_as_h160(address: PoolAddress) -> H160 {
    match address {
        PoolAddress::Address(addr) => addr,
        PoolAddress::PoolId(id) => H160::from_slice(&id.as_bytes()[0..20]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::{ChainId, FeeTier, GasEstimate, Amount, Currency, Route, SwapRouterVersion, Token, V3Pool};
    use primitive_types::U256;

    fn token(n: u64) -> Token {
        Token::new(ChainId::MAINNET, H160::from_low_u64_be(n), 18, None)
    }

    #[test]
    fn encodes_without_panicking() {
        let pool = model::Pool::V3(V3Pool::canonical(
            ChainId::MAINNET,
            H160::from_low_u64_be(42),
            token(1),
            token(2),
            FeeTier::Medium,
            1_000,
            U256::from(1u64) << 96,
        ));
        let route = Route::try_new(vec![pool], token(1), token(2)).unwrap();
        let quote_token = Currency::Token(token(2));
        let route_with_quote = RouteWithQuote {
            route,
            fraction_percent: 100,
            amount_in: Amount::from_raw(Currency::Token(token(1)), U256::from(1_000u64)),
            amount_out: Amount::from_raw(quote_token.clone(), U256::from(900u64)),
            gas: GasEstimate {
                gas_use_estimate: U256::from(100_000u64),
                cost_in_quote_token: Amount::zero(quote_token.clone()),
                cost_in_usd: Amount::zero(quote_token.clone()),
                cost_in_gas_token: None,
            },
            sqrt_price_after_x96: None,
            initialized_ticks_crossed: None,
        };
        let swap_config = SwapConfig {
            recipient: H160::from_low_u64_be(7),
            slippage_tolerance_bps: 50,
            deadline_seconds: 1_800,
            swap_router_version: SwapRouterVersion::V3,
            permit_data: None,
        };
        let encoder = AbiCalldataEncoder;
        let encoded = encoder.encode(&[route_with_quote], TradeType::ExactInput, &swap_config);
        assert!(!encoded.is_empty());
    }
}
