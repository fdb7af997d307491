//! End-to-end exercises of [`router::Router::route`] against the fakes in
//! `tests/e2e/mocks.rs`. Each test wires up exactly the pools/quotes its
//! scenario needs; none of them touch a network or a node.

#[path = "e2e/mocks.rs"]
mod mocks;

use gas::NoL1Fee;
use mocks::{token, FakePoolMetadata, FakeQuoteFetcher, FakeSubgraph, FakeTokenMetadata, RollbackSubgraph};
use model::{
    Amount, BlockId, ChainId, Currency, FeeTier, PoolAddress, RoutingConfig, StablePool, SubgraphPool,
    SubgraphPoolExtra, TradeType, V2Pool, V3Pool,
};
use primitive_types::{H160, H256, U256};
use router::{AbiCalldataEncoder, Router, RouterError};
use routing::TokenList;
use shared::FixedGasPrice;
use std::collections::HashSet;
use std::sync::Arc;

fn hex_token(chain: ChainId, hex_address: &str, decimals: u8, symbol: &str) -> model::Token {
    let address: H160 = hex_address.parse().expect("valid hex address");
    model::Token::new(chain, address, decimals, Some(symbol.to_string()))
}

fn one_pow18(value: u64) -> U256 {
    U256::from(value) * U256::from(10u64).pow(U256::from(18u32))
}

fn v3_sg_pool(id: H160, tokens: [H160; 2], tvl_native: f64, tvl_usd: f64, fee: FeeTier) -> SubgraphPool {
    SubgraphPool {
        id: PoolAddress::Address(id),
        tokens: tokens.to_vec(),
        tvl_native,
        tvl_usd,
        extra: SubgraphPoolExtra::V3 { fee },
    }
}

fn v2_sg_pool(id: H160, tokens: [H160; 2], tvl_native: f64, tvl_usd: f64) -> SubgraphPool {
    SubgraphPool {
        id: PoolAddress::Address(id),
        tokens: tokens.to_vec(),
        tvl_native,
        tvl_usd,
        extra: SubgraphPoolExtra::V2 { reserve: U256::zero() },
    }
}

fn stable_sg_pool(id: H256, tokens: [H160; 2], tvl_native: f64, tvl_usd: f64) -> SubgraphPool {
    SubgraphPool {
        id: PoolAddress::PoolId(id),
        tokens: tokens.to_vec(),
        tvl_native,
        tvl_usd,
        extra: SubgraphPoolExtra::Stable {
            total_shares: U256::from(10_000_000u64),
            tokens_list: tokens.to_vec(),
            wrapper: None,
        },
    }
}

/// Shallow ~1:1 sqrt price, scaled down to stand in for a WETH/stablecoin
/// pair's real raw-unit ratio without computing it to the last digit.
fn weth_quote_sqrt_price() -> U256 {
    (U256::from(1u64) << 96) / U256::from(20_000u64)
}

#[tokio::test]
async fn direct_swap_single_protocol() {
    let chain = ChainId::ARBITRUM_ONE;
    let weth = hex_token(chain, "82af49447d8a07e3bd95bd0d56f35241523fbab1", 18, "WETH");
    let usdc = hex_token(chain, "af88d065e77c8cc2239327c5edb3a432268e5831", 6, "USDC");
    let usdt = hex_token(chain, "fd086bc7cd5c481dcc9c85ebe478a1c0b69fcbb9", 6, "USDT");

    let direct = H160::from_low_u64_be(1_000);
    let weth_usdc = H160::from_low_u64_be(1_001);
    let weth_usdt = H160::from_low_u64_be(1_002);

    let subgraph_v3 = Arc::new(FakeSubgraph::new(vec![
        v3_sg_pool(direct, [usdc.address, usdt.address], 500.0, 1_500_000.0, FeeTier::Medium),
        v3_sg_pool(weth_usdc, [weth.address, usdc.address], 2_000.0, 6_000_000.0, FeeTier::Medium),
        v3_sg_pool(weth_usdt, [weth.address, usdt.address], 1_800.0, 5_400_000.0, FeeTier::Medium),
    ]));

    let pool_metadata = Arc::new(
        FakePoolMetadata::new()
            .with_v3(V3Pool::canonical(chain, direct, usdc.clone(), usdt.clone(), FeeTier::Medium, 1_000_000_000, U256::from(1u64) << 96))
            .with_v3(V3Pool::canonical(chain, weth_usdc, weth.clone(), usdc.clone(), FeeTier::Medium, 1_000_000_000, weth_quote_sqrt_price()))
            .with_v3(V3Pool::canonical(chain, weth_usdt, weth.clone(), usdt.clone(), FeeTier::Medium, 1_000_000_000, weth_quote_sqrt_price())),
    );

    let router = Router::new(
        chain,
        weth.clone(),
        Vec::new(),
        Arc::new(FakeSubgraph::empty()),
        subgraph_v3,
        Arc::new(FakeSubgraph::empty()),
        pool_metadata,
        Arc::new(FakeTokenMetadata::new(chain, vec![weth.clone(), usdc.clone(), usdt.clone()])),
        Arc::new(TokenList::default()),
        Arc::new(FakeQuoteFetcher::new(99, 100)),
        Arc::new(FixedGasPrice(U256::from(100_000_000u64))),
        None,
        Arc::new(NoL1Fee),
        Arc::new(AbiCalldataEncoder),
    )
    .unwrap();

    let amount = Amount::from_raw(Currency::Token(usdc.clone()), U256::from(1_000u64) * U256::from(10u64).pow(U256::from(6u32)));
    let config = RoutingConfig {
        protocols: HashSet::from([model::Protocol::V3]),
        max_splits: 3,
        ..Default::default()
    };

    let plan = router
        .route(amount, Currency::Token(usdt.clone()), TradeType::ExactInput, None, Some(config))
        .await
        .unwrap()
        .expect("a plan should be found");

    assert!(plan.routes.len() <= 3);
    assert!(plan.routes.iter().all(|r| r.route.protocol() == model::Protocol::V3));
    assert!(plan.quote_gas_adjusted.is_positive());
}

#[tokio::test]
async fn no_liquidity_yields_no_route_found() {
    let chain = ChainId::SEPOLIA;
    let weth = token(chain, 1, 18, "WETH");
    let a = token(chain, 2, 18, "FRESH_A");
    let b = token(chain, 3, 18, "FRESH_B");

    let router = Router::new(
        chain,
        weth.clone(),
        Vec::new(),
        Arc::new(FakeSubgraph::empty()),
        Arc::new(FakeSubgraph::empty()),
        Arc::new(FakeSubgraph::empty()),
        Arc::new(FakePoolMetadata::new()),
        Arc::new(FakeTokenMetadata::new(chain, vec![weth.clone(), a.clone(), b.clone()])),
        Arc::new(TokenList::default()),
        Arc::new(FakeQuoteFetcher::new(99, 100)),
        Arc::new(FixedGasPrice(U256::from(1_000_000_000u64))),
        None,
        Arc::new(NoL1Fee),
        Arc::new(AbiCalldataEncoder),
    )
    .unwrap();

    let amount = Amount::from_raw(Currency::Token(a.clone()), one_pow18(100));
    let config = RoutingConfig {
        protocols: HashSet::from([model::Protocol::V3]),
        ..Default::default()
    };

    let result = router
        .route(amount, Currency::Token(b.clone()), TradeType::ExactInput, None, Some(config))
        .await;

    assert!(matches!(result, Err(RouterError::NoRouteFound)));
}

#[tokio::test]
async fn cross_protocol_improvement_is_forced() {
    let chain = ChainId::ARBITRUM_ONE;
    let weth = hex_token(chain, "82af49447d8a07e3bd95bd0d56f35241523fbab1", 18, "WETH");
    let usdc = hex_token(chain, "af88d065e77c8cc2239327c5edb3a432268e5831", 6, "USDC");
    let usdt = hex_token(chain, "fd086bc7cd5c481dcc9c85ebe478a1c0b69fcbb9", 6, "USDT");

    let direct_v3 = H160::from_low_u64_be(1_000);
    let weth_usdc = H160::from_low_u64_be(1_001);
    let weth_usdt = H160::from_low_u64_be(1_002);
    let stable_id = H256::repeat_byte(7);

    let subgraph_v3 = Arc::new(FakeSubgraph::new(vec![
        v3_sg_pool(direct_v3, [usdc.address, usdt.address], 500.0, 1_500_000.0, FeeTier::Medium),
        v3_sg_pool(weth_usdc, [weth.address, usdc.address], 2_000.0, 6_000_000.0, FeeTier::Medium),
        v3_sg_pool(weth_usdt, [weth.address, usdt.address], 1_800.0, 5_400_000.0, FeeTier::Medium),
    ]));
    let subgraph_stable = Arc::new(FakeSubgraph::new(vec![stable_sg_pool(
        stable_id,
        [usdc.address, usdt.address],
        900.0,
        2_700_000.0,
    )]));

    let stable_pool = StablePool {
        chain,
        id: stable_id,
        tokens: vec![usdc.clone(), usdt.clone()],
        amplification_parameter: U256::from(100u64),
        swap_fee_bps: 4,
        total_shares: U256::from(10_000_000_000u64),
        balances: vec![U256::from(5_000_000_000u64); 2],
        scaling_factors: vec![U256::from(10u64).pow(U256::from(12u32)); 2],
    };

    let pool_metadata = Arc::new(
        FakePoolMetadata::new()
            .with_v3(V3Pool::canonical(chain, direct_v3, usdc.clone(), usdt.clone(), FeeTier::Medium, 1_000_000_000, U256::from(1u64) << 96))
            .with_v3(V3Pool::canonical(chain, weth_usdc, weth.clone(), usdc.clone(), FeeTier::Medium, 1_000_000_000, weth_quote_sqrt_price()))
            .with_v3(V3Pool::canonical(chain, weth_usdt, weth.clone(), usdt.clone(), FeeTier::Medium, 1_000_000_000, weth_quote_sqrt_price()))
            .with_stable(stable_pool),
    );

    let router = Router::new(
        chain,
        weth.clone(),
        Vec::new(),
        Arc::new(FakeSubgraph::empty()),
        subgraph_v3,
        subgraph_stable,
        pool_metadata,
        Arc::new(FakeTokenMetadata::new(chain, vec![weth.clone(), usdc.clone(), usdt.clone()])),
        Arc::new(TokenList::default()),
        Arc::new(FakeQuoteFetcher::new(99, 100)),
        Arc::new(FixedGasPrice(U256::from(100_000_000u64))),
        None,
        Arc::new(NoL1Fee),
        Arc::new(AbiCalldataEncoder),
    )
    .unwrap();

    let amount = Amount::from_raw(Currency::Token(usdc.clone()), U256::from(1_000u64) * U256::from(10u64).pow(U256::from(6u32)));
    let config = RoutingConfig {
        protocols: HashSet::from([model::Protocol::V3, model::Protocol::Stable]),
        distribution_percent: 50,
        min_splits: 2,
        max_splits: 2,
        force_cross_protocol: true,
        ..Default::default()
    };

    let plan = router
        .route(amount, Currency::Token(usdt.clone()), TradeType::ExactInput, None, Some(config))
        .await
        .unwrap()
        .expect("a forced cross-protocol plan should be found");

    assert_eq!(plan.routes.len(), 2);
    let protocols: HashSet<model::Protocol> = plan.routes.iter().map(|r| r.route.protocol()).collect();
    assert_eq!(protocols.len(), 2);
}

#[tokio::test]
async fn subgraph_rollback_retry_still_resolves() {
    let chain = ChainId::SEPOLIA;
    let weth = token(chain, 1, 18, "WETH");
    let a = token(chain, 2, 18, "TOKEN_A");
    let b = token(chain, 3, 18, "TOKEN_B");
    let pool_addr = H160::from_low_u64_be(200);

    let rollback = Arc::new(RollbackSubgraph::new(
        vec![v3_sg_pool(pool_addr, [a.address, b.address], 100.0, 200_000.0, FeeTier::Medium)],
        100,
    ));

    let router = Router::new(
        chain,
        weth.clone(),
        Vec::new(),
        Arc::new(FakeSubgraph::empty()),
        rollback.clone(),
        Arc::new(FakeSubgraph::empty()),
        Arc::new(FakePoolMetadata::new().with_v3(V3Pool::canonical(
            chain,
            pool_addr,
            a.clone(),
            b.clone(),
            FeeTier::Medium,
            1_000_000,
            U256::from(1u64) << 96,
        ))),
        Arc::new(FakeTokenMetadata::new(chain, vec![weth.clone(), a.clone(), b.clone()])),
        Arc::new(TokenList::default()),
        Arc::new(FakeQuoteFetcher::new(99, 100)),
        Arc::new(FixedGasPrice(U256::from(1_000_000_000u64))),
        None,
        Arc::new(NoL1Fee),
        Arc::new(AbiCalldataEncoder),
    )
    .unwrap();

    let amount = Amount::from_raw(Currency::Token(a.clone()), one_pow18(10));
    let config = RoutingConfig {
        protocols: HashSet::from([model::Protocol::V3]),
        block_number: BlockId::Number(130),
        ..Default::default()
    };

    let plan = router
        .route(amount, Currency::Token(b.clone()), TradeType::ExactInput, None, Some(config))
        .await
        .unwrap();

    assert!(plan.is_some());
    assert!(rollback.call_count() >= 4, "expected at least one full rollback retry sequence");
}

#[tokio::test]
async fn optimistic_direct_pool_survives_partial_materialization() {
    let chain = ChainId::MAINNET;
    let weth = token(chain, 1, 18, "WETH");
    let a = token(chain, 60, 18, "TOKEN_A");
    let b = token(chain, 61, 18, "TOKEN_B");
    let real_pool = H160::from_low_u64_be(600);

    let router = Router::new(
        chain,
        weth.clone(),
        Vec::new(),
        Arc::new(FakeSubgraph::empty()),
        Arc::new(FakeSubgraph::empty()),
        Arc::new(FakeSubgraph::empty()),
        Arc::new(FakePoolMetadata::new().with_v3(V3Pool::canonical(
            chain,
            real_pool,
            a.clone(),
            b.clone(),
            FeeTier::Medium,
            1_000_000,
            U256::from(1u64) << 96,
        ))),
        Arc::new(FakeTokenMetadata::new(chain, vec![weth.clone(), a.clone(), b.clone()])),
        Arc::new(TokenList::default()),
        Arc::new(FakeQuoteFetcher::new(99, 100)),
        Arc::new(FixedGasPrice(U256::from(20_000_000_000u64))),
        None,
        Arc::new(NoL1Fee),
        Arc::new(AbiCalldataEncoder),
    )
    .unwrap();

    let amount = Amount::from_raw(Currency::Token(a.clone()), one_pow18(5));
    let config = RoutingConfig {
        protocols: HashSet::from([model::Protocol::V3]),
        ..Default::default()
    };

    let plan = router
        .route(amount, Currency::Token(b.clone()), TradeType::ExactInput, None, Some(config))
        .await
        .unwrap()
        .expect("the one fee tier that materializes should still produce a plan");

    assert_eq!(plan.routes.len(), 1);
    assert_eq!(plan.routes[0].route.pools().len(), 1);
}

#[tokio::test]
async fn exact_output_via_v2_adjusts_for_gas() {
    let chain = ChainId::MAINNET;
    let weth = hex_token(chain, "c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2", 18, "WETH");
    let usdc = hex_token(chain, "a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48", 6, "USDC");
    let dai = hex_token(chain, "6b175474e89094c44da98b954eedeac495271d0f", 18, "DAI");

    let usdc_dai = H160::from_low_u64_be(700);
    let weth_usdc = H160::from_low_u64_be(701);

    let subgraph_v2 = Arc::new(FakeSubgraph::new(vec![
        v2_sg_pool(usdc_dai, [usdc.address, dai.address], 1_000.0, 3_000_000.0),
        v2_sg_pool(weth_usdc, [weth.address, usdc.address], 2_000.0, 6_000_000.0),
    ]));

    let pool_metadata = Arc::new(
        FakePoolMetadata::new()
            .with_v2(V2Pool::canonical(
                chain,
                usdc_dai,
                usdc.clone(),
                dai.clone(),
                U256::from(5_000_000u64) * U256::from(10u64).pow(U256::from(6u32)),
                one_pow18(5_000_000),
            ))
            .with_v2(V2Pool::canonical(
                chain,
                weth_usdc,
                weth.clone(),
                usdc.clone(),
                one_pow18(1_000),
                U256::from(3_000_000u64) * U256::from(10u64).pow(U256::from(6u32)),
            )),
    );

    let router = Router::new(
        chain,
        weth.clone(),
        Vec::new(),
        subgraph_v2,
        Arc::new(FakeSubgraph::empty()),
        Arc::new(FakeSubgraph::empty()),
        pool_metadata,
        Arc::new(FakeTokenMetadata::new(chain, vec![weth.clone(), usdc.clone(), dai.clone()])),
        Arc::new(TokenList::default()),
        Arc::new(FakeQuoteFetcher::new(101, 100)),
        Arc::new(FixedGasPrice(U256::from(30_000_000_000u64))),
        None,
        Arc::new(NoL1Fee),
        Arc::new(AbiCalldataEncoder),
    )
    .unwrap();

    let amount = Amount::from_raw(Currency::Token(dai.clone()), one_pow18(500));
    let config = RoutingConfig {
        protocols: HashSet::from([model::Protocol::V2]),
        max_splits: 3,
        ..Default::default()
    };

    let plan = router
        .route(amount, Currency::Token(usdc.clone()), TradeType::ExactOutput, None, Some(config))
        .await
        .unwrap()
        .expect("a plan should be found");

    assert_eq!(plan.quote.currency, Currency::Token(usdc.clone()));
    assert!(plan.quote_gas_adjusted.value > plan.quote.value);
}
