use crate::{
    addresses::QuoterAddresses,
    decode, encode,
    path::{hop_tokens, same_protocol_sections},
    types::{AmountQuote, RouteQuoteResult, RouteQuotes},
};
use async_trait::async_trait;
use model::{
    amount::u256_to_bigint, Amount, BlockId, Currency, Pool, Protocol, Route, StableWrapperPool, Token, TradeType,
};
use multicall::{BatchConfig, CallOutcome, ChainTransport, Multicall};
use num_bigint::BigInt;
use num_rational::BigRational;
use primitive_types::{H160, H256, U256};

#[async_trait]
pub trait QuoteFetcher: Send + Sync {
    /// For each route, quotes every `(fraction_percent, amount)` pair in
    /// `fractions` and returns the (possibly partial) result set (§4.7).
    async fn fetch_quotes(
        &self,
        routes: &[Route],
        trade_type: TradeType,
        fractions: &[(u8, Amount)],
        block: BlockId,
    ) -> Vec<RouteQuotes>;
}

/// Quotes routes by simulating each swap against the on-chain quoter
/// contracts through C1, batching calls per protocol section.
pub struct OnChainQuoteFetcher<T: ChainTransport> {
    multicall: Multicall<T>,
    addresses: QuoterAddresses,
}

impl<T: ChainTransport + 'static> OnChainQuoteFetcher<T> {
    pub fn new(transport: T, config: BatchConfig, addresses: QuoterAddresses) -> Self {
        Self {
            multicall: Multicall::new(transport, config),
            addresses,
        }
    }

    async fn fetch_route(
        &self,
        route: &Route,
        trade_type: TradeType,
        fractions: &[(u8, Amount)],
        block: BlockId,
    ) -> RouteQuotes {
        let only_exact_input = matches!(
            route.protocol(),
            Protocol::Stable | Protocol::StableWrapper | Protocol::Mixed
        );
        if only_exact_input && trade_type == TradeType::ExactOutput {
            tracing::debug!(protocol = %route.protocol(), "exact-output not supported, skipping route");
            return RouteQuotes {
                route: route.clone(),
                amounts: fractions
                    .iter()
                    .map(|(percent, amount)| AmountQuote {
                        fraction_percent: *percent,
                        amount: amount.clone(),
                        quote: None,
                    })
                    .collect(),
            };
        }

        let amounts = match route.protocol() {
            Protocol::StableWrapper => self.fetch_stable_wrapper(route, fractions),
            Protocol::Mixed => self.fetch_mixed(route, fractions, block).await,
            single_protocol => {
                self.fetch_single_protocol(route, single_protocol, trade_type, fractions, block)
                    .await
            }
        };

        RouteQuotes {
            route: route.clone(),
            amounts,
        }
    }

    fn output_currency(route: &Route, trade_type: TradeType) -> Currency {
        match trade_type {
            TradeType::ExactInput => Currency::Token(route.output().clone()),
            TradeType::ExactOutput => Currency::Token(route.input().clone()),
        }
    }

    async fn fetch_single_protocol(
        &self,
        route: &Route,
        protocol: Protocol,
        trade_type: TradeType,
        fractions: &[(u8, Amount)],
        block: BlockId,
    ) -> Vec<AmountQuote> {
        let tokens = hop_tokens(route);
        let pools: Vec<Pool> = route.pools().to_vec();
        let raw_amounts: Vec<U256> = fractions.iter().map(|(_, a)| a.to_raw_floor()).collect();

        let results = self
            .quote_segment(protocol, &pools, &tokens, trade_type, &raw_amounts, block)
            .await;

        let output_currency = Self::output_currency(route, trade_type);
        fractions
            .iter()
            .zip(results)
            .map(|((percent, amount), result)| AmountQuote {
                fraction_percent: *percent,
                amount: amount.clone(),
                quote: result.map(|r| RouteQuoteResult {
                    amount: Amount::from_raw(output_currency.clone(), r.amount_out),
                    sqrt_price_after_x96: r.sqrt_price_after_x96,
                    initialized_ticks_crossed: r.initialized_ticks_crossed,
                }),
            })
            .collect()
    }

    async fn fetch_mixed(&self, route: &Route, fractions: &[(u8, Amount)], block: BlockId) -> Vec<AmountQuote> {
        let tokens = hop_tokens(route);
        let pools = route.pools();
        let sections = same_protocol_sections(route);

        let mut running: Vec<Option<U256>> = fractions.iter().map(|(_, a)| Some(a.to_raw_floor())).collect();
        let mut sqrt_price_acc: Vec<Vec<U256>> = fractions.iter().map(|_| Vec::new()).collect();
        let mut ticks_acc: Vec<u32> = fractions.iter().map(|_| 0).collect();
        let mut touched_v3 = false;

        for section in &sections {
            let section_pools = &pools[section.start..section.end];
            let section_tokens = &tokens[section.start..=section.end];

            if section.protocol == Protocol::StableWrapper {
                for slot in running.iter_mut() {
                    if let Some(amount_in) = *slot {
                        *slot = apply_wrapper_chain(section_pools, section_tokens, amount_in);
                    }
                }
                continue;
            }

            if section.protocol == Protocol::V3 {
                touched_v3 = true;
            }

            let active_indices: Vec<usize> = running
                .iter()
                .enumerate()
                .filter_map(|(i, v)| v.map(|_| i))
                .collect();
            let active_amounts: Vec<U256> = active_indices.iter().map(|&i| running[i].unwrap()).collect();
            if active_amounts.is_empty() {
                break;
            }

            let results = self
                .quote_segment(
                    section.protocol,
                    section_pools,
                    section_tokens,
                    TradeType::ExactInput,
                    &active_amounts,
                    block,
                )
                .await;

            for (position, &idx) in active_indices.iter().enumerate() {
                match &results[position] {
                    Some(result) => {
                        running[idx] = Some(result.amount_out);
                        if let Some(prices) = &result.sqrt_price_after_x96 {
                            sqrt_price_acc[idx].extend(prices.iter().copied());
                        }
                        if let Some(ticks) = result.initialized_ticks_crossed {
                            ticks_acc[idx] += ticks;
                        }
                    }
                    None => running[idx] = None,
                }
            }
        }

        let output_currency = Currency::Token(route.output().clone());
        fractions
            .iter()
            .zip(running)
            .enumerate()
            .map(|(i, ((percent, amount), final_amount))| AmountQuote {
                fraction_percent: *percent,
                amount: amount.clone(),
                quote: final_amount.map(|value| RouteQuoteResult {
                    amount: Amount::from_raw(output_currency.clone(), value),
                    sqrt_price_after_x96: if touched_v3 { Some(sqrt_price_acc[i].clone()) } else { None },
                    initialized_ticks_crossed: if touched_v3 { Some(ticks_acc[i]) } else { None },
                }),
            })
            .collect()
    }

    fn fetch_stable_wrapper(&self, route: &Route, fractions: &[(u8, Amount)]) -> Vec<AmountQuote> {
        let tokens = hop_tokens(route);
        let pools = route.pools();
        let output_currency = Currency::Token(route.output().clone());
        fractions
            .iter()
            .map(|(percent, amount)| {
                let amount_in = amount.to_raw_floor();
                let quote = apply_wrapper_chain(pools, &tokens, amount_in).map(|amount_out| RouteQuoteResult {
                    amount: Amount::from_raw(output_currency.clone(), amount_out),
                    sqrt_price_after_x96: None,
                    initialized_ticks_crossed: None,
                });
                AmountQuote {
                    fraction_percent: *percent,
                    amount: amount.clone(),
                    quote,
                }
            })
            .collect()
    }

    /// Batches one on-chain quoter call per `amounts_in` entry against the
    /// same target contract (the segment's protocol quoter), since every
    /// entry differs only by its amount parameter.
    async fn quote_segment(
        &self,
        protocol: Protocol,
        pools: &[Pool],
        tokens: &[Token],
        trade_type: TradeType,
        amounts_in: &[U256],
        block: BlockId,
    ) -> Vec<Option<SegmentResult>> {
        match protocol {
            Protocol::V3 => self.quote_v3_segment(pools, tokens, trade_type, amounts_in, block).await,
            Protocol::V2 => self.quote_v2_segment(tokens, trade_type, amounts_in, block).await,
            Protocol::Stable => self.quote_stable_segment(pools, tokens, amounts_in, block).await,
            Protocol::StableWrapper | Protocol::Mixed => {
                unreachable!("wrapper and mixed sections are never dispatched here")
            }
        }
    }

    async fn quote_v3_segment(
        &self,
        pools: &[Pool],
        tokens: &[Token],
        trade_type: TradeType,
        amounts_in: &[U256],
        block: BlockId,
    ) -> Vec<Option<SegmentResult>> {
        let fees: Vec<u32> = pools.iter().filter_map(crate::path::v3_fee_pips).collect();
        let reverse = trade_type == TradeType::ExactOutput;
        let path = crate::path::encode_v3_path(tokens, &fees, reverse);

        let calldatas: Vec<Vec<u8>> = amounts_in
            .iter()
            .map(|&amount| match trade_type {
                TradeType::ExactInput => encode::v3_quote_exact_input(path.clone(), amount),
                TradeType::ExactOutput => encode::v3_quote_exact_output(path.clone(), amount),
            })
            .collect();

        let outcomes = self
            .multicall
            .aggregate_same_function_one_contract_many_params(self.addresses.v3_quoter, calldatas, block)
            .await;

        outcomes
            .into_iter()
            .map(|outcome| {
                let data = success_data(outcome)?;
                let decoded = match trade_type {
                    TradeType::ExactInput => decode::decode_v3_exact_input(&data),
                    TradeType::ExactOutput => decode::decode_v3_exact_output(&data),
                }?;
                Some(SegmentResult {
                    amount_out: decoded.amount,
                    sqrt_price_after_x96: Some(decoded.sqrt_price_after_x96),
                    initialized_ticks_crossed: Some(decoded.initialized_ticks_crossed),
                })
            })
            .collect()
    }

    async fn quote_v2_segment(
        &self,
        tokens: &[Token],
        trade_type: TradeType,
        amounts_in: &[U256],
        block: BlockId,
    ) -> Vec<Option<SegmentResult>> {
        let path: Vec<H160> = tokens.iter().map(|t| t.address).collect();
        let calldatas: Vec<Vec<u8>> = amounts_in
            .iter()
            .map(|&amount| match trade_type {
                TradeType::ExactInput => encode::v2_get_amounts_out(amount, &path),
                TradeType::ExactOutput => encode::v2_get_amounts_in(amount, &path),
            })
            .collect();

        let outcomes = self
            .multicall
            .aggregate_same_function_one_contract_many_params(self.addresses.v2_router, calldatas, block)
            .await;

        outcomes
            .into_iter()
            .map(|outcome| {
                let data = success_data(outcome)?;
                let amounts = decode::decode_v2_amounts(&data)?;
                let amount_out = match trade_type {
                    TradeType::ExactInput => *amounts.last()?,
                    TradeType::ExactOutput => *amounts.first()?,
                };
                Some(SegmentResult {
                    amount_out,
                    sqrt_price_after_x96: None,
                    initialized_ticks_crossed: None,
                })
            })
            .collect()
    }

    async fn quote_stable_segment(
        &self,
        pools: &[Pool],
        tokens: &[Token],
        amounts_in: &[U256],
        block: BlockId,
    ) -> Vec<Option<SegmentResult>> {
        let assets: Vec<H160> = tokens.iter().map(|t| t.address).collect();
        let pool_ids: Vec<H256> = pools
            .iter()
            .map(|p| match p.address() {
                model::PoolAddress::PoolId(id) => id,
                model::PoolAddress::Address(a) => H256::from_slice(&[&[0u8; 12][..], a.as_bytes()].concat()),
            })
            .collect();

        let calldatas: Vec<Vec<u8>> = amounts_in
            .iter()
            .map(|&amount_in| {
                let steps: Vec<encode::BatchSwapStep> = pool_ids
                    .iter()
                    .enumerate()
                    .map(|(i, &pool_id)| encode::BatchSwapStep {
                        pool_id,
                        asset_in_index: i,
                        asset_out_index: i + 1,
                        amount: if i == 0 { amount_in } else { U256::zero() },
                    })
                    .collect();
                encode::stable_query_batch_swap(&steps, &assets)
            })
            .collect();

        let outcomes = self
            .multicall
            .aggregate_same_function_one_contract_many_params(self.addresses.stable_vault, calldatas, block)
            .await;

        let output_index = assets.len() - 1;
        outcomes
            .into_iter()
            .map(|outcome| {
                let data = success_data(outcome)?;
                let amount_out = decode::decode_stable_output(&data, output_index)?;
                Some(SegmentResult {
                    amount_out,
                    sqrt_price_after_x96: None,
                    initialized_ticks_crossed: None,
                })
            })
            .collect()
    }
}

struct SegmentResult {
    amount_out: U256,
    sqrt_price_after_x96: Option<Vec<U256>>,
    initialized_ticks_crossed: Option<u32>,
}

fn success_data(outcome: CallOutcome) -> Option<Vec<u8>> {
    match outcome {
        CallOutcome::Success { return_data, .. } => Some(return_data),
        CallOutcome::Failed { reason } => {
            tracing::debug!(reason, "quoter call reverted, skipping amount");
            None
        }
        CallOutcome::Fatal => None,
    }
}

/// A `StableWrapper` route has no AMM math to simulate; its conversion rate
/// is already known from C2's pool metadata, so this is exact rational
/// arithmetic rather than an on-chain call.
fn apply_wrapper_chain(pools: &[Pool], tokens: &[Token], amount_in: U256) -> Option<U256> {
    let mut current = BigRational::from_integer(u256_to_bigint(amount_in));
    for (i, pool) in pools.iter().enumerate() {
        let Pool::StableWrapper(wrapper) = pool else {
            return None;
        };
        current = apply_wrapper_rate(wrapper, &tokens[i], current)?;
    }
    Some(model::amount::bigint_to_u256(&current.floor().to_integer()))
}

fn apply_wrapper_rate(pool: &StableWrapperPool, token_in: &Token, amount_in: BigRational) -> Option<BigRational> {
    let scale = BigRational::from_integer(BigInt::from(10u64).pow(18));
    let rate = BigRational::from_integer(u256_to_bigint(pool.rate));
    if token_in.identity() == pool.share_token.identity() {
        Some(amount_in * rate / scale)
    } else if token_in.identity() == pool.vault_token.identity() {
        Some(amount_in * scale / rate)
    } else {
        None
    }
}

#[async_trait]
impl<T: ChainTransport + 'static> QuoteFetcher for OnChainQuoteFetcher<T> {
    async fn fetch_quotes(
        &self,
        routes: &[Route],
        trade_type: TradeType,
        fractions: &[(u8, Amount)],
        block: BlockId,
    ) -> Vec<RouteQuotes> {
        let mut results = Vec::with_capacity(routes.len());
        for route in routes {
            results.push(self.fetch_route(route, trade_type, fractions, block).await);
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::{ChainId, V2Pool};
    use multicall::{Call, TransportError};

    struct StubTransport {
        amount_out: U256,
    }

    #[async_trait]
    impl ChainTransport for StubTransport {
        async fn execute_batch(
            &self,
            calls: &[Call],
            _block: BlockId,
            _gas_limit_per_call: u64,
        ) -> Result<Vec<multicall::CallResult>, TransportError> {
            let amounts = ethabi::encode(&[ethabi::Token::Array(vec![
                ethabi::Token::Uint(U256::from(1_000u64)),
                ethabi::Token::Uint(self.amount_out),
            ])]);
            Ok(calls
                .iter()
                .map(|_| multicall::CallResult {
                    success: true,
                    return_data: amounts.clone(),
                    gas_used: 50_000,
                })
                .collect())
        }
    }

    fn token(n: u64) -> Token {
        Token::new(ChainId::MAINNET, H160::from_low_u64_be(n), 18, None)
    }

    fn amount(value: u64) -> Amount {
        Amount::from_raw(Currency::Token(token(1)), U256::from(value))
    }

    #[tokio::test]
    async fn v2_route_quotes_via_batched_calls() {
        let pool = Pool::V2(V2Pool::canonical(
            ChainId::MAINNET,
            H160::from_low_u64_be(100),
            token(1),
            token(2),
            U256::from(1_000_000u64),
            U256::from(1_000_000u64),
        ));
        let route = Route::try_new(vec![pool], token(1), token(2)).unwrap();
        let fetcher = OnChainQuoteFetcher::new(
            StubTransport { amount_out: U256::from(950u64) },
            BatchConfig::default(),
            QuoterAddresses {
                v3_quoter: H160::zero(),
                v2_router: H160::from_low_u64_be(1),
                stable_vault: H160::zero(),
            },
        );
        let fractions = vec![(100u8, amount(1_000))];
        let result = fetcher
            .fetch_quotes(&[route], TradeType::ExactInput, &fractions, BlockId::Latest)
            .await;
        assert_eq!(result.len(), 1);
        let quote = result[0].amounts[0].quote.as_ref().unwrap();
        assert_eq!(quote.amount.to_raw_floor(), U256::from(950u64));
    }

    #[tokio::test]
    async fn stable_route_rejects_exact_output() {
        use model::StablePool;

        let stable = Pool::Stable(StablePool {
            chain: ChainId::MAINNET,
            id: primitive_types::H256::repeat_byte(1),
            tokens: vec![token(1), token(2)],
            amplification_parameter: U256::from(100u64),
            swap_fee_bps: 4,
            total_shares: U256::from(1_000u64),
            balances: vec![U256::from(500u64); 2],
            scaling_factors: vec![U256::from(1u64); 2],
        });
        let route = Route::try_new(vec![stable], token(1), token(2)).unwrap();
        let fetcher = OnChainQuoteFetcher::new(
            StubTransport { amount_out: U256::from(950u64) },
            BatchConfig::default(),
            QuoterAddresses {
                v3_quoter: H160::zero(),
                v2_router: H160::zero(),
                stable_vault: H160::from_low_u64_be(7),
            },
        );
        let fractions = vec![(100u8, amount(1_000))];
        let result = fetcher
            .fetch_quotes(&[route], TradeType::ExactOutput, &fractions, BlockId::Latest)
            .await;
        assert!(result[0].amounts[0].quote.is_none());
    }

    #[test]
    fn wrapper_rate_conversion_is_exact() {
        let share = token(1);
        let vault = token(2);
        let wrapper = StableWrapperPool {
            chain: ChainId::MAINNET,
            underlying: primitive_types::H256::repeat_byte(1),
            share_token: share.clone(),
            vault_token: vault.clone(),
            rate: U256::from(2_000_000_000_000_000_000u128),
        };
        let out = apply_wrapper_chain(&[Pool::StableWrapper(wrapper)], &[share, vault], U256::from(100u64));
        assert_eq!(out, Some(U256::from(200u64)));
    }
}
