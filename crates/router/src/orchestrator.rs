use crate::calldata::CalldataEncoder;
use crate::error::RouterError;
use gas::{GasModel, ReferencePools};
use model::{
    Amount, BlockId, ChainId, Currency, Plan, Protocol, Route, RouteWithQuote, RoutingConfig, SwapConfig, Token,
    TradeType,
};
use pool_metadata::PoolMetadataProvider;
use primitive_types::H160;
use quoting::QuoteFetcher;
use routing::{BadTokenDetecting, SelectionContext};
use std::collections::HashSet;
use std::sync::Arc;
use subgraph::SubgraphProvider;
use token_list::TokenMetadataProvider;

/// The four chains this router instance can serve. Every other chain is
/// rejected up front rather than producing a plan built on absent gas
/// constants or reference addresses.
fn is_supported_chain(chain: ChainId) -> bool {
    matches!(chain, ChainId::MAINNET | ChainId::SEPOLIA | ChainId::OPTIMISM | ChainId::ARBITRUM_ONE)
}

/// Ties every collaborator crate (C1-C9) together behind one entry point
/// (§4.10). Holds no mutable state of its own; every call to [`Router::route`]
/// re-derives candidate pools, quotes and gas costs fresh for the requested
/// block, per the "never used for swap math" rule subgraph data is held to.
pub struct Router {
    chain: ChainId,
    native_wrapper: Token,
    base_tokens: Vec<H160>,
    subgraph_v2: Arc<dyn SubgraphProvider>,
    subgraph_v3: Arc<dyn SubgraphProvider>,
    subgraph_stable: Arc<dyn SubgraphProvider>,
    pool_metadata: Arc<dyn PoolMetadataProvider>,
    token_metadata: Arc<dyn TokenMetadataProvider>,
    bad_tokens: Arc<dyn BadTokenDetecting>,
    quote_fetcher: Arc<dyn QuoteFetcher>,
    gas_price: Arc<dyn shared::GasPriceProvider>,
    l1_gas_data: Option<Arc<dyn gas::L1GasDataProvider>>,
    l1_fee_estimator: Arc<dyn gas::L1DataFeeEstimator>,
    calldata_encoder: Arc<dyn CalldataEncoder>,
}

impl Router {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        chain: ChainId,
        native_wrapper: Token,
        base_tokens: Vec<H160>,
        subgraph_v2: Arc<dyn SubgraphProvider>,
        subgraph_v3: Arc<dyn SubgraphProvider>,
        subgraph_stable: Arc<dyn SubgraphProvider>,
        pool_metadata: Arc<dyn PoolMetadataProvider>,
        token_metadata: Arc<dyn TokenMetadataProvider>,
        bad_tokens: Arc<dyn BadTokenDetecting>,
        quote_fetcher: Arc<dyn QuoteFetcher>,
        gas_price: Arc<dyn shared::GasPriceProvider>,
        l1_gas_data: Option<Arc<dyn gas::L1GasDataProvider>>,
        l1_fee_estimator: Arc<dyn gas::L1DataFeeEstimator>,
        calldata_encoder: Arc<dyn CalldataEncoder>,
    ) -> Result<Self, RouterError> {
        if !is_supported_chain(chain) {
            return Err(RouterError::UnsupportedChain(chain));
        }
        Ok(Self {
            chain,
            native_wrapper,
            base_tokens,
            subgraph_v2,
            subgraph_v3,
            subgraph_stable,
            pool_metadata,
            token_metadata,
            bad_tokens,
            quote_fetcher,
            gas_price,
            l1_gas_data,
            l1_fee_estimator,
            calldata_encoder,
        })
    }

    /// §4.10's nine-step flow: validate, select candidates per protocol,
    /// materialize live pool state, enumerate routes, quote, gas-adjust,
    /// split-optimize, fold in the rollup L1 fee, and encode calldata for
    /// whichever [`model::Plan`] wins. Returns `Ok(None)` when no split could
    /// be assembled from whatever candidates were found; returns `Err` only
    /// for input/chain/transport failures, never for "the market has no
    /// liquidity today".
    pub async fn route(
        &self,
        amount: Amount,
        quote_currency: Currency,
        trade_type: TradeType,
        swap_config: Option<SwapConfig>,
        routing_config: Option<RoutingConfig>,
    ) -> Result<Option<Plan>, RouterError> {
        if amount.currency.chain() != self.chain || quote_currency.chain() != self.chain {
            return Err(RouterError::UnsupportedChain(amount.currency.chain()));
        }
        if !amount.is_positive() {
            return Err(RouterError::InvalidInput("amount must be positive".to_string()));
        }
        if amount.currency == quote_currency {
            return Err(RouterError::InvalidInput(
                "amount currency and quote currency must differ".to_string(),
            ));
        }

        let config = routing_config.unwrap_or_default();
        let swap_config = swap_config.unwrap_or_default();

        if trade_type == TradeType::ExactOutput
            && !config.protocols.contains(&Protocol::V2)
            && !config.protocols.contains(&Protocol::V3)
        {
            return Err(RouterError::UnsupportedTradeType);
        }

        let native_wrapper = self.native_wrapper.clone();
        let token_in = amount_side_token(trade_type, &amount.currency, &quote_currency, &native_wrapper, true);
        let token_out = amount_side_token(trade_type, &amount.currency, &quote_currency, &native_wrapper, false);
        let quote_token = match trade_type {
            TradeType::ExactInput => token_out.clone(),
            TradeType::ExactOutput => token_in.clone(),
        };
        let specified_amount = Amount::new(
            Currency::Token(match trade_type {
                TradeType::ExactInput => token_in.clone(),
                TradeType::ExactOutput => token_out.clone(),
            }),
            amount.value.clone(),
        );

        let block = config.block_number;

        let need_v2 = config.protocols.contains(&Protocol::V2);
        let need_v3 = config.protocols.contains(&Protocol::V3) || config.protocols.contains(&Protocol::Mixed);
        let need_stable = config.protocols.contains(&Protocol::Stable)
            || config.protocols.contains(&Protocol::StableWrapper)
            || config.protocols.contains(&Protocol::Mixed);

        let (v2_universe, v3_universe, stable_universe) = tokio::join!(
            fetch_universe(need_v2, self.subgraph_v2.as_ref(), block),
            fetch_universe(need_v3, self.subgraph_v3.as_ref(), block),
            fetch_universe(need_stable, self.subgraph_stable.as_ref(), block),
        );
        if (need_v2 || need_v3 || need_stable)
            && v2_universe.is_err()
            && v3_universe.is_err()
            && stable_universe.is_err()
        {
            return Err(first_err(v2_universe, v3_universe, stable_universe));
        }
        let v2_universe = v2_universe.unwrap_or_default();
        let v3_universe = v3_universe.unwrap_or_default();
        let stable_universe = stable_universe.unwrap_or_default();

        fn selection_ctx<'a>(
            token_in: H160,
            token_out: H160,
            trade_type: TradeType,
            pool_selection: &'a model::PoolSelectionConfig,
            base_tokens: &'a [H160],
            native_wrapper: H160,
            blocked: &'a dyn BadTokenDetecting,
        ) -> SelectionContext<'a> {
            SelectionContext {
                token_in,
                token_out,
                trade_type,
                config: pool_selection,
                base_tokens,
                native_wrapper,
                blocked,
            }
        }

        let v2_candidates = if need_v2 {
            let ctx = selection_ctx(
                token_in.address,
                token_out.address,
                trade_type,
                &config.v2_pool_selection,
                &self.base_tokens,
                native_wrapper.address,
                self.bad_tokens.as_ref(),
            );
            routing::select_for_protocol(&v2_universe, Protocol::V2, &ctx)
        } else {
            Vec::new()
        };
        let v3_candidates = if config.protocols.contains(&Protocol::V3) {
            let ctx = selection_ctx(
                token_in.address,
                token_out.address,
                trade_type,
                &config.v3_pool_selection,
                &self.base_tokens,
                native_wrapper.address,
                self.bad_tokens.as_ref(),
            );
            routing::select_for_protocol(&v3_universe, Protocol::V3, &ctx)
        } else {
            Vec::new()
        };
        let stable_candidates = if need_stable {
            let ctx = selection_ctx(
                token_in.address,
                token_out.address,
                trade_type,
                &config.stable_pool_selection,
                &self.base_tokens,
                native_wrapper.address,
                self.bad_tokens.as_ref(),
            );
            routing::select_for_protocol(&stable_universe, Protocol::Stable, &ctx)
        } else {
            Vec::new()
        };
        let mixed_candidates = if config.protocols.contains(&Protocol::Mixed) {
            let merged: Vec<_> = v3_universe.iter().cloned().chain(stable_universe.iter().cloned()).collect();
            let ctx = selection_ctx(
                token_in.address,
                token_out.address,
                trade_type,
                &config.v3_pool_selection,
                &self.base_tokens,
                native_wrapper.address,
                self.bad_tokens.as_ref(),
            );
            routing::select_for_mixed(&merged, &ctx)
        } else {
            Vec::new()
        };

        let mut addresses: HashSet<H160> = HashSet::new();
        addresses.insert(token_in.address);
        addresses.insert(token_out.address);
        addresses.extend(self.base_tokens.iter().copied());
        if let Some(gas_token) = &config.gas_token {
            addresses.insert(gas_token.address);
        }
        for pool in v2_candidates
            .iter()
            .chain(v3_candidates.iter())
            .chain(stable_candidates.iter())
            .chain(mixed_candidates.iter())
        {
            addresses.extend(pool.tokens.iter().copied());
            if let Some(wrapper) = pool.wrapper() {
                addresses.insert(wrapper);
            }
        }

        let token_map = self
            .token_metadata
            .get_tokens(addresses.into_iter().collect(), block)
            .await?;

        let (v2_pools, v3_pools, stable_pools, mixed_pools) = tokio::join!(
            self.pool_metadata
                .fetch(routing::to_pool_requests(&v2_candidates, &token_map.by_address), block),
            self.pool_metadata
                .fetch(routing::to_pool_requests(&v3_candidates, &token_map.by_address), block),
            self.pool_metadata
                .fetch(routing::to_pool_requests(&stable_candidates, &token_map.by_address), block),
            self.pool_metadata
                .fetch(routing::to_pool_requests(&mixed_candidates, &token_map.by_address), block),
        );

        let v2_routes = enumerate_for(&v2_pools, &token_in, &token_out, config.max_swaps_per_path, Protocol::V2);
        let v3_routes = enumerate_for(&v3_pools, &token_in, &token_out, config.max_swaps_per_path, Protocol::V3);
        let stable_routes =
            enumerate_for(&stable_pools, &token_in, &token_out, config.max_swaps_per_path, Protocol::Stable);
        let stable_wrapper_routes = enumerate_for(
            &stable_pools,
            &token_in,
            &token_out,
            config.max_swaps_per_path,
            Protocol::StableWrapper,
        );
        let mixed_routes =
            enumerate_for(&mixed_pools, &token_in, &token_out, config.max_swaps_per_path, Protocol::Mixed);

        let any_routes = (config.protocols.contains(&Protocol::V2) && !v2_routes.is_empty())
            || (config.protocols.contains(&Protocol::V3) && !v3_routes.is_empty())
            || (config.protocols.contains(&Protocol::Stable) && !stable_routes.is_empty())
            || (config.protocols.contains(&Protocol::StableWrapper) && !stable_wrapper_routes.is_empty())
            || (config.protocols.contains(&Protocol::Mixed) && !mixed_routes.is_empty());
        if !any_routes {
            return Err(RouterError::NoRouteFound);
        }

        let reference_pools = self.build_reference_pools(&quote_token, config.gas_token.as_ref(), block).await;
        let gas_price_wei = self.gas_price.gas_price_wei().await.unwrap_or_default();
        let gas_model = GasModel::new(
            self.chain,
            gas_price_wei,
            config.additional_gas_overhead,
            native_wrapper.clone(),
            config.gas_token.clone(),
            reference_pools,
            std::collections::HashMap::new(),
        );

        let steps = config.distribution_steps();
        let fractions: Vec<(u8, Amount)> = (1..=steps)
            .map(|step| {
                let percent = (step * config.distribution_percent as usize) as u8;
                (percent, specified_amount.fraction(percent))
            })
            .collect();

        let (v2_q, v3_q, stable_q, wrapper_q, mixed_q) = tokio::join!(
            self.quote_and_adjust(&v2_routes, trade_type, &fractions, block, &quote_token, &gas_model),
            self.quote_and_adjust(&v3_routes, trade_type, &fractions, block, &quote_token, &gas_model),
            self.quote_and_adjust(&stable_routes, trade_type, &fractions, block, &quote_token, &gas_model),
            self.quote_and_adjust(&stable_wrapper_routes, trade_type, &fractions, block, &quote_token, &gas_model),
            self.quote_and_adjust(&mixed_routes, trade_type, &fractions, block, &quote_token, &gas_model),
        );

        let mut combined = Vec::new();
        if config.protocols.contains(&Protocol::V2) {
            combined.extend(v2_q);
        }
        if config.protocols.contains(&Protocol::V3) {
            combined.extend(v3_q);
        }
        if config.protocols.contains(&Protocol::Stable) {
            combined.extend(stable_q);
        }
        if config.protocols.contains(&Protocol::StableWrapper) {
            combined.extend(wrapper_q);
        }
        if config.protocols.contains(&Protocol::Mixed) {
            combined.extend(mixed_q);
        }

        let Some(split) = solvers::optimize(combined, trade_type, Currency::Token(quote_token.clone()), &config)
        else {
            return Ok(None);
        };

        let calldata = self.calldata_encoder.encode(&split.routes, trade_type, &swap_config);

        let (gas_use_estimate_usd, gas_use_estimate_quote_token, quote_gas_adjusted) = self
            .apply_l1_fee(
                &calldata,
                &gas_model,
                &quote_token,
                trade_type,
                split.gas_use_estimate_usd.clone(),
                split.gas_use_estimate_quote_token.clone(),
                split.quote_gas_adjusted.clone(),
            )
            .await;

        Ok(Some(Plan {
            trade_type,
            routes: split.routes,
            quote: split.quote,
            quote_gas_adjusted,
            gas_use_estimate: split.gas_use_estimate,
            gas_use_estimate_usd,
            gas_use_estimate_quote_token,
            block,
            calldata,
        }))
    }

    async fn quote_and_adjust(
        &self,
        routes: &[Route],
        trade_type: TradeType,
        fractions: &[(u8, Amount)],
        block: BlockId,
        quote_token: &Token,
        gas_model: &GasModel,
    ) -> Vec<RouteWithQuote> {
        if routes.is_empty() {
            return Vec::new();
        }
        let route_quotes = self.quote_fetcher.fetch_quotes(routes, trade_type, fractions, block).await;
        let mut out = Vec::new();
        for route_quote in route_quotes {
            for amount_quote in route_quote.amounts {
                let Some(result) = amount_quote.quote else {
                    continue;
                };
                let gas = gas_model.estimate(&route_quote.route, quote_token, result.initialized_ticks_crossed);
                let (amount_in, amount_out) = match trade_type {
                    TradeType::ExactInput => (amount_quote.amount, result.amount),
                    TradeType::ExactOutput => (result.amount, amount_quote.amount),
                };
                out.push(RouteWithQuote {
                    route: route_quote.route.clone(),
                    fraction_percent: amount_quote.fraction_percent,
                    amount_in,
                    amount_out,
                    gas,
                    sqrt_price_after_x96: result.sqrt_price_after_x96,
                    initialized_ticks_crossed: result.initialized_ticks_crossed,
                });
            }
        }
        out
    }

    /// Finds a live pool directly pairing `token_a` and `token_b`, trying V3
    /// before V2 — the same priority order the selector gives protocols with
    /// deeper, tighter-spread liquidity on most pairs.
    async fn locate_reference_pool(&self, token_a: &Token, token_b: &Token, block: BlockId) -> Option<model::Pool> {
        for (protocol, provider) in [
            (Protocol::V3, self.subgraph_v3.as_ref()),
            (Protocol::V2, self.subgraph_v2.as_ref()),
        ] {
            let universe = provider
                .list_pools(Some(token_a.address), Some(token_b.address), block)
                .await
                .ok()?;
            let pool_selection = model::PoolSelectionConfig::default();
            let blocked = routing::TokenList::default();
            let ctx = SelectionContext {
                token_in: token_a.address,
                token_out: token_b.address,
                trade_type: TradeType::ExactInput,
                config: &pool_selection,
                base_tokens: &[],
                native_wrapper: self.native_wrapper.address,
                blocked: &blocked,
            };
            let candidates = routing::select_for_protocol(&universe, protocol, &ctx);
            if candidates.is_empty() {
                continue;
            }
            let mut tokens = std::collections::HashMap::new();
            tokens.insert(token_a.address, token_a.clone());
            tokens.insert(token_b.address, token_b.clone());
            let requests = routing::to_pool_requests(&candidates, &tokens);
            if let Some(pool) = self.pool_metadata.fetch(requests, block).await.into_iter().next() {
                return Some(pool);
            }
        }
        None
    }

    async fn build_reference_pools(&self, quote_token: &Token, gas_token: Option<&Token>, block: BlockId) -> ReferencePools {
        let usd_token = token_list::seed_tokens(self.chain)
            .into_iter()
            .find(|t| t.symbol.as_deref() == Some("USDC"));
        let usd_pool = match &usd_token {
            Some(usd) if usd.identity() != self.native_wrapper.identity() => {
                self.locate_reference_pool(&self.native_wrapper, usd, block).await
            }
            _ => None,
        };
        let native_and_quote_token_pool = if quote_token.identity() == self.native_wrapper.identity() {
            None
        } else {
            self.locate_reference_pool(&self.native_wrapper, quote_token, block).await
        };
        let native_and_gas_token_pool = match gas_token {
            Some(gas_token) if gas_token.identity() != self.native_wrapper.identity() => {
                self.locate_reference_pool(&self.native_wrapper, gas_token, block).await
            }
            _ => None,
        };
        ReferencePools {
            usd_pool,
            usd_token,
            native_and_quote_token_pool,
            native_and_gas_token_pool,
        }
    }

    /// Rollup chains charge an L1 data-availability fee on top of execution
    /// gas (§4.9). Recomputed once against the winning plan's real calldata,
    /// since it depends on encoded byte length rather than route shape.
    #[allow(clippy::too_many_arguments)]
    async fn apply_l1_fee(
        &self,
        calldata: &[u8],
        gas_model: &GasModel,
        quote_token: &Token,
        trade_type: TradeType,
        gas_use_estimate_usd: Amount,
        gas_use_estimate_quote_token: Amount,
        quote_gas_adjusted: Amount,
    ) -> (Amount, Amount, Amount) {
        if !self.chain.has_l1_fee() {
            return (gas_use_estimate_usd, gas_use_estimate_quote_token, quote_gas_adjusted);
        }
        let Some(l1_gas_data_provider) = &self.l1_gas_data else {
            return (gas_use_estimate_usd, gas_use_estimate_quote_token, quote_gas_adjusted);
        };
        let Some(l1_gas_data) = l1_gas_data_provider.fetch().await else {
            return (gas_use_estimate_usd, gas_use_estimate_quote_token, quote_gas_adjusted);
        };
        let l1_fee_wei = self.l1_fee_estimator.estimate(calldata, &l1_gas_data);
        let l1_cost_native = Amount::from_raw(Currency::Native(self.chain), l1_fee_wei);
        let reference = gas_model.reference_pools();

        let l1_cost_usd = convert_native_cost(&l1_cost_native, reference.usd_pool.as_ref(), gas_model.native_wrapper(), reference.usd_token.as_ref())
            .unwrap_or_else(|| Amount::zero(gas_use_estimate_usd.currency.clone()));
        let l1_cost_quote = convert_native_cost(
            &l1_cost_native,
            reference.native_and_quote_token_pool.as_ref(),
            gas_model.native_wrapper(),
            Some(quote_token),
        )
        .unwrap_or_else(|| Amount::zero(Currency::Token(quote_token.clone())));

        let usd_total = gas_use_estimate_usd
            .checked_add(&l1_cost_usd)
            .unwrap_or(gas_use_estimate_usd);
        let quote_total = gas_use_estimate_quote_token
            .checked_add(&l1_cost_quote)
            .unwrap_or(gas_use_estimate_quote_token);
        let adjusted = match trade_type {
            TradeType::ExactInput => quote_gas_adjusted
                .checked_sub(&l1_cost_quote)
                .unwrap_or(quote_gas_adjusted),
            TradeType::ExactOutput => quote_gas_adjusted
                .checked_add(&l1_cost_quote)
                .unwrap_or(quote_gas_adjusted),
        };
        (usd_total, quote_total, adjusted)
    }
}

fn amount_side_token(
    trade_type: TradeType,
    amount_currency: &Currency,
    quote_currency: &Currency,
    native_wrapper: &Token,
    want_input_side: bool,
) -> Token {
    let is_input = matches!(trade_type, TradeType::ExactInput);
    let currency = if is_input == want_input_side { amount_currency } else { quote_currency };
    currency.wrapped(|_| native_wrapper.clone())
}

async fn fetch_universe(
    needed: bool,
    provider: &dyn SubgraphProvider,
    block: BlockId,
) -> Result<Vec<model::SubgraphPool>, RouterError> {
    if !needed {
        return Ok(Vec::new());
    }
    provider.list_pools(None, None, block).await.map_err(RouterError::from)
}

fn first_err(
    a: Result<Vec<model::SubgraphPool>, RouterError>,
    b: Result<Vec<model::SubgraphPool>, RouterError>,
    c: Result<Vec<model::SubgraphPool>, RouterError>,
) -> RouterError {
    a.err().or_else(|| b.err()).or_else(|| c.err()).unwrap_or(RouterError::NoRouteFound)
}

fn enumerate_for(
    pools: &[model::Pool],
    token_in: &Token,
    token_out: &Token,
    max_swaps_per_path: usize,
    protocol: Protocol,
) -> Vec<Route> {
    routing::enumerate_routes(pools, token_in, token_out, max_swaps_per_path)
        .into_iter()
        .filter(|route| route.protocol() == protocol)
        .collect()
}

fn convert_native_cost(
    native_cost: &Amount,
    pool: Option<&model::Pool>,
    native: &Token,
    to_token: Option<&Token>,
) -> Option<Amount> {
    let pool = pool?;
    let to_token = to_token?;
    let ratio = gas::mid_price(pool, native, to_token)?;
    Some(Amount::new(Currency::Token(to_token.clone()), &native_cost.value * ratio))
}
