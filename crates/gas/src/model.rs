use crate::constants::{constants_for_chain, ChainGasConstants, ProtocolGasConstants};
use crate::price::mid_price;
use model::{Amount, ChainId, Currency, GasEstimate, Pool, Protocol, Route, Token};
use primitive_types::{H160, U256};
use quoting::{same_protocol_sections, Section};
use std::collections::{HashMap, HashSet};

/// The three reference pools the gas model converts a native-currency cost
/// through (§4.8). All three are located by the selector (C5) during
/// candidate-pool selection and threaded through here by the orchestrator
/// (C10); any of them can be absent, in which case that conversion comes
/// back as zero and the route still participates in selection with no gas
/// adjustment in that unit.
#[derive(Debug, Clone, Default)]
pub struct ReferencePools {
    pub usd_pool: Option<Pool>,
    pub usd_token: Option<Token>,
    pub native_and_quote_token_pool: Option<Pool>,
    pub native_and_gas_token_pool: Option<Pool>,
}

/// Converts an execution-gas unit count into `{gasEstimate,
/// gasCostInQuoteToken, gasCostInUSD, gasCostInGasToken?}` for one route.
/// Heuristic and chain-scoped: base costs come from `constants.rs`, unit
/// conversion comes from `price::mid_price` against the caller-supplied
/// reference pools. Holds no RPC transport of its own — every number it
/// needs (`gas_price_wei`, reference pool state) is already resolved by the
/// time the orchestrator constructs one.
pub struct GasModel {
    chain: ChainId,
    gas_price_wei: U256,
    additional_gas_overhead: u64,
    native_wrapper: Token,
    gas_token: Option<Token>,
    reference_pools: ReferencePools,
    token_overhead: HashMap<H160, u64>,
    constants: ChainGasConstants,
}

impl GasModel {
    pub fn new(
        chain: ChainId,
        gas_price_wei: U256,
        additional_gas_overhead: u64,
        native_wrapper: Token,
        gas_token: Option<Token>,
        reference_pools: ReferencePools,
        token_overhead: HashMap<H160, u64>,
    ) -> Self {
        Self {
            chain,
            gas_price_wei,
            additional_gas_overhead,
            native_wrapper,
            gas_token,
            reference_pools,
            token_overhead,
            constants: constants_for_chain(chain),
        }
    }

    /// `initialized_ticks_crossed` is the route-total V3 tick count C7
    /// already reported alongside the quote; `quote_token` is the trade's
    /// quote-token side, whatever protocol the route happens to be.
    pub fn estimate(&self, route: &Route, quote_token: &Token, initialized_ticks_crossed: Option<u32>) -> GasEstimate {
        let gas_units = self.gas_units(route, initialized_ticks_crossed) + self.additional_gas_overhead;
        let cost_wei = U256::from(gas_units).saturating_mul(self.gas_price_wei);
        let cost_native = Amount::from_raw(Currency::Native(self.chain), cost_wei);

        let cost_in_usd = self
            .convert(&cost_native, self.reference_pools.usd_pool.as_ref(), self.reference_pools.usd_token.as_ref())
            .unwrap_or_else(|| Amount::zero(Currency::Native(self.chain)));

        let cost_in_quote_token = self
            .convert(&cost_native, self.reference_pools.native_and_quote_token_pool.as_ref(), Some(quote_token))
            .unwrap_or_else(|| Amount::zero(Currency::Token(quote_token.clone())));

        let cost_in_gas_token = self.gas_token.as_ref().map(|gas_token| {
            if gas_token.identity() == self.native_wrapper.identity() {
                Amount::new(Currency::Token(gas_token.clone()), cost_native.value.clone())
            } else {
                self.convert(&cost_native, self.reference_pools.native_and_gas_token_pool.as_ref(), Some(gas_token))
                    .unwrap_or_else(|| Amount::zero(Currency::Token(gas_token.clone())))
            }
        });

        GasEstimate {
            gas_use_estimate: U256::from(gas_units),
            cost_in_quote_token,
            cost_in_usd,
            cost_in_gas_token,
        }
    }

    /// Exposed so the orchestrator can re-run the same native-cost
    /// conversion for the rollup L1 fee (§4.9), which is only known after
    /// this model (and the reference pools it was built with) already exist.
    pub fn reference_pools(&self) -> &ReferencePools {
        &self.reference_pools
    }

    pub fn native_wrapper(&self) -> &Token {
        &self.native_wrapper
    }

    fn convert(&self, cost_native: &Amount, pool: Option<&Pool>, to_token: Option<&Token>) -> Option<Amount> {
        let pool = pool?;
        let to_token = to_token?;
        let ratio = mid_price(pool, &self.native_wrapper, to_token)?;
        Some(Amount::new(Currency::Token(to_token.clone()), &cost_native.value * ratio))
    }

    fn gas_units(&self, route: &Route, initialized_ticks_crossed: Option<u32>) -> u64 {
        let base = match route.protocol() {
            Protocol::V2 => protocol_cost(&self.constants.v2, route.hops()),
            Protocol::V3 => protocol_cost(&self.constants.v3, route.hops()),
            Protocol::Stable => protocol_cost(&self.constants.stable, route.hops()) + self.token_overhead_for(route.pools()),
            Protocol::StableWrapper => protocol_cost(&self.constants.stable_wrapper, route.hops()),
            Protocol::Mixed => same_protocol_sections(route)
                .iter()
                .map(|section| self.section_base_cost(section, route))
                .sum(),
        };
        let crosses_v3 = matches!(route.protocol(), Protocol::V3 | Protocol::Mixed);
        let tick_cost = if crosses_v3 {
            self.constants.cost_per_init_tick * initialized_ticks_crossed.unwrap_or(0) as u64
        } else {
            0
        };
        base + tick_cost
    }

    fn section_base_cost(&self, section: &Section, route: &Route) -> u64 {
        let hops = section.end - section.start;
        let pools = &route.pools()[section.start..section.end];
        match section.protocol {
            Protocol::V2 => protocol_cost(&self.constants.v2, hops),
            Protocol::V3 => protocol_cost(&self.constants.v3, hops),
            Protocol::Stable => protocol_cost(&self.constants.stable, hops) + self.token_overhead_for(pools),
            Protocol::StableWrapper => protocol_cost(&self.constants.stable_wrapper, hops),
            Protocol::Mixed => 0,
        }
    }

    /// Additive per-token overhead (e.g. tokens that snapshot governance
    /// weight on transfer) for every distinct token touched once, matching
    /// how the upstream router charges this per token rather than per hop.
    fn token_overhead_for(&self, pools: &[Pool]) -> u64 {
        let mut seen = HashSet::new();
        let mut total = 0u64;
        for pool in pools {
            for token in pool.tokens() {
                if seen.insert(token.address) {
                    if let Some(overhead) = self.token_overhead.get(&token.address) {
                        total += overhead;
                    }
                }
            }
        }
        total
    }
}

fn protocol_cost(constants: &ProtocolGasConstants, hops: usize) -> u64 {
    constants.base_swap_cost + constants.cost_per_hop * hops as u64
}
