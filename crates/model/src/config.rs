use crate::{chain::BlockId, currency::Token, pool::Protocol};
use primitive_types::H160;
use std::collections::{HashMap, HashSet};

/// Per-protocol candidate-pool bucket caps (§4.5). Defaults mirror the
/// upstream router's defaults for mainnet-scale pool universes.
#[derive(Debug, Clone)]
pub struct PoolSelectionConfig {
    pub top_n_with_each_base_token: usize,
    pub top_n_with_base_token: usize,
    pub top_n_direct_swaps: usize,
    pub top_n: usize,
    pub top_n_token_in_out: usize,
    pub top_n_second_hop: usize,
    pub top_n_second_hop_for_token: HashMap<H160, usize>,
    pub tokens_to_avoid_on_second_hops: HashSet<H160>,
}

impl Default for PoolSelectionConfig {
    fn default() -> Self {
        Self {
            top_n_with_each_base_token: 3,
            top_n_with_base_token: 10,
            top_n_direct_swaps: 2,
            top_n: 2,
            top_n_token_in_out: 2,
            top_n_second_hop: 2,
            top_n_second_hop_for_token: HashMap::new(),
            tokens_to_avoid_on_second_hops: HashSet::new(),
        }
    }
}

/// User-tunable knobs for a single `route(...)` call (§6 RoutingConfig).
#[derive(Debug, Clone)]
pub struct RoutingConfig {
    pub block_number: BlockId,
    pub v2_pool_selection: PoolSelectionConfig,
    pub v3_pool_selection: PoolSelectionConfig,
    pub stable_pool_selection: PoolSelectionConfig,
    pub max_swaps_per_path: usize,
    pub min_splits: usize,
    pub max_splits: usize,
    pub distribution_percent: u8,
    pub force_cross_protocol: bool,
    pub protocols: HashSet<Protocol>,
    pub additional_gas_overhead: u64,
    pub gas_token: Option<Token>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            block_number: BlockId::Latest,
            v2_pool_selection: PoolSelectionConfig::default(),
            v3_pool_selection: PoolSelectionConfig::default(),
            stable_pool_selection: PoolSelectionConfig::default(),
            max_swaps_per_path: 5,
            min_splits: 1,
            max_splits: 7,
            distribution_percent: 5,
            force_cross_protocol: false,
            protocols: [Protocol::V2, Protocol::V3, Protocol::Stable, Protocol::StableWrapper, Protocol::Mixed]
                .into_iter()
                .collect(),
            additional_gas_overhead: 0,
            gas_token: None,
        }
    }
}

impl RoutingConfig {
    pub fn distribution_steps(&self) -> usize {
        100 / self.distribution_percent.max(1) as usize
    }
}

/// Swap-router version accepted by the downstream call-data SDK seam.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapRouterVersion {
    V2,
    V3,
}

/// Consumed only by the downstream call-data SDK seam (`CalldataEncoder`);
/// the router core reads nothing from this struct itself.
#[derive(Debug, Clone)]
pub struct SwapConfig {
    pub recipient: H160,
    pub slippage_tolerance_bps: u32,
    pub deadline_seconds: u64,
    pub swap_router_version: SwapRouterVersion,
    pub permit_data: Option<Vec<u8>>,
}

impl Default for SwapConfig {
    fn default() -> Self {
        Self {
            recipient: H160::zero(),
            slippage_tolerance_bps: 50,
            deadline_seconds: 1_800,
            swap_router_version: SwapRouterVersion::V3,
            permit_data: None,
        }
    }
}
