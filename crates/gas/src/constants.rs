use model::ChainId;

/// Fixed execution-gas cost for one protocol's swap on one chain: a base
/// cost plus a per-hop increment.
#[derive(Debug, Clone, Copy)]
pub struct ProtocolGasConstants {
    pub base_swap_cost: u64,
    pub cost_per_hop: u64,
}

/// Per-chain table of `ProtocolGasConstants`, plus the V3-only
/// per-initialized-tick increment (§4.8). Values are heuristic approximations
/// of typical mainnet/L2 swap execution costs, not measured per-deployment.
#[derive(Debug, Clone, Copy)]
pub struct ChainGasConstants {
    pub v2: ProtocolGasConstants,
    pub v3: ProtocolGasConstants,
    pub cost_per_init_tick: u64,
    pub stable: ProtocolGasConstants,
    pub stable_wrapper: ProtocolGasConstants,
}

const MAINNET: ChainGasConstants = ChainGasConstants {
    v2: ProtocolGasConstants {
        base_swap_cost: 120_000,
        cost_per_hop: 40_000,
    },
    v3: ProtocolGasConstants {
        base_swap_cost: 130_000,
        cost_per_hop: 60_000,
    },
    cost_per_init_tick: 22_000,
    stable: ProtocolGasConstants {
        base_swap_cost: 150_000,
        cost_per_hop: 70_000,
    },
    stable_wrapper: ProtocolGasConstants {
        base_swap_cost: 80_000,
        cost_per_hop: 30_000,
    },
};

const OPTIMISM: ChainGasConstants = ChainGasConstants {
    v2: ProtocolGasConstants {
        base_swap_cost: 110_000,
        cost_per_hop: 35_000,
    },
    v3: ProtocolGasConstants {
        base_swap_cost: 115_000,
        cost_per_hop: 50_000,
    },
    cost_per_init_tick: 18_000,
    stable: ProtocolGasConstants {
        base_swap_cost: 130_000,
        cost_per_hop: 60_000,
    },
    stable_wrapper: ProtocolGasConstants {
        base_swap_cost: 70_000,
        cost_per_hop: 25_000,
    },
};

// Arbitrum's L2 execution gas units run substantially higher than an
// Optimism-style chain's for the same opcode trace; this is separate from,
// and charged in addition to, the L1 data-fee supplement in `l1_fee.rs`.
const ARBITRUM_ONE: ChainGasConstants = ChainGasConstants {
    v2: ProtocolGasConstants {
        base_swap_cost: 400_000,
        cost_per_hop: 120_000,
    },
    v3: ProtocolGasConstants {
        base_swap_cost: 450_000,
        cost_per_hop: 180_000,
    },
    cost_per_init_tick: 40_000,
    stable: ProtocolGasConstants {
        base_swap_cost: 500_000,
        cost_per_hop: 220_000,
    },
    stable_wrapper: ProtocolGasConstants {
        base_swap_cost: 250_000,
        cost_per_hop: 90_000,
    },
};

pub fn constants_for_chain(chain: ChainId) -> ChainGasConstants {
    match chain {
        ChainId::OPTIMISM => OPTIMISM,
        ChainId::ARBITRUM_ONE => ARBITRUM_ONE,
        _ => MAINNET,
    }
}
