use crate::pool::{FeeTier, PoolAddress};
use primitive_types::{H160, U256};

/// A minimal pool descriptor as reported by a subgraph provider (C3). Used
/// only for candidate selection — never for swap math, which always goes
/// through freshly fetched on-chain state (C2).
#[derive(Debug, Clone)]
pub struct SubgraphPool {
    pub id: PoolAddress,
    pub tokens: Vec<H160>,
    pub tvl_native: f64,
    pub tvl_usd: f64,
    pub extra: SubgraphPoolExtra,
}

#[derive(Debug, Clone)]
pub enum SubgraphPoolExtra {
    V3 { fee: FeeTier },
    V2 { reserve: U256 },
    Stable {
        total_shares: U256,
        tokens_list: Vec<H160>,
        wrapper: Option<H160>,
    },
}

impl SubgraphPool {
    pub fn involves(&self, token: H160) -> bool {
        self.tokens.contains(&token)
    }

    /// The stable wrapper's token, if this descriptor carries one — used by
    /// the candidate selector's Stable bucket rule (§4.5, §9 open question).
    pub fn wrapper(&self) -> Option<H160> {
        match &self.extra {
            SubgraphPoolExtra::Stable { wrapper, .. } => *wrapper,
            _ => None,
        }
    }

    /// A synthetic placeholder for "this pool might exist on-chain but the
    /// subgraph has never indexed it" — emitted when a direct-swap bucket
    /// comes up empty for V2/V3 (§4.5 `topByDirectSwapPool`).
    pub fn optimistic_v3(token0: H160, token1: H160, fee: FeeTier) -> Self {
        let (token0, token1) = if token0 < token1 {
            (token0, token1)
        } else {
            (token1, token0)
        };
        Self {
            id: PoolAddress::Address(H160::zero()),
            tokens: vec![token0, token1],
            tvl_native: 0.0,
            tvl_usd: 0.0,
            extra: SubgraphPoolExtra::V3 { fee },
        }
    }

    pub fn optimistic_v2(token0: H160, token1: H160) -> Self {
        let (token0, token1) = if token0 < token1 {
            (token0, token1)
        } else {
            (token1, token0)
        };
        Self {
            id: PoolAddress::Address(H160::zero()),
            tokens: vec![token0, token1],
            tvl_native: 0.0,
            tvl_usd: 0.0,
            extra: SubgraphPoolExtra::V2 {
                reserve: U256::zero(),
            },
        }
    }

    pub fn is_optimistic(&self) -> bool {
        matches!(self.id, PoolAddress::Address(addr) if addr == H160::zero())
    }
}
