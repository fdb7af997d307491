use crate::{chain::ChainId, currency::Token};
use primitive_types::{H160, H256, U256};
use sha3::{Digest, Keccak256};
use std::fmt;

/// Concentrated-liquidity fee tiers. Variants carry their basis-point value
/// directly rather than looking it up from a side table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FeeTier {
    Lowest,
    Low,
    Medium,
    High,
}

impl FeeTier {
    pub const ALL: [FeeTier; 4] = [FeeTier::Lowest, FeeTier::Low, FeeTier::Medium, FeeTier::High];

    pub fn bps(self) -> u32 {
        match self {
            FeeTier::Lowest => 1,
            FeeTier::Low => 5,
            FeeTier::Medium => 30,
            FeeTier::High => 100,
        }
    }

    /// Fee denominated in hundredths of a basis point, the unit concentrated
    /// liquidity pools use on-chain (100 = 0.01%, 10_000 = 1%).
    pub fn pips(self) -> u32 {
        match self {
            FeeTier::Lowest => 100,
            FeeTier::Low => 500,
            FeeTier::Medium => 3_000,
            FeeTier::High => 10_000,
        }
    }
}

/// A protocol-qualified identity for a pool: an address for V2/V3 pools, a
/// 32-byte pool id for Stable pools and their wrappers (matching how the
/// upstream vault addresses stable pools).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoolAddress {
    Address(H160),
    PoolId(H256),
}

impl fmt::Display for PoolAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolAddress::Address(a) => write!(f, "{a:#x}"),
            PoolAddress::PoolId(id) => write!(f, "{id:#x}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    V2,
    V3,
    Stable,
    StableWrapper,
    Mixed,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Protocol::V2 => "V2",
            Protocol::V3 => "V3",
            Protocol::Stable => "Stable",
            Protocol::StableWrapper => "StableWrapper",
            Protocol::Mixed => "Mixed",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone)]
pub struct V3Pool {
    pub chain: ChainId,
    pub address: H160,
    pub token0: Token,
    pub token1: Token,
    pub fee: FeeTier,
    pub liquidity: u128,
    /// `slot0().sqrtPriceX96`: the pool's current price, as the square root
    /// of token1-per-token0 in Q64.96 fixed point. Used by the gas model to
    /// convert a reference pool's mid price without simulating a swap.
    pub sqrt_price_x96: U256,
}

#[derive(Debug, Clone)]
pub struct V2Pool {
    pub chain: ChainId,
    pub address: H160,
    pub token0: Token,
    pub token1: Token,
    pub reserve0: U256,
    pub reserve1: U256,
}

#[derive(Debug, Clone)]
pub struct StablePool {
    pub chain: ChainId,
    pub id: H256,
    pub tokens: Vec<Token>,
    pub amplification_parameter: U256,
    pub swap_fee_bps: u32,
    pub total_shares: U256,
    pub balances: Vec<U256>,
    /// Per-token scaling factors applied before the invariant math (18
    /// decimals of precision, matching the upstream vault convention).
    pub scaling_factors: Vec<U256>,
}

#[derive(Debug, Clone)]
pub struct StableWrapperPool {
    pub chain: ChainId,
    /// The stable pool whose share token this wrapper exposes.
    pub underlying: H256,
    pub share_token: Token,
    pub vault_token: Token,
    /// Rate of one vault-token unit in share-token units, 18-decimal fixed
    /// point, as reported by the wrapper contract.
    pub rate: U256,
}

impl StableWrapperPool {
    /// Identity distinct from the underlying stable pool's own id, so a
    /// route can hop through a stable pool's share token and then its
    /// wrapper into the vault token without the two edges colliding as the
    /// same pool under `Route`'s no-repeat check.
    pub fn id(&self) -> H256 {
        let mut input = Vec::with_capacity(32 + 20);
        input.extend_from_slice(self.underlying.as_bytes());
        input.extend_from_slice(self.vault_token.address.as_bytes());
        H256::from_slice(&Keccak256::digest(&input))
    }
}

/// The pool sum-type. Dispatch is by `match`, never type erasure.
#[derive(Debug, Clone)]
pub enum Pool {
    V3(V3Pool),
    V2(V2Pool),
    Stable(StablePool),
    StableWrapper(StableWrapperPool),
}

impl Pool {
    pub fn tokens(&self) -> Vec<&Token> {
        match self {
            Pool::V3(p) => vec![&p.token0, &p.token1],
            Pool::V2(p) => vec![&p.token0, &p.token1],
            Pool::Stable(p) => p.tokens.iter().collect(),
            Pool::StableWrapper(p) => vec![&p.share_token, &p.vault_token],
        }
    }

    pub fn involves_token(&self, token: &Token) -> bool {
        self.tokens().iter().any(|t| *t == token)
    }

    /// Given one side of a two-token hop, returns the other side. For Stable
    /// pools with more than two tokens this is ambiguous and returns `None`
    /// — multi-asset stable hops are expressed as a direct edge between the
    /// two tokens actually used, resolved by the route enumerator, not here.
    pub fn other(&self, token: &Token) -> Option<&Token> {
        match self {
            Pool::V3(p) => {
                if &p.token0 == token {
                    Some(&p.token1)
                } else if &p.token1 == token {
                    Some(&p.token0)
                } else {
                    None
                }
            }
            Pool::V2(p) => {
                if &p.token0 == token {
                    Some(&p.token1)
                } else if &p.token1 == token {
                    Some(&p.token0)
                } else {
                    None
                }
            }
            Pool::Stable(p) => {
                if p.tokens.len() == 2 {
                    if &p.tokens[0] == token {
                        Some(&p.tokens[1])
                    } else if &p.tokens[1] == token {
                        Some(&p.tokens[0])
                    } else {
                        None
                    }
                } else {
                    None
                }
            }
            Pool::StableWrapper(p) => {
                if &p.share_token == token {
                    Some(&p.vault_token)
                } else if &p.vault_token == token {
                    Some(&p.share_token)
                } else {
                    None
                }
            }
        }
    }

    pub fn address(&self) -> PoolAddress {
        match self {
            Pool::V3(p) => PoolAddress::Address(p.address),
            Pool::V2(p) => PoolAddress::Address(p.address),
            Pool::Stable(p) => PoolAddress::PoolId(p.id),
            Pool::StableWrapper(p) => PoolAddress::PoolId(p.id()),
        }
    }

    pub fn protocol(&self) -> Protocol {
        match self {
            Pool::V3(_) => Protocol::V3,
            Pool::V2(_) => Protocol::V2,
            Pool::Stable(_) => Protocol::Stable,
            Pool::StableWrapper(_) => Protocol::StableWrapper,
        }
    }

    pub fn chain(&self) -> ChainId {
        match self {
            Pool::V3(p) => p.chain,
            Pool::V2(p) => p.chain,
            Pool::Stable(p) => p.chain,
            Pool::StableWrapper(p) => p.chain,
        }
    }
}

impl V2Pool {
    /// Enforces the `token0 < token1` lexicographic invariant, swapping
    /// reserves along with the tokens if the caller passed them reversed.
    pub fn canonical(
        chain: ChainId,
        address: H160,
        mut token0: Token,
        mut token1: Token,
        mut reserve0: U256,
        mut reserve1: U256,
    ) -> Self {
        if token0.address > token1.address {
            std::mem::swap(&mut token0, &mut token1);
            std::mem::swap(&mut reserve0, &mut reserve1);
        }
        Self {
            chain,
            address,
            token0,
            token1,
            reserve0,
            reserve1,
        }
    }
}

impl V3Pool {
    /// `sqrt_price_x96` is assumed already expressed against the sorted
    /// `(token0, token1)` pair, matching how `slot0()` reports it on-chain;
    /// callers that derive the pool address via `derive_v3_pool_address`
    /// (which sorts first) never hit the defensive swap below.
    pub fn canonical(
        chain: ChainId,
        address: H160,
        mut token0: Token,
        mut token1: Token,
        fee: FeeTier,
        liquidity: u128,
        sqrt_price_x96: U256,
    ) -> Self {
        if token0.address > token1.address {
            std::mem::swap(&mut token0, &mut token1);
        }
        Self {
            chain,
            address,
            token0,
            token1,
            fee,
            liquidity,
            sqrt_price_x96,
        }
    }
}
