use std::{fmt, str::FromStr};

/// Identifies an EVM-compatible chain. Plain newtype — the set of chains the
/// router actually serves is enforced by the orchestrator, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct ChainId(pub u64);

impl ChainId {
    pub const MAINNET: ChainId = ChainId(1);
    pub const SEPOLIA: ChainId = ChainId(11155111);
    pub const OPTIMISM: ChainId = ChainId(10);
    pub const ARBITRUM_ONE: ChainId = ChainId(42161);

    /// Chains whose transactions are charged an additional L1 data-posting
    /// fee on top of L2 execution gas.
    pub fn has_l1_fee(self) -> bool {
        matches!(self, ChainId::OPTIMISM | ChainId::ARBITRUM_ONE)
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ChainId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(ChainId)
    }
}

impl From<u64> for ChainId {
    fn from(value: u64) -> Self {
        ChainId(value)
    }
}

/// A block reference used to pin reads for determinism, or `Latest` to read
/// whatever the node currently reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockId {
    Latest,
    Number(u64),
}

impl BlockId {
    pub fn pinned(self) -> Option<u64> {
        match self {
            BlockId::Latest => None,
            BlockId::Number(n) => Some(n),
        }
    }
}

impl Default for BlockId {
    fn default() -> Self {
        BlockId::Latest
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockId::Latest => write!(f, "latest"),
            BlockId::Number(n) => write!(f, "{n}"),
        }
    }
}
