use model::{FeeTier, Token};
use primitive_types::H256;

/// What the caller already knows about a pool before fetching its live
/// state — token identities come from subgraph data or an optimistic
/// synthetic descriptor (§4.2); only the mutable on-chain fields (reserves,
/// liquidity, balances, ...) are fetched here.
#[derive(Debug, Clone)]
pub enum PoolRequest {
    V3 {
        token0: Token,
        token1: Token,
        fee: FeeTier,
    },
    V2 {
        token0: Token,
        token1: Token,
    },
    Stable {
        id: H256,
        tokens: Vec<Token>,
        wrapper: Option<Token>,
    },
}
