use crate::chain::ChainId;
use primitive_types::H160;
use std::{fmt, hash::Hash};

/// An ERC20-style token. Equality and hashing are by `(chain, address)` only
/// — decimals and symbol are metadata, not identity, matching the upstream
/// "equality is by (chain, lowercase-address)" rule (addresses here are
/// already canonical 20-byte values, so no case folding is needed).
#[derive(Debug, Clone)]
pub struct Token {
    pub chain: ChainId,
    pub address: H160,
    pub decimals: u8,
    pub symbol: Option<String>,
}

impl Token {
    pub fn new(chain: ChainId, address: H160, decimals: u8, symbol: Option<String>) -> Self {
        Self {
            chain,
            address,
            decimals,
            symbol,
        }
    }

    pub fn identity(&self) -> (ChainId, H160) {
        (self.chain, self.address)
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.symbol {
            Some(symbol) => write!(f, "{symbol}({:#x})", self.address),
            None => write!(f, "{:#x}", self.address),
        }
    }
}

/// Either the chain's native asset or an ERC20 token. The router performs all
/// internal math on wrapped tokens; `Currency::Native` only appears at the
/// edges of a request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Currency {
    Native(ChainId),
    Token(Token),
}

impl Currency {
    pub fn chain(&self) -> ChainId {
        match self {
            Currency::Native(chain) => *chain,
            Currency::Token(token) => token.chain,
        }
    }

    pub fn is_native(&self) -> bool {
        matches!(self, Currency::Native(_))
    }

    /// The token this currency should be treated as for internal routing
    /// math: native currencies are represented by their chain's wrapped
    /// twin.
    pub fn wrapped(&self, native_wrapper: impl Fn(ChainId) -> Token) -> Token {
        match self {
            Currency::Native(chain) => native_wrapper(*chain),
            Currency::Token(token) => token.clone(),
        }
    }

    pub fn as_token(&self) -> Option<&Token> {
        match self {
            Currency::Native(_) => None,
            Currency::Token(token) => Some(token),
        }
    }
}

impl From<Token> for Currency {
    fn from(token: Token) -> Self {
        Currency::Token(token)
    }
}
