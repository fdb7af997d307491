use primitive_types::H160;
use std::collections::HashSet;

/// Whether a token is safe to route through. Keeps only the static
/// deny-list implementation — trace-based detection is a downstream
/// concern that stays out of scope here.
pub trait BadTokenDetecting: Send + Sync {
    fn is_bad(&self, token: H160) -> bool;
}

/// Static deny-list implementation, exposed to the candidate selector as
/// `bad_token::TokenList`.
#[derive(Debug, Clone, Default)]
pub struct TokenList {
    denied: HashSet<H160>,
}

impl TokenList {
    pub fn new(denied: HashSet<H160>) -> Self {
        Self { denied }
    }
}

impl BadTokenDetecting for TokenList {
    fn is_bad(&self, token: H160) -> bool {
        self.denied.contains(&token)
    }
}
