use model::{Amount, Route};
use primitive_types::U256;

/// The result of a single successful on-chain quote call for one route at
/// one fraction of the trade amount.
#[derive(Debug, Clone)]
pub struct RouteQuoteResult {
    /// The opposite side of `amount`: the output for exact-in, the required
    /// input for exact-out.
    pub amount: Amount,
    /// V3-only: sqrt price immediately after the swap, one entry per hop.
    pub sqrt_price_after_x96: Option<Vec<U256>>,
    /// V3-only: total initialized ticks crossed across all hops.
    pub initialized_ticks_crossed: Option<u32>,
}

/// One (route, fraction) pair: the trade-amount fraction quoted, and either
/// the quoter's result or `None` if the on-chain call reverted (§4.7).
#[derive(Debug, Clone)]
pub struct AmountQuote {
    pub fraction_percent: u8,
    pub amount: Amount,
    pub quote: Option<RouteQuoteResult>,
}

/// A route together with its quote at every requested fraction step.
#[derive(Debug, Clone)]
pub struct RouteQuotes {
    pub route: Route,
    pub amounts: Vec<AmountQuote>,
}
