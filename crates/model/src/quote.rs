use crate::{amount::Amount, route::Route};
use primitive_types::U256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeType {
    ExactInput,
    ExactOutput,
}

/// Per-route gas accounting, produced by the gas model (C8) and merged onto
/// a route's quote before the split optimizer sees it.
#[derive(Debug, Clone)]
pub struct GasEstimate {
    pub gas_use_estimate: U256,
    pub cost_in_quote_token: Amount,
    pub cost_in_usd: Amount,
    pub cost_in_gas_token: Option<Amount>,
}

/// A route carrying a fraction of the overall trade, plus its on-chain quote
/// and gas accounting. `fraction_percent` is always a multiple of the
/// configured `distributionPercent`.
#[derive(Debug, Clone)]
pub struct RouteWithQuote {
    pub route: Route,
    pub fraction_percent: u8,
    pub amount_in: Amount,
    pub amount_out: Amount,
    pub gas: GasEstimate,
    pub sqrt_price_after_x96: Option<Vec<U256>>,
    pub initialized_ticks_crossed: Option<u32>,
}

impl RouteWithQuote {
    /// The aggregate used as the optimization objective: `quote - gas` for
    /// exact-in (bigger is better), `quote + gas` for exact-out (smaller is
    /// better, since it represents input required).
    pub fn gas_adjusted_quote(&self, trade_type: TradeType, quote_token_side: &Amount) -> Amount {
        match trade_type {
            TradeType::ExactInput => quote_token_side
                .checked_sub(&self.gas.cost_in_quote_token)
                .unwrap_or_else(|| Amount::zero(quote_token_side.currency.clone())),
            TradeType::ExactOutput => quote_token_side
                .checked_add(&self.gas.cost_in_quote_token)
                .unwrap_or_else(|| quote_token_side.clone()),
        }
    }
}
