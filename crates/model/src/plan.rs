use crate::{
    amount::Amount,
    chain::BlockId,
    quote::{RouteWithQuote, TradeType},
};
use primitive_types::U256;

/// The final result of a routing invocation: a set of sub-routes whose
/// fractions sum to exactly 100, plus aggregate quote and gas accounting and
/// the opaque call-data a caller submits on-chain.
#[derive(Debug, Clone)]
pub struct Plan {
    pub trade_type: TradeType,
    pub routes: Vec<RouteWithQuote>,
    pub quote: Amount,
    pub quote_gas_adjusted: Amount,
    pub gas_use_estimate: U256,
    pub gas_use_estimate_usd: Amount,
    pub gas_use_estimate_quote_token: Amount,
    pub block: BlockId,
    pub calldata: Vec<u8>,
}

impl Plan {
    /// Fraction-closure check from the testable-properties list: splits sum
    /// to exactly 100 and each fraction is positive.
    pub fn fractions_are_closed(&self) -> bool {
        let sum: u32 = self.routes.iter().map(|r| r.fraction_percent as u32).sum();
        sum == 100 && self.routes.iter().all(|r| r.fraction_percent > 0)
    }

    pub fn split_count(&self) -> usize {
        self.routes.len()
    }
}
