use model::{Amount, RouteWithQuote};
use primitive_types::U256;

/// The chosen split: a set of routes and fractions summing to 100, plus the
/// aggregate quote/gas accounting the orchestrator (C10) folds into the
/// final `model::Plan` alongside the block reference and calldata — neither
/// of which this crate touches.
#[derive(Debug, Clone)]
pub struct SplitResult {
    pub routes: Vec<RouteWithQuote>,
    pub quote: Amount,
    pub quote_gas_adjusted: Amount,
    pub gas_use_estimate: U256,
    pub gas_use_estimate_usd: Amount,
    pub gas_use_estimate_quote_token: Amount,
}
