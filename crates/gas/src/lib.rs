//! Heuristic per-route gas model (C8): base execution-gas cost per protocol
//! and chain, converted into quote-token/USD/gas-token units via a reference
//! pool's mid price, never via a swap simulation. The L1 data-fee supplement
//! for rollup chains is a separate seam applied once, after the split
//! optimizer (C9) has already picked the winning plan.

mod constants;
mod l1_fee;
mod model;
mod price;

pub use constants::{ChainGasConstants, ProtocolGasConstants};
pub use l1_fee::{L1DataFeeEstimator, L1GasData, L1GasDataProvider, NoL1Fee, OptimismStyleL1FeeEstimator};
pub use model::{GasModel, ReferencePools};
pub use price::mid_price;
