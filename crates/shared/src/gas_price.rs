use async_trait::async_trait;
use primitive_types::U256;

/// Current gas price in wei, read once per router invocation and threaded
/// through the gas model (§4.8) — the same cadence and seam shape as
/// `gas::L1GasDataProvider`, just for the base execution-gas price instead
/// of the rollup L1 supplement.
#[async_trait]
pub trait GasPriceProvider: Send + Sync {
    async fn gas_price_wei(&self) -> Option<U256>;
}

/// A provider that always reports a fixed value. Useful for tests and for
/// chains where no live gas-price oracle is configured.
pub struct FixedGasPrice(pub U256);

#[async_trait]
impl GasPriceProvider for FixedGasPrice {
    async fn gas_price_wei(&self) -> Option<U256> {
        Some(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixed_gas_price_is_stable() {
        let provider = FixedGasPrice(U256::from(50_000_000_000u64));
        assert_eq!(provider.gas_price_wei().await, Some(U256::from(50_000_000_000u64)));
    }
}
