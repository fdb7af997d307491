use async_trait::async_trait;
use primitive_types::U256;

/// L1 base fee and scalar for one rollup chain, read once per router
/// invocation — the same cadence as the gas-price provider, not per
/// candidate route (§4.8).
#[derive(Debug, Clone, Copy)]
pub struct L1GasData {
    pub l1_base_fee_wei: U256,
    pub scalar: U256,
    /// Decimal places `scalar` is fixed-point scaled by (OP-stack chains use
    /// 1e6).
    pub scalar_precision: u32,
}

#[async_trait]
pub trait L1GasDataProvider: Send + Sync {
    async fn fetch(&self) -> Option<L1GasData>;
}

/// Converts the winning plan's ABI-encoded calldata into an additional wei
/// cost. Applied exactly once, to the already-chosen plan, after C9 — never
/// per candidate route, since only the winning plan's calldata is final.
pub trait L1DataFeeEstimator: Send + Sync {
    fn estimate(&self, calldata: &[u8], l1_gas_data: &L1GasData) -> U256;
}

/// No rollup configured, or the chain doesn't charge an L1 data fee.
pub struct NoL1Fee;

impl L1DataFeeEstimator for NoL1Fee {
    fn estimate(&self, _calldata: &[u8], _l1_gas_data: &L1GasData) -> U256 {
        U256::zero()
    }
}

/// OP-stack-style calldata gas accounting: each zero byte costs 4 L1 gas,
/// each non-zero byte costs 16, scaled by the chain's posted `scalar` and
/// priced at `l1_base_fee_wei`.
pub struct OptimismStyleL1FeeEstimator;

impl L1DataFeeEstimator for OptimismStyleL1FeeEstimator {
    fn estimate(&self, calldata: &[u8], l1_gas_data: &L1GasData) -> U256 {
        let mut l1_gas_units = U256::zero();
        for byte in calldata {
            l1_gas_units += if *byte == 0 { U256::from(4u64) } else { U256::from(16u64) };
        }
        let scaled = l1_gas_units.saturating_mul(l1_gas_data.scalar) / U256::from(10u64).pow(U256::from(l1_gas_data.scalar_precision));
        scaled.saturating_mul(l1_gas_data.l1_base_fee_wei)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gas_data() -> L1GasData {
        L1GasData {
            l1_base_fee_wei: U256::from(20_000_000_000u64),
            scalar: U256::from(1_000_000u64),
            scalar_precision: 6,
        }
    }

    #[test]
    fn no_l1_fee_is_always_zero() {
        let fee = NoL1Fee.estimate(&[1, 2, 3], &gas_data());
        assert_eq!(fee, U256::zero());
    }

    #[test]
    fn non_zero_bytes_cost_more_than_zero_bytes() {
        let estimator = OptimismStyleL1FeeEstimator;
        let zero_heavy = estimator.estimate(&[0, 0, 0, 0], &gas_data());
        let non_zero_heavy = estimator.estimate(&[1, 2, 3, 4], &gas_data());
        assert!(non_zero_heavy > zero_heavy);
    }

    #[test]
    fn empty_calldata_costs_nothing() {
        let estimator = OptimismStyleL1FeeEstimator;
        assert_eq!(estimator.estimate(&[], &gas_data()), U256::zero());
    }
}
