use crate::currency::Currency;
use num_bigint::{BigInt, Sign};
use num_rational::BigRational;
use num_traits::{FromPrimitive, Signed, ToPrimitive};
use primitive_types::U256;

/// Converts a 256-bit on-chain integer into the arbitrary-precision integer
/// used by the exact-rational math layer. Infallible: `U256` is always
/// non-negative and fits in a `BigInt`.
pub fn u256_to_bigint(value: U256) -> BigInt {
    let mut bytes = [0u8; 32];
    value.to_big_endian(&mut bytes);
    BigInt::from_bytes_be(Sign::Plus, &bytes)
}

/// Converts a non-negative `BigInt` back to a `U256`, truncating silently if
/// it does not fit (callers that cross back into on-chain-amount land must
/// already have bounded the value to 256 bits — this is a display/boundary
/// conversion, never used mid-computation).
pub fn bigint_to_u256(value: &BigInt) -> U256 {
    let (sign, bytes) = value.to_bytes_be();
    debug_assert_ne!(sign, Sign::Minus, "on-chain amounts are never negative");
    let mut buf = [0u8; 32];
    if bytes.len() >= 32 {
        buf.copy_from_slice(&bytes[bytes.len() - 32..]);
    } else {
        buf[32 - bytes.len()..].copy_from_slice(&bytes);
    }
    U256::from_big_endian(&buf)
}

/// An arbitrary-precision rational amount bound to a currency. All internal
/// math is exact; rounding only happens when crossing to/from a 256-bit
/// on-chain integer.
#[derive(Debug, Clone)]
pub struct Amount {
    pub currency: Currency,
    pub value: BigRational,
}

impl Amount {
    pub fn new(currency: Currency, value: BigRational) -> Self {
        Self { currency, value }
    }

    pub fn from_raw(currency: Currency, raw: U256) -> Self {
        Self {
            currency,
            value: BigRational::from_integer(u256_to_bigint(raw)),
        }
    }

    pub fn zero(currency: Currency) -> Self {
        Self {
            currency,
            value: BigRational::from_integer(BigInt::from(0)),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.value.numer().signum() == 0
    }

    pub fn is_positive(&self) -> bool {
        self.value.is_positive()
    }

    /// Rounds down to the nearest integer and returns the on-chain
    /// representation. Rounding only happens here, at the boundary.
    pub fn to_raw_floor(&self) -> U256 {
        let floored = self.value.floor().to_integer();
        bigint_to_u256(&floored)
    }

    /// Rounds up — used when an exact-out amount must not under-cover the
    /// caller's requested output.
    pub fn to_raw_ceil(&self) -> U256 {
        let ceiled = self.value.ceil().to_integer();
        bigint_to_u256(&ceiled)
    }

    /// Human-scaled approximation, dividing by `10^decimals`. Lossy by
    /// construction — only ever used for display.
    pub fn to_f64_scaled(&self, decimals: u8) -> f64 {
        let scale = BigRational::from_integer(BigInt::from(10).pow(decimals as u32));
        (&self.value / scale).to_f64().unwrap_or(f64::NAN)
    }

    pub fn checked_add(&self, other: &Amount) -> Option<Amount> {
        if self.currency != other.currency {
            return None;
        }
        Some(Amount {
            currency: self.currency.clone(),
            value: &self.value + &other.value,
        })
    }

    pub fn checked_sub(&self, other: &Amount) -> Option<Amount> {
        if self.currency != other.currency {
            return None;
        }
        Some(Amount {
            currency: self.currency.clone(),
            value: &self.value - &other.value,
        })
    }

    /// Multiplies by an integer-percent fraction in `0..=100`, exactly.
    pub fn fraction(&self, percent: u8) -> Amount {
        let ratio = BigRational::new(BigInt::from_u8(percent).unwrap(), BigInt::from(100));
        Amount {
            currency: self.currency.clone(),
            value: &self.value * ratio,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::ChainId;

    #[test]
    fn roundtrip_u256() {
        let original = U256::from(123456789u64);
        let big = u256_to_bigint(original);
        assert_eq!(bigint_to_u256(&big), original);
    }

    #[test]
    fn roundtrip_u256_max() {
        let original = U256::MAX;
        let big = u256_to_bigint(original);
        assert_eq!(bigint_to_u256(&big), original);
    }

    #[test]
    fn fraction_splits_exactly() {
        let amount = Amount::from_raw(Currency::Native(ChainId::MAINNET), U256::from(1_000u64));
        let parts: Vec<_> = [25u8, 25, 25, 25].iter().map(|p| amount.fraction(*p)).collect();
        let total = parts
            .iter()
            .fold(BigRational::from_integer(BigInt::from(0)), |acc, a| acc + &a.value);
        assert_eq!(total, amount.value);
    }

    #[test]
    fn zero_is_zero() {
        let amount = Amount::zero(Currency::Native(ChainId::MAINNET));
        assert!(amount.is_zero());
        assert!(!amount.is_positive());
    }
}
