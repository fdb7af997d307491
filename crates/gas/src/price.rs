use model::amount::u256_to_bigint;
use model::{Pool, Token};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::Zero;

/// The pool's current raw-unit exchange ratio: how many raw `to` units one
/// raw `from` unit is worth, read from reserves (V2) or `sqrtPriceX96` (V3).
/// `None` if the pool doesn't price this exact `(from, to)` pair, or is a
/// Stable/StableWrapper pool — reference pools for gas conversion are always
/// V2/V3 (§4.8). Never simulates a swap; this is a spot mid price.
pub fn mid_price(pool: &Pool, from: &Token, to: &Token) -> Option<BigRational> {
    match pool {
        Pool::V2(p) => {
            let reserve0 = BigRational::from_integer(u256_to_bigint(p.reserve0));
            let reserve1 = BigRational::from_integer(u256_to_bigint(p.reserve1));
            if from.identity() == p.token0.identity() && to.identity() == p.token1.identity() {
                checked_ratio(reserve1, reserve0)
            } else if from.identity() == p.token1.identity() && to.identity() == p.token0.identity() {
                checked_ratio(reserve0, reserve1)
            } else {
                None
            }
        }
        Pool::V3(p) => {
            // sqrtPriceX96^2 / 2^192 is token1-per-token0, in raw on-chain
            // units, matching `slot0()`'s own convention.
            let sqrt_price = u256_to_bigint(p.sqrt_price_x96);
            let numerator = &sqrt_price * &sqrt_price;
            let denominator = BigInt::from(2u8).pow(192);
            let token1_per_token0 = BigRational::new(numerator, denominator);
            if from.identity() == p.token0.identity() && to.identity() == p.token1.identity() {
                Some(token1_per_token0)
            } else if from.identity() == p.token1.identity() && to.identity() == p.token0.identity() {
                checked_ratio(BigRational::from_integer(BigInt::from(1u8)), token1_per_token0)
            } else {
                None
            }
        }
        Pool::Stable(_) | Pool::StableWrapper(_) => None,
    }
}

fn checked_ratio(numerator: BigRational, denominator: BigRational) -> Option<BigRational> {
    if denominator.numer().is_zero() {
        None
    } else {
        Some(numerator / denominator)
    }
}
