use ethabi::{ParamType, Token as AbiToken};
use primitive_types::U256;

fn as_u256(token: &AbiToken) -> Option<U256> {
    match token {
        AbiToken::Uint(value) | AbiToken::Int(value) => {
            let mut bytes = [0u8; 32];
            value.to_big_endian(&mut bytes);
            Some(U256::from_big_endian(&bytes))
        }
        _ => None,
    }
}

/// A two's-complement `int256` as returned by `queryBatchSwap`, split into
/// sign and magnitude.
fn signed_magnitude(raw: U256) -> (bool, U256) {
    if raw.bit(255) {
        let magnitude = (!raw).overflowing_add(U256::one()).0;
        (true, magnitude)
    } else {
        (false, raw)
    }
}

pub struct V3QuoteResult {
    pub amount: U256,
    pub sqrt_price_after_x96: Vec<U256>,
    pub initialized_ticks_crossed: u32,
}

fn decode_v3_result(return_data: &[u8]) -> Option<V3QuoteResult> {
    let decoded = ethabi::decode(
        &[
            ParamType::Uint(256),
            ParamType::Array(Box::new(ParamType::Uint(160))),
            ParamType::Array(Box::new(ParamType::Uint(32))),
            ParamType::Uint(256),
        ],
        return_data,
    )
    .ok()?;

    let amount = as_u256(&decoded[0])?;
    let sqrt_price_after_x96 = match &decoded[1] {
        AbiToken::Array(items) => items.iter().map(as_u256).collect::<Option<Vec<_>>>()?,
        _ => return None,
    };
    let initialized_ticks_crossed = match &decoded[2] {
        AbiToken::Array(items) => items
            .iter()
            .map(|t| as_u256(t).map(|v| v.as_u32()))
            .collect::<Option<Vec<_>>>()?
            .into_iter()
            .sum(),
        _ => return None,
    };

    Some(V3QuoteResult {
        amount,
        sqrt_price_after_x96,
        initialized_ticks_crossed,
    })
}

pub fn decode_v3_exact_input(return_data: &[u8]) -> Option<V3QuoteResult> {
    decode_v3_result(return_data)
}

pub fn decode_v3_exact_output(return_data: &[u8]) -> Option<V3QuoteResult> {
    decode_v3_result(return_data)
}

/// `getAmountsOut`/`getAmountsIn` both return the full `amounts` array along
/// the path; exact-in wants the last entry, exact-out the first.
pub fn decode_v2_amounts(return_data: &[u8]) -> Option<Vec<U256>> {
    let decoded = ethabi::decode(&[ParamType::Array(Box::new(ParamType::Uint(256)))], return_data).ok()?;
    match &decoded[0] {
        AbiToken::Array(items) => items.iter().map(as_u256).collect(),
        _ => None,
    }
}

/// Decodes `queryBatchSwap`'s `int256[] assetDeltas` and returns the
/// unsigned magnitude the caller (vault -> trader) received at
/// `output_asset_index`: a negative delta means tokens left the vault to the
/// trader, which is what `quoteExactInput`-style callers want.
pub fn decode_stable_output(return_data: &[u8], output_asset_index: usize) -> Option<U256> {
    let decoded = ethabi::decode(&[ParamType::Array(Box::new(ParamType::Int(256)))], return_data).ok()?;
    let deltas = match &decoded[0] {
        AbiToken::Array(items) => items,
        _ => return None,
    };
    let raw = as_u256(deltas.get(output_asset_index)?)?;
    let (is_negative, magnitude) = signed_magnitude(raw);
    if is_negative {
        Some(magnitude)
    } else {
        None
    }
}
