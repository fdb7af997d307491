use primitive_types::H160;
use sha3::{Digest, Keccak256};

/// Derives a V3-style pool address deterministically from
/// `(factory, token0, token1, fee_pips)` using the standard
/// `CREATE2(factory, keccak256(token0, token1, fee), init_code_hash)`
/// formula, so pools the subgraph has never indexed can still be probed
/// optimistically (§4.2).
pub fn derive_v3_pool_address(
    factory: H160,
    token0: H160,
    token1: H160,
    fee_pips: u32,
    init_code_hash: [u8; 32],
) -> H160 {
    let (token0, token1) = if token0 < token1 {
        (token0, token1)
    } else {
        (token1, token0)
    };

    let mut salt_input = Vec::with_capacity(20 + 20 + 32);
    salt_input.extend_from_slice(token0.as_bytes());
    salt_input.extend_from_slice(token1.as_bytes());
    let mut fee_bytes = [0u8; 32];
    fee_bytes[28..].copy_from_slice(&fee_pips.to_be_bytes());
    salt_input.extend_from_slice(&fee_bytes);
    let salt = Keccak256::digest(&salt_input);

    let mut create2_input = Vec::with_capacity(1 + 20 + 32 + 32);
    create2_input.push(0xff);
    create2_input.extend_from_slice(factory.as_bytes());
    create2_input.extend_from_slice(&salt);
    create2_input.extend_from_slice(&init_code_hash);
    let hash = Keccak256::digest(&create2_input);

    H160::from_slice(&hash[12..])
}

/// Derives a V2-style pool address the same way, using the V2 factory's
/// init-code hash. Used to probe optimistic direct-swap pools the subgraph
/// has not indexed yet (§4.5 `topByDirectSwapPool`).
pub fn derive_v2_pool_address(token0: H160, token1: H160) -> H160 {
    const V2_FACTORY_BYTES: [u8; 20] =
        hex_literal::hex!("5c69bee701ef814a2b6a3edd4b1652cb9cc5aa6f");
    const V2_INIT_CODE_HASH: [u8; 32] =
        hex_literal::hex!("96e8ac4277198ff8b6f785478aa9a39f403cb768dd02cbee326c3e7da348845");

    let (token0, token1) = if token0 < token1 {
        (token0, token1)
    } else {
        (token1, token0)
    };
    let mut salt_input = Vec::with_capacity(40);
    salt_input.extend_from_slice(token0.as_bytes());
    salt_input.extend_from_slice(token1.as_bytes());
    let salt = Keccak256::digest(&salt_input);

    let mut create2_input = Vec::with_capacity(1 + 20 + 32 + 32);
    create2_input.push(0xff);
    create2_input.extend_from_slice(&V2_FACTORY_BYTES);
    create2_input.extend_from_slice(&salt);
    create2_input.extend_from_slice(&V2_INIT_CODE_HASH);
    let hash = Keccak256::digest(&create2_input);

    H160::from_slice(&hash[12..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_is_order_independent() {
        let factory = H160::from_low_u64_be(1);
        let a = H160::from_low_u64_be(2);
        let b = H160::from_low_u64_be(3);
        let init_hash = [7u8; 32];
        assert_eq!(
            derive_v3_pool_address(factory, a, b, 3000, init_hash),
            derive_v3_pool_address(factory, b, a, 3000, init_hash)
        );
    }

    #[test]
    fn different_fee_gives_different_address() {
        let factory = H160::from_low_u64_be(1);
        let a = H160::from_low_u64_be(2);
        let b = H160::from_low_u64_be(3);
        let init_hash = [7u8; 32];
        assert_ne!(
            derive_v3_pool_address(factory, a, b, 500, init_hash),
            derive_v3_pool_address(factory, a, b, 3000, init_hash)
        );
    }

    #[test]
    fn v2_derivation_is_order_independent() {
        let a = H160::from_low_u64_be(2);
        let b = H160::from_low_u64_be(3);
        assert_eq!(derive_v2_pool_address(a, b), derive_v2_pool_address(b, a));
    }
}
