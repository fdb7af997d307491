use sha3::{Digest, Keccak256};

/// Computes the 4-byte function selector for a Solidity signature, e.g.
/// `selector("getReserves()")`.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = Keccak256::digest(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

pub fn encode_no_args(signature: &str) -> Vec<u8> {
    selector(signature).to_vec()
}

pub fn encode_bytes32_arg(signature: &str, arg: [u8; 32]) -> Vec<u8> {
    let mut data = selector(signature).to_vec();
    data.extend_from_slice(&arg);
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_is_four_bytes_and_deterministic() {
        let a = selector("getReserves()");
        let b = selector("getReserves()");
        assert_eq!(a, b);
        assert_eq!(a.len(), 4);
    }

    #[test]
    fn different_signatures_differ() {
        assert_ne!(selector("token0()"), selector("token1()"));
    }
}
