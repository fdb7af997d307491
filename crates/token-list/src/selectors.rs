use sha3::{Digest, Keccak256};

/// Computes the 4-byte function selector for a Solidity signature, e.g.
/// `selector("symbol()")`.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = Keccak256::digest(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_is_four_bytes_and_deterministic() {
        let a = selector("symbol()");
        let b = selector("symbol()");
        assert_eq!(a, b);
        assert_eq!(a.len(), 4);
    }
}
