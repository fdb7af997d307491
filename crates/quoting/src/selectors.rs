use sha3::{Digest, Keccak256};

/// Computes the 4-byte function selector for a Solidity signature, same
/// derivation as `pool-metadata::selectors::selector` (duplicated here since
/// that one is private to its own crate).
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = Keccak256::digest(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}
