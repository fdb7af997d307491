use primitive_types::H160;

/// On-chain quoter-contract addresses this crate calls through C1. One set
/// per chain, supplied by the embedding settings layer (C11).
#[derive(Debug, Clone, Copy)]
pub struct QuoterAddresses {
    pub v3_quoter: H160,
    pub v2_router: H160,
    pub stable_vault: H160,
}
