use model::{Pool, Protocol, Route, Token};

/// Walks a route's pools in order, returning the token at each step
/// (`hops() + 1` entries: input, each intermediate hop output, final
/// output). Mirrors the adjacency walk `Route::try_new` already performed
/// when validating the path, so this never fails on a validated route.
pub fn hop_tokens(route: &Route) -> Vec<Token> {
    let mut tokens = Vec::with_capacity(route.hops() + 1);
    let mut cursor = route.input().clone();
    tokens.push(cursor.clone());
    for pool in route.pools() {
        cursor = pool
            .other(&cursor)
            .cloned()
            .expect("route was validated by Route::try_new");
        tokens.push(cursor.clone());
    }
    tokens
}

/// The V3 fee tier of a hop, in pips (hundredths of a basis point). `None`
/// for non-V3 pools, which never appear in a pure-V3 or Mixed V3-section
/// path segment built by this crate.
pub fn v3_fee_pips(pool: &Pool) -> Option<u32> {
    match pool {
        Pool::V3(p) => Some(p.fee.pips()),
        _ => None,
    }
}

/// Encodes a Uniswap-V3-style multi-hop path: `token0 | fee | token1 | fee |
/// token2 | ...`, each token 20 bytes and each fee a big-endian `uint24`.
/// `quoteExactInput` takes the path ordered tokenIn -> tokenOut;
/// `quoteExactOutput` takes the same hops with the token and fee order
/// reversed (tokenOut -> tokenIn), per the upstream quoter convention.
pub fn encode_v3_path(tokens: &[Token], fees: &[u32], reverse: bool) -> Vec<u8> {
    debug_assert_eq!(tokens.len(), fees.len() + 1);
    let mut ordered_tokens: Vec<&Token> = tokens.iter().collect();
    let mut ordered_fees: Vec<u32> = fees.to_vec();
    if reverse {
        ordered_tokens.reverse();
        ordered_fees.reverse();
    }

    let mut path = Vec::with_capacity(ordered_tokens.len() * 20 + ordered_fees.len() * 3);
    for (i, token) in ordered_tokens.iter().enumerate() {
        path.extend_from_slice(token.address.as_bytes());
        if i < ordered_fees.len() {
            let fee = ordered_fees[i];
            path.extend_from_slice(&fee.to_be_bytes()[1..]);
        }
    }
    path
}

/// One maximal run of same-protocol hops within a route, as a half-open
/// `[start, end)` range over `route.pools()`. `hop_tokens(route)[start]` is
/// the section's input token, `hop_tokens(route)[end]` its output token.
/// A Mixed route's quote is the chained composition of its sections; the
/// gas model partitions a Mixed route's cost contribution the same way.
pub struct Section {
    pub protocol: Protocol,
    pub start: usize,
    pub end: usize,
}

pub fn same_protocol_sections(route: &Route) -> Vec<Section> {
    let pools = route.pools();
    let mut sections = Vec::new();
    let mut i = 0;
    while i < pools.len() {
        let protocol = pools[i].protocol();
        let mut j = i + 1;
        while j < pools.len() && pools[j].protocol() == protocol {
            j += 1;
        }
        sections.push(Section {
            protocol,
            start: i,
            end: j,
        });
        i = j;
    }
    sections
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::ChainId;
    use primitive_types::H160;

    fn token(n: u64) -> Token {
        Token::new(ChainId::MAINNET, H160::from_low_u64_be(n), 18, None)
    }

    #[test]
    fn path_length_matches_hops() {
        let tokens = vec![token(1), token(2), token(3)];
        let fees = vec![3_000u32, 500u32];
        let path = encode_v3_path(&tokens, &fees, false);
        assert_eq!(path.len(), 20 * 3 + 3 * 2);
    }

    #[test]
    fn reversed_path_starts_at_the_last_token() {
        let tokens = vec![token(1), token(2)];
        let fees = vec![3_000u32];
        let forward = encode_v3_path(&tokens, &fees, false);
        let backward = encode_v3_path(&tokens, &fees, true);
        assert_eq!(&forward[0..20], token(1).address.as_bytes());
        assert_eq!(&backward[0..20], token(2).address.as_bytes());
    }

    #[test]
    fn sections_split_at_protocol_boundaries() {
        use model::V2Pool;
        use primitive_types::U256;

        let v2_pool = Pool::V2(V2Pool::canonical(
            ChainId::MAINNET,
            H160::from_low_u64_be(100),
            token(1),
            token(2),
            U256::from(1_000u64),
            U256::from(1_000u64),
        ));
        let route = Route::try_new(vec![v2_pool], token(1), token(2)).unwrap();
        let sections = same_protocol_sections(&route);
        assert_eq!(sections.len(), 1);
        assert_eq!((sections[0].start, sections[0].end), (0, 1));
        assert_eq!(sections[0].protocol, Protocol::V2);
    }
}
