use model::{ChainId, Pool, PoolAddress, Route, StablePool, Token};
use primitive_types::H160;
use std::collections::{HashMap, HashSet};

type TokenIdentity = (ChainId, H160);

/// One directed hop: `from` and `to` are the tokens on either side, `pool`
/// is the (possibly projected, see `project_stable_pool`) pool that
/// realizes it.
struct Edge {
    from: Token,
    to: Token,
    pool: Pool,
}

/// A multi-asset Stable pool can't be walked generically (`Pool::other`
/// only handles the two-token case); the enumerator projects it down to
/// just the two tokens a given hop actually uses, keeping the same pool id
/// so the dedup-by-pool-id rule still recognizes it as the same pool under
/// a different token-pair projection (§4.6).
fn project_stable_pool(pool: &StablePool, index_a: usize, index_b: usize) -> Pool {
    Pool::Stable(StablePool {
        chain: pool.chain,
        id: pool.id,
        tokens: vec![pool.tokens[index_a].clone(), pool.tokens[index_b].clone()],
        amplification_parameter: pool.amplification_parameter,
        swap_fee_bps: pool.swap_fee_bps,
        total_shares: pool.total_shares,
        balances: vec![pool.balances[index_a], pool.balances[index_b]],
        scaling_factors: vec![pool.scaling_factors[index_a], pool.scaling_factors[index_b]],
    })
}

fn edges_for_pool(pool: &Pool) -> Vec<Edge> {
    match pool {
        Pool::Stable(stable) if stable.tokens.len() > 2 => {
            let mut edges = Vec::new();
            for i in 0..stable.tokens.len() {
                for j in 0..stable.tokens.len() {
                    if i == j {
                        continue;
                    }
                    edges.push(Edge {
                        from: stable.tokens[i].clone(),
                        to: stable.tokens[j].clone(),
                        pool: project_stable_pool(stable, i, j),
                    });
                }
            }
            edges
        }
        _ => {
            let tokens = pool.tokens();
            if tokens.len() != 2 {
                return Vec::new();
            }
            let (a, b) = (tokens[0].clone(), tokens[1].clone());
            vec![
                Edge { from: a.clone(), to: b.clone(), pool: pool.clone() },
                Edge { from: b, to: a, pool: pool.clone() },
            ]
        }
    }
}

struct Frame {
    pool: Pool,
}

/// Enumerates every simple path from `token_in` to `token_out` over
/// `candidate_pools` with at most `max_swaps_per_path` hops, depth-first
/// with backtracking (§4.6). Every path that reaches `token_out` is
/// returned regardless of which protocols it touches; `Route::try_new`
/// classifies it, rejecting a would-be mixed route with fewer than two
/// distinct protocol variants. Callers that only want cross-protocol
/// routes (the mixed enumerator) filter on `Route::protocol` themselves.
pub fn enumerate_routes(
    candidate_pools: &[Pool],
    token_in: &Token,
    token_out: &Token,
    max_swaps_per_path: usize,
) -> Vec<Route> {
    let mut edges: Vec<Edge> = Vec::new();
    for pool in candidate_pools {
        edges.extend(edges_for_pool(pool));
    }

    let mut by_source: HashMap<TokenIdentity, Vec<usize>> = HashMap::new();
    for (idx, edge) in edges.iter().enumerate() {
        by_source.entry(edge.from.identity()).or_default().push(idx);
    }

    let mut routes = Vec::new();
    let mut path: Vec<Frame> = Vec::new();
    let mut visited_tokens: HashSet<TokenIdentity> = HashSet::new();
    let mut visited_pool_ids: HashSet<PoolAddress> = HashSet::new();

    visited_tokens.insert(token_in.identity());
    dfs(
        token_in,
        token_in,
        token_out,
        &edges,
        &by_source,
        max_swaps_per_path,
        &mut path,
        &mut visited_tokens,
        &mut visited_pool_ids,
        &mut routes,
    );
    routes
}

#[allow(clippy::too_many_arguments)]
fn dfs(
    current: &Token,
    token_in: &Token,
    token_out: &Token,
    edges: &[Edge],
    by_source: &HashMap<TokenIdentity, Vec<usize>>,
    max_swaps_per_path: usize,
    path: &mut Vec<Frame>,
    visited_tokens: &mut HashSet<TokenIdentity>,
    visited_pool_ids: &mut HashSet<PoolAddress>,
    routes: &mut Vec<Route>,
) {
    if current == token_out && !path.is_empty() {
        let pools: Vec<Pool> = path.iter().map(|frame| frame.pool.clone()).collect();
        if let Ok(route) = Route::try_new(pools, token_in.clone(), token_out.clone()) {
            routes.push(route);
        }
        return;
    }

    if path.len() >= max_swaps_per_path {
        return;
    }

    let Some(candidates) = by_source.get(&current.identity()) else {
        return;
    };

    for &idx in candidates {
        let edge = &edges[idx];
        if visited_tokens.contains(&edge.to.identity()) {
            continue;
        }
        let pool_id = edge.pool.address();
        if visited_pool_ids.contains(&pool_id) {
            continue;
        }

        visited_tokens.insert(edge.to.identity());
        visited_pool_ids.insert(pool_id);
        path.push(Frame { pool: edge.pool.clone() });

        dfs(
            &edge.to,
            token_in,
            token_out,
            edges,
            by_source,
            max_swaps_per_path,
            path,
            visited_tokens,
            visited_pool_ids,
            routes,
        );

        path.pop();
        visited_pool_ids.remove(&pool_id);
        visited_tokens.remove(&edge.to.identity());
    }
}
