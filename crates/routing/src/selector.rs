use crate::bad_token::BadTokenDetecting;
use model::{FeeTier, PoolAddress, PoolSelectionConfig, Protocol, SubgraphPool, SubgraphPoolExtra, TradeType};
use primitive_types::H160;
use std::collections::HashSet;

/// Everything the bucket algorithm needs besides the candidate pool universe
/// itself (§4.5).
pub struct SelectionContext<'a> {
    pub token_in: H160,
    pub token_out: H160,
    pub trade_type: TradeType,
    pub config: &'a PoolSelectionConfig,
    pub base_tokens: &'a [H160],
    pub native_wrapper: H160,
    pub blocked: &'a dyn BadTokenDetecting,
}

/// A Stable pool's wrapper token is folded into its token set only when it
/// equals `token_in`, never `token_out` — a deliberate, asymmetric
/// pool-inclusion rule (§9 open question), not a symmetric "wrapper as
/// another token" treatment. Every bucket below feeds `token_in` here
/// regardless of which side (`token_in` or `token_out`) it's currently
/// testing membership for.
fn pool_tokens(pool: &SubgraphPool, token_in: H160) -> Vec<H160> {
    let mut tokens = pool.tokens.clone();
    if let Some(wrapper) = pool.wrapper() {
        if wrapper == token_in && !tokens.contains(&wrapper) {
            tokens.push(wrapper);
        }
    }
    tokens
}

fn matches_protocol(pool: &SubgraphPool, protocol: Protocol) -> bool {
    matches!(
        (protocol, &pool.extra),
        (Protocol::V2, SubgraphPoolExtra::V2 { .. })
            | (Protocol::V3, SubgraphPoolExtra::V3 { .. })
            | (Protocol::Stable, SubgraphPoolExtra::Stable { .. })
    )
}

fn is_blocked(pool: &SubgraphPool, token_in: H160, blocked: &dyn BadTokenDetecting) -> bool {
    pool_tokens(pool, token_in).iter().any(|t| blocked.is_bad(*t))
}

/// Deterministic ordering: TVL descending, then pool id ascending (§4.5
/// "tie-breaks").
fn cmp_by_tvl_then_id(a: &SubgraphPool, b: &SubgraphPool) -> std::cmp::Ordering {
    b.tvl_native
        .total_cmp(&a.tvl_native)
        .then_with(|| a.id.to_string().cmp(&b.id.to_string()))
}

/// Selects a bounded candidate set for a single protocol (V2, V3 or Stable).
/// Mixed routes union the V3 and Stable results at the call site (§4.5).
pub fn select_for_protocol(
    universe: &[SubgraphPool],
    protocol: Protocol,
    ctx: &SelectionContext,
) -> Vec<SubgraphPool> {
    let mut pools: Vec<SubgraphPool> = universe
        .iter()
        .filter(|p| matches_protocol(p, protocol))
        .filter(|p| !is_blocked(p, ctx.token_in, ctx.blocked))
        .cloned()
        .collect();
    pools.sort_by(cmp_by_tvl_then_id);

    let mut selected: HashSet<PoolAddress> = HashSet::new();
    let mut result: Vec<SubgraphPool> = Vec::new();

    let take = |result: &mut Vec<SubgraphPool>, selected: &mut HashSet<PoolAddress>, pool: &SubgraphPool| {
        if selected.insert(pool.id) {
            result.push(pool.clone());
            true
        } else {
            false
        }
    };

    // topByBaseWithTokenIn / topByBaseWithTokenOut
    for anchor in [ctx.token_in, ctx.token_out] {
        let mut bucket_count = 0usize;
        for &base in ctx.base_tokens {
            if bucket_count >= ctx.config.top_n_with_base_token {
                break;
            }
            let mut per_base = 0usize;
            for pool in &pools {
                if per_base >= ctx.config.top_n_with_each_base_token
                    || bucket_count >= ctx.config.top_n_with_base_token
                {
                    break;
                }
                if selected.contains(&pool.id) {
                    continue;
                }
                let toks = pool_tokens(pool, ctx.token_in);
                if toks.contains(&base) && toks.contains(&anchor) {
                    if take(&mut result, &mut selected, pool) {
                        per_base += 1;
                        bucket_count += 1;
                    }
                }
            }
        }
    }

    // topByDirectSwapPool
    let mut direct_count = 0usize;
    for pool in &pools {
        if direct_count >= ctx.config.top_n_direct_swaps {
            break;
        }
        if selected.contains(&pool.id) {
            continue;
        }
        let toks = pool_tokens(pool, ctx.token_in);
        if toks.contains(&ctx.token_in) && toks.contains(&ctx.token_out) && take(&mut result, &mut selected, pool) {
            direct_count += 1;
        }
    }
    if direct_count == 0 && matches!(protocol, Protocol::V2 | Protocol::V3) {
        tracing::debug!(
            ?protocol,
            token_in = ?ctx.token_in,
            token_out = ?ctx.token_out,
            "no indexed direct-swap pool, injecting optimistic candidates"
        );
        inject_optimistic_direct_swap(protocol, ctx, &mut result, &mut selected);
    }

    // topByEthQuoteTokenPool
    let quote_side = match ctx.trade_type {
        TradeType::ExactInput => ctx.token_out,
        TradeType::ExactOutput => ctx.token_in,
    };
    if quote_side != ctx.native_wrapper {
        if let Some(pool) = pools.iter().find(|p| {
            !selected.contains(&p.id) && {
                let toks = pool_tokens(p, ctx.token_in);
                toks.contains(&ctx.native_wrapper) && toks.contains(&quote_side)
            }
        }) {
            take(&mut result, &mut selected, pool);
        }
    }

    // topByTVL
    let mut tvl_count = 0usize;
    for pool in &pools {
        if tvl_count >= ctx.config.top_n {
            break;
        }
        if selected.contains(&pool.id) {
            continue;
        }
        if take(&mut result, &mut selected, pool) {
            tvl_count += 1;
        }
    }

    // topByTVLUsingTokenIn / topByTVLUsingTokenOut
    let mut second_hop_seeds: Vec<H160> = Vec::new();
    for anchor in [ctx.token_in, ctx.token_out] {
        let mut count = 0usize;
        for pool in &pools {
            if count >= ctx.config.top_n_token_in_out {
                break;
            }
            if selected.contains(&pool.id) {
                continue;
            }
            let toks = pool_tokens(pool, ctx.token_in);
            if toks.contains(&anchor) && take(&mut result, &mut selected, pool) {
                count += 1;
                if let Some(other) = toks.iter().find(|t| **t != anchor) {
                    second_hop_seeds.push(*other);
                }
            }
        }
    }

    // Second hops
    for seed in second_hop_seeds {
        if ctx.config.tokens_to_avoid_on_second_hops.contains(&seed) {
            continue;
        }
        let cap = ctx
            .config
            .top_n_second_hop_for_token
            .get(&seed)
            .copied()
            .unwrap_or(ctx.config.top_n_second_hop);
        let mut count = 0usize;
        for pool in &pools {
            if count >= cap {
                break;
            }
            if selected.contains(&pool.id) {
                continue;
            }
            if pool_tokens(pool, ctx.token_in).contains(&seed) && take(&mut result, &mut selected, pool) {
                count += 1;
            }
        }
    }

    result
}

/// Synthetic placeholders all share the zero-address `PoolAddress` (the real
/// address isn't known until the pool is deployed), so they're appended
/// directly rather than deduped through `selected` — every fee tier is a
/// distinct candidate despite the shared placeholder id.
fn inject_optimistic_direct_swap(
    protocol: Protocol,
    ctx: &SelectionContext,
    result: &mut Vec<SubgraphPool>,
    _selected: &mut HashSet<PoolAddress>,
) {
    match protocol {
        Protocol::V3 => {
            for fee in FeeTier::ALL {
                result.push(SubgraphPool::optimistic_v3(ctx.token_in, ctx.token_out, fee));
            }
        }
        Protocol::V2 => {
            result.push(SubgraphPool::optimistic_v2(ctx.token_in, ctx.token_out));
        }
        _ => {}
    }
}

/// Mixed-route candidate set: union of V3 and Stable selections (§4.5).
pub fn select_for_mixed(universe: &[SubgraphPool], ctx: &SelectionContext) -> Vec<SubgraphPool> {
    let mut selected: HashSet<PoolAddress> = HashSet::new();
    let mut result = Vec::new();
    for protocol in [Protocol::V3, Protocol::Stable] {
        for pool in select_for_protocol(universe, protocol, ctx) {
            if selected.insert(pool.id) {
                result.push(pool);
            }
        }
    }
    result
}
