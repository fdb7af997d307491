use crate::types::SplitResult;
use model::{Amount, Currency, Protocol, RouteWithQuote, RoutingConfig, TradeType};
use primitive_types::U256;
use std::collections::{HashMap, HashSet};

/// One dynamic-programming cell: the best plan known so far that reaches a
/// given `(percent, split count, already cross-protocol)` state.
#[derive(Clone)]
struct DpState {
    routes: Vec<RouteWithQuote>,
    objective: Amount,
    protocols: HashSet<Protocol>,
}

/// Picks the split maximizing (exact-in) or minimizing (exact-out) the
/// gas-adjusted aggregate quote (§4.9). `candidates` is every `(route,
/// fraction)` pair with a known on-chain quote, typically many fractions per
/// route; the optimizer chooses at most one fraction per distinct route.
///
/// State `dp[p][k][mixed]` holds the best plan summing to exactly `p`
/// percent, using exactly `k` routes, that has (`mixed`) or hasn't touched
/// two or more distinct protocols yet. The `mixed` dimension only exists to
/// let `forceCrossProtocol` pick from the cross-protocol-only slice of the
/// table without losing the unconstrained optimum to it, since protocol
/// diversity is monotonic (a plan that is mixed stays mixed as routes are
/// added) but not otherwise comparable to a single-protocol plan at the same
/// state.
pub fn optimize(
    candidates: Vec<RouteWithQuote>,
    trade_type: TradeType,
    quote_token: Currency,
    config: &RoutingConfig,
) -> Option<SplitResult> {
    let step = config.distribution_percent.max(1) as usize;
    let num_steps = 100 / step;
    if num_steps == 0 || candidates.is_empty() {
        return None;
    }
    let max_splits = config.max_splits.min(num_steps).max(1);
    let min_splits = config.min_splits.max(1).min(max_splits);

    let groups = group_by_route(candidates);

    let mut dp: Vec<Vec<[Option<DpState>; 2]>> = vec![vec![[None, None]; max_splits + 1]; num_steps + 1];
    dp[0][0][0] = Some(DpState {
        routes: Vec::new(),
        objective: Amount::zero(quote_token.clone()),
        protocols: HashSet::new(),
    });

    for group in groups.values() {
        // Snapshot before this route's own candidates are folded in, so a
        // plan can use at most one fraction of this route (classic 0/1
        // knapsack: read only from the pre-route table, write into the live
        // one).
        let snapshot = dp.clone();
        for candidate in group {
            apply_candidate(&mut dp, &snapshot, candidate, trade_type, &quote_token, step, num_steps, max_splits);
        }
    }

    let Some(best) = select_best(&dp, num_steps, min_splits, max_splits, config.force_cross_protocol, trade_type) else {
        tracing::debug!(
            min_splits,
            max_splits,
            force_cross_protocol = config.force_cross_protocol,
            "no split reaches 100% within the configured window"
        );
        return None;
    };
    Some(finalize(best, trade_type, &quote_token))
}

#[allow(clippy::too_many_arguments)]
fn apply_candidate(
    dp: &mut [Vec<[Option<DpState>; 2]>],
    snapshot: &[Vec<[Option<DpState>; 2]>],
    candidate: &RouteWithQuote,
    trade_type: TradeType,
    quote_token: &Currency,
    step: usize,
    num_steps: usize,
    max_splits: usize,
) {
    let frac = candidate.fraction_percent as usize;
    if frac == 0 || frac % step != 0 {
        return;
    }
    let frac_idx = frac / step;
    if frac_idx > num_steps {
        return;
    }

    let quote_side = match trade_type {
        TradeType::ExactInput => &candidate.amount_out,
        TradeType::ExactOutput => &candidate.amount_in,
    };
    if &quote_side.currency != quote_token {
        return;
    }
    let candidate_value = candidate.gas_adjusted_quote(trade_type, quote_side);

    for prev_p in 0..=(num_steps - frac_idx) {
        for prev_k in 0..max_splits {
            for mixed_idx in 0..2 {
                let Some(prev_state) = &snapshot[prev_p][prev_k][mixed_idx] else {
                    continue;
                };
                let Some(new_objective) = prev_state.objective.checked_add(&candidate_value) else {
                    continue;
                };
                let mut protocols = prev_state.protocols.clone();
                protocols.insert(candidate.route.protocol());
                let new_mixed = protocols.len() >= 2;
                let mut routes = prev_state.routes.clone();
                routes.push(candidate.clone());

                let new_state = DpState {
                    routes,
                    objective: new_objective,
                    protocols,
                };
                let new_p = prev_p + frac_idx;
                let new_k = prev_k + 1;
                let slot = &mut dp[new_p][new_k][new_mixed as usize];
                let replace = match slot {
                    None => true,
                    Some(current) => is_better(&new_state, current, trade_type),
                };
                if replace {
                    *slot = Some(new_state);
                }
            }
        }
    }
}

fn select_best(
    dp: &[Vec<[Option<DpState>; 2]>],
    num_steps: usize,
    min_splits: usize,
    max_splits: usize,
    force_cross_protocol: bool,
    trade_type: TradeType,
) -> Option<DpState> {
    let mut best: Option<DpState> = None;
    for k in min_splits..=max_splits {
        for mixed_idx in 0..2 {
            if force_cross_protocol && mixed_idx == 0 {
                continue;
            }
            if let Some(state) = &dp[num_steps][k][mixed_idx] {
                let replace = match &best {
                    None => true,
                    Some(current) => is_better(state, current, trade_type),
                };
                if replace {
                    best = Some(state.clone());
                }
            }
        }
    }
    best
}

fn finalize(best: DpState, trade_type: TradeType, quote_token: &Currency) -> SplitResult {
    let mut quote = Amount::zero(quote_token.clone());
    let mut gas_use_estimate = U256::zero();
    let mut gas_use_estimate_usd = best
        .routes
        .first()
        .map(|r| Amount::zero(r.gas.cost_in_usd.currency.clone()))
        .unwrap_or_else(|| Amount::zero(quote_token.clone()));
    let mut gas_use_estimate_quote_token = Amount::zero(quote_token.clone());

    for route in &best.routes {
        let side = match trade_type {
            TradeType::ExactInput => &route.amount_out,
            TradeType::ExactOutput => &route.amount_in,
        };
        quote = quote.checked_add(side).unwrap_or(quote);
        gas_use_estimate = gas_use_estimate.saturating_add(route.gas.gas_use_estimate);
        gas_use_estimate_usd = gas_use_estimate_usd.checked_add(&route.gas.cost_in_usd).unwrap_or(gas_use_estimate_usd);
        gas_use_estimate_quote_token = gas_use_estimate_quote_token
            .checked_add(&route.gas.cost_in_quote_token)
            .unwrap_or(gas_use_estimate_quote_token);
    }

    let quote_gas_adjusted = match trade_type {
        TradeType::ExactInput => quote
            .checked_sub(&gas_use_estimate_quote_token)
            .unwrap_or_else(|| Amount::zero(quote_token.clone())),
        TradeType::ExactOutput => quote
            .checked_add(&gas_use_estimate_quote_token)
            .unwrap_or_else(|| quote.clone()),
    };

    SplitResult {
        routes: best.routes,
        quote,
        quote_gas_adjusted,
        gas_use_estimate,
        gas_use_estimate_usd,
        gas_use_estimate_quote_token,
    }
}

fn group_by_route(candidates: Vec<RouteWithQuote>) -> HashMap<Vec<model::PoolAddress>, Vec<RouteWithQuote>> {
    let mut groups: HashMap<Vec<model::PoolAddress>, Vec<RouteWithQuote>> = HashMap::new();
    for candidate in candidates {
        groups.entry(candidate.route.id()).or_default().push(candidate);
    }
    groups
}

/// `true` if `candidate` should replace `current` at the same DP cell.
/// Primary comparison is the gas-adjusted objective (bigger wins for
/// exact-in, smaller for exact-out); ties are broken by fewer splits, then
/// by the lexicographically-smaller sorted route-id signature, so the
/// result never depends on route processing order (§4.9 "Determinism").
fn is_better(candidate: &DpState, current: &DpState, trade_type: TradeType) -> bool {
    match cmp_objective(&candidate.objective, &current.objective, trade_type) {
        std::cmp::Ordering::Greater => true,
        std::cmp::Ordering::Less => false,
        std::cmp::Ordering::Equal => tie_break(candidate, current),
    }
}

fn cmp_objective(a: &Amount, b: &Amount, trade_type: TradeType) -> std::cmp::Ordering {
    match trade_type {
        TradeType::ExactInput => a.value.cmp(&b.value),
        TradeType::ExactOutput => b.value.cmp(&a.value),
    }
}

fn tie_break(a: &DpState, b: &DpState) -> bool {
    match a.routes.len().cmp(&b.routes.len()) {
        std::cmp::Ordering::Less => true,
        std::cmp::Ordering::Greater => false,
        std::cmp::Ordering::Equal => route_signature(a) < route_signature(b),
    }
}

fn route_signature(state: &DpState) -> Vec<String> {
    let mut ids: Vec<String> = state
        .routes
        .iter()
        .map(|r| r.route.id().iter().map(|a| a.to_string()).collect::<Vec<_>>().join(","))
        .collect();
    ids.sort();
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::{ChainId, FeeTier, GasEstimate, Pool, Protocol as P, Route, Token, V2Pool, V3Pool};
    use primitive_types::H160;

    fn token(n: u64) -> Token {
        Token::new(ChainId::MAINNET, H160::from_low_u64_be(n), 18, None)
    }

    fn no_gas(currency: Currency) -> GasEstimate {
        GasEstimate {
            gas_use_estimate: U256::zero(),
            cost_in_quote_token: Amount::zero(currency.clone()),
            cost_in_usd: Amount::zero(currency.clone()),
            cost_in_gas_token: None,
        }
    }

    fn route_with_quote(route: Route, fraction_percent: u8, amount_out: u64, quote_token: Currency) -> RouteWithQuote {
        RouteWithQuote {
            route,
            fraction_percent,
            amount_in: Amount::zero(Currency::Token(token(1))),
            amount_out: Amount::from_raw(quote_token.clone(), U256::from(amount_out)),
            gas: no_gas(quote_token),
            sqrt_price_after_x96: None,
            initialized_ticks_crossed: None,
        }
    }

    fn v2(a: u64, b: u64, addr: u64) -> Pool {
        Pool::V2(V2Pool::canonical(
            ChainId::MAINNET,
            H160::from_low_u64_be(addr),
            token(a),
            token(b),
            U256::from(1_000u64),
            U256::from(1_000u64),
        ))
    }

    fn v3(a: u64, b: u64, addr: u64) -> Pool {
        Pool::V3(V3Pool::canonical(
            ChainId::MAINNET,
            H160::from_low_u64_be(addr),
            token(a),
            token(b),
            FeeTier::Medium,
            1_000_000,
            U256::from(1u64) << 96,
        ))
    }

    #[test]
    fn picks_single_best_route_at_full_fraction() {
        let quote_token = Currency::Token(token(2));
        let route_a = Route::try_new(vec![v2(1, 2, 10)], token(1), token(2)).unwrap();
        let route_b = Route::try_new(vec![v2(1, 2, 11)], token(1), token(2)).unwrap();
        let candidates = vec![
            route_with_quote(route_a, 100, 900, quote_token.clone()),
            route_with_quote(route_b, 100, 1_000, quote_token.clone()),
        ];
        let config = RoutingConfig {
            distribution_percent: 100,
            min_splits: 1,
            max_splits: 1,
            ..Default::default()
        };
        let result = optimize(candidates, TradeType::ExactInput, quote_token, &config).unwrap();
        assert_eq!(result.routes.len(), 1);
        assert_eq!(result.routes[0].fraction_percent, 100);
        assert_eq!(result.routes[0].amount_out.to_raw_floor(), U256::from(1_000u64));
    }

    #[test]
    fn splits_across_two_routes_when_additive_value_is_higher() {
        let quote_token = Currency::Token(token(2));
        let route_a = Route::try_new(vec![v2(1, 2, 10)], token(1), token(2)).unwrap();
        let route_b = Route::try_new(vec![v2(1, 2, 11)], token(1), token(2)).unwrap();
        let candidates = vec![
            route_with_quote(route_a.clone(), 50, 480, quote_token.clone()),
            route_with_quote(route_a, 100, 900, quote_token.clone()),
            route_with_quote(route_b.clone(), 50, 520, quote_token.clone()),
            route_with_quote(route_b, 100, 1_000, quote_token.clone()),
        ];
        let config = RoutingConfig {
            distribution_percent: 50,
            min_splits: 1,
            max_splits: 2,
            ..Default::default()
        };
        let result = optimize(candidates, TradeType::ExactInput, quote_token, &config).unwrap();
        // 480 + 520 = 1000 beats either single-route 900/1000 outcome.
        assert_eq!(result.routes.len(), 2);
        assert_eq!(result.quote.to_raw_floor(), U256::from(1_000u64));
    }

    #[test]
    fn force_cross_protocol_rejects_single_protocol_plans() {
        let quote_token = Currency::Token(token(2));
        let route_a = Route::try_new(vec![v2(1, 2, 10)], token(1), token(2)).unwrap();
        let candidates = vec![route_with_quote(route_a, 100, 1_000, quote_token.clone())];
        let config = RoutingConfig {
            distribution_percent: 100,
            min_splits: 1,
            max_splits: 1,
            force_cross_protocol: true,
            ..Default::default()
        };
        let result = optimize(candidates, TradeType::ExactInput, quote_token, &config);
        assert!(result.is_none());
    }

    #[test]
    fn force_cross_protocol_accepts_mixed_protocol_plans() {
        let quote_token = Currency::Token(token(2));
        let route_a = Route::try_new(vec![v2(1, 2, 10)], token(1), token(2)).unwrap();
        let route_b = Route::try_new(vec![v3(1, 2, 11)], token(1), token(2)).unwrap();
        let candidates = vec![
            route_with_quote(route_a, 50, 480, quote_token.clone()),
            route_with_quote(route_b, 50, 480, quote_token.clone()),
        ];
        let config = RoutingConfig {
            distribution_percent: 50,
            min_splits: 1,
            max_splits: 2,
            force_cross_protocol: true,
            ..Default::default()
        };
        let result = optimize(candidates, TradeType::ExactInput, quote_token, &config).unwrap();
        let protocols: HashSet<P> = result.routes.iter().map(|r| r.route.protocol()).collect();
        assert!(protocols.len() >= 2);
    }

    #[test]
    fn min_splits_rejects_a_single_route_solution() {
        let quote_token = Currency::Token(token(2));
        let route_a = Route::try_new(vec![v2(1, 2, 10)], token(1), token(2)).unwrap();
        let candidates = vec![route_with_quote(route_a, 100, 1_000, quote_token.clone())];
        let config = RoutingConfig {
            distribution_percent: 100,
            min_splits: 2,
            max_splits: 2,
            ..Default::default()
        };
        let result = optimize(candidates, TradeType::ExactInput, quote_token, &config);
        assert!(result.is_none());
    }

    #[test]
    fn no_candidates_yields_no_plan() {
        let quote_token = Currency::Token(token(2));
        let config = RoutingConfig::default();
        let result = optimize(Vec::new(), TradeType::ExactInput, quote_token, &config);
        assert!(result.is_none());
    }
}
