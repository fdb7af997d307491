use crate::{
    currency::Token,
    pool::{Pool, PoolAddress, Protocol},
};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("route must contain at least one pool")]
    Empty,
    #[error("hop {0} does not connect to the next hop's input token")]
    Disconnected(usize),
    #[error("route does not start at the declared input token")]
    WrongInput,
    #[error("route does not end at the declared output token")]
    WrongOutput,
    #[error("pool {0} appears more than once in the route")]
    RepeatedPool(PoolAddress),
    #[error("mixed route must contain at least two pools of at least two distinct protocols")]
    NotActuallyMixed,
}

/// An ordered, validated chain of pools connecting `input` to `output`. Once
/// constructed a route is immutable — enumeration is the only place paths
/// are built incrementally.
#[derive(Debug, Clone)]
pub struct Route {
    pools: Vec<Pool>,
    input: Token,
    output: Token,
    protocol: Protocol,
}

impl Route {
    /// Validates every invariant in the data model: adjacency, no repeated
    /// pool, matching ends, and — for `Mixed` — at least two pools of at
    /// least two distinct underlying protocols.
    pub fn try_new(pools: Vec<Pool>, input: Token, output: Token) -> Result<Self, RouteError> {
        if pools.is_empty() {
            return Err(RouteError::Empty);
        }

        let mut seen = std::collections::HashSet::new();
        for pool in &pools {
            if !seen.insert(pool.address()) {
                return Err(RouteError::RepeatedPool(pool.address()));
            }
        }

        let mut cursor = input.clone();
        for (i, pool) in pools.iter().enumerate() {
            if !pool.involves_token(&cursor) {
                return Err(if i == 0 {
                    RouteError::WrongInput
                } else {
                    RouteError::Disconnected(i - 1)
                });
            }
            cursor = pool
                .other(&cursor)
                .cloned()
                .ok_or(RouteError::Disconnected(i))?;
        }
        if cursor != output {
            return Err(RouteError::WrongOutput);
        }

        let protocol = Self::classify(&pools)?;

        Ok(Self {
            pools,
            input,
            output,
            protocol,
        })
    }

    fn classify(pools: &[Pool]) -> Result<Protocol, RouteError> {
        let mut distinct = std::collections::HashSet::new();
        for pool in pools {
            distinct.insert(pool.protocol());
        }
        match distinct.len() {
            0 => Err(RouteError::Empty),
            1 => Ok(distinct.into_iter().next().unwrap()),
            _ => {
                if pools.len() >= 2 {
                    Ok(Protocol::Mixed)
                } else {
                    Err(RouteError::NotActuallyMixed)
                }
            }
        }
    }

    pub fn pools(&self) -> &[Pool] {
        &self.pools
    }

    pub fn input(&self) -> &Token {
        &self.input
    }

    pub fn output(&self) -> &Token {
        &self.output
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    pub fn hops(&self) -> usize {
        self.pools.len()
    }

    /// A stable identity for tie-breaking and dedup: the ordered list of
    /// pool addresses. Two routes with the same pools in the same order are
    /// the same route even if constructed separately.
    pub fn id(&self) -> Vec<PoolAddress> {
        self.pools.iter().map(Pool::address).collect()
    }
}

impl PartialEq for Route {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}
impl Eq for Route {}
