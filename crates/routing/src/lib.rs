//! Candidate-pool selection (C5) and route enumeration (C6).

mod bad_token;
mod enumerator;
mod materialize;
mod selector;

pub use bad_token::{BadTokenDetecting, TokenList};
pub use enumerator::enumerate_routes;
pub use materialize::to_pool_requests;
pub use selector::{select_for_mixed, select_for_protocol, SelectionContext};
