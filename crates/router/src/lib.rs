//! Orchestrates the smart order router's collaborator crates behind one
//! entry point: [`Router::route`]. Selection (`routing`), pool metadata
//! (`pool_metadata`), subgraph candidate discovery (`subgraph`), on-chain
//! quoting (`quoting`), gas accounting (`gas`) and split optimization
//! (`solvers`) each stay ignorant of one another; this crate is the only one
//! that wires all of them together for a single request.

pub mod calldata;
pub mod error;
pub mod orchestrator;

pub use calldata::{AbiCalldataEncoder, CalldataEncoder};
pub use error::RouterError;
pub use orchestrator::Router;
