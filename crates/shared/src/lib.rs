//! Ambient infrastructure shared across the router's collaborators: process
//! configuration, time abstraction, HTTP transport guardrails, logging and
//! metrics. No routing logic lives here.

pub mod gas_price;
pub mod http_client;
pub mod metrics;
pub mod settings;
pub mod telemetry;
pub mod time;

pub use gas_price::{FixedGasPrice, GasPriceProvider};
pub use http_client::{response_body_with_size_limit, SizeLimitError};
pub use settings::RouterSettings;
pub use time::Now;
