use model::ChainId;
use primitive_types::H160;
use std::{
    fmt::{self, Display, Formatter},
    num::ParseFloatError,
    time::Duration,
};
use tracing::level_filters::LevelFilter;
use url::Url;

#[derive(clap::Parser)]
pub struct LoggingArguments {
    #[clap(long, env, default_value = "warn,router=debug,shared=debug")]
    pub log_filter: String,

    #[clap(long, env, default_value = "error")]
    pub log_stderr_threshold: LevelFilter,
}

/// Per-invocation configuration for the router's RPC, subgraph and caching
/// collaborators. Every field is overridable via `--flag` or the matching
/// `env`-derived environment variable.
#[derive(clap::Parser)]
pub struct RouterSettings {
    #[clap(flatten)]
    pub logging: LoggingArguments,

    /// The chain this router instance serves.
    #[clap(long, env, default_value = "1")]
    pub chain_id: u64,

    /// JSON-RPC node URL used for multicall batches (C1).
    #[clap(long, env, default_value = "http://localhost:8545")]
    pub node_url: Url,

    /// Subgraph GraphQL endpoint for candidate pool discovery (C3). Falls
    /// back to the static seed set when unset.
    #[clap(long, env)]
    pub subgraph_url: Option<Url>,

    /// Override address for a deployed Multicall3-compatible contract.
    /// Unset means the transport batches calls without an on-chain
    /// aggregator.
    #[clap(long, env)]
    pub multicall_address: Option<H160>,

    #[clap(long, env)]
    pub v3_factory_address: Option<H160>,

    #[clap(long, env)]
    pub v3_quoter_address: Option<H160>,

    #[clap(long, env)]
    pub v2_router_address: Option<H160>,

    #[clap(long, env)]
    pub stable_vault_address: Option<H160>,

    #[clap(long, env)]
    pub native_wrapper_address: Option<H160>,

    #[clap(long, env)]
    pub gas_token_address: Option<H160>,

    /// Base tokens used for finding multi-hop paths between multiple AMMs.
    /// Should be the most liquid tokens on the given network.
    #[clap(long, env, use_value_delimiter = true)]
    pub base_tokens: Vec<H160>,

    /// How long a fetched pool's on-chain state stays cache-fresh.
    #[clap(long, env, default_value = "4", value_parser = duration_from_seconds)]
    pub pool_cache_ttl_seconds: Duration,

    /// Exponential-backoff retry budget for subgraph and quoter calls.
    #[clap(long, env, default_value = "2")]
    pub max_retries: u32,

    /// Hard timeout for a subgraph candidate-pool query.
    #[clap(long, env, default_value = "30", value_parser = duration_from_seconds)]
    pub subgraph_timeout_seconds: Duration,

    /// Hard timeout for an on-chain quoter round-trip.
    #[clap(long, env, default_value = "10", value_parser = duration_from_seconds)]
    pub quoter_timeout_seconds: Duration,

    /// Maximum bytes accepted from any single HTTP response body before the
    /// request is treated as failed.
    #[clap(long, env, default_value = "10485760")]
    pub http_response_size_limit_bytes: usize,
}

impl RouterSettings {
    pub fn chain(&self) -> ChainId {
        ChainId(self.chain_id)
    }
}

pub fn duration_from_seconds(s: &str) -> Result<Duration, ParseFloatError> {
    Ok(Duration::from_secs_f64(s.parse()?))
}

pub fn display_secret_option<T>(f: &mut Formatter<'_>, name: &str, option: &Option<T>) -> fmt::Result {
    display_option(f, name, &option.as_ref().map(|_| "SECRET"))
}

pub fn display_option(f: &mut Formatter<'_>, name: &str, option: &Option<impl Display>) -> fmt::Result {
    write!(f, "{name}: ")?;
    match option {
        Some(display) => writeln!(f, "{display}"),
        None => writeln!(f, "None"),
    }
}

pub fn display_list<T: Display>(f: &mut Formatter<'_>, name: &str, iter: impl IntoIterator<Item = T>) -> fmt::Result {
    write!(f, "{name}: [")?;
    for (i, t) in iter.into_iter().enumerate() {
        if i != 0 {
            f.write_str(", ")?;
        }
        write!(f, "{t}")?;
    }
    writeln!(f, "]")
}

impl Display for RouterSettings {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "log_filter: {}", self.logging.log_filter)?;
        writeln!(f, "chain_id: {}", self.chain_id)?;
        writeln!(f, "node_url: {}", self.node_url)?;
        display_option(f, "subgraph_url", &self.subgraph_url)?;
        display_option(f, "multicall_address", &self.multicall_address.map(|a| format!("{a:#x}")))?;
        display_list(f, "base_tokens", self.base_tokens.iter().map(|a| format!("{a:#x}")))?;
        writeln!(f, "pool_cache_ttl_seconds: {:?}", self.pool_cache_ttl_seconds)?;
        writeln!(f, "max_retries: {}", self.max_retries)?;
        writeln!(f, "subgraph_timeout_seconds: {:?}", self.subgraph_timeout_seconds)?;
        writeln!(f, "quoter_timeout_seconds: {:?}", self.quoter_timeout_seconds)?;
        Ok(())
    }
}
