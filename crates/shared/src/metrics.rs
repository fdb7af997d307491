use once_cell::sync::Lazy;
use prometheus::{IntCounter, IntCounterVec, Registry};
use prometheus_metric_storage::MetricStorage;

/// Process-wide registry every component's metrics are registered against.
pub static REGISTRY: Lazy<Registry> = Lazy::new(Registry::new);

pub fn registry() -> &'static Registry {
    &REGISTRY
}

#[derive(MetricStorage, Clone, Debug)]
#[metric(subsystem = "router")]
pub struct Metrics {
    /// Multicall batches that had to be retried after halving.
    pub multicall_batch_retries: IntCounter,

    /// Subgraph queries that rolled their requested block back and retried
    /// after an "indexed up to N" error.
    pub subgraph_fallback_hits: IntCounter,

    /// Pool-metadata and token-metadata cache lookups, labeled `hit`/`miss`.
    #[metric(labels("outcome"))]
    pub cache_lookups: IntCounterVec,

    /// Candidate pools dropped during selection or materialization, labeled
    /// by the protocol they belonged to.
    #[metric(labels("protocol"))]
    pub pools_dropped: IntCounterVec,
}

impl Metrics {
    pub fn get() -> &'static Metrics {
        Self::instance(registry()).expect("router metrics registration is infallible at process startup")
    }
}
