use std::sync::atomic::{AtomicBool, Ordering};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Installs a global `tracing` subscriber filtered by `log_filter`, using an
/// env-filter-plus-fmt-layer stack. Panics if a global subscriber is already
/// set; callers that may run this more than once (tests, repeated library
/// entry points) should use [`initialize_reentrant`] instead.
pub fn initialize(log_filter: &str) {
    let env_filter = EnvFilter::try_new(log_filter).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Same as [`initialize`], but safe to call more than once per process (e.g.
/// from multiple tests in the same binary) — only the first call installs
/// the subscriber.
pub fn initialize_reentrant(log_filter: &str) {
    if INITIALIZED.swap(true, Ordering::SeqCst) {
        return;
    }
    initialize(log_filter);
}
