use tracing_subscriber::EnvFilter;

/// Default filter directive when `RUST_LOG` is unset.
const DEFAULT_LOG_LEVEL: &str = "info";

/// Installs the global tracing subscriber: compact fmt output filtered by
/// `RUST_LOG`. Safe to call more than once; later calls are no-ops.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
