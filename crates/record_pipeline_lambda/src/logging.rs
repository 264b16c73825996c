use tracing_subscriber::EnvFilter;

pub const DEFAULT_LOG_FILTER: &str = "info";

/// Installs the JSON tracing subscriber used by both Lambda binaries.
///
/// Time and target are left out because CloudWatch stamps ingestion time.
/// Installation is best-effort: an already-installed global subscriber is
/// kept and the failure is ignored.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let _ = tracing_subscriber::fmt()
        .json()
        .flatten_event(true)
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .try_init();
}
