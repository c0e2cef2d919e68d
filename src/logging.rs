use tracing_subscriber::EnvFilter;

/// Install a global subscriber reading the `RUST_LOG` filter, defaulting to
/// `info`. Embedders that bring their own subscriber can skip this; calling
/// it twice is a no-op.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}
