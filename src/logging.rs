use tracing_subscriber::EnvFilter;

/// Install the global subscriber. Result lines go to stdout, so logs go
/// to stderr with a quiet default; `RUST_LOG` overrides it.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
