use tracing_subscriber::{EnvFilter, fmt};

/// Install the global tracing subscriber.
/// - Respects `RUST_LOG` if set, otherwise uses `default_filter`
/// - Writes to stderr like the desktop builds
/// - Safe to call more than once; later calls are ignored
pub fn init_tracing(default_filter: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr)
        .try_init();
}
