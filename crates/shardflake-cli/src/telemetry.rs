use tracing_subscriber::{EnvFilter, fmt};

/// Installs a stderr `fmt` subscriber filtered by `RUST_LOG` (default
/// `info`). Stdout stays reserved for IDs.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // A subscriber may already be installed when embedded in tests.
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
