//! Tracing init. Level from VENVKIT_LOG_LEVEL (RUST_LOG wins), VENVKIT_QUIET, VENVKIT_LOG_JSON.

use tracing_subscriber::{prelude::*, EnvFilter};

/// Initialize tracing. Call at process startup. Logs go to stderr so they
/// interleave with the status banners and never mix into the app's stdout.
pub fn init_tracing() {
    let cfg = venvkit_core::config::ObservabilityConfig::from_env();
    let level: String = if cfg.quiet {
        "venvkit=warn".to_string()
    } else {
        cfg.log_level.clone()
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&level));

    let _ = if cfg.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false),
            )
            .try_init()
    };
}
