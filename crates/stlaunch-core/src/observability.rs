//! Observability: tracing init.
//!
//! Uses config::ObservabilityConfig for STLAUNCH_QUIET, STLAUNCH_LOG_LEVEL and STLAUNCH_LOG_JSON.

use tracing_subscriber::{prelude::*, EnvFilter};

/// Initialize tracing. Call at process startup.
/// When STLAUNCH_QUIET=1, only WARN and above are logged. `RUST_LOG` wins when set.
pub fn init_tracing() {
    let cfg = crate::config::ObservabilityConfig::from_env();
    let level: String = if cfg.quiet {
        "stlaunch=warn,stlaunch_env=warn".to_string()
    } else {
        cfg.log_level.clone()
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&level));

    // Logs go to stderr so the downstream app keeps stdout.
    let _ = if cfg.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };
}

/// Quiet mode suppresses info-level progress output.
pub fn is_quiet() -> bool {
    crate::config::ObservabilityConfig::from_env().quiet
}
