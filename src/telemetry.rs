//! Telemetry and Observability
//!
//! Handles setting up `tracing-subscriber` for structured logging. The
//! global subscriber can only be installed once, so initialization is
//! deferred until the effective log level is known (CLI flag or config),
//! rather than installing a default early and trying to swap it later.
//!
//! Priority: `RUST_LOG` env var > `log_level` parameter > default "info".

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Build the env filter for a configured log level.
fn level_filter(log_level: &str) -> EnvFilter {
    EnvFilter::new(format!("{},docket_engine={}", log_level, log_level))
}

/// Install the global tracing subscriber with the given log level.
///
/// A `RUST_LOG` env var overrides `log_level`. Call exactly once, after
/// CLI parsing and config loading have produced the effective level; a
/// second call cannot replace the installed subscriber.
///
/// In debug builds: pretty-printed terminal output.
/// In release builds: JSON structured output with spans.
pub fn init_telemetry_with_level(log_level: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| level_filter(log_level));

    #[cfg(debug_assertions)]
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().pretty().with_target(false))
            .try_init()
            .ok();
    }

    #[cfg(not(debug_assertions))]
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_current_span(true))
            .try_init()
            .ok();
    }
}
