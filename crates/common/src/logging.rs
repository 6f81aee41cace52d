use crate::config::Environment;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "info";

pub(crate) fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Initialize the global tracing subscriber.
///
/// Production emits JSON lines, development emits pretty ANSI output.
/// Filtering follows `RUST_LOG` and defaults to `info`.
///
/// An OpenTelemetry layer is always attached; it is a no-op until a tracer
/// provider is installed (see [`crate::TelemetryGuard`]). Calling this twice
/// is harmless: the second call leaves the first subscriber in place.
pub fn setup_logging(environment: Environment) {
    let registry = tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_opentelemetry::layer());

    let result = match environment {
        Environment::Production => registry
            .with(tracing_subscriber::fmt::layer().json().with_level(true))
            .try_init(),
        Environment::Development => registry
            .with(tracing_subscriber::fmt::layer().pretty().with_ansi(true))
            .try_init(),
    };

    if result.is_err() {
        tracing::debug!("Global subscriber already installed, keeping it");
    }
}
