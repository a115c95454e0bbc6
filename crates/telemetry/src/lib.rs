//! Tracing subscriber setup shared by the Tomato binaries.

use anyhow::anyhow;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tomato_kernel::settings::{LogFormat, TelemetrySettings};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `settings.log_filter`. Fails if a
/// subscriber is already installed.
pub fn init(settings: &TelemetrySettings) -> anyhow::Result<()> {
    let filter = build_filter(&settings.log_filter)?;
    let registry = tracing_subscriber::registry().with(filter);

    let result = match settings.log_format {
        LogFormat::Pretty => registry.with(fmt::layer().with_target(true)).try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(true).with_target(true))
            .try_init(),
    };
    result.map_err(|e| anyhow!("failed to initialize tracing subscriber: {}", e))?;

    tracing::debug!(
        target: "tomato-telemetry",
        log_filter = %settings.log_filter,
        log_format = ?settings.log_format,
        "telemetry initialized"
    );

    Ok(())
}

fn build_filter(fallback: &str) -> anyhow::Result<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .map_err(|e| anyhow!("invalid log filter '{}': {}", fallback, e))
}
