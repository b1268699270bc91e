//! Tracing subscriber configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Tracing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TracingConfig {
    /// Log level filter, used when `RUST_LOG` is not set
    pub log_level: String,

    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
        }
    }
}

/// `RUST_LOG` wins over the configured level.
pub fn build_filter(config: &TracingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level))
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_tracing(service_name: &str, config: &TracingConfig) -> Result<()> {
    let filter = build_filter(config);

    if config.json {
        let fmt_layer = fmt::layer()
            .json()
            .with_current_span(true)
            .with_target(true)
            .with_thread_ids(true);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .try_init()
            .context("failed to install tracing subscriber")?;
    } else {
        let fmt_layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .try_init()
            .context("failed to install tracing subscriber")?;
    }

    ::tracing::info!(service = service_name, level = %config.log_level, "tracing initialized");
    Ok(())
}
