//! # Gate Telemetry
//!
//! Structured logging for the governance bridge binaries.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gate_telemetry::{init_tracing, TelemetryConfig};
//!
//! let config = TelemetryConfig::from_env().with_service_name("resolve-proposal");
//! init_tracing(&config)?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OTEL_SERVICE_NAME` | `governance-bridge` | Service name in logs |
//! | `GB_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `GB_JSON_LOGS` | `false` | JSON formatted output |

#![warn(missing_docs)]

mod config;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use tracing_setup::{build_env_filter, init_tracing};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// Subscriber could not be installed.
    #[error("Failed to initialize tracing subscriber: {0}")]
    Init(String),

    /// Filter or other configuration is invalid.
    #[error("Invalid configuration: {0}")]
    Config(String),
}
