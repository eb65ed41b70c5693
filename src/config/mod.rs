//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment
//! variables using the `config` and `dotenvy` crates. Configuration is
//! loaded with the `HONEYLURE` prefix and nested values use double
//! underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use honeylure::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server listening on {}", config.server.bind_addr());
//! ```

mod channel;
mod engagement;
mod error;
mod extraction;
mod reporting;
mod server;

pub use channel::{ChannelConfig, ChannelMode};
pub use engagement::{DetectionConfig, EngagementConfig};
pub use error::{ConfigError, ValidationError};
pub use extraction::ExtractionConfig;
pub use reporting::ReportingConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Every section has workable defaults, so the service runs with an empty
/// environment; validation still rejects incoherent overrides at startup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment, API key)
    #[serde(default)]
    pub server: ServerConfig,

    /// Scam detection configuration
    #[serde(default)]
    pub detection: DetectionConfig,

    /// Engagement and termination policy configuration
    #[serde(default)]
    pub engagement: EngagementConfig,

    /// Intelligence extraction configuration
    #[serde(default)]
    pub extraction: ExtractionConfig,

    /// Final-report delivery configuration
    #[serde(default)]
    pub reporting: ReportingConfig,

    /// Scammer channel configuration
    #[serde(default)]
    pub channel: ChannelConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with the `HONEYLURE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `HONEYLURE__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `HONEYLURE__DETECTION__THRESHOLD=70` -> `detection.threshold = 70`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("HONEYLURE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// Invalid static configuration is rejected here, at startup, rather
    /// than running with silently incoherent policy.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.detection.validate()?;
        self.engagement.validate()?;
        self.extraction.validate()?;
        self.reporting.validate()?;
        self.channel.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
