//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid port number")]
    InvalidPort,

    #[error("Detection threshold must be within 0..=100")]
    InvalidThreshold,

    #[error("max_turns must be greater than zero")]
    InvalidMaxTurns,

    #[error("session_timeout_secs must be greater than zero")]
    InvalidSessionTimeout,

    #[error("sweep_interval_secs must be greater than zero")]
    InvalidSweepInterval,

    #[error("Sufficient-intelligence artifact minimums must be at least 1")]
    InvalidArtifactMinimums,

    #[error("Persona override '{0}' is not in the catalog")]
    UnknownPersonaOverride(String),

    #[error("Reporting endpoint must be an http(s) URL")]
    InvalidReportingEndpoint,

    #[error("Reporting timeout must be greater than zero")]
    InvalidReportingTimeout,

    #[error("Live channel mode requires channel.base_url")]
    MissingChannelBaseUrl,

    #[error("Channel base_url must be an http(s) URL")]
    InvalidChannelBaseUrl,

    #[error("API key is required in production")]
    ApiKeyRequiredInProduction,
}
