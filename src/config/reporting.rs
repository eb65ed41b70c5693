//! Reporting configuration

use secrecy::SecretString;
use serde::Deserialize;

use super::error::ValidationError;

/// Final-report delivery configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ReportingConfig {
    /// Collection endpoint; reports go to the log when unset
    #[serde(default)]
    pub endpoint: Option<String>,

    /// API key sent in the `x-api-key` header
    #[serde(default)]
    pub api_key: Option<SecretString>,

    /// Per-attempt delivery timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries after the initial attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base delay for exponential backoff between retries
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Token-bucket burst size for outbound calls
    #[serde(default = "default_burst_capacity")]
    pub burst_capacity: u32,

    /// Sustained outbound call rate
    #[serde(default = "default_calls_per_minute")]
    pub calls_per_minute: u32,
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    500
}

fn default_burst_capacity() -> u32 {
    5
}

fn default_calls_per_minute() -> u32 {
    30
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
            burst_capacity: default_burst_capacity(),
            calls_per_minute: default_calls_per_minute(),
        }
    }
}

impl ReportingConfig {
    /// Validate reporting configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(endpoint) = &self.endpoint {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err(ValidationError::InvalidReportingEndpoint);
            }
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidReportingTimeout);
        }
        Ok(())
    }

    /// Bucket refill rate in tokens per second
    pub fn refill_per_sec(&self) -> f64 {
        f64::from(self.calls_per_minute.max(1)) / 60.0
    }
}
