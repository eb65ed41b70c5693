//! Scammer channel configuration

use secrecy::SecretString;
use serde::Deserialize;

use super::error::ValidationError;

/// Which scammer-channel adapter to construct.
///
/// Chosen once at startup; nothing downstream branches on it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelMode {
    Simulator,
    Live,
}

/// Scammer channel configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelConfig {
    /// Adapter selection
    #[serde(default = "default_mode")]
    pub mode: ChannelMode,

    /// Relay base URL, required in live mode
    #[serde(default)]
    pub base_url: Option<String>,

    /// API key for the relay
    #[serde(default)]
    pub api_key: Option<SecretString>,

    /// Per-request relay timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_mode() -> ChannelMode {
    ChannelMode::Simulator
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            base_url: None,
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ChannelConfig {
    /// Validate channel configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.mode == ChannelMode::Live {
            match &self.base_url {
                None => return Err(ValidationError::MissingChannelBaseUrl),
                Some(url) if !url.starts_with("http://") && !url.starts_with("https://") => {
                    return Err(ValidationError::InvalidChannelBaseUrl)
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}
