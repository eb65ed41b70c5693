//! Extraction configuration

use serde::Deserialize;

use crate::domain::intel::{EnabledExtractors, ExtractorKind};

use super::error::ValidationError;

/// Intelligence extraction configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionConfig {
    /// Extraction rules to run; everything by default
    #[serde(default = "default_enabled")]
    pub enabled: Vec<ExtractorKind>,
}

fn default_enabled() -> Vec<ExtractorKind> {
    ExtractorKind::ALL.to_vec()
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
        }
    }
}

impl ExtractionConfig {
    /// Validate extraction configuration
    ///
    /// An empty rule set is legal (the extractor degrades to empty records),
    /// so there is nothing to reject here.
    pub fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }

    /// The enabled rules as the domain set type
    pub fn enabled_set(&self) -> EnabledExtractors {
        EnabledExtractors::from_kinds(self.enabled.iter().copied())
    }
}
