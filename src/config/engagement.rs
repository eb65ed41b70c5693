//! Detection and engagement policy configuration

use serde::Deserialize;

use crate::domain::engagement::TerminationPolicy;
use crate::domain::foundation::PersonaId;
use crate::domain::persona::catalog;

use super::error::ValidationError;

/// Scam detection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DetectionConfig {
    /// Engagement threshold on the 0-100 confidence scale
    #[serde(default = "default_threshold")]
    pub threshold: u8,
}

fn default_threshold() -> u8 {
    60
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
        }
    }
}

impl DetectionConfig {
    /// Validate detection configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.threshold > 100 {
            return Err(ValidationError::InvalidThreshold);
        }
        Ok(())
    }
}

/// Engagement and termination policy configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EngagementConfig {
    /// Hard turn limit per session
    #[serde(default = "default_max_turns")]
    pub max_turns: u32,

    /// Wall-clock session timeout
    #[serde(default = "default_session_timeout_secs")]
    pub session_timeout_secs: u64,

    /// Payment-identifying artifacts required by the sufficiency rule
    #[serde(default = "default_artifact_minimum")]
    pub sufficient_payment_artifacts: usize,

    /// Contact-identifying artifacts required by the sufficiency rule
    #[serde(default = "default_artifact_minimum")]
    pub sufficient_contact_artifacts: usize,

    /// Select personas by scam-type affinity; when false the default
    /// persona handles everything
    #[serde(default = "default_persona_auto_select")]
    pub persona_auto_select: bool,

    /// Pin every session to one persona id
    #[serde(default)]
    pub persona_override: Option<String>,

    /// Idle-sweep cadence
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

fn default_max_turns() -> u32 {
    20
}

fn default_session_timeout_secs() -> u64 {
    1_800
}

fn default_artifact_minimum() -> usize {
    1
}

fn default_persona_auto_select() -> bool {
    true
}

fn default_sweep_interval_secs() -> u64 {
    60
}

impl Default for EngagementConfig {
    fn default() -> Self {
        Self {
            max_turns: default_max_turns(),
            session_timeout_secs: default_session_timeout_secs(),
            sufficient_payment_artifacts: default_artifact_minimum(),
            sufficient_contact_artifacts: default_artifact_minimum(),
            persona_auto_select: default_persona_auto_select(),
            persona_override: None,
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

impl EngagementConfig {
    /// Validate engagement configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_turns == 0 {
            return Err(ValidationError::InvalidMaxTurns);
        }
        if self.session_timeout_secs == 0 {
            return Err(ValidationError::InvalidSessionTimeout);
        }
        if self.sweep_interval_secs == 0 {
            return Err(ValidationError::InvalidSweepInterval);
        }
        if self.sufficient_payment_artifacts == 0 || self.sufficient_contact_artifacts == 0 {
            return Err(ValidationError::InvalidArtifactMinimums);
        }
        if let Some(raw) = self.persona_override.as_deref() {
            let known = self
                .persona_override_id()
                .map(|id| catalog().get(&id).is_some())
                .unwrap_or(false);
            if !known {
                return Err(ValidationError::UnknownPersonaOverride(raw.to_string()));
            }
        }
        Ok(())
    }

    /// The configured persona pin, parsed
    pub fn persona_override_id(&self) -> Option<PersonaId> {
        self.persona_override
            .as_deref()
            .and_then(|raw| PersonaId::new(raw).ok())
    }

    /// Build the termination policy from this configuration
    pub fn termination_policy(&self) -> TerminationPolicy {
        TerminationPolicy::new(
            self.max_turns,
            self.session_timeout_secs,
            self.sufficient_payment_artifacts,
            self.sufficient_contact_artifacts,
        )
    }
}
