//! Persona value objects.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::detection::ScamType;
use crate::domain::foundation::PersonaId;

/// Dominant conversational register of a persona.
///
/// Reply template buckets are keyed on this, so the set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonaTrait {
    /// Confused, slow, asks for things to be repeated.
    Hesitant,
    /// Excited, wants to move fast.
    Eager,
    /// Worried, seeks reassurance.
    Anxious,
    /// Terse, mid-task, short answers.
    Brisk,
}

/// How readily the persona appears to comply.
///
/// More vulnerable personas start probing for payment details earlier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VulnerabilityLevel {
    Low,
    Medium,
    MediumHigh,
    High,
}

impl VulnerabilityLevel {
    /// Earliest turn at which this persona plausibly asks for details.
    pub fn min_probe_turn(&self) -> u32 {
        match self {
            VulnerabilityLevel::High => 2,
            VulnerabilityLevel::MediumHigh => 3,
            VulnerabilityLevel::Medium => 4,
            VulnerabilityLevel::Low => 5,
        }
    }
}

/// A static decoy identity.
///
/// Personas are immutable reference data loaded once from the embedded
/// catalog; selection never mutates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    pub id: PersonaId,
    pub name: String,
    pub primary_trait: PersonaTrait,
    pub traits: Vec<String>,
    pub vulnerability: VulnerabilityLevel,
    /// Per-scam-type affinity weight, 0-100.
    pub affinities: BTreeMap<ScamType, u32>,
}

impl Persona {
    /// Affinity weight for a scam type, if this persona plays it.
    pub fn affinity_for(&self, scam_type: ScamType) -> Option<u32> {
        self.affinities.get(&scam_type).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn more_vulnerable_personas_probe_earlier() {
        assert!(
            VulnerabilityLevel::High.min_probe_turn()
                < VulnerabilityLevel::Low.min_probe_turn()
        );
    }

    #[test]
    fn affinity_lookup_misses_for_unlisted_types() {
        let persona = Persona {
            id: PersonaId::new("test").unwrap(),
            name: "Test".to_string(),
            primary_trait: PersonaTrait::Hesitant,
            traits: vec![],
            vulnerability: VulnerabilityLevel::Medium,
            affinities: BTreeMap::from([(ScamType::BankingFraud, 80)]),
        };
        assert_eq!(persona.affinity_for(ScamType::BankingFraud), Some(80));
        assert_eq!(persona.affinity_for(ScamType::PrizeLottery), None);
    }
}
