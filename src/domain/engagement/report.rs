//! The final intelligence report.
//!
//! Produced exactly once per session on termination and handed to the
//! reporting collaborator. Field names follow the external wire contract.

use serde::{Deserialize, Serialize};

use crate::domain::session::Session;

/// Harvested artifacts in wire form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedIntelligence {
    pub bank_accounts: Vec<String>,
    pub upi_ids: Vec<String>,
    pub phishing_links: Vec<String>,
    pub phone_numbers: Vec<String>,
    pub suspicious_keywords: Vec<String>,
}

/// The outbound final-report payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalReport {
    pub session_id: String,
    pub scam_detected: bool,
    pub total_messages_exchanged: u32,
    pub extracted_intelligence: ExtractedIntelligence,
    pub agent_notes: String,
}

impl FinalReport {
    /// Builds the report from a finalized session.
    pub fn from_session(session: &Session) -> Self {
        let intel = session.intelligence();

        let extracted = ExtractedIntelligence {
            bank_accounts: intel.bank_accounts.iter().map(|a| a.to_string()).collect(),
            upi_ids: intel.upi_handles.iter().cloned().collect(),
            phishing_links: intel.urls.iter().cloned().collect(),
            phone_numbers: intel.phone_numbers.iter().cloned().collect(),
            suspicious_keywords: intel.suspicious_keywords.iter().cloned().collect(),
        };

        Self {
            session_id: session.id().to_string(),
            scam_detected: session.scam_detected(),
            total_messages_exchanged: session.messages().len() as u32,
            extracted_intelligence: extracted,
            agent_notes: Self::build_notes(session),
        }
    }

    /// Human-readable summary, carrying artifacts that have no dedicated
    /// field in the wire contract (crypto addresses, emails).
    fn build_notes(session: &Session) -> String {
        let mut notes = Vec::new();

        match session.scam_type() {
            Some(scam_type) => notes.push(format!(
                "Scam type: {} (confidence {}%)",
                scam_type,
                session.confidence()
            )),
            None => notes.push(format!(
                "Not classified as a scam (confidence {}%)",
                session.confidence()
            )),
        }

        if let Some(persona_id) = session.persona_id() {
            notes.push(format!("Persona: {}", persona_id));
        }
        if let Some(reason) = session.ended_reason() {
            notes.push(format!("Ended: {}", reason));
        }
        notes.push(format!("Turns: {}", session.turn_count()));

        let intel = session.intelligence();
        if !intel.crypto_addresses.is_empty() {
            let addresses: Vec<String> = intel
                .crypto_addresses
                .iter()
                .map(|a| format!("{}:{}", a.chain, a.address))
                .collect();
            notes.push(format!("Crypto addresses: {}", addresses.join(", ")));
        }
        if !intel.emails.is_empty() {
            let emails: Vec<String> = intel.emails.iter().cloned().collect();
            notes.push(format!("Emails: {}", emails.join(", ")));
        }

        notes.join(" | ")
    }
}
