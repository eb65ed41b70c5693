//! Accumulated intelligence for a session.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A bank account artifact anchored on an IFSC code.
///
/// The account number is absent when no account-shaped token appeared near
/// the IFSC; the bank name is absent when the IFSC prefix is not in the
/// static lookup table. Neither case drops the artifact.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BankAccount {
    pub account_number: Option<String>,
    pub ifsc: String,
    pub bank_name: Option<String>,
}

impl fmt::Display for BankAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let number = self.account_number.as_deref().unwrap_or("unknown");
        match &self.bank_name {
            Some(bank) => write!(f, "{} ({}, {})", number, self.ifsc, bank),
            None => write!(f, "{} ({})", number, self.ifsc),
        }
    }
}

/// Supported cryptocurrency chains for address shape checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CryptoChain {
    Bitcoin,
    Ethereum,
}

impl fmt::Display for CryptoChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CryptoChain::Bitcoin => write!(f, "bitcoin"),
            CryptoChain::Ethereum => write!(f, "ethereum"),
        }
    }
}

/// A cryptocurrency address reported per matching chain.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CryptoAddress {
    pub chain: CryptoChain,
    pub address: String,
}

/// Deduplicated artifacts harvested from a session.
///
/// Every value is stored normalized (handles, URLs, and emails lowercased;
/// IFSC codes uppercased; phone numbers in E.164), which makes `merge` a
/// plain set union: commutative, associative, and idempotent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntelligenceRecord {
    pub bank_accounts: BTreeSet<BankAccount>,
    pub upi_handles: BTreeSet<String>,
    pub phone_numbers: BTreeSet<String>,
    pub urls: BTreeSet<String>,
    pub emails: BTreeSet<String>,
    pub crypto_addresses: BTreeSet<CryptoAddress>,
    pub suspicious_keywords: BTreeSet<String>,
}

impl IntelligenceRecord {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Union-merges another record into this one.
    pub fn merge(&mut self, other: IntelligenceRecord) {
        self.bank_accounts.extend(other.bank_accounts);
        self.upi_handles.extend(other.upi_handles);
        self.phone_numbers.extend(other.phone_numbers);
        self.urls.extend(other.urls);
        self.emails.extend(other.emails);
        self.crypto_addresses.extend(other.crypto_addresses);
        self.suspicious_keywords.extend(other.suspicious_keywords);
    }

    /// Returns the union of two records without mutating either.
    pub fn merged(mut a: IntelligenceRecord, b: IntelligenceRecord) -> IntelligenceRecord {
        a.merge(b);
        a
    }

    /// True when no artifact of any kind has been captured.
    ///
    /// Suspicious keywords are colour, not identity, and do not count.
    pub fn is_empty(&self) -> bool {
        self.bank_accounts.is_empty()
            && self.upi_handles.is_empty()
            && self.phone_numbers.is_empty()
            && self.urls.is_empty()
            && self.emails.is_empty()
            && self.crypto_addresses.is_empty()
    }

    /// Number of payment-identifying artifacts (bank account, UPI handle,
    /// or crypto address).
    pub fn payment_artifact_count(&self) -> usize {
        self.bank_accounts.len() + self.upi_handles.len() + self.crypto_addresses.len()
    }

    /// Number of contact-identifying artifacts (phone number or URL).
    pub fn contact_artifact_count(&self) -> usize {
        self.phone_numbers.len() + self.urls.len()
    }

    /// Number of high-value artifacts overall.
    ///
    /// Used by the reply selector to notice when a turn just captured
    /// something worth stalling over.
    pub fn high_value_count(&self) -> usize {
        self.payment_artifact_count() + self.contact_artifact_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with_upi(handle: &str) -> IntelligenceRecord {
        let mut record = IntelligenceRecord::new();
        record.upi_handles.insert(handle.to_string());
        record
    }

    fn record_with_phone(number: &str) -> IntelligenceRecord {
        let mut record = IntelligenceRecord::new();
        record.phone_numbers.insert(number.to_string());
        record
    }

    #[test]
    fn new_record_is_empty() {
        assert!(IntelligenceRecord::new().is_empty());
    }

    #[test]
    fn keywords_alone_do_not_count_as_artifacts() {
        let mut record = IntelligenceRecord::new();
        record.suspicious_keywords.insert("urgent".to_string());
        assert!(record.is_empty());
    }

    #[test]
    fn merge_is_commutative() {
        let a = record_with_upi("a@paytm");
        let b = record_with_phone("+919876543210");
        assert_eq!(
            IntelligenceRecord::merged(a.clone(), b.clone()),
            IntelligenceRecord::merged(b, a)
        );
    }

    #[test]
    fn merge_is_associative() {
        let a = record_with_upi("a@paytm");
        let b = record_with_phone("+919876543210");
        let c = record_with_upi("c@ybl");

        let left = IntelligenceRecord::merged(IntelligenceRecord::merged(a.clone(), b.clone()), c.clone());
        let right = IntelligenceRecord::merged(a, IntelligenceRecord::merged(b, c));
        assert_eq!(left, right);
    }

    #[test]
    fn merge_is_idempotent() {
        let a = record_with_upi("a@paytm");
        assert_eq!(IntelligenceRecord::merged(a.clone(), a.clone()), a);
    }

    #[test]
    fn artifact_counts_split_payment_and_contact() {
        let mut record = IntelligenceRecord::new();
        record.upi_handles.insert("x@ybl".to_string());
        record.bank_accounts.insert(BankAccount {
            account_number: Some("123456789".to_string()),
            ifsc: "SBIN0001234".to_string(),
            bank_name: Some("State Bank of India".to_string()),
        });
        record.urls.insert("http://phish.example".to_string());

        assert_eq!(record.payment_artifact_count(), 2);
        assert_eq!(record.contact_artifact_count(), 1);
        assert_eq!(record.high_value_count(), 3);
    }

    #[test]
    fn bank_account_display_includes_bank_when_resolved() {
        let with_bank = BankAccount {
            account_number: Some("1234567890".to_string()),
            ifsc: "HDFC0001234".to_string(),
            bank_name: Some("HDFC Bank".to_string()),
        };
        assert_eq!(with_bank.to_string(), "1234567890 (HDFC0001234, HDFC Bank)");

        let without_bank = BankAccount {
            account_number: None,
            ifsc: "ZZZZ0001234".to_string(),
            bank_name: None,
        };
        assert_eq!(without_bank.to_string(), "unknown (ZZZZ0001234)");
    }
}
