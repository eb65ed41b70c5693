//! The intelligence extractor.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::ops::Range;
use std::sync::Arc;

use crate::ports::PhoneValidator;

use super::{bank_for_prefix, handles, BankAccount, CryptoAddress, CryptoChain, IntelligenceRecord};

/// Input beyond this many characters is ignored rather than rejected.
const MAX_INPUT_CHARS: usize = 10_000;

/// How far (in whitespace tokens) an account number may sit from its IFSC.
const ACCOUNT_TOKEN_WINDOW: usize = 12;

/// Region assumed for phone candidates without an explicit country code.
const DEFAULT_PHONE_REGION: &str = "IN";

/// Punctuation stripped from the tail of URL matches.
const URL_TRAILING_PUNCT: &[char] = &['.', ',', ';', ':', '!', '?', ')', ']'];

static IFSC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Za-z]{4}0[A-Za-z0-9]{6}\b").expect("ifsc pattern is valid"));

static ACCOUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{9,18}\b").expect("account pattern is valid"));

static HANDLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Za-z0-9][A-Za-z0-9._-]*@[A-Za-z0-9][A-Za-z0-9.-]*")
        .expect("handle pattern is valid")
});

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b")
        .expect("email pattern is valid")
});

static URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)https?://[^\s<>"']+"#).expect("url pattern is valid"));

static PHONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\+?\d[\d\s().-]{6,16}\d").expect("phone pattern is valid"));

static BITCOIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[13][a-km-zA-HJ-NP-Z1-9]{25,34}\b").expect("bitcoin pattern is valid")
});

static ETHEREUM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b0x[a-fA-F0-9]{40}\b").expect("ethereum pattern is valid"));

/// Words and phrases recorded as suspicious when present.
static SUSPICIOUS_KEYWORDS: &[&str] = &[
    "urgent",
    "immediately",
    "verify",
    "confirm",
    "account blocked",
    "suspended",
    "expire",
    "click here",
    "limited time",
    "act now",
    "congratulations",
    "winner",
    "prize",
    "lottery",
    "reward",
    "claim",
    "police",
    "arrest",
    "legal action",
    "court",
    "fine",
    "tax",
    "refund",
    "payment",
    "transfer",
    "send money",
    "otp",
    "kyc",
    "processing fee",
];

/// One switchable extraction rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractorKind {
    BankAccounts,
    UpiHandles,
    PhoneNumbers,
    Urls,
    Emails,
    CryptoAddresses,
    SuspiciousKeywords,
}

impl ExtractorKind {
    /// Every extraction rule.
    pub const ALL: [ExtractorKind; 7] = [
        ExtractorKind::BankAccounts,
        ExtractorKind::UpiHandles,
        ExtractorKind::PhoneNumbers,
        ExtractorKind::Urls,
        ExtractorKind::Emails,
        ExtractorKind::CryptoAddresses,
        ExtractorKind::SuspiciousKeywords,
    ];
}

/// The set of extraction rules switched on by configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnabledExtractors(BTreeSet<ExtractorKind>);

impl EnabledExtractors {
    /// All rules enabled.
    pub fn all() -> Self {
        Self(ExtractorKind::ALL.into_iter().collect())
    }

    /// No rules enabled.
    pub fn none() -> Self {
        Self(BTreeSet::new())
    }

    /// Enables one rule.
    pub fn with(mut self, kind: ExtractorKind) -> Self {
        self.0.insert(kind);
        self
    }

    /// Builds the set from an explicit list.
    pub fn from_kinds(kinds: impl IntoIterator<Item = ExtractorKind>) -> Self {
        Self(kinds.into_iter().collect())
    }

    /// Whether a rule is enabled.
    pub fn contains(&self, kind: ExtractorKind) -> bool {
        self.0.contains(&kind)
    }

    /// True when no rule is enabled.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for EnabledExtractors {
    fn default() -> Self {
        Self::all()
    }
}

/// Extracts a partial `IntelligenceRecord` from arbitrary text.
///
/// Never fails: malformed, empty, or oversized input degrades to an empty
/// record. Re-running on identical text yields an identical record.
#[derive(Clone)]
pub struct IntelligenceExtractor {
    enabled: EnabledExtractors,
    phone_validator: Arc<dyn PhoneValidator>,
}

impl IntelligenceExtractor {
    /// Creates an extractor with the given rule set and phone capability.
    pub fn new(enabled: EnabledExtractors, phone_validator: Arc<dyn PhoneValidator>) -> Self {
        Self {
            enabled,
            phone_validator,
        }
    }

    /// Runs every enabled rule over `text`.
    pub fn extract(&self, text: &str) -> IntelligenceRecord {
        let text = bounded(text);
        let mut record = IntelligenceRecord::new();
        if text.trim().is_empty() {
            return record;
        }

        if self.enabled.contains(ExtractorKind::BankAccounts) {
            extract_bank_accounts(text, &mut record);
        }
        if self.enabled.contains(ExtractorKind::UpiHandles) {
            extract_upi_handles(text, &mut record);
        }
        if self.enabled.contains(ExtractorKind::PhoneNumbers) {
            self.extract_phone_numbers(text, &mut record);
        }
        if self.enabled.contains(ExtractorKind::Urls) {
            extract_urls(text, &mut record);
        }
        if self.enabled.contains(ExtractorKind::Emails) {
            extract_emails(text, &mut record);
        }
        if self.enabled.contains(ExtractorKind::CryptoAddresses) {
            extract_crypto_addresses(text, &mut record);
        }
        if self.enabled.contains(ExtractorKind::SuspiciousKeywords) {
            extract_suspicious_keywords(text, &mut record);
        }

        record
    }

    fn extract_phone_numbers(&self, text: &str, record: &mut IntelligenceRecord) {
        for m in PHONE.find_iter(text) {
            // An invalid candidate or a capability failure discards just
            // this one candidate.
            if let Ok(normalized) = self
                .phone_validator
                .normalize(m.as_str(), DEFAULT_PHONE_REGION)
            {
                record.phone_numbers.insert(normalized);
            }
        }
    }
}

/// Byte ranges of every artifact-shaped span in `text`.
///
/// The reply perturbation strategy consults this before mutating anything:
/// a span that any extraction pattern would match must stay byte-identical.
pub fn artifact_spans(text: &str) -> Vec<Range<usize>> {
    let text = bounded(text);
    let mut spans = Vec::new();
    for pattern in [
        &*IFSC, &*ACCOUNT, &*HANDLE, &*EMAIL, &*URL, &*PHONE, &*BITCOIN, &*ETHEREUM,
    ] {
        for m in pattern.find_iter(text) {
            spans.push(m.range());
        }
    }
    spans.sort_by_key(|range| (range.start, range.end));
    spans
}

/// Caps input length; extraction never rejects oversized text.
fn bounded(text: &str) -> &str {
    match text.char_indices().nth(MAX_INPUT_CHARS) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Index of the whitespace-separated token containing `byte_offset`.
fn token_index(text: &str, byte_offset: usize) -> usize {
    text[..byte_offset].split_whitespace().count()
}

fn extract_bank_accounts(text: &str, record: &mut IntelligenceRecord) {
    let accounts: Vec<(usize, &str)> = ACCOUNT
        .find_iter(text)
        .map(|m| (token_index(text, m.start()), m.as_str()))
        .collect();

    for m in IFSC.find_iter(text) {
        let ifsc = m.as_str().to_uppercase();
        let ifsc_token = token_index(text, m.start());

        // Nearest account-shaped token within the window; ties go to the
        // earlier token.
        let account_number = accounts
            .iter()
            .map(|(idx, digits)| (idx.abs_diff(ifsc_token), *idx, *digits))
            .filter(|(distance, _, _)| *distance <= ACCOUNT_TOKEN_WINDOW)
            .min_by_key(|(distance, idx, _)| (*distance, *idx))
            .map(|(_, _, digits)| digits.to_string());

        let bank_name = bank_for_prefix(&ifsc[..4]).map(String::from);

        record.bank_accounts.insert(BankAccount {
            account_number,
            ifsc,
            bank_name,
        });
    }
}

fn extract_upi_handles(text: &str, record: &mut IntelligenceRecord) {
    for m in HANDLE.find_iter(text) {
        let candidate = m.as_str().to_lowercase();
        let Some((_, domain)) = candidate.rsplit_once('@') else {
            continue;
        };
        if handles::is_email_provider(domain) {
            continue;
        }
        if handles::is_payment_domain(domain) {
            record.upi_handles.insert(candidate);
        }
    }
}

fn extract_urls(text: &str, record: &mut IntelligenceRecord) {
    for m in URL.find_iter(text) {
        let url = m.as_str().trim_end_matches(URL_TRAILING_PUNCT).to_lowercase();
        if !url.is_empty() {
            record.urls.insert(url);
        }
    }
}

fn extract_emails(text: &str, record: &mut IntelligenceRecord) {
    for m in EMAIL.find_iter(text) {
        let email = m.as_str().to_lowercase();
        let Some((_, domain)) = email.rsplit_once('@') else {
            continue;
        };
        // Payment handles never carry a dotted provider domain, so anything
        // here is mail, not money, unless the allowlist says otherwise.
        if !handles::is_payment_domain(domain) {
            record.emails.insert(email);
        }
    }
}

fn extract_crypto_addresses(text: &str, record: &mut IntelligenceRecord) {
    for m in BITCOIN.find_iter(text) {
        record.crypto_addresses.insert(CryptoAddress {
            chain: CryptoChain::Bitcoin,
            address: m.as_str().to_string(),
        });
    }
    for m in ETHEREUM.find_iter(text) {
        record.crypto_addresses.insert(CryptoAddress {
            chain: CryptoChain::Ethereum,
            address: m.as_str().to_string(),
        });
    }
}

fn extract_suspicious_keywords(text: &str, record: &mut IntelligenceRecord) {
    let lower = text.to_lowercase();
    for keyword in SUSPICIOUS_KEYWORDS {
        if lower.contains(keyword) {
            record.suspicious_keywords.insert((*keyword).to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::HeuristicPhoneValidator;
    use proptest::prelude::*;

    fn extractor() -> IntelligenceExtractor {
        IntelligenceExtractor::new(
            EnabledExtractors::all(),
            Arc::new(HeuristicPhoneValidator::new()),
        )
    }

    // Degradation paths

    #[test]
    fn empty_input_yields_empty_record() {
        assert!(extractor().extract("").is_empty());
        assert!(extractor().extract("   \n ").is_empty());
    }

    #[test]
    fn oversized_input_is_truncated_not_rejected() {
        let mut text = "x".repeat(MAX_INPUT_CHARS + 100);
        text.push_str(" scammer@paytm");
        let record = extractor().extract(&text);
        // The handle sits past the cap and is ignored.
        assert!(record.upi_handles.is_empty());
    }

    // Bank accounts

    #[test]
    fn pairs_account_with_nearby_ifsc_and_resolves_bank() {
        let record = extractor().extract(
            "Your account will be blocked. Verify at http://fake-bank.com, \
             IFSC HDFC0001234, account 1234567890",
        );

        assert_eq!(record.urls.len(), 1);
        assert!(record.urls.contains("http://fake-bank.com"));

        assert_eq!(record.bank_accounts.len(), 1);
        let account = record.bank_accounts.iter().next().unwrap();
        assert_eq!(account.account_number.as_deref(), Some("1234567890"));
        assert_eq!(account.ifsc, "HDFC0001234");
        assert_eq!(account.bank_name.as_deref(), Some("HDFC Bank"));
    }

    #[test]
    fn unresolved_ifsc_prefix_is_kept_without_bank_name() {
        let record = extractor().extract("Send to 123456789 IFSC ZZZZ0XY9876");
        let account = record.bank_accounts.iter().next().unwrap();
        assert_eq!(account.ifsc, "ZZZZ0XY9876");
        assert!(account.bank_name.is_none());
        assert_eq!(account.account_number.as_deref(), Some("123456789"));
    }

    #[test]
    fn standalone_ifsc_is_recorded_without_account() {
        let record = extractor().extract("My branch code is SBIN0004321, nothing else.");
        let account = record.bank_accounts.iter().next().unwrap();
        assert!(account.account_number.is_none());
        assert_eq!(account.bank_name.as_deref(), Some("State Bank of India"));
    }

    #[test]
    fn account_outside_token_window_is_not_paired() {
        let filler = "word ".repeat(ACCOUNT_TOKEN_WINDOW + 3);
        let text = format!("account 987654321 {}IFSC ICIC0001111", filler);
        let record = extractor().extract(&text);
        let account = record.bank_accounts.iter().next().unwrap();
        assert!(account.account_number.is_none());
    }

    #[test]
    fn ifsc_is_uppercased() {
        let record = extractor().extract("ifsc hdfc0001234 please");
        assert_eq!(record.bank_accounts.iter().next().unwrap().ifsc, "HDFC0001234");
    }

    // UPI handles

    #[test]
    fn upi_handle_with_allowlisted_domain_is_accepted() {
        let record = extractor().extract("Pay to scammer@paytm right away");
        assert!(record.upi_handles.contains("scammer@paytm"));
    }

    #[test]
    fn plain_email_is_not_a_upi_handle() {
        let record = extractor().extract("contact me at bob@example.com");
        assert!(record.upi_handles.is_empty());
        assert!(record.emails.contains("bob@example.com"));
    }

    #[test]
    fn email_provider_domains_are_rejected_as_handles() {
        let record = extractor().extract("send to fraud@gmail.com");
        assert!(record.upi_handles.is_empty());
        assert!(record.emails.contains("fraud@gmail.com"));
    }

    #[test]
    fn handles_are_lowercased_for_dedup() {
        let record = extractor().extract("Winner@PhonePe or winner@phonepe");
        assert_eq!(record.upi_handles.len(), 1);
    }

    // Phones

    #[test]
    fn explicit_country_code_normalizes_to_e164() {
        let record = extractor().extract("Call +919876543210 now");
        assert!(record.phone_numbers.contains("+919876543210"));
    }

    #[test]
    fn bare_mobile_number_assumes_default_region() {
        let record = extractor().extract("my number is 98765 43210");
        assert!(record.phone_numbers.contains("+919876543210"));
    }

    #[test]
    fn invalid_phone_candidates_are_discarded() {
        // Account-shaped digit runs do not leak into the phone set.
        let record = extractor().extract("account number 1234567890123");
        assert!(record.phone_numbers.is_empty());
    }

    // URLs and crypto

    #[test]
    fn urls_are_deduplicated_case_insensitively() {
        let record = extractor().extract("go to HTTP://Phish.example/x and http://phish.example/x");
        assert_eq!(record.urls.len(), 1);
    }

    #[test]
    fn bitcoin_and_ethereum_addresses_are_split_by_chain() {
        let record = extractor().extract(
            "BTC 1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa or \
             ETH 0x52908400098527886E0F7030069857D2E4169EE7",
        );
        let chains: Vec<CryptoChain> =
            record.crypto_addresses.iter().map(|a| a.chain).collect();
        assert!(chains.contains(&CryptoChain::Bitcoin));
        assert!(chains.contains(&CryptoChain::Ethereum));
    }

    // Keywords and switches

    #[test]
    fn suspicious_keywords_are_collected() {
        let record = extractor().extract("URGENT: verify your KYC and pay the processing fee");
        assert!(record.suspicious_keywords.contains("urgent"));
        assert!(record.suspicious_keywords.contains("kyc"));
        assert!(record.suspicious_keywords.contains("processing fee"));
    }

    #[test]
    fn disabled_rules_extract_nothing() {
        let extractor = IntelligenceExtractor::new(
            EnabledExtractors::none().with(ExtractorKind::Urls),
            Arc::new(HeuristicPhoneValidator::new()),
        );
        let record =
            extractor.extract("scammer@paytm and http://phish.example and +919876543210");
        assert!(record.upi_handles.is_empty());
        assert!(record.phone_numbers.is_empty());
        assert_eq!(record.urls.len(), 1);
    }

    // Determinism and spans

    #[test]
    fn extraction_is_idempotent() {
        let text = "Pay scammer@paytm, acct 1234567890 IFSC SBIN0001234, call +919876543210, \
                    visit http://phish.example";
        assert_eq!(extractor().extract(text), extractor().extract(text));
    }

    #[test]
    fn artifact_spans_cover_every_artifact() {
        let text = "send to scammer@paytm or visit http://phish.example";
        let spans = artifact_spans(text);
        let handle_at = text.find("scammer@paytm").unwrap();
        let url_at = text.find("http://").unwrap();
        assert!(spans.iter().any(|r| r.contains(&handle_at)));
        assert!(spans.iter().any(|r| r.contains(&url_at)));
    }

    proptest! {
        #[test]
        fn merge_of_two_extractions_is_commutative(a in ".{0,200}", b in ".{0,200}") {
            let left = IntelligenceRecord::merged(extractor().extract(&a), extractor().extract(&b));
            let right = IntelligenceRecord::merged(extractor().extract(&b), extractor().extract(&a));
            prop_assert_eq!(left, right);
        }

        #[test]
        fn merging_an_extraction_with_itself_changes_nothing(a in ".{0,200}") {
            let once = extractor().extract(&a);
            let twice = IntelligenceRecord::merged(once.clone(), once.clone());
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn extraction_never_panics_on_arbitrary_input(a in "\\PC{0,500}") {
            let _ = extractor().extract(&a);
        }
    }
}
