//! Static IFSC-prefix to bank-name lookup.

/// IFSC prefix table for the banks most commonly named in collected reports.
///
/// Prefixes are the first four (alphabetic) characters of an IFSC code.
static BANK_PREFIXES: &[(&str, &str)] = &[
    ("SBIN", "State Bank of India"),
    ("HDFC", "HDFC Bank"),
    ("ICIC", "ICICI Bank"),
    ("AXIS", "Axis Bank"),
    ("UTIB", "Axis Bank"),
    ("PUNB", "Punjab National Bank"),
    ("BARB", "Bank of Baroda"),
    ("CNRB", "Canara Bank"),
    ("UBIN", "Union Bank of India"),
    ("IDIB", "Indian Bank"),
    ("IOBA", "Indian Overseas Bank"),
    ("KKBK", "Kotak Mahindra Bank"),
    ("YESB", "Yes Bank"),
    ("FDRL", "Federal Bank"),
    ("INDB", "IndusInd Bank"),
    ("IDFB", "IDFC First Bank"),
];

/// Resolves a bank name from the 4-letter IFSC prefix.
///
/// Matching is case-insensitive. Returns `None` for unknown prefixes; the
/// caller records the artifact without a bank name rather than dropping it.
pub fn bank_for_prefix(prefix: &str) -> Option<&'static str> {
    let upper = prefix.to_uppercase();
    BANK_PREFIXES
        .iter()
        .find(|(code, _)| *code == upper)
        .map(|(_, name)| *name)
}
