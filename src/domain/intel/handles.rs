//! Payment-handle allowlist and email-provider rejection list.
//!
//! The broad `local@domain` shape used for candidate discovery would match
//! every ordinary email address; the allowlist filter below is the defense
//! against that.

/// Domain parts accepted as instant-payment handles.
static PAYMENT_DOMAINS: &[&str] = &[
    "paytm",
    "phonepe",
    "googlepay",
    "gpay",
    "amazonpay",
    "apl",
    "bhim",
    "upi",
    "ybl",
    "ibl",
    "axl",
    "oksbi",
    "okaxis",
    "okicici",
    "okhdfcbank",
    "sbi",
    "icici",
    "hdfcbank",
    "axisbank",
    "kotak",
    "federal",
    "indus",
    "pnb",
    "cnrb",
    "boi",
    "fbl",
];

/// Domain parts of conventional email providers, always rejected as handles.
static EMAIL_PROVIDER_DOMAINS: &[&str] = &[
    "gmail.com",
    "yahoo.com",
    "yahoo.co.in",
    "hotmail.com",
    "outlook.com",
    "protonmail.com",
    "icloud.com",
    "aol.com",
    "mail.com",
    "zoho.com",
    "yandex.com",
    "rediffmail.com",
    "live.com",
];

/// True when the lowercased domain part is a known payment-handle suffix.
pub fn is_payment_domain(domain: &str) -> bool {
    PAYMENT_DOMAINS.contains(&domain)
}

/// True when the lowercased domain part looks like an email provider.
pub fn is_email_provider(domain: &str) -> bool {
    EMAIL_PROVIDER_DOMAINS.contains(&domain)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_suffixes_are_accepted() {
        assert!(is_payment_domain("paytm"));
        assert!(is_payment_domain("okhdfcbank"));
    }

    #[test]
    fn email_providers_are_flagged() {
        assert!(is_email_provider("gmail.com"));
        assert!(!is_email_provider("paytm"));
    }

    #[test]
    fn arbitrary_domains_are_neither() {
        assert!(!is_payment_domain("example.com"));
        assert!(!is_email_provider("example.com"));
    }
}
