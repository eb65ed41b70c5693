//! Closed set of scam categories.
//!
//! Each variant carries its weight and pattern table as associated data so
//! callers never branch category-by-category.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Scam category recognized by the detector.
///
/// Declaration order doubles as the fixed tie-break priority: when two
/// categories score identically (same normalized score, same raw match
/// count), the one declared first wins. The order is defined once here and
/// never recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScamType {
    BankingFraud,
    UpiPayment,
    Impersonation,
    TechSupport,
    PrizeLottery,
    InvestmentCrypto,
}

impl ScamType {
    /// All categories in fixed priority order.
    pub const ALL: [ScamType; 6] = [
        ScamType::BankingFraud,
        ScamType::UpiPayment,
        ScamType::Impersonation,
        ScamType::TechSupport,
        ScamType::PrizeLottery,
        ScamType::InvestmentCrypto,
    ];

    /// Tie-break priority: lower is stronger.
    pub fn priority(&self) -> usize {
        Self::ALL
            .iter()
            .position(|t| t == self)
            .expect("every variant is listed in ALL")
    }

    /// Confidence weight applied to this category's raw match count.
    pub fn weight(&self) -> f64 {
        match self {
            ScamType::BankingFraud => 1.3,
            ScamType::UpiPayment => 1.3,
            ScamType::Impersonation => 1.2,
            ScamType::TechSupport => 1.1,
            ScamType::PrizeLottery => 1.0,
            ScamType::InvestmentCrypto => 1.0,
        }
    }

    /// Case-insensitive keyword table for this category.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            ScamType::BankingFraud => &[
                "account",
                "blocked",
                "verify",
                "suspended",
                "kyc",
                "otp",
                "bank",
                "ifsc",
                "net banking",
                "debit card",
                "atm pin",
                "unauthorized transaction",
            ],
            ScamType::UpiPayment => &[
                "upi",
                "paytm",
                "phonepe",
                "google pay",
                "collect request",
                "cashback",
                "wallet",
                "upi pin",
                "payment failed",
                "refund",
            ],
            ScamType::Impersonation => &[
                "income tax",
                "police",
                "arrest",
                "court",
                "legal action",
                "customs",
                "government",
                "officer",
                "aadhaar",
                "pan card",
                "fine",
                "complaint",
            ],
            ScamType::TechSupport => &[
                "virus",
                "malware",
                "microsoft",
                "computer",
                "antivirus",
                "remote access",
                "teamviewer",
                "infected",
                "license",
                "security patch",
            ],
            ScamType::PrizeLottery => &[
                "won",
                "winner",
                "prize",
                "lottery",
                "congratulations",
                "claim",
                "lucky draw",
                "processing fee",
                "reward",
                "selected",
            ],
            ScamType::InvestmentCrypto => &[
                "investment",
                "returns",
                "profit",
                "trading",
                "bitcoin",
                "crypto",
                "double your money",
                "guaranteed",
                "minimum investment",
            ],
        }
    }
}

impl fmt::Display for ScamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ScamType::BankingFraud => "banking_fraud",
            ScamType::UpiPayment => "upi_payment",
            ScamType::Impersonation => "impersonation",
            ScamType::TechSupport => "tech_support",
            ScamType::PrizeLottery => "prize_lottery",
            ScamType::InvestmentCrypto => "investment_crypto",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for ScamType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "banking_fraud" => Ok(ScamType::BankingFraud),
            "upi_payment" => Ok(ScamType::UpiPayment),
            "impersonation" => Ok(ScamType::Impersonation),
            "tech_support" => Ok(ScamType::TechSupport),
            "prize_lottery" => Ok(ScamType::PrizeLottery),
            "investment_crypto" => Ok(ScamType::InvestmentCrypto),
            other => Err(format!("unknown scam type: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_follows_declaration_order() {
        assert_eq!(ScamType::BankingFraud.priority(), 0);
        assert_eq!(ScamType::InvestmentCrypto.priority(), 5);
    }

    #[test]
    fn every_category_has_keywords() {
        for scam_type in ScamType::ALL {
            assert!(!scam_type.keywords().is_empty());
        }
    }

    #[test]
    fn display_roundtrips_through_from_str() {
        for scam_type in ScamType::ALL {
            let parsed: ScamType = scam_type.to_string().parse().unwrap();
            assert_eq!(parsed, scam_type);
        }
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&ScamType::BankingFraud).unwrap();
        assert_eq!(json, "\"banking_fraud\"");
    }
}
