//! Intelligence extraction - pulls structured artifacts from scammer text.
//!
//! Extraction is deterministic and idempotent; merging two records is a pure
//! set union, so results can be accumulated across turns in any order.

mod banks;
mod extractor;
mod handles;
mod record;

pub use banks::bank_for_prefix;
pub use extractor::{artifact_spans, EnabledExtractors, ExtractorKind, IntelligenceExtractor};
pub use record::{BankAccount, CryptoAddress, CryptoChain, IntelligenceRecord};
