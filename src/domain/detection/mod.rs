//! Scam detection - scores raw text against weighted category patterns.
//!
//! The detector is a pure function: no side effects, safe to call from any
//! number of concurrent sessions without coordination.

mod detector;
mod patterns;
mod result;
mod scam_type;

pub use detector::ScamDetector;
pub use result::DetectionResult;
pub use scam_type::ScamType;
