//! Reporting port.
//!
//! The final intelligence report is a best-effort external side effect: a
//! slow or unreachable endpoint must never stall a session's state
//! transition, and a failed submission never rolls a session back.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::engagement::FinalReport;

/// Errors from the reporting collaborator.
///
/// All variants are recoverable: the caller logs and queues the report for
/// retry instead of propagating.
#[derive(Debug, Clone, Error)]
pub enum ReportError {
    #[error("report endpoint rejected the submission: {0}")]
    Rejected(String),

    #[error("report delivery timed out after {0} seconds")]
    Timeout(u64),

    #[error("network failure delivering report: {0}")]
    Network(String),
}

/// Port for delivering finalized session reports.
#[async_trait]
pub trait Reporter: Send + Sync {
    /// Submits one final report.
    ///
    /// Implementations must bound their own latency; callers additionally
    /// wrap the call in a timeout.
    async fn submit(&self, report: &FinalReport) -> Result<(), ReportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reporter_is_object_safe() {
        fn _accepts_dyn(_reporter: &dyn Reporter) {}
    }
}
