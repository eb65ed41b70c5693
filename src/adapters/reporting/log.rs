//! Log-only reporter.
//!
//! Used when no collection endpoint is configured: the final report is
//! written to the structured log and delivery always succeeds.

use async_trait::async_trait;
use tracing::info;

use crate::domain::engagement::FinalReport;
use crate::ports::{ReportError, Reporter};

/// Reporter that emits the payload into the log stream.
#[derive(Debug, Clone, Default)]
pub struct LogReporter;

impl LogReporter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Reporter for LogReporter {
    async fn submit(&self, report: &FinalReport) -> Result<(), ReportError> {
        let payload = serde_json::to_string(report)
            .map_err(|e| ReportError::Rejected(format!("unserializable report: {}", e)))?;
        info!(
            session_id = %report.session_id,
            scam_detected = report.scam_detected,
            messages = report.total_messages_exchanged,
            %payload,
            "final report"
        );
        Ok(())
    }
}
