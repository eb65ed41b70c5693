//! Recording reporter for tests.
//!
//! Captures submissions for verification and can inject a configurable
//! number of initial failures for resilience testing.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use crate::domain::engagement::FinalReport;
use crate::ports::{ReportError, Reporter};

/// Reporter that records everything it is asked to deliver.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    submissions: Mutex<Vec<FinalReport>>,
    attempts: AtomicU32,
    failures_remaining: AtomicU32,
}

impl RecordingReporter {
    /// A reporter that always succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// A reporter whose first `n` submissions fail with a network error.
    pub fn failing_first(n: u32) -> Self {
        Self {
            failures_remaining: AtomicU32::new(n),
            ..Self::default()
        }
    }

    /// Successful submissions, in delivery order.
    pub fn submissions(&self) -> Vec<FinalReport> {
        self.submissions.lock().expect("reporter mutex poisoned").clone()
    }

    /// Total attempts, including injected failures.
    pub fn attempt_count(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Reporter for RecordingReporter {
    async fn submit(&self, report: &FinalReport) -> Result<(), ReportError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        let should_fail = self
            .failures_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |v| v.checked_sub(1))
            .is_ok();
        if should_fail {
            return Err(ReportError::Network("injected failure".to_string()));
        }

        self.submissions
            .lock()
            .expect("reporter mutex poisoned")
            .push(report.clone());
        Ok(())
    }
}
