//! Report dispatch with pacing and retries.
//!
//! `ReportDispatcher` decorates any `Reporter` with a token-bucket pacer for
//! outbound calls plus bounded exponential-backoff retries. A report that
//! still fails after the last retry is surfaced as an error for the caller
//! to log; the session's terminal state is never revisited.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::domain::engagement::FinalReport;
use crate::ports::{ReportError, Reporter};

/// Token bucket for pacing outbound calls.
#[derive(Debug)]
pub struct TokenBucket {
    capacity: f64,
    refill_per_sec: f64,
    state: Mutex<BucketState>,
}

#[derive(Debug)]
struct BucketState {
    tokens: f64,
    last_refill: Instant,
}

impl TokenBucket {
    /// Creates a bucket that starts full.
    pub fn new(capacity: u32, refill_per_sec: f64) -> Self {
        let capacity = f64::from(capacity.max(1));
        Self {
            capacity,
            refill_per_sec: refill_per_sec.max(0.001),
            state: Mutex::new(BucketState {
                tokens: capacity,
                last_refill: Instant::now(),
            }),
        }
    }

    /// Takes one token, sleeping until the refill makes one available.
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut state = self.state.lock().await;
                let now = Instant::now();
                let elapsed = now.duration_since(state.last_refill).as_secs_f64();
                state.tokens =
                    (state.tokens + elapsed * self.refill_per_sec).min(self.capacity);
                state.last_refill = now;

                if state.tokens >= 1.0 {
                    state.tokens -= 1.0;
                    return;
                }
                Duration::from_secs_f64((1.0 - state.tokens) / self.refill_per_sec)
            };
            tokio::time::sleep(wait).await;
        }
    }
}

/// Reporter decorator adding pacing, per-attempt timeout, and retries.
pub struct ReportDispatcher {
    inner: Arc<dyn Reporter>,
    bucket: TokenBucket,
    attempt_timeout: Duration,
    max_retries: u32,
    backoff_base: Duration,
}

impl ReportDispatcher {
    pub fn new(
        inner: Arc<dyn Reporter>,
        bucket: TokenBucket,
        attempt_timeout: Duration,
        max_retries: u32,
        backoff_base: Duration,
    ) -> Self {
        Self {
            inner,
            bucket,
            attempt_timeout,
            max_retries,
            backoff_base,
        }
    }
}

#[async_trait]
impl Reporter for ReportDispatcher {
    async fn submit(&self, report: &FinalReport) -> Result<(), ReportError> {
        let mut attempt: u32 = 0;
        loop {
            self.bucket.acquire().await;

            let outcome = tokio::time::timeout(self.attempt_timeout, self.inner.submit(report))
                .await
                .unwrap_or(Err(ReportError::Timeout(self.attempt_timeout.as_secs())));

            let err = match outcome {
                Ok(()) => {
                    if attempt > 0 {
                        info!(
                            session_id = %report.session_id,
                            attempt = attempt + 1,
                            "report delivered after retry"
                        );
                    }
                    return Ok(());
                }
                Err(err) => err,
            };

            if attempt >= self.max_retries {
                warn!(
                    session_id = %report.session_id,
                    attempts = attempt + 1,
                    error = %err,
                    "giving up on report delivery"
                );
                return Err(err);
            }

            let delay = self.backoff_base * 2u32.saturating_pow(attempt);
            warn!(
                session_id = %report.session_id,
                attempt = attempt + 1,
                error = %err,
                retry_in_ms = delay.as_millis() as u64,
                "report delivery failed, will retry"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::RecordingReporter;
    use crate::domain::foundation::{SessionId, Timestamp};
    use crate::domain::session::Session;

    fn report() -> FinalReport {
        let session = Session::new(SessionId::new("dispatch-test").unwrap(), Timestamp::now());
        FinalReport::from_session(&session)
    }

    fn fast_bucket() -> TokenBucket {
        TokenBucket::new(100, 1_000.0)
    }

    #[tokio::test]
    async fn delivers_on_first_success() {
        let inner = Arc::new(RecordingReporter::new());
        let dispatcher = ReportDispatcher::new(
            inner.clone(),
            fast_bucket(),
            Duration::from_secs(1),
            3,
            Duration::from_millis(1),
        );

        dispatcher.submit(&report()).await.unwrap();
        assert_eq!(inner.attempt_count(), 1);
        assert_eq!(inner.submissions().len(), 1);
    }

    #[tokio::test]
    async fn retries_until_the_endpoint_recovers() {
        let inner = Arc::new(RecordingReporter::failing_first(2));
        let dispatcher = ReportDispatcher::new(
            inner.clone(),
            fast_bucket(),
            Duration::from_secs(1),
            3,
            Duration::from_millis(1),
        );

        dispatcher.submit(&report()).await.unwrap();
        assert_eq!(inner.attempt_count(), 3);
        assert_eq!(inner.submissions().len(), 1);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let inner = Arc::new(RecordingReporter::failing_first(10));
        let dispatcher = ReportDispatcher::new(
            inner.clone(),
            fast_bucket(),
            Duration::from_secs(1),
            2,
            Duration::from_millis(1),
        );

        let result = dispatcher.submit(&report()).await;
        assert!(result.is_err());
        // Initial attempt plus two retries.
        assert_eq!(inner.attempt_count(), 3);
        assert!(inner.submissions().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn bucket_paces_calls_beyond_capacity() {
        let bucket = TokenBucket::new(1, 1.0);
        bucket.acquire().await;

        let start = Instant::now();
        bucket.acquire().await;
        assert!(start.elapsed() >= Duration::from_millis(900));
    }

    #[tokio::test]
    async fn bucket_allows_burst_up_to_capacity() {
        let bucket = TokenBucket::new(3, 0.001);
        for _ in 0..3 {
            // Must not sleep; a hang here would trip the test timeout.
            tokio::time::timeout(Duration::from_millis(50), bucket.acquire())
                .await
                .expect("burst capacity should not block");
        }
    }
}
