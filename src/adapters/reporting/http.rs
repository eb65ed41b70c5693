//! HTTP reporter.
//!
//! Delivers final reports to the external collection endpoint. Every request
//! carries its own timeout so a stalled endpoint can never hold a session's
//! finalization hostage.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

use crate::domain::engagement::FinalReport;
use crate::ports::{ReportError, Reporter};

/// Reporter that POSTs the payload as JSON.
pub struct HttpReporter {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<SecretString>,
    timeout: Duration,
}

impl HttpReporter {
    pub fn new(endpoint: String, api_key: Option<SecretString>, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            api_key,
            timeout,
        }
    }
}

#[async_trait]
impl Reporter for HttpReporter {
    async fn submit(&self, report: &FinalReport) -> Result<(), ReportError> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .json(report)
            .timeout(self.timeout);

        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key.expose_secret());
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ReportError::Timeout(self.timeout.as_secs())
            } else {
                ReportError::Network(e.to_string())
            }
        })?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(ReportError::Rejected(format!(
                "endpoint returned {}",
                response.status()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reporter_construction_holds_settings() {
        let reporter = HttpReporter::new(
            "http://localhost:9/report".to_string(),
            None,
            Duration::from_secs(10),
        );
        assert_eq!(reporter.endpoint, "http://localhost:9/report");
        assert_eq!(reporter.timeout, Duration::from_secs(10));
    }
}
