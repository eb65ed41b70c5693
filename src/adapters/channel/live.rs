//! Live scammer channel over HTTP.
//!
//! Talks to an external conversation relay with the same surface as the
//! simulator; which of the two is in play is decided once at construction.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use crate::domain::detection::ScamType;
use crate::ports::{ChannelError, ChannelSession, ScammerChannel};

/// HTTP client for a remote scammer relay.
pub struct HttpScammerChannel {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<SecretString>,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct StartConversationBody {
    session_id: String,
    initial_message: String,
    scam_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseBody {
    message: Option<String>,
}

impl HttpScammerChannel {
    pub fn new(base_url: String, api_key: Option<SecretString>, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            timeout,
        }
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let builder = builder.timeout(self.timeout);
        match &self.api_key {
            Some(key) => builder.header("x-api-key", key.expose_secret()),
            None => builder,
        }
    }

    fn map_error(&self, err: reqwest::Error) -> ChannelError {
        if err.is_timeout() {
            ChannelError::Timeout(self.timeout.as_secs())
        } else {
            ChannelError::Transport(err.to_string())
        }
    }

    fn check_status(
        &self,
        channel_id: &str,
        response: &reqwest::Response,
    ) -> Result<(), ChannelError> {
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ChannelError::NotFound(channel_id.to_string()));
        }
        if !status.is_success() {
            return Err(ChannelError::Transport(format!("relay returned {}", status)));
        }
        Ok(())
    }
}

#[async_trait]
impl ScammerChannel for HttpScammerChannel {
    async fn start_conversation(
        &self,
        scam_type: Option<ScamType>,
    ) -> Result<ChannelSession, ChannelError> {
        let url = format!("{}/conversations", self.base_url);
        let body = json!({ "scam_type": scam_type.map(|t| t.to_string()) });

        let response = self
            .request(self.client.post(&url).json(&body))
            .send()
            .await
            .map_err(|e| self.map_error(e))?;
        self.check_status("", &response)?;

        let body: StartConversationBody = response
            .json()
            .await
            .map_err(|e| ChannelError::Transport(e.to_string()))?;

        Ok(ChannelSession {
            channel_id: body.session_id,
            opening_message: body.initial_message,
            scam_type: body.scam_type.and_then(|s| s.parse().ok()),
        })
    }

    async fn send_message(&self, channel_id: &str, text: &str) -> Result<(), ChannelError> {
        let url = format!("{}/conversations/{}/messages", self.base_url, channel_id);
        let response = self
            .request(self.client.post(&url).json(&json!({ "message": text })))
            .send()
            .await
            .map_err(|e| self.map_error(e))?;
        self.check_status(channel_id, &response)
    }

    async fn get_response(&self, channel_id: &str) -> Result<Option<String>, ChannelError> {
        let url = format!("{}/conversations/{}/response", self.base_url, channel_id);
        let response = self
            .request(self.client.get(&url))
            .send()
            .await
            .map_err(|e| self.map_error(e))?;
        self.check_status(channel_id, &response)?;

        let body: ResponseBody = response
            .json()
            .await
            .map_err(|e| ChannelError::Transport(e.to_string()))?;
        Ok(body.message)
    }

    async fn end_conversation(&self, channel_id: &str) -> Result<(), ChannelError> {
        let url = format!("{}/conversations/{}", self.base_url, channel_id);
        let response = self
            .request(self.client.delete(&url))
            .send()
            .await
            .map_err(|e| self.map_error(e))?;
        self.check_status(channel_id, &response)
    }
}
