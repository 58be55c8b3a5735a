//! Slack Web API client (`chat.postMessage`)

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use super::{DeliveryReceipt, MessageSink};
use crate::ErFinderError;
use crate::config::MessagingConfig;

pub struct SlackClient {
    client: Client,
    base_url: String,
    token: String,
}

#[derive(Debug, Serialize)]
struct PostMessageRequest<'a> {
    channel: &'a str,
    text: &'a str,
}

/// Slack reports failures with HTTP 200 and `ok: false`
#[derive(Debug, Deserialize)]
struct PostMessageResponse {
    ok: bool,
    channel: Option<String>,
    ts: Option<String>,
    error: Option<String>,
}

impl PostMessageResponse {
    fn into_receipt(self, requested_channel: &str) -> Result<DeliveryReceipt> {
        if !self.ok {
            let reason = self.error.unwrap_or_else(|| "Unknown error".to_string());
            error!("Message delivery failed: {}", reason);
            return Err(ErFinderError::api(reason).into());
        }

        let timestamp = self
            .ts
            .ok_or_else(|| ErFinderError::api("Slack response is missing the message timestamp"))?;

        Ok(DeliveryReceipt {
            channel: self
                .channel
                .unwrap_or_else(|| requested_channel.to_string()),
            timestamp,
        })
    }
}

impl SlackClient {
    pub fn new(config: &MessagingConfig) -> Result<Self> {
        let token = match &config.slack_bot_token {
            Some(token) => token.clone(),
            None => env::var("SLACK_BOT_TOKEN").context("Missing SLACK_BOT_TOKEN env var")?,
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("er-finder/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.slack_base_url.trim_end_matches('/').to_string(),
            token,
        })
    }
}

impl MessageSink for SlackClient {
    async fn send(&self, channel: &str, text: &str) -> Result<DeliveryReceipt> {
        let url = format!("{}/chat.postMessage", self.base_url);
        debug!("Posting message to {}", channel);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&PostMessageRequest { channel, text })
            .send()
            .await
            .context("Slack request failed")?;

        let status = response.status();
        if !status.is_success() {
            return Err(ErFinderError::api(format!("Slack returned {status}")).into());
        }

        let body: PostMessageResponse = response
            .json()
            .await
            .context("Failed to parse Slack response")?;
        body.into_receipt(channel)
    }
}
