//! OpenAI-compatible chat completion client

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::TextGenerator;
use crate::ErFinderError;
use crate::config::MessagingConfig;

pub struct OpenAiClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl ChatCompletionResponse {
    fn into_content(self) -> Result<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ErFinderError::api("No completion choices in response").into())
    }
}

impl OpenAiClient {
    pub fn new(config: &MessagingConfig) -> Result<Self> {
        let api_key = match &config.openai_api_key {
            Some(key) => key.clone(),
            None => env::var("OPENAI_API_KEY").context("Missing OPENAI_API_KEY env var")?,
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("er-finder/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.openai_base_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
        })
    }
}

impl TextGenerator for OpenAiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        debug!("Requesting completion from {} with model {}", url, self.model);

        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("Completion request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ErFinderError::api(format!(
                "Completion request returned {status}: {body}"
            ))
            .into());
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .context("Failed to parse completion response")?;
        completion.into_content()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let request = ChatCompletionRequest {
            model: "gpt-3.5-turbo",
            messages: vec![ChatMessage {
                role: "user",
                content: "oss에 대한 tmi를 하나 던져줘.",
            }],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-3.5-turbo");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "oss에 대한 tmi를 하나 던져줘.");
    }

    #[test]
    fn test_first_choice_is_used() {
        let response: ChatCompletionResponse = serde_json::from_str(
            r#"{
                "id": "chatcmpl-1",
                "object": "chat.completion",
                "choices": [
                    {"index": 0, "message": {"role": "assistant", "content": "First"}, "finish_reason": "stop"},
                    {"index": 1, "message": {"role": "assistant", "content": "Second"}, "finish_reason": "stop"}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(response.into_content().unwrap(), "First");
    }

    #[test]
    fn test_empty_choices_is_api_error() {
        let response: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices": []}"#).unwrap();
        let err = response.into_content().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ErFinderError>(),
            Some(ErFinderError::Api { .. })
        ));
    }

    #[test]
    fn test_configured_key_and_trailing_slash() {
        let config = MessagingConfig {
            openai_api_key: Some("sk-test".to_string()),
            openai_base_url: "http://localhost:8080/v1/".to_string(),
            ..MessagingConfig::default()
        };
        let client = OpenAiClient::new(&config).unwrap();
        assert_eq!(client.api_key, "sk-test");
        assert_eq!(client.base_url, "http://localhost:8080/v1");
        assert_eq!(client.model, "gpt-3.5-turbo");
    }
}
