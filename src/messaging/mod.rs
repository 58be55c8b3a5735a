//! Chat trivia job
//!
//! Asks a language model for a short snippet and posts it to a chat
//! channel. Two sequential calls, no state and no retries.

use anyhow::Result;
use tracing::{info, instrument};

pub mod openai;
pub mod slack;

pub use openai::OpenAiClient;
pub use slack::SlackClient;

/// Produces text for a prompt
pub trait TextGenerator {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Delivers text to a channel
pub trait MessageSink {
    async fn send(&self, channel: &str, text: &str) -> Result<DeliveryReceipt>;
}

/// Confirmation of a delivered message
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryReceipt {
    pub channel: String,
    /// Chat-side message timestamp
    pub timestamp: String,
}

/// Generate a message for `prompt` and deliver it to `channel`.
#[instrument(skip(generator, sink))]
pub async fn post_generated_message<G: TextGenerator, S: MessageSink>(
    generator: &G,
    sink: &S,
    prompt: &str,
    channel: &str,
) -> Result<DeliveryReceipt> {
    let text = generator.generate(prompt).await?;
    info!("Generated {} characters", text.chars().count());

    let receipt = sink.send(channel, &text).await?;
    info!(
        "Message delivered to {} (timestamp: {})",
        receipt.channel, receipt.timestamp
    );
    Ok(receipt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErFinderError;
    use std::sync::Mutex;

    struct FixedGenerator(&'static str);

    impl TextGenerator for FixedGenerator {
        async fn generate(&self, prompt: &str) -> Result<String> {
            Ok(format!("{}: {}", prompt, self.0))
        }
    }

    struct FailingGenerator;

    impl TextGenerator for FailingGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            Err(ErFinderError::api("model unavailable").into())
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        sent: Mutex<Vec<(String, String)>>,
    }

    impl MessageSink for RecordingSink {
        async fn send(&self, channel: &str, text: &str) -> Result<DeliveryReceipt> {
            self.sent
                .lock()
                .unwrap()
                .push((channel.to_string(), text.to_string()));
            Ok(DeliveryReceipt {
                channel: channel.to_string(),
                timestamp: "1700000000.000100".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_generated_text_is_posted() {
        let sink = RecordingSink::default();
        let receipt = post_generated_message(&FixedGenerator("trivia"), &sink, "tmi", "#oss")
            .await
            .unwrap();

        assert_eq!(receipt.channel, "#oss");
        assert_eq!(receipt.timestamp, "1700000000.000100");
        let sent = sink.sent.lock().unwrap();
        assert_eq!(sent.as_slice(), &[("#oss".to_string(), "tmi: trivia".to_string())]);
    }

    #[tokio::test]
    async fn test_generation_failure_sends_nothing() {
        let sink = RecordingSink::default();
        let err = post_generated_message(&FailingGenerator, &sink, "tmi", "#oss")
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ErFinderError>(),
            Some(ErFinderError::Api { .. })
        ));
        assert!(sink.sent.lock().unwrap().is_empty());
    }
}
