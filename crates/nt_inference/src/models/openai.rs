use std::fmt;
use std::time::Duration;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use nt_core::{Error, Result, Summarizer};
use crate::Config;

const SYSTEM_PROMPT: &str = "You are a brief summarizer.";

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Deserialize)]
struct Message {
    content: Option<String>,
}

/// Summarizer backed by an OpenAI-compatible chat completions endpoint.
pub struct OpenAiSummarizer {
    client: Client,
    api_key: Option<String>,
    api_url: String,
    model: String,
    max_tokens: u32,
}

impl fmt::Debug for OpenAiSummarizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiSummarizer")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .finish()
    }
}

impl OpenAiSummarizer {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            api_key: config.api_key.filter(|key| !key.trim().is_empty()),
            api_url: config.api_url,
            model: config.model_name,
            max_tokens: config.max_tokens,
        })
    }

    fn build_request(&self, title: &str, description: &str) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: format!(
                        "Summarize the following news article in 2-3 sentences:\n\nTitle: {}\n\n{}",
                        title, description
                    ),
                },
            ],
            max_tokens: self.max_tokens,
        }
    }

    async fn request_summary(&self, api_key: &str, title: &str, description: &str) -> Result<String> {
        let request = self.build_request(title, description);
        let response = self.client
            .post(&self.api_url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json::<ChatResponse>()
            .await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| Error::Inference("Summarizer response contained no choices".to_string()))
    }
}

#[async_trait]
impl Summarizer for OpenAiSummarizer {
    fn name(&self) -> &str {
        "OpenAI"
    }

    async fn summarize(&self, title: Option<&str>, description: Option<&str>) -> String {
        let Some(api_key) = self.api_key.as_deref() else {
            tracing::debug!("No API key configured, skipping summary");
            return String::new();
        };

        let title = title.unwrap_or_default();
        match self.request_summary(api_key, title, description.unwrap_or_default()).await {
            Ok(summary) => {
                tracing::debug!("Generated summary for \"{}\"", title);
                summary
            }
            Err(e) => {
                tracing::warn!("⚠️ Failed to summarize \"{}\": {}", title, e);
                String::new()
            }
        }
    }
}
