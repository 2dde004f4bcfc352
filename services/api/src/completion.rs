use anyhow::{Result, anyhow};
use async_trait::async_trait;
use debate_types::Turn;
#[cfg(test)]
use mockall::automock;
use reqwest::Client;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: Message,
}

#[derive(Debug, Deserialize)]
pub struct Message {
    pub content: Option<String>,
}

/// One entry of the `messages` array sent to the chat-completions endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system",
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: content.into(),
        }
    }
}

impl From<&Turn> for ChatMessage {
    fn from(turn: &Turn) -> Self {
        Self {
            role: turn.role().as_str(),
            content: turn.content().to_string(),
        }
    }
}

// Generates the opponent's next argument from a prepared conversation.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Completion: Send + Sync {
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String>;
}

/// Sampling settings for every debate reply.
const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 1024;
const TOP_P: f32 = 1.0;

/// Client for an OpenAI-compatible `/chat/completions` endpoint (Groq by default).
pub struct ChatClient {
    client: Client,
    api_base: String,
    api_key: String,
    model: String,
}

impl ChatClient {
    pub fn new(api_base: String, api_key: String, model: String) -> Self {
        Self {
            client: Client::new(),
            api_base,
            api_key,
            model,
        }
    }
}

#[async_trait]
impl Completion for ChatClient {
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "temperature": TEMPERATURE,
            "max_tokens": MAX_TOKENS,
            "top_p": TOP_P,
            "stream": false,
        });

        tracing::debug!("Requesting completion with {} messages", messages.len());
        let resp = self
            .client
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json::<LlmResponse>()
            .await?;

        resp.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| anyhow!("Completion returned no content"))
    }
}
