use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use troquey_core::config::{LlmConfig, LlmProvider};

/// Chat-completion gateway abstraction. The company prospector only ever
/// needs one system/user exchange, so the surface stays minimal.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String, LlmError>;
}

#[derive(Debug, Error)]
pub enum LlmError {
    /// Gateway returned HTTP 429; callers surface this as their own
    /// rate-limit signal.
    #[error("llm gateway rate limit exceeded")]
    RateLimited,
    /// Gateway returned HTTP 402: the account is out of credits.
    #[error("llm gateway credits exhausted")]
    CreditsExhausted,
    #[error("llm gateway error (status {status}): {detail}")]
    Gateway { status: u16, detail: String },
    #[error("llm transport failure: {0}")]
    Transport(String),
    #[error("llm reply contained no content")]
    EmptyReply,
}

/// OpenAI-compatible chat-completions client. All supported providers expose
/// the same wire shape (`/v1/chat/completions`), so one request body covers
/// openai, anthropic's compatibility endpoint, and ollama.
pub struct HttpLlmClient {
    http: reqwest::Client,
    config: LlmConfig,
}

impl HttpLlmClient {
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|error| LlmError::Transport(error.to_string()))?;

        Ok(Self { http, config })
    }

    fn endpoint(&self) -> String {
        let base = self
            .config
            .base_url
            .as_deref()
            .unwrap_or(match self.config.provider {
                LlmProvider::OpenAi => "https://api.openai.com",
                LlmProvider::Anthropic => "https://api.anthropic.com",
                LlmProvider::Ollama => "http://localhost:11434",
            })
            .trim_end_matches('/')
            .to_string();

        format!("{base}/v1/chat/completions")
    }

    async fn request_once(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, LlmError> {
        let body = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage { role: "system", content: system_prompt.to_string() },
                ChatMessage { role: "user", content: user_prompt.to_string() },
            ],
        };

        let mut request = self.http.post(self.endpoint()).json(&body);
        if let Some(api_key) = &self.config.api_key {
            request = request.bearer_auth(api_key.expose_secret());
        }

        let response =
            request.send().await.map_err(|error| LlmError::Transport(error.to_string()))?;
        let status = response.status();

        match status.as_u16() {
            429 => return Err(LlmError::RateLimited),
            402 => return Err(LlmError::CreditsExhausted),
            code if !status.is_success() => {
                let detail = response.text().await.unwrap_or_default();
                return Err(LlmError::Gateway { status: code, detail });
            }
            _ => {}
        }

        let payload: ChatCompletionResponse =
            response.json().await.map_err(|error| LlmError::Transport(error.to_string()))?;

        payload
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(LlmError::EmptyReply)
    }

    fn is_retryable(error: &LlmError) -> bool {
        matches!(
            error,
            LlmError::Transport(_) | LlmError::Gateway { status: 500..=599, .. }
        )
    }
}

#[async_trait]
impl LlmClient for HttpLlmClient {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String, LlmError> {
        let mut attempt = 0u32;
        loop {
            match self.request_once(system_prompt, user_prompt).await {
                Ok(content) => return Ok(content),
                Err(error) if Self::is_retryable(&error) && attempt < self.config.max_retries => {
                    attempt += 1;
                    warn!(
                        event_name = "agent.llm.retry",
                        attempt,
                        error = %error,
                        "retrying llm gateway request"
                    );
                    tokio::time::sleep(Duration::from_millis(250 * u64::from(attempt))).await;
                }
                Err(error) => return Err(error),
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}
