//! Text-generation clients.
//!
//! Both variants implement the same capability — `generate(prompt) -> text` —
//! and are selected once when the provider is constructed from configuration.
//! Nothing downstream branches on the kind.

use ralph_core::config::ProviderConfig;
use serde::Deserialize;

use crate::error::ProviderError;
use crate::Result;

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

/// A configured text-generation provider.
#[derive(Debug, Clone)]
pub enum Provider {
    Local(LocalClient),
    Remote(RemoteClient),
}

impl Provider {
    /// Construct the provider named by configuration.
    ///
    /// For a remote provider the API key environment variable must be set;
    /// a missing secret fails here, at startup, and is never retried.
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        match config {
            ProviderConfig::Local { endpoint, model } => Ok(Provider::Local(LocalClient::new(
                endpoint.clone(),
                model.clone(),
            ))),
            ProviderConfig::Remote {
                endpoint,
                model,
                api_key_env,
            } => {
                let api_key = std::env::var(api_key_env)
                    .map_err(|_| ProviderError::MissingSecret(api_key_env.clone()))?;
                Ok(Provider::Remote(RemoteClient::new(
                    endpoint.clone(),
                    model.clone(),
                    api_key,
                )))
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Provider::Local(_) => "local",
            Provider::Remote(_) => "remote",
        }
    }

    pub fn model(&self) -> &str {
        match self {
            Provider::Local(c) => &c.model,
            Provider::Remote(c) => &c.model,
        }
    }

    /// Request one text completion for `prompt`.
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        match self {
            Provider::Local(c) => c.generate(prompt).await,
            Provider::Remote(c) => c.generate(prompt).await,
        }
    }
}

// ---------------------------------------------------------------------------
// LocalClient — Ollama-style /api/generate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct LocalClient {
    http: reqwest::Client,
    base_url: String,
    pub(crate) model: String,
}

#[derive(Deserialize)]
struct LocalGenerateResponse {
    response: String,
}

impl LocalClient {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            model: model.into(),
        }
    }

    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/generate", self.base_url.trim_end_matches('/'));
        let body = serde_json::json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
        });

        let resp = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let payload: LocalGenerateResponse = resp.json().await?;
        if payload.response.trim().is_empty() {
            return Err(ProviderError::UnexpectedPayload(
                "empty completion".to_string(),
            ));
        }
        Ok(payload.response)
    }
}

// ---------------------------------------------------------------------------
// RemoteClient — OpenAI-style /v1/chat/completions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct RemoteClient {
    http: reqwest::Client,
    base_url: String,
    pub(crate) model: String,
    api_key: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}

impl RemoteClient {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            model: model.into(),
            api_key: api_key.into(),
        }
    }

    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!(
            "{}/v1/chat/completions",
            self.base_url.trim_end_matches('/')
        );
        let body = serde_json::json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
        });

        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let payload: ChatCompletionResponse = resp.json().await?;
        let content = payload
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default();
        if content.trim().is_empty() {
            return Err(ProviderError::UnexpectedPayload(
                "no choices in completion".to_string(),
            ));
        }
        Ok(content)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
