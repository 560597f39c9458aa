//! OpenAI-compatible provider.
//!
//! [`OpenAiCompatProvider`] POSTs to `{base_url}/chat/completions`. Pointed at
//! `http://localhost:11434/v1` it drives Ollama; pointed elsewhere it works
//! with any server speaking the same format.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::LlmProviderConfig;
use crate::error::{ProviderError, Result};
use crate::provider::Provider;
use crate::types::{ChatRequest, ChatResponse};

/// A chat-completions provider over HTTP.
pub struct OpenAiCompatProvider {
    config: LlmProviderConfig,
    http: reqwest::Client,
    api_key: Option<String>,
}

impl OpenAiCompatProvider {
    /// Create a provider. The API key, if any, is read from
    /// `config.api_key_env` at request time.
    pub fn new(config: LlmProviderConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
            api_key: None,
        }
    }

    /// Create a provider with an explicit API key.
    pub fn with_api_key(config: LlmProviderConfig, api_key: String) -> Self {
        Self {
            api_key: Some(api_key),
            ..Self::new(config)
        }
    }

    fn completions_url(&self) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        format!("{base}/chat/completions")
    }

    /// Explicit key, then the configured env var, then none.
    fn resolve_api_key(&self) -> Option<String> {
        if let Some(ref key) = self.api_key {
            return Some(key.clone());
        }
        self.config
            .api_key_env
            .as_deref()
            .and_then(|var| std::env::var(var).ok())
            .filter(|key| !key.is_empty())
    }
}

#[async_trait]
impl Provider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        &self.config.name
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let url = self.completions_url();

        let mut request = request.clone();
        if request.model.is_empty()
            && let Some(ref model) = self.config.default_model
        {
            request.model = model.clone();
        }

        debug!(
            provider = %self.config.name,
            model = %request.model,
            messages = request.messages.len(),
            tools = request.tools.len(),
            "sending chat completion request"
        );

        let mut req = self
            .http
            .post(&url)
            .timeout(Duration::from_secs(self.config.timeout()))
            .header("Content-Type", "application/json");
        if let Some(key) = self.resolve_api_key() {
            req = req.header("Authorization", format!("Bearer {key}"));
        }
        for (k, v) in &self.config.headers {
            req = req.header(k.as_str(), v.as_str());
        }

        let response = req
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::from_send(e, &url))?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                provider = %self.config.name,
                status = status.as_u16(),
                "chat completion failed"
            );
            return Err(match status.as_u16() {
                401 | 403 => ProviderError::AuthFailed(body),
                404 => ProviderError::ModelNotFound(format!("model '{}': {}", request.model, body)),
                _ => ProviderError::RequestFailed(format!("HTTP {status}: {body}")),
            });
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout
            } else {
                ProviderError::InvalidResponse(format!("failed to parse response: {e}"))
            }
        })?;

        if chat_response.choices.is_empty() {
            return Err(ProviderError::InvalidResponse(
                "response contained no choices".into(),
            ));
        }

        debug!(
            provider = %self.config.name,
            model = %chat_response.model,
            choices = chat_response.choices.len(),
            "chat completion response received"
        );

        Ok(chat_response)
    }
}

impl std::fmt::Debug for OpenAiCompatProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCompatProvider")
            .field("name", &self.config.name)
            .field("base_url", &self.config.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .finish()
    }
}
