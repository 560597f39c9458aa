//! Endpoint configuration for [`OpenAiCompatProvider`](crate::OpenAiCompatProvider).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// How to reach one OpenAI-compatible endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmProviderConfig {
    /// Provider name used in logs.
    pub name: String,

    /// Base URL ending in the API version (e.g. `http://localhost:11434/v1`).
    pub base_url: String,

    /// Environment variable holding an API key. `None` sends no
    /// `Authorization` header, which is what a local Ollama expects.
    #[serde(default)]
    pub api_key_env: Option<String>,

    /// Model used when a request leaves it empty.
    #[serde(default)]
    pub default_model: Option<String>,

    /// Extra headers sent with every request.
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Per-request timeout in seconds.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl LlmProviderConfig {
    /// Configuration for a local Ollama server's OpenAI-compatible API.
    pub fn ollama(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: "ollama".into(),
            base_url: base_url.into(),
            api_key_env: None,
            default_model: Some(model.into()),
            headers: HashMap::new(),
            timeout_secs: None,
        }
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Effective timeout in seconds.
    pub fn timeout(&self) -> u64 {
        self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ollama_builder_has_no_key() {
        let cfg = LlmProviderConfig::ollama("http://localhost:11434/v1", "phi3:mini");
        assert_eq!(cfg.name, "ollama");
        assert!(cfg.api_key_env.is_none());
        assert_eq!(cfg.default_model.as_deref(), Some("phi3:mini"));
        assert_eq!(cfg.timeout(), DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn timeout_override() {
        let cfg = LlmProviderConfig::ollama("http://x/v1", "m").with_timeout_secs(7);
        assert_eq!(cfg.timeout(), 7);
    }

    #[test]
    fn deserializes_minimal() {
        let cfg: LlmProviderConfig =
            serde_json::from_str(r#"{"name": "lan", "base_url": "http://10.0.0.2:11434/v1"}"#)
                .unwrap();
        assert!(cfg.headers.is_empty());
        assert!(cfg.api_key_env.is_none());
    }
}
