//! Ollama's native health endpoints.
//!
//! Chat goes through the OpenAI-compatible API; these calls only answer
//! whether the server is running (`GET /api/version`) and which models have
//! been pulled (`GET /api/tags`).

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::error::{ProviderError, Result};

/// Timeout for the connectivity check.
pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Deserialize)]
struct VersionResponse {
    version: String,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Debug, Deserialize)]
struct ModelTag {
    name: String,
}

/// Client for the Ollama root URL (e.g. `http://localhost:11434`).
#[derive(Debug, Clone)]
pub struct OllamaClient {
    base_url: String,
    http: reqwest::Client,
}

impl OllamaClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, endpoint: &str) -> Result<T> {
        let url = format!("{}{endpoint}", self.base_url);
        debug!(url = %url, "ollama health request");
        let response = self
            .http
            .get(&url)
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await
            .map_err(|e| ProviderError::from_send(e, &self.base_url))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::RequestFailed(format!("HTTP {status} from {url}")));
        }
        response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("{endpoint}: {e}")))
    }

    /// Server version; any error means Ollama is not usable.
    pub async fn version(&self) -> Result<String> {
        let v: VersionResponse = self.get_json("/api/version").await?;
        Ok(v.version)
    }

    /// Names of locally available models.
    pub async fn list_models(&self) -> Result<Vec<String>> {
        let tags: TagsResponse = self.get_json("/api/tags").await?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    /// Whether `model` has been pulled. An untagged name matches `:latest`.
    pub async fn has_model(&self, model: &str) -> Result<bool> {
        let models = self.list_models().await?;
        Ok(models.iter().any(|name| model_matches(name, model)))
    }
}

fn model_matches(available: &str, wanted: &str) -> bool {
    if available == wanted {
        return true;
    }
    !wanted.contains(':') && available.strip_suffix(":latest") == Some(wanted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untagged_name_matches_latest() {
        assert!(model_matches("llama3:latest", "llama3"));
        assert!(model_matches("phi3:mini", "phi3:mini"));
        assert!(!model_matches("phi3:medium", "phi3:mini"));
        assert!(!model_matches("phi3:mini", "phi3"));
    }

    #[test]
    fn base_url_is_trimmed() {
        let c = OllamaClient::new("http://localhost:11434/");
        assert_eq!(c.base_url(), "http://localhost:11434");
    }
}
