//! The [`Provider`] trait for chat completions.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{ChatRequest, ChatResponse};

/// Something that can answer a chat completion request.
///
/// The agent holds an `Arc<dyn Provider>`; tests substitute scripted
/// providers to drive the tool loop without a model server.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Provider name for logs (e.g. "ollama").
    fn name(&self) -> &str;

    /// Execute one chat completion request.
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse>;
}
