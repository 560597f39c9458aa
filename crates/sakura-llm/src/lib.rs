//! Chat-completion client for sakura.
//!
//! Talks to any OpenAI-compatible `/chat/completions` endpoint. In practice
//! that is a local Ollama server, which exposes the OpenAI shape under
//! `<ollama>/v1` and needs no API key. [`OllamaClient`] covers Ollama's own
//! health endpoints used for startup checks.
//!
//! # Architecture
//!
//! - [`Provider`] is the chat completion seam the agent depends on
//! - [`OpenAiCompatProvider`] implements it over HTTP
//! - [`LlmProviderConfig`] describes the endpoint
//! - [`OllamaClient`] answers "is the server up" and "is the model pulled"
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use sakura_llm::{ChatMessage, ChatRequest, LlmProviderConfig, OpenAiCompatProvider, Provider};
//!
//! let provider = OpenAiCompatProvider::new(
//!     LlmProviderConfig::ollama("http://localhost:11434/v1", "phi3:mini"),
//! );
//! let request = ChatRequest::new("phi3:mini", vec![ChatMessage::user("Hello!")]);
//! let response = provider.complete(&request).await?;
//! println!("{}", response.choices[0].message.content);
//! ```

pub mod config;
pub mod error;
pub mod ollama;
pub mod openai_compat;
pub mod provider;
pub mod types;

pub use config::LlmProviderConfig;
pub use error::{ProviderError, Result};
pub use ollama::OllamaClient;
pub use openai_compat::OpenAiCompatProvider;
pub use provider::Provider;
pub use types::{ChatMessage, ChatRequest, ChatResponse, Choice, FunctionCall, ToolCall, Usage};
