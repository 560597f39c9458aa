//! CLI command implementations for `sakura`.
//!
//! - [`chat`] -- interactive wake-word session (the default).
//! - [`ask`] -- one request, one reply.
//! - [`doctor`] -- environment diagnostics.
//! - [`tools`] -- list the built-in tools.

pub mod ask;
pub mod chat;
pub mod doctor;
pub mod tools;

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use sakura_core::{AgentSettings, MaidAgent, ToolRegistry};
use sakura_llm::{LlmProviderConfig, OllamaClient, OpenAiCompatProvider, ProviderError};
use sakura_platform::config_loader::{self, LoadedConfig};
use sakura_platform::{NativePlatform, Platform};
use sakura_types::config::Config;
use sakura_types::error::SakuraError;
use tracing::{debug, info};

use crate::observer::ConsoleObserver;

/// Options shared by every subcommand.
#[derive(Debug, Clone, Default)]
pub struct GlobalOpts {
    pub config: Option<PathBuf>,
    pub model: Option<String>,
    pub voice: bool,
}

/// Load the config and apply command-line overrides.
pub async fn load_config(
    platform: &NativePlatform,
    opts: &GlobalOpts,
) -> Result<LoadedConfig, SakuraError> {
    let mut loaded =
        config_loader::load_config(platform.fs(), platform.env(), opts.config.as_deref()).await?;
    apply_overrides(&mut loaded.config, opts);
    match &loaded.path {
        Some(path) => info!(path = %path.display(), "config loaded"),
        None => info!("using default config"),
    }
    Ok(loaded)
}

/// Load the config for a command that talks to the model. A missing config
/// file is reported to Master and yields `None`.
pub async fn load_startup_config(
    platform: &NativePlatform,
    opts: &GlobalOpts,
    narration: Narration,
) -> anyhow::Result<Option<Config>> {
    match load_config(platform, opts).await {
        Ok(loaded) => Ok(Some(loaded.config)),
        Err(SakuraError::ConfigNotFound { path }) => {
            let message = format!("❌ Configuration file not found at '{}'", path.display());
            match narration {
                Narration::Stdout => println!("{message}"),
                Narration::Stderr => eprintln!("{message}"),
            }
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

pub fn apply_overrides(config: &mut Config, opts: &GlobalOpts) {
    if let Some(model) = opts.model.as_deref().filter(|m| !m.trim().is_empty()) {
        debug!(model, "model overridden on the command line");
        config.ollama_model = model.trim().to_string();
    }
    if opts.voice {
        config.voice.enabled = true;
    }
}

/// Registry with every built-in tool.
pub fn build_registry(platform: Arc<NativePlatform>, config: &Config) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    sakura_tools::register_all(&mut registry, platform, &config.tools);
    registry
}

/// Where the console narration goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Narration {
    Stdout,
    Stderr,
}

/// The maid agent talking to Ollama's OpenAI-compatible endpoint, narrated
/// on the console.
pub fn build_agent(config: &Config, platform: Arc<NativePlatform>, narration: Narration) -> MaidAgent {
    let thinking = Arc::new(AtomicBool::new(config.show_thinking));
    let mut observer = ConsoleObserver::new(config.name.clone(), Arc::clone(&thinking));
    if narration == Narration::Stderr {
        observer = observer.on_stderr();
    }
    let provider_config = LlmProviderConfig::ollama(config.llm_base_url(), &config.ollama_model)
        .with_timeout_secs(config.request_timeout_secs);
    let provider = Arc::new(OpenAiCompatProvider::new(provider_config));
    let tools = Arc::new(build_registry(platform, config));
    MaidAgent::new(provider, tools, AgentSettings::from_config(config))
        .with_observer(Arc::new(observer))
        .with_thinking_flag(thinking)
}

/// Why Ollama cannot serve requests.
#[derive(Debug)]
pub enum OllamaProblem {
    /// Nothing answered at the URL.
    Unreachable(String),
    /// Answered, but not with a version.
    Unhealthy(String),
}

/// Probe `GET /api/version`.
pub async fn check_ollama(client: &OllamaClient) -> Result<String, OllamaProblem> {
    let url = client.base_url().to_string();
    client.version().await.map_err(|e| match e {
        ProviderError::Unreachable(_) | ProviderError::Timeout => OllamaProblem::Unreachable(url),
        other => {
            debug!(error = %other, "ollama health check failed");
            OllamaProblem::Unhealthy(url)
        }
    })
}

impl OllamaProblem {
    /// Setup steps for Master, ending with the model to pull.
    pub fn guidance(&self, model: &str) -> Vec<String> {
        let mut lines = match self {
            Self::Unreachable(url) => vec![
                format!("⚠️  Warning: Cannot connect to Ollama at {url}!"),
                "   1. Install Ollama: https://ollama.ai".to_string(),
                "   2. Start it: ollama serve".to_string(),
            ],
            Self::Unhealthy(url) => vec![
                format!("⚠️  Warning: Ollama doesn't seem to be running on {url}"),
                "   Please start Ollama: ollama serve".to_string(),
            ],
        };
        lines.push(format!("   3. Pull model: ollama pull {model}"));
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_apply() {
        let mut config = Config::default();
        let opts = GlobalOpts {
            config: None,
            model: Some(" qwen2.5:7b ".into()),
            voice: true,
        };
        apply_overrides(&mut config, &opts);
        assert_eq!(config.ollama_model, "qwen2.5:7b");
        assert!(config.voice.enabled);
    }

    #[test]
    fn blank_model_override_is_ignored() {
        let mut config = Config::default();
        let before = config.ollama_model.clone();
        apply_overrides(
            &mut config,
            &GlobalOpts {
                model: Some("  ".into()),
                ..GlobalOpts::default()
            },
        );
        assert_eq!(config.ollama_model, before);
        assert!(!config.voice.enabled);
    }

    #[test]
    fn guidance_mentions_model() {
        let lines = OllamaProblem::Unreachable("http://localhost:11434".into()).guidance("phi3:mini");
        assert_eq!(lines[0], "⚠️  Warning: Cannot connect to Ollama at http://localhost:11434!");
        assert_eq!(lines.last().unwrap(), "   3. Pull model: ollama pull phi3:mini");
    }

    #[test]
    fn registry_has_all_tools() {
        let registry = build_registry(Arc::new(NativePlatform::new()), &Config::default());
        assert_eq!(registry.len(), 6);
    }

    #[test]
    fn agent_starts_with_configured_thinking() {
        let config = Config {
            show_thinking: true,
            ..Config::default()
        };
        let agent = build_agent(&config, Arc::new(NativePlatform::new()), Narration::Stderr);
        assert!(agent.is_thinking());
        assert!(!agent.toggle_thinking());
        assert_eq!(agent.settings().model, config.ollama_model);
        assert_eq!(agent.tools().len(), 6);
    }

    #[tokio::test]
    async fn unreachable_ollama() {
        let client = OllamaClient::new("http://127.0.0.1:1");
        let problem = check_ollama(&client).await.unwrap_err();
        assert!(matches!(problem, OllamaProblem::Unreachable(ref u) if u == "http://127.0.0.1:1"));
    }

    #[tokio::test]
    async fn error_status_is_unhealthy() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/version"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        let problem = check_ollama(&OllamaClient::new(server.uri())).await.unwrap_err();
        assert!(matches!(problem, OllamaProblem::Unhealthy(_)));
        assert!(problem.guidance("phi3:mini")[0].contains("doesn't seem to be running"));
    }
}
