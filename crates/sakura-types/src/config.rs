//! Configuration schema types.
//!
//! All structs accept both `snake_case` and `camelCase` field names via
//! `#[serde(alias)]`, every field has a default, and unknown fields are
//! silently ignored so older config files keep loading.
//!
//! A minimal `config.json`:
//!
//! ```json
//! {
//!   "name": "Sakura",
//!   "wake_word": "maid",
//!   "ollama_model": "llama3.1:8b",
//!   "show_thinking": true
//! }
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ── Root config ──────────────────────────────────────────────────────────

/// Root configuration for the assistant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Persona name shown in replies and art.
    #[serde(default = "default_name")]
    pub name: String,

    /// Keyword that wakes the assistant (case-insensitive substring).
    #[serde(default = "default_wake_word", alias = "wakeWord")]
    pub wake_word: String,

    /// Root URL of the Ollama server.
    #[serde(default = "default_ollama_base_url", alias = "ollamaBaseUrl")]
    pub ollama_base_url: String,

    /// Ollama model name.
    #[serde(default = "default_ollama_model", alias = "ollamaModel")]
    pub ollama_model: String,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Start the session with thinking (verbose trace) mode enabled.
    #[serde(default, alias = "showThinking")]
    pub show_thinking: bool,

    /// Home directory hint handed to the model in the system prompt.
    #[serde(default = "default_user_home_prefix", alias = "userHomePrefix")]
    pub user_home_prefix: String,

    /// System prompt override. `{name}` and `{user_home_prefix}` are substituted.
    #[serde(default, alias = "promptTemplate")]
    pub prompt_template: Option<String>,

    /// Maximum LLM/tool round trips for a single request.
    #[serde(default = "default_max_tool_iterations", alias = "maxToolIterations")]
    pub max_tool_iterations: u32,

    /// Number of previous exchanges replayed as chat history (0 = stateless).
    #[serde(default, alias = "memoryWindow")]
    pub memory_window: usize,

    /// HTTP timeout for a single LLM call, in seconds.
    #[serde(default = "default_request_timeout_secs", alias = "requestTimeoutSecs")]
    pub request_timeout_secs: u64,

    /// Screen clearing, the wake animation and "press Enter" pauses.
    #[serde(default = "default_true")]
    pub animations: bool,

    /// Built-in tool settings.
    #[serde(default)]
    pub tools: ToolsConfig,

    /// Voice input settings.
    #[serde(default)]
    pub voice: VoiceConfig,
}

impl Config {
    /// Base URL of Ollama's OpenAI-compatible API (`<ollama_base_url>/v1`).
    pub fn llm_base_url(&self) -> String {
        format!("{}/v1", self.ollama_base_url.trim_end_matches('/'))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: default_name(),
            wake_word: default_wake_word(),
            ollama_base_url: default_ollama_base_url(),
            ollama_model: default_ollama_model(),
            temperature: default_temperature(),
            show_thinking: false,
            user_home_prefix: default_user_home_prefix(),
            prompt_template: None,
            max_tool_iterations: default_max_tool_iterations(),
            memory_window: 0,
            request_timeout_secs: default_request_timeout_secs(),
            animations: true,
            tools: ToolsConfig::default(),
            voice: VoiceConfig::default(),
        }
    }
}

pub(crate) fn default_true() -> bool {
    true
}
fn default_name() -> String {
    "Sakura".into()
}
fn default_wake_word() -> String {
    "maid".into()
}
fn default_ollama_base_url() -> String {
    "http://localhost:11434".into()
}
fn default_ollama_model() -> String {
    "phi3:mini".into()
}
fn default_temperature() -> f64 {
    0.7
}
fn default_max_tool_iterations() -> u32 {
    8
}
fn default_request_timeout_secs() -> u64 {
    120
}

#[cfg(feature = "native")]
fn default_user_home_prefix() -> String {
    dirs::home_dir()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| "~".into())
}

#[cfg(not(feature = "native"))]
fn default_user_home_prefix() -> String {
    "~".into()
}

// ── Tools ────────────────────────────────────────────────────────────────

/// Settings for the built-in tools.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Timeout for `execute_shell_command`, in seconds.
    #[serde(default = "default_shell_timeout", alias = "shellTimeoutSecs")]
    pub shell_timeout_secs: u64,

    /// Timeout for `search_in_file`, in seconds.
    #[serde(default = "default_grep_timeout", alias = "grepTimeoutSecs")]
    pub grep_timeout_secs: u64,

    /// Matching lines reported by `search_in_file`.
    #[serde(default = "default_grep_max_lines", alias = "grepMaxLines")]
    pub grep_max_lines: usize,

    /// Timeout for `check_running_processes`, in seconds.
    #[serde(default = "default_process_timeout", alias = "processTimeoutSecs")]
    pub process_timeout_secs: u64,

    /// Lines of process listing reported (header included).
    #[serde(default = "default_process_max_lines", alias = "processMaxLines")]
    pub process_max_lines: usize,

    /// Web search URL; `{query}` is replaced by the form-encoded query.
    #[serde(default = "default_search_url", alias = "searchUrl")]
    pub search_url: String,

    /// Music search URL; `{query}` is replaced by the percent-encoded song name.
    #[serde(default = "default_music_url", alias = "musicUrl")]
    pub music_url: String,

    /// Shell command policy.
    #[serde(default, alias = "commandPolicy")]
    pub command_policy: CommandPolicyConfig,
}

fn default_shell_timeout() -> u64 {
    30
}
fn default_grep_timeout() -> u64 {
    10
}
fn default_grep_max_lines() -> usize {
    5
}
fn default_process_timeout() -> u64 {
    10
}
fn default_process_max_lines() -> usize {
    15
}
fn default_search_url() -> String {
    "https://duckduckgo.com/?q={query}".into()
}
fn default_music_url() -> String {
    "https://open.spotify.com/search/{query}".into()
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            shell_timeout_secs: default_shell_timeout(),
            grep_timeout_secs: default_grep_timeout(),
            grep_max_lines: default_grep_max_lines(),
            process_timeout_secs: default_process_timeout(),
            process_max_lines: default_process_max_lines(),
            search_url: default_search_url(),
            music_url: default_music_url(),
            command_policy: CommandPolicyConfig::default(),
        }
    }
}

/// Command execution policy for `execute_shell_command`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandPolicyConfig {
    /// `"denylist"` (default: everything not matching a pattern runs) or
    /// `"allowlist"` (only listed executables run).
    #[serde(default = "default_policy_mode")]
    pub mode: String,

    /// Executable basenames permitted in allowlist mode. Empty keeps the defaults.
    #[serde(default)]
    pub allowlist: Vec<String>,

    /// Extra substrings blocked in denylist mode. Empty keeps the defaults.
    #[serde(default)]
    pub denylist: Vec<String>,
}

fn default_policy_mode() -> String {
    "denylist".into()
}

impl Default for CommandPolicyConfig {
    fn default() -> Self {
        Self {
            mode: default_policy_mode(),
            allowlist: Vec::new(),
            denylist: Vec::new(),
        }
    }
}

// ── Voice ────────────────────────────────────────────────────────────────

/// Speech-to-text backend selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceBackend {
    /// A running whisper.cpp server (`POST /inference`).
    #[default]
    Server,
    /// In-process whisper.cpp through whisper-rs (`whisper-local` feature).
    Local,
}

impl std::fmt::Display for VoiceBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Server => f.write_str("server"),
            Self::Local => f.write_str("local"),
        }
    }
}

/// Voice input configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceConfig {
    /// Offer the `voice` command in the awake state.
    #[serde(default)]
    pub enabled: bool,

    /// Which transcription backend to use.
    #[serde(default)]
    pub backend: VoiceBackend,

    /// Whisper model size (`tiny`, `base`, `small`, ...).
    #[serde(default = "default_model_size", alias = "modelSize")]
    pub model_size: String,

    /// Directory holding `ggml-<size>.bin` models for the local backend.
    #[serde(default, alias = "modelDir")]
    pub model_dir: Option<PathBuf>,

    /// Root URL of the whisper.cpp server.
    #[serde(default = "default_server_url", alias = "serverUrl")]
    pub server_url: String,

    /// Capture sample rate in Hz.
    #[serde(default = "default_sample_rate", alias = "sampleRate")]
    pub sample_rate: u32,

    /// Spoken language hint.
    #[serde(default = "default_language")]
    pub language: String,

    /// Input device name (`None` = system default).
    #[serde(default, alias = "inputDevice")]
    pub input_device: Option<String>,
}

impl VoiceConfig {
    /// Resolve the model directory, falling back to `~/.sakura/models`.
    pub fn resolved_model_dir(&self) -> PathBuf {
        if let Some(ref dir) = self.model_dir {
            return dir.clone();
        }
        #[cfg(feature = "native")]
        if let Some(home) = dirs::home_dir() {
            return home.join(".sakura").join("models");
        }
        PathBuf::from(".sakura").join("models")
    }
}

fn default_model_size() -> String {
    "base".into()
}
fn default_server_url() -> String {
    "http://127.0.0.1:8080".into()
}
fn default_sample_rate() -> u32 {
    16_000
}
fn default_language() -> String {
    "en".into()
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            backend: VoiceBackend::default(),
            model_size: default_model_size(),
            model_dir: None,
            server_url: default_server_url(),
            sample_rate: default_sample_rate(),
            language: default_language(),
            input_device: None,
        }
    }
}
