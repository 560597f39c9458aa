//! Configuration file discovery and loading.
//!
//! The discovery order is:
//! 1. An explicit path (`--config`).
//! 2. The `SAKURA_CONFIG` environment variable.
//! 3. `./config.json` in the working directory.
//! 4. `~/.sakura/config.json`.
//! 5. If none exists, built-in defaults.
//!
//! A path named explicitly (steps 1 and 2) must exist; a missing file there is
//! [`SakuraError::ConfigNotFound`]. Keys are normalized from camelCase to
//! snake_case before deserializing.

use std::path::{Path, PathBuf};

use sakura_types::SakuraError;
use sakura_types::config::Config;
use serde_json::Value;
use tracing::{debug, info};

use crate::env::Environment;
use crate::fs::FileSystem;

/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "SAKURA_CONFIG";

/// File name looked up in the working directory and `~/.sakura/`.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// A loaded configuration and where it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    /// `None` when no file was found and defaults are in use.
    pub path: Option<PathBuf>,
}

/// Where a candidate config path came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Named by the user; must exist.
    Explicit(PathBuf),
    /// Found on disk by the fallback chain.
    Discovered(PathBuf),
}

/// Find the config file without reading it.
pub async fn discover_config_path(
    fs: &dyn FileSystem,
    env: &dyn Environment,
    explicit: Option<&Path>,
) -> Option<ConfigSource> {
    if let Some(path) = explicit {
        return Some(ConfigSource::Explicit(path.to_path_buf()));
    }
    if let Some(path) = env.get_var(CONFIG_ENV_VAR).filter(|p| !p.is_empty()) {
        return Some(ConfigSource::Explicit(PathBuf::from(path)));
    }

    let mut candidates = Vec::new();
    if let Some(cwd) = fs.current_dir() {
        candidates.push(cwd.join(CONFIG_FILE_NAME));
    }
    if let Some(home) = fs.home_dir() {
        candidates.push(home.join(".sakura").join(CONFIG_FILE_NAME));
    }
    for candidate in candidates {
        if fs.exists(&candidate).await {
            return Some(ConfigSource::Discovered(candidate));
        }
    }
    None
}

/// Discover, read and deserialize the configuration.
pub async fn load_config(
    fs: &dyn FileSystem,
    env: &dyn Environment,
    explicit: Option<&Path>,
) -> Result<LoadedConfig, SakuraError> {
    let path = match discover_config_path(fs, env, explicit).await {
        None => {
            info!("no config file found, using defaults");
            return Ok(LoadedConfig {
                config: Config::default(),
                path: None,
            });
        }
        Some(ConfigSource::Explicit(path)) => {
            if !fs.exists(&path).await {
                return Err(SakuraError::ConfigNotFound { path });
            }
            path
        }
        Some(ConfigSource::Discovered(path)) => path,
    };

    debug!(path = %path.display(), "loading config file");
    let contents = fs.read_to_string(&path).await?;
    let config = parse_config(&contents).map_err(|e| SakuraError::ConfigInvalid {
        reason: format!("{}: {e}", path.display()),
    })?;

    Ok(LoadedConfig {
        config,
        path: Some(path),
    })
}

/// Parse config JSON text, normalizing keys first.
pub fn parse_config(contents: &str) -> Result<Config, serde_json::Error> {
    let raw: Value = serde_json::from_str(contents)?;
    serde_json::from_value(normalize_keys(raw))
}

/// Convert camelCase object keys to snake_case, recursively.
pub fn normalize_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (camel_to_snake(&k), normalize_keys(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_keys).collect()),
        other => other,
    }
}

/// Convert one camelCase identifier to snake_case.
///
/// Acronym runs stay together: `"HTTPTimeout"` becomes `"http_timeout"`.
///
/// ```
/// # use sakura_platform::config_loader::camel_to_snake;
/// assert_eq!(camel_to_snake("wakeWord"), "wake_word");
/// assert_eq!(camel_to_snake("ollamaBaseURL"), "ollama_base_url");
/// assert_eq!(camel_to_snake("already_snake"), "already_snake");
/// ```
pub fn camel_to_snake(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &ch) in chars.iter().enumerate() {
        if ch.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|c| c.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower)
            {
                out.push('_');
            }
        }
        out.extend(ch.to_lowercase());
    }
    out
}
