//! Built-in tools for sakura.
//!
//! Each tool implements [`Tool`](sakura_core::tools::registry::Tool) and
//! answers with a short persona-styled message. Failures Master should hear
//! about (timeouts, missing files, commands that cannot start) come back as
//! "Sorry Master..." text; only bad arguments are returned as
//! [`ToolError::InvalidArgs`].
//!
//! # Tools
//!
//! - **Browser tools** ([`browser_tools`]): `search_internet`, `play_music_spotify`
//! - **File search** ([`file_search`]): `search_in_file`
//! - **Processes** ([`processes`]): `check_running_processes`
//! - **System info** ([`system_info`]): `get_system_info`
//! - **Shell** ([`shell`]): `execute_shell_command`, gated by [`security_policy`]

pub mod browser_tools;
pub mod file_search;
pub mod processes;
pub mod security_policy;
pub mod shell;
pub mod system_info;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use sakura_core::tools::registry::{ToolError, ToolRegistry};
use sakura_platform::Platform;
use sakura_types::config::ToolsConfig;
use serde_json::Value;

use crate::security_policy::CommandPolicy;

/// Register every built-in tool with `registry`.
pub fn register_all<P: Platform + 'static>(
    registry: &mut ToolRegistry,
    platform: Arc<P>,
    config: &ToolsConfig,
) {
    registry.register(Arc::new(browser_tools::SearchInternetTool::new(
        platform.clone(),
        config.search_url.clone(),
    )));
    registry.register(Arc::new(browser_tools::PlayMusicTool::new(
        platform.clone(),
        config.music_url.clone(),
    )));
    registry.register(Arc::new(file_search::SearchInFileTool::new(
        platform.clone(),
        config.grep_timeout_secs,
        config.grep_max_lines,
    )));
    registry.register(Arc::new(processes::CheckProcessesTool::new(
        platform.clone(),
        config.process_timeout_secs,
        config.process_max_lines,
    )));
    registry.register(Arc::new(system_info::SystemInfoTool::new(platform.clone())));
    registry.register(Arc::new(shell::ShellCommandTool::new(
        platform,
        CommandPolicy::from_config(&config.command_policy),
        config.shell_timeout_secs,
    )));
}

/// Fetch a required, non-blank string argument, trimmed.
pub(crate) fn required_str<'a>(args: &'a Value, field: &str) -> Result<&'a str, ToolError> {
    required_raw(args, field).map(str::trim)
}

/// Fetch a required, non-blank string argument exactly as given.
pub(crate) fn required_raw<'a>(args: &'a Value, field: &str) -> Result<&'a str, ToolError> {
    args.get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ToolError::InvalidArgs(format!("missing required field: {field}")))
}

/// First `max` lines of `text`, joined with newlines.
pub(crate) fn head_lines(text: &str, max: usize) -> String {
    text.lines().take(max).collect::<Vec<_>>().join("\n")
}
