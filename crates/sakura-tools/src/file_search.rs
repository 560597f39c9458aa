//! `search_in_file`: grep a single file for a pattern.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sakura_core::tools::registry::{Tool, ToolError};
use sakura_platform::Platform;
use sakura_platform::process::{CommandSpec, ProcessError};
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::{head_lines, required_raw, required_str};

/// Runs `grep -n` against one file and reports the first few matching lines.
pub struct SearchInFileTool<P: Platform> {
    platform: Arc<P>,
    timeout_secs: u64,
    max_lines: usize,
}

impl<P: Platform> SearchInFileTool<P> {
    pub fn new(platform: Arc<P>, timeout_secs: u64, max_lines: usize) -> Self {
        Self {
            platform,
            timeout_secs,
            max_lines,
        }
    }

    /// Expand a leading `~` to the home directory.
    fn resolve(&self, filepath: &str) -> PathBuf {
        let home = self.platform.fs().home_dir();
        match (filepath.strip_prefix('~'), home) {
            (Some(""), Some(home)) => home,
            (Some(rest), Some(home)) if rest.starts_with(['/', '\\']) => {
                home.join(&rest[1..])
            }
            _ => PathBuf::from(filepath),
        }
    }
}

#[async_trait]
impl<P: Platform + 'static> Tool for SearchInFileTool<P> {
    fn name(&self) -> &str {
        "search_in_file"
    }

    fn description(&self) -> &str {
        "Search for a text pattern inside a file and return the matching lines with line numbers."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "pattern": {
                    "type": "string",
                    "description": "Text or regular expression to look for"
                },
                "filepath": {
                    "type": "string",
                    "description": "Path of the file to search"
                }
            },
            "required": ["pattern", "filepath"]
        })
    }

    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        // Leading whitespace can be part of what Master is looking for.
        let pattern = required_raw(&args, "pattern")?;
        let filepath = required_str(&args, "filepath")?;
        let path = self.resolve(filepath);

        if !self.platform.fs().exists(&path).await {
            return Ok(Value::String(format!(
                "Master, I couldn't find the file: {filepath}"
            )));
        }

        debug!(pattern, path = %path.display(), "searching file");
        let spec = CommandSpec::new("grep")
            .args(["-n", "-e", pattern, "--"])
            .arg(path.to_string_lossy())
            .timeout(Duration::from_secs(self.timeout_secs));

        let reply = match self.platform.process().run(&spec).await {
            Ok(out) if !out.stdout.trim().is_empty() => format!(
                "Master, here's what I found in {filepath}:\n{}",
                head_lines(&out.stdout, self.max_lines)
            ),
            // grep exits 1 when nothing matched and 2 on errors.
            Ok(out) if out.exit_code > 1 && !out.stderr.trim().is_empty() => {
                warn!(stderr = %out.stderr.trim(), "grep failed");
                format!(
                    "Sorry Master, I couldn't search the file... ({})",
                    out.stderr.trim()
                )
            }
            Ok(_) => format!("Master, I couldn't find '{pattern}' in {filepath}."),
            Err(ProcessError::TimedOut { .. }) => {
                "Sorry Master, that search took too long...".to_string()
            }
            Err(e) => {
                warn!(error = %e, "grep could not run");
                format!("Sorry Master, I couldn't search the file... ({e})")
            }
        };
        Ok(Value::String(reply))
    }
}
