//! `check_running_processes`: the busiest processes on the machine.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sakura_core::tools::registry::{Tool, ToolError};
use sakura_platform::Platform;
use sakura_platform::process::CommandSpec;
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::head_lines;

/// Process listing command for the current OS, sorted by CPU where possible.
pub(crate) fn listing_command() -> CommandSpec {
    if cfg!(windows) {
        CommandSpec::new("tasklist").args(["/fo", "table"])
    } else if cfg!(target_os = "macos") {
        // BSD ps has no --sort; -r sorts by CPU.
        CommandSpec::new("ps").args(["aux", "-r"])
    } else {
        CommandSpec::new("ps").args(["aux", "--sort=-%cpu"])
    }
}

pub struct CheckProcessesTool<P: Platform> {
    platform: Arc<P>,
    timeout_secs: u64,
    max_lines: usize,
}

impl<P: Platform> CheckProcessesTool<P> {
    pub fn new(platform: Arc<P>, timeout_secs: u64, max_lines: usize) -> Self {
        Self {
            platform,
            timeout_secs,
            max_lines,
        }
    }
}

#[async_trait]
impl<P: Platform + 'static> Tool for CheckProcessesTool<P> {
    fn name(&self) -> &str {
        "check_running_processes"
    }

    fn description(&self) -> &str {
        "List the processes currently running on Master's computer, busiest first."
    }

    fn parameters(&self) -> Value {
        json!({"type": "object", "properties": {}})
    }

    async fn execute(&self, _args: Value) -> Result<Value, ToolError> {
        let spec = listing_command().timeout(Duration::from_secs(self.timeout_secs));
        debug!(program = %spec.program, "listing processes");

        let reply = match self.platform.process().run(&spec).await {
            Ok(out) if out.success() || !out.stdout.trim().is_empty() => format!(
                "Master, here are the running processes:\n{}",
                head_lines(&out.stdout, self.max_lines)
            ),
            Ok(out) => {
                let reason = out.stderr.trim();
                warn!(exit_code = out.exit_code, stderr = reason, "process listing failed");
                format!("Sorry Master, I couldn't check the processes... ({reason})")
            }
            Err(e) => {
                warn!(error = %e, "process listing failed");
                format!("Sorry Master, I couldn't check the processes... ({e})")
            }
        };
        Ok(Value::String(reply))
    }
}
