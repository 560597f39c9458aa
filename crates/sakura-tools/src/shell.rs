//! `execute_shell_command`: run a command line through the system shell.
//!
//! Every command is checked against the [`CommandPolicy`] first. Refusals
//! and failures come back as apologies so the model can explain them to
//! Master; they never abort the conversation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sakura_core::tools::registry::{Tool, ToolError};
use sakura_platform::Platform;
use sakura_platform::process::{CommandSpec, ProcessError};
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::required_str;
use crate::security_policy::CommandPolicy;

pub struct ShellCommandTool<P: Platform> {
    platform: Arc<P>,
    policy: CommandPolicy,
    timeout_secs: u64,
}

impl<P: Platform> ShellCommandTool<P> {
    pub fn new(platform: Arc<P>, policy: CommandPolicy, timeout_secs: u64) -> Self {
        Self {
            platform,
            policy,
            timeout_secs,
        }
    }
}

#[async_trait]
impl<P: Platform + 'static> Tool for ShellCommandTool<P> {
    fn name(&self) -> &str {
        "execute_shell_command"
    }

    fn description(&self) -> &str {
        "Execute a shell command on Master's computer and return its output."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "command": {
                    "type": "string",
                    "description": "The shell command line to run"
                }
            },
            "required": ["command"]
        })
    }

    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        let command = required_str(&args, "command")?;

        if let Err(e) = self.policy.validate(command) {
            warn!(command, reason = %e, "shell command refused by policy");
            return Ok(Value::String(format!(
                "Sorry Master, I'm not allowed to run that command... ({e})"
            )));
        }

        info!(command, "executing shell command");
        let spec = CommandSpec::shell(command).timeout(Duration::from_secs(self.timeout_secs));

        let reply = match self.platform.process().run(&spec).await {
            Ok(out) => {
                debug!(exit_code = out.exit_code, "shell command finished");
                if !out.stdout.trim().is_empty() {
                    format!(
                        "Master, the command executed successfully:\n{}",
                        out.stdout.trim_end()
                    )
                } else if !out.stderr.trim().is_empty() {
                    format!("Master, there was an error:\n{}", out.stderr.trim_end())
                } else {
                    "Master, the command executed without any output.".to_string()
                }
            }
            Err(ProcessError::TimedOut { .. }) => {
                warn!(command, "shell command timed out");
                "Sorry Master, the command took too long to execute...".to_string()
            }
            Err(e) => {
                warn!(command, error = %e, "shell command failed to start");
                format!("Sorry Master, I couldn't execute the command... ({e})")
            }
        };
        Ok(Value::String(reply))
    }
}
