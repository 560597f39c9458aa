//! `get_system_info`: a short summary of the host.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sakura_core::tools::registry::{Tool, ToolError};
use sakura_platform::Platform;
use sakura_platform::process::CommandSpec;
use serde_json::{Value, json};
use tracing::debug;

const VERSION_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Human name of the operating system this binary was built for.
pub(crate) fn os_name() -> &'static str {
    match std::env::consts::OS {
        "linux" => "Linux",
        "macos" => "macOS",
        "windows" => "Windows",
        "freebsd" => "FreeBSD",
        "openbsd" => "OpenBSD",
        "netbsd" => "NetBSD",
        other => other,
    }
}

pub struct SystemInfoTool<P: Platform> {
    platform: Arc<P>,
}

impl<P: Platform> SystemInfoTool<P> {
    pub fn new(platform: Arc<P>) -> Self {
        Self { platform }
    }

    /// Kernel release (`uname -r`) or the Windows `ver` banner.
    async fn os_version(&self) -> String {
        let spec = if cfg!(windows) {
            CommandSpec::shell("ver")
        } else {
            CommandSpec::new("uname").arg("-r")
        }
        .timeout(VERSION_PROBE_TIMEOUT);

        match self.platform.process().run(&spec).await {
            Ok(out) if out.success() && !out.stdout.trim().is_empty() => {
                out.stdout.trim().to_string()
            }
            Ok(out) => {
                debug!(exit_code = out.exit_code, "os version probe returned nothing");
                "unknown".into()
            }
            Err(e) => {
                debug!(error = %e, "os version probe failed");
                "unknown".into()
            }
        }
    }
}

#[async_trait]
impl<P: Platform + 'static> Tool for SystemInfoTool<P> {
    fn name(&self) -> &str {
        "get_system_info"
    }

    fn description(&self) -> &str {
        "Get basic information about Master's computer: operating system, version, architecture and current directory."
    }

    fn parameters(&self) -> Value {
        json!({"type": "object", "properties": {}})
    }

    async fn execute(&self, _args: Value) -> Result<Value, ToolError> {
        let current_dir = self
            .platform
            .fs()
            .current_dir()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "unknown".into());

        let entries = [
            ("OS", os_name().to_string()),
            ("OS Version", self.os_version().await),
            ("Architecture", std::env::consts::ARCH.to_string()),
            ("Current Directory", current_dir),
            ("Sakura Version", env!("CARGO_PKG_VERSION").to_string()),
        ];

        let mut reply = String::from("Master, here's your system information:\n");
        for (key, value) in entries {
            reply.push_str(&format!("• {key}: {value}\n"));
        }
        Ok(Value::String(reply))
    }
}
