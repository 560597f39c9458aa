//! Tool registry and [`Tool`] trait definition.
//!
//! Tools are exposed to the model through OpenAI function calling. Each one
//! declares a JSON Schema for its arguments; the registry publishes those
//! schemas and dispatches calls by name.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

/// Error type for tool execution.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// No tool with that name is registered.
    #[error("tool not found: {0}")]
    NotFound(String),

    /// Arguments are missing, malformed or of the wrong type.
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
}

/// A capability the model may invoke.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name used in function calling.
    fn name(&self) -> &str;

    /// One-line description shown to the model.
    fn description(&self) -> &str;

    /// JSON Schema (`type: "object"`) for the arguments.
    fn parameters(&self) -> Value;

    /// Run the tool. Arguments match [`parameters`](Tool::parameters).
    async fn execute(&self, args: Value) -> Result<Value, ToolError>;
}

/// Tools indexed by name.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool, replacing any existing tool with the same name.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        debug!(tool = %name, "registering tool");
        self.tools.insert(name, tool);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Registered tool names, sorted.
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// `(name, description)` pairs, sorted by name.
    pub fn describe(&self) -> Vec<(String, String)> {
        self.list()
            .into_iter()
            .filter_map(|name| {
                let desc = self.tools.get(&name)?.description().to_string();
                Some((name, desc))
            })
            .collect()
    }

    /// Schemas in OpenAI function-calling format, sorted by tool name:
    ///
    /// ```json
    /// {"type": "function", "function": {"name": "...", "description": "...", "parameters": {...}}}
    /// ```
    pub fn schemas(&self) -> Vec<Value> {
        self.list()
            .into_iter()
            .filter_map(|name| {
                let tool = self.tools.get(&name)?;
                Some(serde_json::json!({
                    "type": "function",
                    "function": {
                        "name": name,
                        "description": tool.description(),
                        "parameters": tool.parameters(),
                    }
                }))
            })
            .collect()
    }

    /// Execute a tool by name.
    pub async fn execute(&self, name: &str, args: Value) -> Result<Value, ToolError> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;
        debug!(tool = %name, "executing tool");
        tool.execute(args).await
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
