//! Events emitted by the agent loop.
//!
//! The agent reports its progress as a stream of [`AgentEvent`]s so the CLI
//! can narrate what the maid is doing (thinking, picking a tool, reading
//! the result) without the core crate knowing anything about terminals.

use serde::{Deserialize, Serialize};

/// Maximum characters of tool output shown in a [`AgentEvent::ToolEnd`] preview.
pub const PREVIEW_CHARS: usize = 100;

/// A progress event from one agent request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentEvent {
    /// The model has been asked for the next step.
    LlmStart,

    /// The model has answered.
    LlmEnd,

    /// The model decided to call a tool.
    AgentAction {
        /// Tool name.
        tool: String,
        /// Any text the model produced alongside the call.
        reasoning: String,
        /// Raw JSON arguments.
        input: String,
    },

    /// A tool is about to run.
    ToolStart {
        /// Tool name.
        name: String,
    },

    /// A tool finished.
    ToolEnd {
        /// Tool name.
        name: String,
        /// Full tool output.
        output: String,
    },

    /// The final reply is ready.
    Finish,
}

impl AgentEvent {
    /// Shorten tool output to [`PREVIEW_CHARS`] characters, appending `...`
    /// when anything was cut.
    pub fn preview(output: &str) -> String {
        let mut chars = output.chars();
        let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
        if chars.next().is_some() {
            format!("{head}...")
        } else {
            head
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_keeps_short_output() {
        assert_eq!(AgentEvent::preview("ok"), "ok");
    }

    #[test]
    fn preview_truncates_long_output() {
        let long = "x".repeat(150);
        let p = AgentEvent::preview(&long);
        assert_eq!(p.len(), PREVIEW_CHARS + 3);
        assert!(p.ends_with("..."));
    }

    #[test]
    fn preview_exact_length_has_no_ellipsis() {
        let exact = "y".repeat(PREVIEW_CHARS);
        assert_eq!(AgentEvent::preview(&exact), exact);
    }

    #[test]
    fn preview_is_char_safe() {
        let flowers = "🌸".repeat(120);
        let p = AgentEvent::preview(&flowers);
        assert_eq!(p.chars().count(), PREVIEW_CHARS + 3);
    }

    #[test]
    fn events_serialize_with_type_tag() {
        let ev = AgentEvent::ToolStart {
            name: "get_system_info".into(),
        };
        let json = serde_json::to_string(&ev).unwrap();
        assert!(json.contains(r#""type":"tool_start""#));
    }
}
