//! Narrates agent progress on the terminal.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use sakura_core::AgentObserver;
use sakura_types::event::AgentEvent;

/// Prints tool activity, plus the full trace when thinking mode is on.
pub struct ConsoleObserver {
    name: String,
    thinking: Arc<AtomicBool>,
    to_stderr: bool,
}

impl ConsoleObserver {
    pub fn new(name: impl Into<String>, thinking: Arc<AtomicBool>) -> Self {
        Self {
            name: name.into(),
            thinking,
            to_stderr: false,
        }
    }

    /// Write to stderr so stdout carries only the reply (`sakura ask`).
    pub fn on_stderr(mut self) -> Self {
        self.to_stderr = true;
        self
    }
}

/// Lines printed for `event`.
pub fn render(event: &AgentEvent, name: &str, thinking: bool) -> Vec<String> {
    match event {
        AgentEvent::ToolStart { name: tool } => vec![format!("🔧 Executing tool: {tool}")],
        _ if !thinking => Vec::new(),
        AgentEvent::LlmStart => vec!["🧠 Starting to think...".into()],
        AgentEvent::LlmEnd => vec!["💭 Finished thinking!".into()],
        AgentEvent::AgentAction {
            tool,
            reasoning,
            input,
        } => {
            let mut lines = vec![format!("🤔 {name} thinks: I should use {tool}")];
            if !reasoning.trim().is_empty() {
                lines.push(format!("   💡 Reasoning: {}", reasoning.trim()));
            }
            lines.push(format!("   🔧 Tool input: {input}"));
            lines
        }
        AgentEvent::ToolEnd { output, .. } => {
            vec![format!("✅ Tool result: {}", AgentEvent::preview(output))]
        }
        AgentEvent::Finish => vec!["🎯 Final response ready!".into()],
    }
}

impl AgentObserver for ConsoleObserver {
    fn on_event(&self, event: &AgentEvent) {
        for line in render(event, &self.name, self.thinking.load(Ordering::Relaxed)) {
            if self.to_stderr {
                eprintln!("{line}");
            } else {
                println!("{line}");
            }
        }
    }
}
