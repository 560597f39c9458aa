//! The tool-calling agent loop.
//!
//! [`MaidAgent::process`] turns one line from Master into one reply:
//!
//! ```text
//! system prompt + replayed history + user input
//!   |
//!   v
//! provider.complete()  <-----------------------+
//!   |                                          |
//!   +-- tool calls? -- execute each via registry, append results
//!   |
//!   v
//! final text
//! ```
//!
//! Failures never escape `process`: they become an apologetic reply so the
//! session keeps running.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use sakura_llm::{ChatMessage, ChatRequest, Provider, ProviderError, ToolCall};
use sakura_types::SakuraError;
use sakura_types::config::Config;
use sakura_types::event::AgentEvent;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::observer::{AgentObserver, NullObserver};
use crate::persona;
use crate::security::{MAX_TOOL_RESULT_BYTES, result_text, truncate_result};
use crate::tools::registry::{ToolError, ToolRegistry};

/// Per-agent model settings.
#[derive(Debug, Clone)]
pub struct AgentSettings {
    pub model: String,
    pub temperature: f64,
    pub max_tool_iterations: u32,
    /// Previous exchanges replayed into each request (0 = stateless).
    pub memory_window: usize,
    pub system_prompt: String,
}

impl AgentSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            model: config.ollama_model.clone(),
            temperature: config.temperature,
            max_tool_iterations: config.max_tool_iterations,
            memory_window: config.memory_window,
            system_prompt: persona::system_prompt(config),
        }
    }
}

/// The maid: a provider, a tool registry and a persona.
pub struct MaidAgent {
    provider: Arc<dyn Provider>,
    tools: Arc<ToolRegistry>,
    settings: AgentSettings,
    observer: Arc<dyn AgentObserver>,
    thinking: Arc<AtomicBool>,
    history: Mutex<VecDeque<ChatMessage>>,
}

impl MaidAgent {
    pub fn new(
        provider: Arc<dyn Provider>,
        tools: Arc<ToolRegistry>,
        settings: AgentSettings,
    ) -> Self {
        Self {
            provider,
            tools,
            settings,
            observer: Arc::new(NullObserver),
            thinking: Arc::new(AtomicBool::new(false)),
            history: Mutex::new(VecDeque::new()),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn AgentObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Share a thinking flag with whoever renders events.
    pub fn with_thinking_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.thinking = flag;
        self
    }

    pub fn thinking_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.thinking)
    }

    pub fn is_thinking(&self) -> bool {
        self.thinking.load(Ordering::Relaxed)
    }

    pub fn set_thinking(&self, enabled: bool) {
        self.thinking.store(enabled, Ordering::Relaxed);
    }

    /// Flip thinking mode and return the new state.
    pub fn toggle_thinking(&self) -> bool {
        !self.thinking.fetch_xor(true, Ordering::Relaxed)
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn settings(&self) -> &AgentSettings {
        &self.settings
    }

    /// Messages currently replayed as history.
    pub fn history_len(&self) -> usize {
        self.history.lock().map(|h| h.len()).unwrap_or(0)
    }

    /// Answer `input`. Errors are rendered as an apology.
    pub async fn process(&self, input: &str) -> String {
        match self.try_process(input).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "request failed");
                format!("Sorry Master, I encountered an error... ({e})")
            }
        }
    }

    /// Answer `input`, surfacing errors.
    pub async fn try_process(&self, input: &str) -> Result<String, SakuraError> {
        let mut messages = Vec::with_capacity(4);
        messages.push(ChatMessage::system(self.settings.system_prompt.clone()));
        if let Ok(history) = self.history.lock() {
            messages.extend(history.iter().cloned());
        }
        messages.push(ChatMessage::user(input));

        let request = ChatRequest::new(self.settings.model.clone(), messages)
            .with_temperature(self.settings.temperature)
            .with_tools(self.tools.schemas());

        let reply = self.run_tool_loop(request).await?;
        self.remember(input, &reply);
        Ok(reply)
    }

    async fn run_tool_loop(&self, mut request: ChatRequest) -> Result<String, SakuraError> {
        let max_iterations = self.settings.max_tool_iterations.max(1);

        for iteration in 0..max_iterations {
            self.observer.on_event(&AgentEvent::LlmStart);
            let response = self
                .provider
                .complete(&request)
                .await
                .map_err(provider_error)?;
            self.observer.on_event(&AgentEvent::LlmEnd);

            let message = response
                .choices
                .into_iter()
                .next()
                .map(|c| c.message)
                .ok_or_else(|| SakuraError::Provider {
                    message: "response contained no choices".into(),
                })?;

            let calls = with_call_ids(message.tool_calls(), iteration);
            if calls.is_empty() {
                debug!(iteration, "tool loop complete");
                self.observer.on_event(&AgentEvent::Finish);
                return Ok(message.content.trim().to_string());
            }

            debug!(iteration, tool_count = calls.len(), "executing tool calls");
            for call in &calls {
                self.observer.on_event(&AgentEvent::AgentAction {
                    tool: call.function.name.clone(),
                    reasoning: message.content.trim().to_string(),
                    input: call.function.arguments.clone(),
                });
            }

            request.messages.push(ChatMessage {
                role: "assistant".into(),
                content: message.content,
                tool_call_id: None,
                tool_calls: Some(calls.clone()),
            });

            for call in calls {
                let output = self.execute_call(&call).await;
                request.messages.push(ChatMessage::tool(call.id, output));
            }
        }

        Err(SakuraError::Provider {
            message: format!("max tool iterations ({max_iterations}) exceeded"),
        })
    }

    async fn execute_call(&self, call: &ToolCall) -> String {
        let name = call.function.name.as_str();
        self.observer.on_event(&AgentEvent::ToolStart {
            name: name.to_string(),
        });

        let result = match parse_arguments(&call.function.arguments) {
            Ok(args) => self.tools.execute(name, args).await,
            Err(e) => Err(e),
        };
        let output = match result {
            Ok(value) => result_text(&truncate_result(value, MAX_TOOL_RESULT_BYTES)),
            Err(e) => {
                error!(tool = %name, error = %e, "tool execution failed");
                serde_json::json!({ "error": e.to_string() }).to_string()
            }
        };

        self.observer.on_event(&AgentEvent::ToolEnd {
            name: name.to_string(),
            output: output.clone(),
        });
        output
    }

    fn remember(&self, input: &str, reply: &str) {
        let window = self.settings.memory_window;
        if window == 0 {
            return;
        }
        if let Ok(mut history) = self.history.lock() {
            history.push_back(ChatMessage::user(input));
            history.push_back(ChatMessage::assistant(reply));
            while history.len() > window * 2 {
                history.pop_front();
            }
        }
    }
}

/// Tool calls with an id each; local models often leave ids empty.
fn with_call_ids(calls: &[ToolCall], iteration: u32) -> Vec<ToolCall> {
    calls
        .iter()
        .enumerate()
        .map(|(i, call)| {
            let mut call = call.clone();
            if call.id.is_empty() {
                call.id = format!("call_{iteration}_{i}");
            }
            call
        })
        .collect()
}

/// Parse tool arguments. Empty means no arguments; a JSON string holding an
/// object (double-encoded) is unwrapped.
fn parse_arguments(raw: &str) -> Result<Value, ToolError> {
    if raw.trim().is_empty() {
        return Ok(Value::Object(Default::default()));
    }
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| ToolError::InvalidArgs(format!("malformed JSON arguments: {e}")))?;
    if let Value::String(ref inner) = value
        && let Ok(decoded @ Value::Object(_)) = serde_json::from_str::<Value>(inner)
    {
        return Ok(decoded);
    }
    Ok(value)
}

fn provider_error(err: ProviderError) -> SakuraError {
    match err {
        ProviderError::Timeout => SakuraError::Timeout {
            operation: "llm_call".into(),
        },
        other => SakuraError::Provider {
            message: other.to_string(),
        },
    }
}
