//! The agent loop over real HTTP: a mocked Ollama asks for a tool, gets the
//! result back as a `tool` message, then answers.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use sakura_core::{AgentSettings, MaidAgent, Tool, ToolError, ToolRegistry};
use sakura_llm::{LlmProviderConfig, OpenAiCompatProvider};
use serde_json::{Value, json};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct TeaTimer {
    calls: AtomicUsize,
}

#[async_trait]
impl Tool for TeaTimer {
    fn name(&self) -> &str {
        "tea_timer"
    }

    fn description(&self) -> &str {
        "Minutes left until the tea is ready."
    }

    fn parameters(&self) -> Value {
        json!({"type": "object", "properties": {"kind": {"type": "string"}}, "required": ["kind"]})
    }

    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let kind = args["kind"].as_str().unwrap_or("black");
        Ok(json!(format!("{kind} tea ready in 3 minutes")))
    }
}

fn completion(message: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "id": "chatcmpl-x",
        "model": "phi3:mini",
        "choices": [{"index": 0, "message": message, "finish_reason": "stop"}]
    }))
}

#[tokio::test]
async fn tool_result_is_fed_back() {
    let server = MockServer::start().await;

    // Second round: the tool result is in the transcript.
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains("green tea ready in 3 minutes"))
        .respond_with(completion(json!({
            "role": "assistant",
            "content": "Your green tea will be ready in 3 minutes, Master! 🍵"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(completion(json!({
            "role": "assistant",
            "content": null,
            "tool_calls": [{
                "id": "call_7",
                "type": "function",
                "function": {"name": "tea_timer", "arguments": "{\"kind\":\"green\"}"}
            }]
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    let timer = Arc::new(TeaTimer::default());
    let mut tools = ToolRegistry::new();
    tools.register(timer.clone());

    let provider = OpenAiCompatProvider::new(LlmProviderConfig::ollama(
        format!("{}/v1", server.uri()),
        "phi3:mini",
    ));
    let settings = AgentSettings {
        model: "phi3:mini".into(),
        temperature: 0.7,
        max_tool_iterations: 4,
        memory_window: 0,
        system_prompt: "You are Sakura.".into(),
    };
    let agent = MaidAgent::new(Arc::new(provider), Arc::new(tools), settings);

    let reply = agent.try_process("how long for green tea?").await.unwrap();
    assert_eq!(reply, "Your green tea will be ready in 3 minutes, Master! 🍵");
    assert_eq!(timer.calls.load(Ordering::SeqCst), 1);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    let first: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(first["tools"][0]["function"]["name"], "tea_timer");
    let second: Value = serde_json::from_slice(&requests[1].body).unwrap();
    let last = second["messages"].as_array().unwrap().last().unwrap().clone();
    assert_eq!(last["role"], "tool");
    assert_eq!(last["tool_call_id"], "call_7");
}

#[tokio::test]
async fn unreachable_server_is_an_apology() {
    let provider = OpenAiCompatProvider::new(LlmProviderConfig::ollama("http://127.0.0.1:1/v1", "phi3:mini"));
    let agent = MaidAgent::new(
        Arc::new(provider),
        Arc::new(ToolRegistry::new()),
        AgentSettings {
            model: "phi3:mini".into(),
            temperature: 0.7,
            max_tool_iterations: 4,
            memory_window: 0,
            system_prompt: "You are Sakura.".into(),
        },
    );
    let reply = agent.process("hello").await;
    assert!(reply.starts_with("Sorry Master, I encountered an error..."), "{reply}");
}
