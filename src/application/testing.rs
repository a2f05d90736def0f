//! In-memory collaborators for bridge tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::{Map, Value, json};

use crate::domain::error::BridgeError;
use crate::domain::traits::{CompletionProvider, ToolSession};
use crate::domain::types::{
    AssistantReply, CompletionRequest, ToolDescriptor, ToolInvocationRequest, ToolOutput,
};

type Handler =
    Box<dyn Fn(&str, &Map<String, Value>) -> Result<ToolOutput, BridgeError> + Send + Sync>;

pub fn tool(name: &str, description: &str) -> ToolDescriptor {
    ToolDescriptor {
        name: name.to_string(),
        description: description.to_string(),
        parameter_schema: Map::new(),
    }
}

pub fn call(id: &str, name: &str, arguments: &str) -> ToolInvocationRequest {
    ToolInvocationRequest {
        call_id: id.to_string(),
        tool_name: name.to_string(),
        arguments: arguments.to_string(),
    }
}

pub struct FakeSession {
    tools: Vec<ToolDescriptor>,
    fail_list: bool,
    handler: Handler,
    calls: Mutex<Vec<(String, Map<String, Value>)>>,
    list_count: AtomicUsize,
    close_count: AtomicUsize,
}

impl FakeSession {
    pub fn with_tools(tools: Vec<ToolDescriptor>) -> Self {
        Self {
            tools,
            fail_list: false,
            handler: Box::new(|name: &str, _: &Map<String, Value>| {
                Err(BridgeError::ToolInvocation {
                    tool: name.to_string(),
                    message: "no handler".to_string(),
                })
            }),
            calls: Mutex::new(Vec::new()),
            list_count: AtomicUsize::new(0),
            close_count: AtomicUsize::new(0),
        }
    }

    /// A session exposing `add(a, b)` and `subtract(a, b)`.
    pub fn calculator() -> Self {
        let schema = json!({
            "type": "object",
            "properties": {"a": {"type": "integer"}, "b": {"type": "integer"}},
            "required": ["a", "b"]
        });
        let schema = schema.as_object().cloned().unwrap_or_default();
        let add = ToolDescriptor {
            name: "add".to_string(),
            description: "Add two numbers together".to_string(),
            parameter_schema: schema.clone(),
        };
        let subtract = ToolDescriptor {
            name: "subtract".to_string(),
            description: "Subtract one number from another".to_string(),
            parameter_schema: schema,
        };
        Self::with_tools(vec![add, subtract]).handler(|name, args| {
            let a = args.get("a").and_then(Value::as_i64).unwrap_or_default();
            let b = args.get("b").and_then(Value::as_i64).unwrap_or_default();
            match name {
                "add" => Ok(ToolOutput::text((a + b).to_string())),
                "subtract" => Ok(ToolOutput::text((a - b).to_string())),
                other => Err(BridgeError::ToolInvocation {
                    tool: other.to_string(),
                    message: "unknown tool".to_string(),
                }),
            }
        })
    }

    pub fn handler(
        mut self,
        handler: impl Fn(&str, &Map<String, Value>) -> Result<ToolOutput, BridgeError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        self.handler = Box::new(handler);
        self
    }

    pub fn failing_list(mut self) -> Self {
        self.fail_list = true;
        self
    }

    pub fn calls(&self) -> Vec<(String, Map<String, Value>)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn list_count(&self) -> usize {
        self.list_count.load(Ordering::SeqCst)
    }

    pub fn close_count(&self) -> usize {
        self.close_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ToolSession for FakeSession {
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, BridgeError> {
        self.list_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_list {
            return Err(BridgeError::Catalog("connection reset".to_string()));
        }
        Ok(self.tools.clone())
    }

    async fn call_tool(
        &self,
        name: &str,
        arguments: Map<String, Value>,
    ) -> Result<ToolOutput, BridgeError> {
        self.calls
            .lock()
            .unwrap()
            .push((name.to_string(), arguments.clone()));
        (self.handler)(name, &arguments)
    }

    async fn close(&self) -> Result<(), BridgeError> {
        self.close_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Provider that replays a fixed script and records every request.
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<AssistantReply, BridgeError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedProvider {
    pub fn new(replies: Vec<AssistantReply>) -> Self {
        Self::with_results(replies.into_iter().map(Ok).collect())
    }

    pub fn with_results(replies: Vec<Result<AssistantReply, BridgeError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<AssistantReply, BridgeError> {
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(BridgeError::Completion("script exhausted".to_string())))
    }
}
