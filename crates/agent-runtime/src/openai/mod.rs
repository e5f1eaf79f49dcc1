//! OpenAI Service Adapter
//!
//! Implementation of `ServiceAdapter` for the Chat Completions API.

mod transport;
pub mod types;

use std::sync::Arc;
use std::time::Duration;

use agent_core::{
    error::Result,
    message::{Message, Role, ToolCallDescriptor},
    service::ServiceAdapter,
    tool::ToolDefinition,
};
use async_trait::async_trait;
use serde_json::{Value, json};

pub use transport::{HttpTransport, Transport};
use types::{ChatRequest, ChatResponse, FinishReason, FunctionSpec, ToolSpec, WireMessage};

/// OpenAI provider configuration
#[derive(Clone)]
pub struct OpenAiConfig {
    /// API key. Required.
    pub api_key: String,

    /// Model identifier
    pub model: String,

    /// Base URL; override for proxies or compatible local servers
    pub base_url: String,

    /// Per-request timeout
    pub timeout: Duration,
}

impl std::fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl OpenAiConfig {
    pub const DEFAULT_MODEL: &'static str = "gpt-5-nano-2025-08-07";
    pub const DEFAULT_BASE_URL: &'static str = "https://api.openai.com/v1";

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: Self::DEFAULT_MODEL.into(),
            base_url: Self::DEFAULT_BASE_URL.into(),
            timeout: Duration::from_secs(60),
        }
    }

    /// Full URL of the chat completions endpoint
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

/// OpenAI chat-completions adapter
pub struct OpenAiService {
    model: String,
    transport: Arc<dyn Transport>,
}

impl OpenAiService {
    /// Create an adapter talking HTTP to the configured endpoint
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config.model, Arc::new(transport)))
    }

    /// Create an adapter over any transport
    pub fn with_transport(model: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            model: model.into(),
            transport,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Build the request body for `messages` and `tools`
    pub fn build_request(&self, messages: &[Message], tools: &[ToolDefinition]) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: Self::wire_messages(messages),
            tools: tools
                .iter()
                .map(|def| ToolSpec {
                    kind: "function",
                    function: FunctionSpec {
                        name: def.name.clone(),
                        description: def.description.clone(),
                        parameters: def.json_schema(),
                    },
                })
                .collect(),
        }
    }

    /// Convert agent messages to OpenAI format.
    ///
    /// Consecutive tool-call messages are folded back into one assistant
    /// message carrying a `tool_calls` array, which must precede the `tool`
    /// messages answering it.
    fn wire_messages(messages: &[Message]) -> Vec<Value> {
        let mut out = Vec::with_capacity(messages.len());
        let mut calls: Vec<Value> = Vec::new();

        for message in messages {
            if message.role == Role::ToolCall {
                if let Some(entry) = Self::tool_call_entry(message) {
                    calls.push(entry);
                }
                continue;
            }

            Self::flush_calls(&mut out, &mut calls);
            out.push(
                message
                    .native
                    .clone()
                    .unwrap_or_else(|| Self::fallback_native(message)),
            );
        }
        Self::flush_calls(&mut out, &mut calls);

        out
    }

    fn flush_calls(out: &mut Vec<Value>, calls: &mut Vec<Value>) {
        if !calls.is_empty() {
            out.push(json!({
                "role": "assistant",
                "content": null,
                "tool_calls": std::mem::take(calls),
            }));
        }
    }

    fn tool_call_entry(message: &Message) -> Option<Value> {
        if let Some(native) = &message.native {
            return Some(native.clone());
        }
        message.tool_call_descriptor().map(|call| {
            json!({
                "id": call.id,
                "type": "function",
                "function": { "name": call.name, "arguments": call.arguments },
            })
        })
    }

    /// Native form for messages that were built without one
    fn fallback_native(message: &Message) -> Value {
        let role = match message.role {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant | Role::ToolCall => "assistant",
            Role::ToolResult => "tool",
        };
        Self::native(&WireMessage {
            role,
            content: message.content.as_deref(),
            tool_call_id: None,
        })
    }

    fn native(message: &WireMessage<'_>) -> Value {
        // A struct of strings always serializes
        serde_json::to_value(message).unwrap_or(Value::Null)
    }

    fn text_message(role: Role, wire_role: &'static str, text: &str) -> Message {
        Message::new(role, text).with_native(Self::native(&WireMessage {
            role: wire_role,
            content: Some(text),
            tool_call_id: None,
        }))
    }
}

#[async_trait]
impl ServiceAdapter for OpenAiService {
    type Response = ChatResponse;

    fn format_initial_turn(&self, user_prompt: &str, system_prompt: &str) -> Vec<Message> {
        vec![
            Self::text_message(Role::System, "system", system_prompt),
            Self::text_message(Role::User, "user", user_prompt),
        ]
    }

    async fn send_request(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
    ) -> Result<ChatResponse> {
        let request = self.build_request(messages, tools);
        tracing::debug!(
            model = %self.model,
            messages = request.messages.len(),
            tools = request.tools.len(),
            "Sending chat completion request"
        );

        let response = self.transport.send(&request).await?;
        if let Some(usage) = &response.usage {
            tracing::debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Chat completion usage"
            );
        }
        Ok(response)
    }

    fn classify_response(&self, response: &ChatResponse) -> Vec<Message> {
        let mut messages = Vec::new();

        for choice in &response.choices {
            let message = &choice.message;
            match choice.finish_reason {
                Some(FinishReason::ToolCalls) => {
                    messages.extend(message.tool_calls.iter().map(|call| {
                        let descriptor = ToolCallDescriptor::new(
                            &call.id,
                            &call.function.name,
                            &call.function.arguments,
                        );
                        // A struct of strings always serializes
                        let native = serde_json::to_value(call).unwrap_or(Value::Null);
                        Message::tool_call(descriptor).with_native(native)
                    }));
                }
                Some(FinishReason::Stop) => {
                    let text = message.content.as_deref().unwrap_or_default();
                    messages.push(Self::text_message(Role::Assistant, "assistant", text));
                }
                other => {
                    tracing::warn!(
                        finish_reason = ?other,
                        index = choice.index,
                        "Treating unexpected finish reason as final text"
                    );
                    let text = message.content.as_deref().unwrap_or_default();
                    messages.push(Self::text_message(Role::Assistant, "assistant", text));
                }
            }
        }

        messages
    }

    fn format_tool_result(&self, result_text: &str, call: &ToolCallDescriptor) -> Message {
        Message::tool_result(result_text).with_native(Self::native(&WireMessage {
            role: "tool",
            content: Some(result_text),
            tool_call_id: Some(&call.id),
        }))
    }
}
