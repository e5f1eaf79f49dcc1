//! Conversation Messages
//!
//! Standard message format used across the agent system. Each message can
//! carry the provider-native payload it was built from so a service adapter
//! can send it back unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{AgentError, Result};

/// Role of a message sender
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    /// System prompt/instructions
    System,
    /// User input
    User,
    /// Assistant (LLM) final text
    Assistant,
    /// A tool invocation requested by the model
    ToolCall,
    /// Output of a tool, reported back to the model
    ToolResult,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::System => write!(f, "system"),
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
            Self::ToolCall => write!(f, "tool-call"),
            Self::ToolResult => write!(f, "tool-result"),
        }
    }
}

/// One requested tool invocation, correlated to its result by `id`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallDescriptor {
    /// Correlation id, unique within a provider response
    pub id: String,

    /// Tool to invoke
    pub name: String,

    /// JSON-encoded arguments exactly as the provider sent them
    pub arguments: String,

    /// Set once the result has been appended to the conversation
    #[serde(default)]
    pub complete: bool,
}

impl ToolCallDescriptor {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments: arguments.into(),
            complete: false,
        }
    }

    /// Parse the argument string into a JSON object.
    ///
    /// An empty string is treated as `{}`; anything that is not a JSON object
    /// is rejected with [`AgentError::ToolArgument`].
    pub fn parse_arguments(&self) -> Result<Value> {
        let raw = self.arguments.trim();
        if raw.is_empty() {
            return Ok(Value::Object(Map::new()));
        }

        match serde_json::from_str::<Value>(raw) {
            Ok(value @ Value::Object(_)) => Ok(value),
            Ok(other) => Err(AgentError::ToolArgument {
                tool: self.name.clone(),
                reason: format!("expected a JSON object, got {other}"),
            }),
            Err(e) => Err(AgentError::ToolArgument {
                tool: self.name.clone(),
                reason: format!("malformed JSON: {e}"),
            }),
        }
    }
}

/// A single message in a conversation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Message {
    /// Message role
    pub role: Role,

    /// Text content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Present on `tool-call` messages
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call: Option<ToolCallDescriptor>,

    /// Provider-native form of this message, used to resend it verbatim
    #[serde(skip_serializing_if = "Option::is_none")]
    pub native: Option<Value>,

    /// Timestamp
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a new message
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: Some(content.into()),
            tool_call: None,
            native: None,
            timestamp: Utc::now(),
        }
    }

    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Create a tool-call message with no text content
    pub fn tool_call(descriptor: ToolCallDescriptor) -> Self {
        Self {
            role: Role::ToolCall,
            content: None,
            tool_call: Some(descriptor),
            native: None,
            timestamp: Utc::now(),
        }
    }

    /// Create a tool result message
    pub fn tool_result(content: impl Into<String>) -> Self {
        Self::new(Role::ToolResult, content)
    }

    /// Attach the provider-native payload
    #[must_use]
    pub fn with_native(mut self, native: Value) -> Self {
        self.native = Some(native);
        self
    }

    /// Text content, empty if none
    pub fn text(&self) -> &str {
        self.content.as_deref().unwrap_or_default()
    }

    pub const fn tool_call_descriptor(&self) -> Option<&ToolCallDescriptor> {
        self.tool_call.as_ref()
    }

    /// A tool call that has not been answered yet
    pub fn pending_tool_call(&self) -> Option<&ToolCallDescriptor> {
        self.tool_call.as_ref().filter(|call| !call.complete)
    }

    /// Mark the outstanding tool call as answered.
    ///
    /// Returns `false` if this is not a tool call or it was already complete.
    pub fn mark_tool_call_complete(&mut self) -> bool {
        match self.tool_call.as_mut() {
            Some(call) if !call.complete => {
                call.complete = true;
                true
            }
            _ => false,
        }
    }

    /// Estimate token count (rough approximation)
    pub fn estimate_tokens(&self) -> u32 {
        let len = self.text().len()
            + self
                .tool_call
                .as_ref()
                .map_or(0, |call| call.name.len() + call.arguments.len());
        // ~4 characters per token, +4 for role overhead
        u32::try_from(len / 4).unwrap_or(u32::MAX).saturating_add(4)
    }
}

/// The messages carried from one user turn to the next
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a message
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Get all messages
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Get the last message
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Reduce a finished working list to its user messages plus the final reply.
    ///
    /// Tool calls, tool results, system prompts and earlier assistant replies
    /// are dropped. The reply is the last assistant message at or after
    /// `turn_start`; replies carried in from earlier turns never count. If the
    /// model produced none this turn an empty reply is recorded.
    pub fn collapse(working: &[Message], turn_start: usize) -> Self {
        let mut messages: Vec<Message> = working
            .iter()
            .filter(|m| m.role == Role::User)
            .cloned()
            .collect();

        let reply = working
            .get(turn_start..)
            .unwrap_or_default()
            .iter()
            .rev()
            .find(|m| m.role == Role::Assistant)
            .cloned()
            .unwrap_or_else(|| Message::assistant(""));
        messages.push(reply);

        Self { messages }
    }

    /// Estimate total tokens in conversation
    pub fn estimate_tokens(&self) -> u32 {
        self.messages.iter().map(Message::estimate_tokens).sum()
    }

    /// Number of messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
