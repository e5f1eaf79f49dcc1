//! Service Adapter Strategy Pattern
//!
//! Defines the interface every model provider implements. All knowledge of a
//! provider's wire schema lives behind this trait; the reasoning loop only
//! sees [`Message`]s.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_core::service::ServiceAdapter;
//!
//! let messages = service.format_initial_turn("List files in ./output", SYSTEM_PROMPT);
//! let response = service.send_request(&messages, registry.definitions()).await?;
//! let classified = service.classify_response(&response);
//! ```

use async_trait::async_trait;

use crate::error::Result;
use crate::message::{Message, Role, ToolCallDescriptor};
use crate::tool::ToolDefinition;

/// Strategy trait for model providers
///
/// Implement this trait to add support for new backends.
/// The agent works exclusively through this interface.
#[async_trait]
pub trait ServiceAdapter: Send + Sync {
    /// Raw, typed provider response
    type Response: Send + Sync;

    /// Build the opening `system` and `user` messages, with native payloads.
    fn format_initial_turn(&self, user_prompt: &str, system_prompt: &str) -> Vec<Message>;

    /// Serialize the conversation plus tool definitions and perform the call.
    ///
    /// Fails with [`AgentError::Transport`](crate::AgentError::Transport). Never retries.
    async fn send_request(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
    ) -> Result<Self::Response>;

    /// Turn a raw response into tool-call and assistant messages.
    ///
    /// Must be pure: the same response always yields the same messages.
    /// A response with no actionable choices yields an empty list.
    fn classify_response(&self, response: &Self::Response) -> Vec<Message>;

    /// Build the message reporting a tool's output for `call`.
    fn format_tool_result(&self, result_text: &str, call: &ToolCallDescriptor) -> Message;
}

/// What a classified message asks the agent to do
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ServiceAction<'a> {
    /// Show final text to the user
    Respond(&'a str),
    /// Run a tool that has not been answered yet
    InvokeTool(&'a ToolCallDescriptor),
}

impl Message {
    /// The action this message still requires, if any
    pub fn action(&self) -> Option<ServiceAction<'_>> {
        match self.role {
            Role::Assistant => Some(ServiceAction::Respond(self.text())),
            Role::ToolCall => self.pending_tool_call().map(ServiceAction::InvokeTool),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actions() {
        assert_eq!(
            Message::assistant("done").action(),
            Some(ServiceAction::Respond("done"))
        );
        assert_eq!(Message::user("hi").action(), None);
        assert_eq!(Message::tool_result("{}").action(), None);

        let mut call = Message::tool_call(ToolCallDescriptor::new("c1", "list_files", "{}"));
        assert!(matches!(
            call.action(),
            Some(ServiceAction::InvokeTool(d)) if d.name == "list_files"
        ));
        call.mark_tool_call_complete();
        assert_eq!(call.action(), None);
    }
}
