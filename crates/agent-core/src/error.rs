//! Error Types

use thiserror::Error;

/// Result type alias for agent operations
pub type Result<T> = std::result::Result<T, AgentError>;

/// Agent error types
#[derive(Error, Debug)]
pub enum AgentError {
    /// Network, auth, timeout or malformed-response failure talking to the provider
    #[error("Transport error: {0}")]
    Transport(String),

    /// Tool not found in registry
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// Tool arguments could not be parsed or are missing required fields
    #[error("Invalid arguments for tool '{tool}': {reason}")]
    ToolArgument { tool: String, reason: String },

    /// The tool itself failed
    #[error("Tool '{tool}' failed: {source}")]
    ToolExecution {
        tool: String,
        #[source]
        source: anyhow::Error,
    },

    /// A tool with this name is already registered
    #[error("Tool already registered: {0}")]
    DuplicateTool(String),

    /// The act cycle kept requesting tools past the configured limit
    #[error("Maximum tool cycles ({0}) reached")]
    MaxCycles(usize),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AgentError {
    /// Convert to a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport(msg) => format!("The AI service could not be reached: {msg}"),
            Self::ToolNotFound(name) => format!("The tool '{name}' is not available."),
            Self::ToolArgument { tool, reason } => {
                format!("The model sent invalid input to '{tool}': {reason}")
            }
            Self::ToolExecution { tool, source } => format!("Tool '{tool}' failed: {source}"),
            Self::MaxCycles(max) => {
                format!("Gave up after {max} rounds of tool calls. Please try a simpler request.")
            }
            Self::DuplicateTool(name) => format!("A tool named '{name}' is already registered."),
            Self::Config(msg) => format!("Configuration problem: {msg}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        assert_eq!(
            AgentError::ToolNotFound("grep".into()).user_message(),
            "The tool 'grep' is not available."
        );
        assert!(
            AgentError::Transport("HTTP 500".into())
                .user_message()
                .contains("HTTP 500")
        );
        assert!(AgentError::MaxCycles(3).user_message().contains('3'));
    }

    #[test]
    fn test_execution_error_keeps_cause() {
        let err = AgentError::ToolExecution {
            tool: "read_file".into(),
            source: anyhow::anyhow!("File does not exist: ./missing.txt"),
        };
        assert_eq!(
            err.to_string(),
            "Tool 'read_file' failed: File does not exist: ./missing.txt"
        );
        assert!(std::error::Error::source(&err).is_some());
    }
}
