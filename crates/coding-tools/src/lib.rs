//! # coding-tools
//!
//! File-system tools for the coding agent, plus the system prompt that
//! tells the model when to use them.
//!
//! | Tool          | Parameters              | Result                         |
//! |---------------|-------------------------|--------------------------------|
//! | `read_file`   | `filePath`              | file content                   |
//! | `create_file` | `filePath`, `content`   | content written                |
//! | `update_file` | `filePath`, `newContent`| content written (must exist)   |
//! | `list_files`  | `dirPath`               | sorted names of regular files  |

pub mod error;
pub mod fs;

use agent_core::ToolRegistry;

pub use error::{FsToolError, Result};

/// Re-export tools for easy registration
pub mod tools {
    pub use crate::fs::{
        CreateFileTool, ListFilesTool, ReadFileTool, UpdateFileTool, list_files_tool,
    };
}

/// System prompt for the coding agent
pub const CODING_AGENT_PROMPT: &str = "You are a helpful coding assistant. \
Always call a tool whenever you can to help the user with coding tasks. \
Do not call a tool if the user is asking a non-coding related question. \
Avoid redundant tool calls.";

/// Register every coding tool into `registry`
pub fn register_all(registry: &mut ToolRegistry) -> agent_core::Result<()> {
    registry.register(tools::ReadFileTool)?;
    registry.register(tools::CreateFileTool)?;
    registry.register(tools::UpdateFileTool)?;
    registry.register(tools::list_files_tool())?;
    Ok(())
}

/// A registry holding exactly the coding tools
pub fn registry() -> agent_core::Result<ToolRegistry> {
    let mut registry = ToolRegistry::new();
    register_all(&mut registry)?;
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_registry_contents() {
        let registry = registry().unwrap();
        assert_eq!(
            registry.names(),
            vec!["read_file", "create_file", "update_file", "list_files"]
        );
    }

    #[test]
    fn test_registering_twice_fails() {
        let mut registry = registry().unwrap();
        assert!(matches!(
            register_all(&mut registry),
            Err(agent_core::AgentError::DuplicateTool(name)) if name == "read_file"
        ));
    }

    #[tokio::test]
    async fn test_missing_file_is_execution_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.txt");

        let err = registry()
            .unwrap()
            .invoke("read_file", &json!({ "filePath": path.to_str().unwrap() }))
            .await
            .unwrap_err();
        assert!(matches!(err, agent_core::AgentError::ToolExecution { ref tool, .. } if tool == "read_file"));
    }
}
