use agent_core::{ParameterSchema, Tool, ToolDefinition};
use async_trait::async_trait;
use serde_json::{Value, json};

use super::str_arg;
use crate::error::FsToolError;

/// Reads a whole file as UTF-8 text
pub struct ReadFileTool;

#[async_trait]
impl Tool for ReadFileTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new("read_file", "Read the content of a specified file").param(
            ParameterSchema::new("filePath", "string", "The path of the file to read"),
        )
    }

    async fn execute(&self, args: &Value) -> anyhow::Result<Value> {
        let path = str_arg(args, "filePath")?;
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| FsToolError::from_io(path, e, FsToolError::FileNotFound))?;

        Ok(json!(format!("Content of file {path}: {content}")))
    }
}
