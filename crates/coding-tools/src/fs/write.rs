use std::path::Path;

use agent_core::{ParameterSchema, Tool, ToolDefinition};
use async_trait::async_trait;
use serde_json::{Value, json};

use super::str_arg;
use crate::error::{FsToolError, Result};

/// Creates (or overwrites) a file, making parent directories as needed
pub struct CreateFileTool;

/// Replaces the content of a file that already exists
pub struct UpdateFileTool;

#[async_trait]
impl Tool for CreateFileTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new("create_file", "Create a new file with the specified content")
            .param(ParameterSchema::new(
                "filePath",
                "string",
                "The path of the file to create",
            ))
            .param(ParameterSchema::new(
                "content",
                "string",
                "The content to write to the file",
            ))
    }

    async fn execute(&self, args: &Value) -> anyhow::Result<Value> {
        let path = str_arg(args, "filePath")?;
        let content = str_arg(args, "content")?;

        if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| FsToolError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }
        let written = write_and_read_back(path, content).await?;
        tracing::info!(path, "File created");

        Ok(json!(format!("Content of created file {path}: {written}")))
    }
}

#[async_trait]
impl Tool for UpdateFileTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new("update_file", "Update the content of an existing file")
            .param(ParameterSchema::new(
                "filePath",
                "string",
                "The path of the file to update",
            ))
            .param(ParameterSchema::new(
                "newContent",
                "string",
                "The new content to write to the file",
            ))
    }

    async fn execute(&self, args: &Value) -> anyhow::Result<Value> {
        let path = str_arg(args, "filePath")?;
        let new_content = str_arg(args, "newContent")?;

        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| FsToolError::from_io(path, e, FsToolError::FileNotFound))?;
        if !metadata.is_file() {
            return Err(FsToolError::FileNotFound(path.into()).into());
        }

        let written = write_and_read_back(path, new_content).await?;
        tracing::info!(path, "File updated");

        Ok(json!(format!("Content of updated file {path}: {written}")))
    }
}

async fn write_and_read_back(path: &str, content: &str) -> Result<String> {
    let io_err = |source| FsToolError::Io {
        path: path.into(),
        source,
    };
    tokio::fs::write(path, content).await.map_err(io_err)?;
    tokio::fs::read_to_string(path).await.map_err(io_err)
}
