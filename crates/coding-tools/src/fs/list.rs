use std::path::Path;

use agent_core::{FnTool, ParameterSchema, ToolDefinition};
use serde_json::{Value, json};

use super::str_arg;
use crate::error::{FsToolError, Result};

/// `list_files`, backed by a synchronous function.
///
/// Runs on the caller's thread.
pub type ListFilesTool = FnTool<fn(&Value) -> anyhow::Result<Value>>;

pub fn list_files_tool() -> ListFilesTool {
    let definition = ToolDefinition::new("list_files", "List all files in a specified directory")
        .param(ParameterSchema::new(
            "dirPath",
            "string",
            "The path of the directory to list files from",
        ));
    FnTool::new(
        definition,
        list_files_value as fn(&Value) -> anyhow::Result<Value>,
    )
}

fn list_files_value(args: &Value) -> anyhow::Result<Value> {
    let dir = str_arg(args, "dirPath")?;
    Ok(json!(list_files(Path::new(dir))?))
}

/// Names of the regular files directly inside `dir`, sorted
fn list_files(dir: &Path) -> Result<Vec<String>> {
    let entries =
        std::fs::read_dir(dir).map_err(|e| FsToolError::from_io(dir, e, FsToolError::DirectoryNotFound))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| FsToolError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        // Follows symlinks, so a link to a file counts as a file
        let is_file = std::fs::metadata(entry.path()).is_ok_and(|m| m.is_file());
        if is_file {
            files.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    files.sort();

    tracing::debug!(dir = %dir.display(), count = files.len(), "Listed files");
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_core::Tool;

    #[tokio::test]
    async fn test_lists_only_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.txt"), "b").unwrap();
        std::fs::write(dir.path().join("a.txt"), "a").unwrap();
        std::fs::create_dir(dir.path().join("subdir")).unwrap();

        let out = list_files_tool()
            .execute(&json!({ "dirPath": dir.path().to_str().unwrap() }))
            .await
            .unwrap();
        assert_eq!(out, json!(["a.txt", "b.txt"]));
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent");

        let err = list_files(&missing).unwrap_err();
        assert!(matches!(err, FsToolError::DirectoryNotFound(p) if p == missing));
    }
}
