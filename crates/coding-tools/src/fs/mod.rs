//! File-system tools
//!
//! Thin wrappers over the filesystem. Paths are used as given, relative to
//! the process working directory.
//!
//! `read_file`, `create_file` and `update_file` go through `tokio::fs`.
//! `list_files` is a plain [`agent_core::FnTool`] and calls `std::fs`
//! directly, blocking the calling worker for the duration of one
//! `read_dir` of a single directory.

mod list;
mod read;
mod write;

pub use list::{ListFilesTool, list_files_tool};
pub use read::ReadFileTool;
pub use write::{CreateFileTool, UpdateFileTool};

use serde_json::Value;

use crate::error::{FsToolError, Result};

/// Fetch a string argument; presence is already checked by the registry
fn str_arg<'a>(args: &'a Value, name: &'static str) -> Result<&'a str> {
    args.get(name)
        .and_then(Value::as_str)
        .ok_or(FsToolError::InvalidArgument(name))
}
