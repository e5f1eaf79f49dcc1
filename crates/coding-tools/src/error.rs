//! Error Types for the file-system tools

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FsToolError>;

#[derive(Error, Debug)]
pub enum FsToolError {
    #[error("File does not exist: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Directory does not exist: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("Argument '{0}' must be a string")]
    InvalidArgument(&'static str),

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FsToolError {
    /// Wrap an IO error, mapping `NotFound` to `not_found`
    pub(crate) fn from_io(
        path: impl Into<PathBuf>,
        source: std::io::Error,
        not_found: fn(PathBuf) -> Self,
    ) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            not_found(path)
        } else {
            Self::Io { path, source }
        }
    }
}
