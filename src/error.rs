use std::path::PathBuf;

/// Errors that can occur when setting up loggers or emitting records.
#[derive(Debug, thiserror::Error)]
pub enum StdLogError {
    #[error("Failed to resolve the current working directory: {0}")]
    CurrentDirUnavailable(String),
    #[error("Failed to create directory '{0}': {1}")]
    CreateDirectoryFailed(PathBuf, String),
    #[error("Log path '{0}' exists but is not a directory")]
    NotADirectory(PathBuf),
    #[error("Failed to create file '{0}': {1}")]
    CreateFileFailed(PathBuf, String),
    #[error("Failed to rename file from '{from}' to '{to}': {error}")]
    RenameFileError { from: PathBuf, to: PathBuf, error: String },
    #[error("Failed to remove file '{path}': {error}")]
    RemoveFileError { path: PathBuf, error: String },
    #[error("File IO error: {0}")]
    FileIOError(#[from] std::io::Error),
    #[error("Invalid logging level: {0}")]
    InvalidLevel(String),
    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type Result<T, E = StdLogError> = std::result::Result<T, E>;
