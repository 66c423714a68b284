use std::path::PathBuf;
use thiserror::Error;

/// Domain failures of the deploy and packaging tools
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("output path must be a folder: {0:?}")]
    OutputNotADirectory(PathBuf),

    #[error("expected source file does not exist: {0:?}")]
    MissingSource(PathBuf),

    #[error("source and destination are the same file: {0:?}")]
    SameFile(PathBuf),

    #[error("{name} must be relative to the project root, got {path:?}")]
    AbsoluteSourcePath { name: &'static str, path: PathBuf },

    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with status {code:?}")]
    ProcessFailed { command: String, code: Option<i32> },
}
