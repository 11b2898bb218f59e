//! Error types for ollama-bench

use std::time::Duration;
use thiserror::Error;

/// Result type for benchmark operations
pub type Result<T> = std::result::Result<T, BenchError>;

#[derive(Error, Debug)]
pub enum BenchError {
    /// Program is not installed or not on PATH
    #[error("Command not found: {0}")]
    CommandNotFound(String),

    /// Program ran longer than allowed and was killed
    #[error("{program} timed out after {}s", after.as_secs_f64())]
    Timeout { program: String, after: Duration },

    /// Program exited with a failure status
    #[error("{program} failed ({status}): {stderr}")]
    CommandFailed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}
