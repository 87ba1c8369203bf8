// src/engine/error.rs

use std::fmt;
use std::io;

use thiserror::Error;

/// Filesystem operation that failed, used to phrase `Io` messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoOp {
    CreateFile,
    Delete,
    OpenDirectory,
    ReadDirectory,
}

impl fmt::Display for IoOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            IoOp::CreateFile => "create file",
            IoOp::Delete => "delete",
            IoOp::OpenDirectory => "open directory",
            IoOp::ReadDirectory => "read directory",
        };
        f.write_str(verb)
    }
}

/// Every failure the executor reports back to a caller.
///
/// None of these escape as transport errors: each one is folded into a
/// failed [`ExecutionResult`](crate::engine::ExecutionResult) whose message
/// is the `Display` output below.
#[derive(Debug, Error)]
pub enum ExecutorError {
    /// Body is not parseable JSON.
    #[error("Invalid JSON")]
    InvalidJson,

    /// `action` is absent or not a string.
    #[error("Missing action")]
    MissingAction,

    /// `action` is a string but not a known name.
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    /// The action needs an argument that has no configured default.
    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),

    /// Body exceeded the assembler capacity; the tail was dropped.
    #[error("Request body exceeds {limit} bytes ({dropped} bytes truncated)")]
    BodyTooLarge { limit: usize, dropped: usize },

    /// The transport failed while streaming the body.
    #[error("Failed to read request body: {0}")]
    BodyRead(String),

    /// Filesystem failure. Only the error kind is exposed, never the raw OS string.
    #[error("Error: cannot {op} {path} ({kind})")]
    Io {
        op: IoOp,
        path: String,
        kind: io::ErrorKind,
    },

    /// A directory entry name cannot be represented as a JSON string.
    /// `entry` is the escaped form of the raw name.
    #[error("Error: cannot list {path} (entry {entry} is not valid UTF-8)")]
    NonUtf8Entry { path: String, entry: String },

    /// Application launch failed, exited nonzero or timed out.
    #[error("Error: cannot launch {app} ({reason})")]
    Launch { app: String, reason: String },

    /// A blocking handler task panicked or was cancelled.
    #[error("Internal error while executing {0}")]
    Internal(&'static str),
}

impl ExecutorError {
    pub fn io(op: IoOp, path: &str, err: &io::Error) -> Self {
        ExecutorError::Io {
            op,
            path: path.to_string(),
            kind: err.kind(),
        }
    }

    /// Stable machine-readable code, used in logs and events.
    pub fn code(&self) -> &'static str {
        match self {
            ExecutorError::InvalidJson => "INVALID_JSON",
            ExecutorError::MissingAction => "MISSING_ACTION",
            ExecutorError::UnknownAction(_) => "UNKNOWN_ACTION",
            ExecutorError::MissingArgument(_) => "MISSING_ARGUMENT",
            ExecutorError::BodyTooLarge { .. } => "BODY_TOO_LARGE",
            ExecutorError::BodyRead(_) => "BODY_READ_FAILED",
            ExecutorError::Io { .. } => "IO_ERROR",
            ExecutorError::NonUtf8Entry { .. } => "NON_UTF8_ENTRY",
            ExecutorError::Launch { .. } => "LAUNCH_FAILED",
            ExecutorError::Internal(_) => "INTERNAL",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_errors_use_fixed_messages() {
        assert_eq!(ExecutorError::InvalidJson.to_string(), "Invalid JSON");
        assert_eq!(ExecutorError::MissingAction.to_string(), "Missing action");
        assert_eq!(
            ExecutorError::UnknownAction("frobnicate".into()).to_string(),
            "Unknown action: frobnicate"
        );
    }

    #[test]
    fn io_error_names_path_and_kind_only() {
        let os = io::Error::new(io::ErrorKind::NotFound, "internal detail /proc/xyz");
        let err = ExecutorError::io(IoOp::Delete, "/tmp/missing.txt", &os);

        let msg = err.to_string();
        assert!(msg.contains("/tmp/missing.txt"));
        assert!(msg.starts_with("Error: cannot delete"));
        assert!(!msg.contains("internal detail"));
        assert_eq!(err.code(), "IO_ERROR");
    }
}
