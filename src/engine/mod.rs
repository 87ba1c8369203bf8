use serde::Serialize;
use serde_json::Value;

use crate::util::clip_chars;

pub mod assembler;
pub mod dispatch;
pub mod encode;
pub mod error;
pub mod events;
pub mod handlers;
pub mod launcher;
pub mod sink;
pub mod validate;

pub use assembler::{AssembledBody, BodyAssembler};
pub use dispatch::Dispatcher;
pub use encode::encode;
pub use error::ExecutorError;

/* ---------------- execution output ---------------- */

/// Outcome of one request. Built fresh per request and dropped once the
/// response has been written.
///
/// `data` holds a JSON value, never pre-rendered text, so it is embedded as
/// a nested object when encoded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionResult {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "is_empty_data")]
    pub data: Option<Value>,
}

fn is_empty_data(data: &Option<Value>) -> bool {
    matches!(data, None | Some(Value::Null))
}

impl ExecutionResult {
    pub fn ok(message: impl Into<String>, data: Value) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }

    /// Clip the message to at most `max_chars` characters.
    pub fn bounded(mut self, max_chars: usize) -> Self {
        self.message = clip_chars(&self.message, max_chars);
        self
    }
}

impl From<ExecutorError> for ExecutionResult {
    fn from(err: ExecutorError) -> Self {
        ExecutionResult::failure(err.to_string())
    }
}
