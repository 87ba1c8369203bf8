use crate::execution_id::ExecutionId;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionEventKind {
    RequestReceived,
    RequestRejected,
    ActionStarted,
    ActionSucceeded,
    ActionFailed,
}

#[derive(Debug, Serialize, Clone)]
pub struct ExecutionEvent {
    pub execution_id: ExecutionId,
    pub kind: ExecutionEventKind,
    /// Action name, once known.
    pub action: Option<String>,
    /// Result message or error code.
    pub detail: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ExecutionEvent {
    pub fn new(execution_id: &ExecutionId, kind: ExecutionEventKind) -> Self {
        Self {
            execution_id: execution_id.clone(),
            kind,
            action: None,
            detail: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

pub fn request_received(execution_id: &ExecutionId) -> ExecutionEvent {
    ExecutionEvent::new(execution_id, ExecutionEventKind::RequestReceived)
}
