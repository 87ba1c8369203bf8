use crate::engine::events::{ExecutionEvent, ExecutionEventKind};
use crate::engine::sink::EventSink;

/// Forwards execution events to `tracing`, one line per event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventSink;

impl TracingEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for TracingEventSink {
    fn emit(&mut self, event: ExecutionEvent) {
        let id = &event.execution_id;
        let action = event.action.as_deref().unwrap_or("-");
        let detail = event.detail.as_deref().unwrap_or("");

        match event.kind {
            ExecutionEventKind::RequestReceived => {
                tracing::info!(execution_id = %id, "execution request received");
            }
            ExecutionEventKind::ActionStarted => {
                tracing::info!(execution_id = %id, action, "action started");
            }
            ExecutionEventKind::ActionSucceeded => {
                tracing::info!(execution_id = %id, action, "{}", detail);
            }
            ExecutionEventKind::RequestRejected => {
                tracing::warn!(execution_id = %id, code = detail, "request rejected");
            }
            ExecutionEventKind::ActionFailed => {
                tracing::error!(execution_id = %id, action, "{}", detail);
            }
        }
    }
}
