use crate::engine::events::ExecutionEvent;

/// Destination for execution events. Injected into the dispatcher so
/// handlers never write to a process-wide log directly.
pub trait EventSink: Send {
    fn emit(&mut self, event: ExecutionEvent);
}
