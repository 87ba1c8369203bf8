use crate::engine::events::{ExecutionEvent, ExecutionEventKind};
use crate::engine::sink::EventSink;

/// An in-memory event sink used to collect execution events
/// during a single request, so tests can assert on the event sequence.
#[derive(Debug, Default)]
pub struct CollectingEventSink {
    events: Vec<ExecutionEvent>,
}

impl CollectingEventSink {
    /// Create a new, empty collecting sink.
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
        }
    }

    /// Borrow all collected events.
    pub fn events(&self) -> &[ExecutionEvent] {
        &self.events
    }

    /// Kinds only, in emission order.
    pub fn kinds(&self) -> Vec<ExecutionEventKind> {
        self.events.iter().map(|e| e.kind).collect()
    }
}

impl EventSink for CollectingEventSink {
    fn emit(&mut self, event: ExecutionEvent) {
        self.events.push(event);
    }
}
