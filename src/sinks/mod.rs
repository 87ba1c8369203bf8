#[cfg(test)]
pub mod collecting;
pub mod log;

#[cfg(test)]
pub use collecting::CollectingEventSink;
pub use log::TracingEventSink;
