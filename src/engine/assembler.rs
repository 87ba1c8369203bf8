// src/engine/assembler.rs

//! Request body assembly.
//!
//! The transport may hand over a POST body in several chunks. A
//! [`BodyAssembler`] owns the buffer for exactly one request, accumulates
//! chunks up to a fixed capacity and reports completion once a zero-length
//! chunk is pushed.
//!
//! Bytes past capacity are dropped and counted. The count travels with the
//! finished [`AssembledBody`] so the dispatcher can reject it explicitly
//! instead of parsing a silently cut document.

use crate::engine::ExecutorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblerState {
    /// No chunk seen yet; buffer not allocated.
    Init,
    /// At least one non-empty chunk received.
    Accumulating,
    /// Zero-length chunk observed; body is final.
    Complete,
}

#[derive(Debug)]
pub struct BodyAssembler {
    capacity: usize,
    buffer: Option<Vec<u8>>,
    dropped: usize,
    state: AssemblerState,
}

impl BodyAssembler {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            buffer: None,
            dropped: 0,
            state: AssemblerState::Init,
        }
    }

    /// Feed one chunk. An empty chunk marks the end of the body.
    ///
    /// Chunks pushed after completion are ignored.
    pub fn push(&mut self, chunk: &[u8]) -> AssemblerState {
        if self.state == AssemblerState::Complete {
            return self.state;
        }

        if chunk.is_empty() {
            self.state = AssemblerState::Complete;
            return self.state;
        }

        let capacity = self.capacity;
        let buffer = self
            .buffer
            .get_or_insert_with(|| Vec::with_capacity(capacity.min(chunk.len())));

        let available = capacity.saturating_sub(buffer.len());
        let take = chunk.len().min(available);
        buffer.extend_from_slice(&chunk[..take]);
        self.dropped += chunk.len() - take;

        self.state = AssemblerState::Accumulating;
        self.state
    }

    /// Hand over the finished body. `None` until a zero-length chunk arrived.
    pub fn into_body(self) -> Option<AssembledBody> {
        if self.state != AssemblerState::Complete {
            return None;
        }

        Some(AssembledBody {
            bytes: self.buffer.unwrap_or_default(),
            capacity: self.capacity,
            dropped: self.dropped,
        })
    }
}

/// A complete request body plus its truncation record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledBody {
    bytes: Vec<u8>,
    capacity: usize,
    dropped: usize,
}

impl AssembledBody {
    /// Build a body directly, bypassing chunked assembly.
    pub fn whole(bytes: Vec<u8>, capacity: usize) -> Self {
        let mut assembler = BodyAssembler::new(capacity);
        assembler.push(&bytes);
        assembler.push(&[]);
        assembler.into_body().unwrap_or(AssembledBody {
            bytes: Vec::new(),
            capacity,
            dropped: 0,
        })
    }

    pub fn is_truncated(&self) -> bool {
        self.dropped > 0
    }

    /// Body bytes, or `BodyTooLarge` when anything was dropped.
    pub fn into_bytes(self) -> Result<Vec<u8>, ExecutorError> {
        if self.is_truncated() {
            return Err(ExecutorError::BodyTooLarge {
                limit: self.capacity,
                dropped: self.dropped,
            });
        }
        Ok(self.bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_in_init_without_buffer() {
        let assembler = BodyAssembler::new(16);
        assert_eq!(assembler.state, AssemblerState::Init);
        assert!(assembler.buffer.is_none());
        assert!(assembler.into_body().is_none());
    }

    #[test]
    fn joins_chunks_in_order() {
        let mut assembler = BodyAssembler::new(64);
        assert_eq!(assembler.push(b"{\"action\":"), AssemblerState::Accumulating);
        assert_eq!(assembler.push(b"\"list_directory\"}"), AssemblerState::Accumulating);
        assert_eq!(assembler.push(b""), AssemblerState::Complete);

        let body = assembler.into_body().expect("complete body");
        assert!(!body.is_truncated());
        assert_eq!(body.bytes, b"{\"action\":\"list_directory\"}");
    }

    #[test]
    fn not_complete_until_zero_length_chunk() {
        let mut assembler = BodyAssembler::new(64);
        assembler.push(b"{}");
        assert_eq!(assembler.state, AssemblerState::Accumulating);
        assert!(assembler.into_body().is_none());
    }

    #[test]
    fn empty_body_completes_from_init() {
        let mut assembler = BodyAssembler::new(8);
        assert_eq!(assembler.push(&[]), AssemblerState::Complete);
        let body = assembler.into_body().expect("complete body");
        assert!(body.bytes.is_empty());
    }

    #[test]
    fn overflow_is_counted_and_rejected() {
        let mut assembler = BodyAssembler::new(8);
        assembler.push(b"0123456");
        assembler.push(b"789abc");
        assembler.push(&[]);

        let body = assembler.into_body().expect("complete body");
        assert_eq!(body.bytes, b"01234567");
        assert_eq!(body.dropped, 5);

        match body.into_bytes() {
            Err(ExecutorError::BodyTooLarge { limit, dropped }) => {
                assert_eq!(limit, 8);
                assert_eq!(dropped, 5);
            }
            other => panic!("expected BodyTooLarge, got {other:?}"),
        }
    }

    #[test]
    fn exact_capacity_is_not_truncated() {
        let body = AssembledBody::whole(b"12345678".to_vec(), 8);
        assert_eq!(body.into_bytes().expect("fits"), b"12345678".to_vec());
    }

    #[test]
    fn chunks_after_completion_are_ignored() {
        let mut assembler = BodyAssembler::new(8);
        assembler.push(b"ab");
        assembler.push(&[]);
        assert_eq!(assembler.push(b"cd"), AssemblerState::Complete);

        let body = assembler.into_body().expect("complete body");
        assert_eq!(body.bytes, b"ab");
        assert!(!body.is_truncated());
    }
}
