use super::{ByteSink, StreamError};
use async_trait::async_trait;
use bytes::Bytes;

/// In-memory sink for tests
pub struct MockSink {
    pub chunks: Vec<Bytes>,
    pub finished: bool,
    pub should_fail: bool,
}

impl MockSink {
    pub fn new() -> Self {
        Self {
            chunks: Vec::new(),
            finished: false,
            should_fail: false,
        }
    }

    pub fn with_failure() -> Self {
        Self {
            should_fail: true,
            ..Self::new()
        }
    }

    pub fn received(&self) -> Vec<u8> {
        self.chunks.iter().flat_map(|chunk| chunk.to_vec()).collect()
    }
}

#[async_trait]
impl ByteSink for MockSink {
    async fn write_chunk(&mut self, chunk: Bytes) -> Result<(), StreamError> {
        if self.should_fail {
            return Err(StreamError::Sink("Mock failure".to_string()));
        }
        self.chunks.push(chunk);
        Ok(())
    }

    async fn finish(&mut self) -> Result<(), StreamError> {
        self.finished = true;
        Ok(())
    }
}
