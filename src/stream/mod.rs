//! Byte streaming capabilities consumed by the queue
//!
//! Downloads feeding the queue are modelled as a finite, non-restartable [`ByteSource`]
//! piped into a [`ByteSink`] that signals completion through [`ByteSink::finish`].

pub mod file_sink;
pub mod source;

#[cfg(test)]
pub(crate) mod mock;

pub use file_sink::FileSink;
pub use source::StreamSource;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum StreamError {
    #[error("Source stream failed: {0}")]
    Source(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("Sink rejected data: {0}")]
    Sink(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Producer of byte chunks, e.g. an HTTP response body
#[async_trait]
pub trait ByteSource: Send {
    /// Next chunk, or `None` once the source is exhausted
    async fn next_chunk(&mut self) -> Result<Option<Bytes>, StreamError>;
}

/// Destination accepting byte chunks, e.g. a file being written
#[async_trait]
pub trait ByteSink: Send {
    async fn write_chunk(&mut self, chunk: Bytes) -> Result<(), StreamError>;

    /// Signal that no more data follows
    async fn finish(&mut self) -> Result<(), StreamError>;
}

/// Copy every chunk from `source` into `sink`, then finish the sink.
///
/// Returns the number of bytes copied. The sink is not finished when either side fails.
pub async fn pipe<S, K>(source: &mut S, sink: &mut K) -> Result<u64, StreamError>
where
    S: ByteSource + ?Sized,
    K: ByteSink + ?Sized,
{
    let mut total = 0u64;
    while let Some(chunk) = source.next_chunk().await? {
        total += chunk.len() as u64;
        sink.write_chunk(chunk).await?;
    }
    sink.finish().await?;
    debug!("Piped {} bytes", total);
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::mock::MockSink;
    use super::*;
    use futures_util::stream;

    type Body = StreamSource<stream::Iter<std::vec::IntoIter<Result<Bytes, std::io::Error>>>>;

    fn chunks(parts: &[&'static str]) -> Body {
        let items: Vec<Result<Bytes, std::io::Error>> = parts
            .iter()
            .map(|part| Ok(Bytes::from_static(part.as_bytes())))
            .collect();
        StreamSource::new(stream::iter(items))
    }

    #[tokio::test]
    async fn test_pipe_copies_all_chunks() {
        let mut source = chunks(&["hello ", "aggregation ", "queue"]);
        let mut sink = MockSink::new();

        let total = pipe(&mut source, &mut sink).await.unwrap();
        assert_eq!(total, 23);
        assert_eq!(sink.received(), b"hello aggregation queue");
        assert!(sink.finished);
    }

    #[tokio::test]
    async fn test_pipe_empty_source() {
        let mut source = chunks(&[]);
        let mut sink = MockSink::new();

        assert_eq!(pipe(&mut source, &mut sink).await.unwrap(), 0);
        assert!(sink.finished);
    }

    #[tokio::test]
    async fn test_pipe_sink_failure() {
        let mut source = chunks(&["data"]);
        let mut sink = MockSink::with_failure();

        let result = pipe(&mut source, &mut sink).await;
        assert!(matches!(result, Err(StreamError::Sink(_))));
        assert!(!sink.finished);
    }

    #[tokio::test]
    async fn test_pipe_source_failure() {
        let items = vec![
            Ok(Bytes::from_static(b"partial")),
            Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset")),
        ];
        let mut source = StreamSource::new(stream::iter(items));
        let mut sink = MockSink::new();

        let result = pipe(&mut source, &mut sink).await;
        assert!(matches!(result, Err(StreamError::Source(_))));
        assert_eq!(sink.received(), b"partial");
        assert!(!sink.finished);
    }
}
