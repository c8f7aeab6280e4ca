use super::{ByteSource, StreamError};
use async_trait::async_trait;
use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use std::error::Error;

/// Adapts a fallible byte stream (such as an HTTP body) into a [`ByteSource`].
///
/// After the first error or the end of the stream, every further call yields `None`.
pub struct StreamSource<S> {
    inner: S,
    exhausted: bool,
}

impl<S> StreamSource<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            exhausted: false,
        }
    }
}

#[async_trait]
impl<S, E> ByteSource for StreamSource<S>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin + Send,
    E: Into<Box<dyn Error + Send + Sync>> + Send + 'static,
{
    async fn next_chunk(&mut self) -> Result<Option<Bytes>, StreamError> {
        if self.exhausted {
            return Ok(None);
        }
        match self.inner.next().await {
            Some(Ok(chunk)) => Ok(Some(chunk)),
            Some(Err(e)) => {
                self.exhausted = true;
                Err(StreamError::Source(e.into()))
            }
            None => {
                self.exhausted = true;
                Ok(None)
            }
        }
    }
}
