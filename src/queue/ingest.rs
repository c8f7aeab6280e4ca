//! Download ingestion and queue integration

use super::{enqueue_and_save, SharedAggregatorQueue, StateError, StateStorage};
use crate::stream::{pipe, ByteSink, ByteSource, StreamError};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Download for {cid} failed: {source}")]
    Stream {
        cid: String,
        #[source]
        source: StreamError,
    },
    #[error(transparent)]
    State(#[from] StateError),
}

/// Streams a download to its destination and queues the resulting job
pub struct JobIngestor {
    queue: SharedAggregatorQueue,
    storage: Option<StateStorage>,
}

impl JobIngestor {
    /// Create an ingestor that only updates the in-memory queue
    pub fn new(queue: SharedAggregatorQueue) -> Self {
        Self {
            queue,
            storage: None,
        }
    }

    /// Persist the queue after every successful ingestion
    pub fn with_storage(mut self, storage: StateStorage) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn queue(&self) -> &SharedAggregatorQueue {
        &self.queue
    }

    /// Pipe `source` into `sink`, then enqueue `(cid, tx_id)`.
    ///
    /// A failed transfer enqueues nothing. Returns the number of bytes transferred.
    pub async fn ingest<S, K>(
        &self,
        source: &mut S,
        sink: &mut K,
        cid: &str,
        tx_id: &str,
    ) -> Result<u64, IngestError>
    where
        S: ByteSource + ?Sized,
        K: ByteSink + ?Sized,
    {
        debug!("Ingesting download for {}/{}", cid, tx_id);

        let bytes = pipe(source, sink)
            .await
            .map_err(|err| IngestError::Stream {
                cid: cid.to_string(),
                source: err,
            })?;

        match &self.storage {
            Some(storage) => enqueue_and_save(&self.queue, storage, cid, tx_id).await?,
            None => self.queue.lock().await.enqueue_job(cid, tx_id),
        }

        info!("Queued {}/{} after {} bytes", cid, tx_id, bytes);
        Ok(bytes)
    }
}
