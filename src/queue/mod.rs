//! Aggregation job queue and its durable projection
//!
//! This module provides:
//! - An ordered in-memory queue of cid/txID jobs
//! - JSON persistence with cold-start and atomic-save semantics
//! - A shared handle that serializes mutation and save for concurrent hosts
//! - Ingestion of streamed downloads that end in an enqueued job

pub mod ingest;
pub mod manager;
pub mod storage;

pub use ingest::{IngestError, JobIngestor};
pub use manager::{AggregatorQueue, QueueState};
pub use storage::{StateError, StateStorage};

use crate::job::AggregatorJob;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared queue instance. The lock is the mutual-exclusion discipline for concurrent workers.
pub type SharedAggregatorQueue = Arc<Mutex<AggregatorQueue>>;

/// Create a new shared queue
pub fn create_shared_queue() -> SharedAggregatorQueue {
    Arc::new(Mutex::new(AggregatorQueue::new()))
}

impl AggregatorQueue {
    /// Persist the current jobs
    pub async fn save_state(&self, storage: &StateStorage) -> Result<(), StateError> {
        storage.save(self.jobs()).await
    }

    /// Read persisted jobs without touching the in-memory queue
    pub async fn load_state(&self, storage: &StateStorage) -> Result<Vec<AggregatorJob>, StateError> {
        storage.load().await
    }

    /// Replace the in-memory queue with the persisted jobs, returning how many were loaded
    pub async fn restore_state(&mut self, storage: &StateStorage) -> Result<usize, StateError> {
        let jobs = storage.load().await?;
        let count = jobs.len();
        self.replace_jobs(jobs);
        Ok(count)
    }
}

/// Load a shared queue from storage
pub async fn load_shared_queue(storage: &StateStorage) -> Result<SharedAggregatorQueue, StateError> {
    let mut queue = AggregatorQueue::new();
    queue.restore_state(storage).await?;
    Ok(Arc::new(Mutex::new(queue)))
}

/// Enqueue and persist while holding the lock, so no other mutation interleaves.
///
/// When the save fails the job is taken back out, so memory still matches disk and a retry
/// cannot persist it twice.
pub async fn enqueue_and_save(
    queue: &SharedAggregatorQueue,
    storage: &StateStorage,
    cid: &str,
    tx_id: &str,
) -> Result<(), StateError> {
    let mut guard = queue.lock().await;
    guard.enqueue_job(cid, tx_id);
    if let Err(e) = guard.save_state(storage).await {
        guard.pop_job();
        return Err(e);
    }
    Ok(())
}

/// Dequeue and persist while holding the lock. Nothing is written when no job matched.
///
/// When the save fails the job goes back to its old position and the error is returned.
pub async fn dequeue_and_save(
    queue: &SharedAggregatorQueue,
    storage: &StateStorage,
    cid: &str,
    tx_id: &str,
) -> Result<bool, StateError> {
    let mut guard = queue.lock().await;
    let Some((index, job)) = guard.take_job(cid, tx_id) else {
        return Ok(false);
    };
    if let Err(e) = guard.save_state(storage).await {
        guard.insert_job(index, job);
        return Err(e);
    }
    Ok(true)
}
