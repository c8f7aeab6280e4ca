//! File-backed aggregation job queue
//!
//! Pending work items pair a content identifier (`cid`) with a transaction identifier
//! (`txID`). The queue lives in memory and is persisted explicitly as a JSON array, so
//! callers decide when a mutation becomes durable.

pub mod config;
pub mod job;
pub mod queue;
pub mod stream;

pub use config::{default_state_path, AggregatorConfig, STATE_FILE_NAME};
pub use job::AggregatorJob;
pub use queue::{
    create_shared_queue, dequeue_and_save, enqueue_and_save, load_shared_queue, AggregatorQueue,
    IngestError, JobIngestor, QueueState, SharedAggregatorQueue, StateError, StateStorage,
};
pub use stream::{pipe, ByteSink, ByteSource, FileSink, StreamError, StreamSource};
