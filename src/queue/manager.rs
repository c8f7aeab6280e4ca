//! In-memory aggregation queue with composite-key removal

use crate::job::AggregatorJob;
use tracing::debug;

/// Externally meaningful queue states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueState {
    Empty,
    Populated,
}

/// Ordered collection of pending aggregation jobs
///
/// Insertion order is processing order. Not synchronized: hosts driving the queue from
/// several workers go through [`super::SharedAggregatorQueue`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregatorQueue {
    jobs: Vec<AggregatorJob>,
}

impl AggregatorQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self { jobs: Vec::new() }
    }

    /// Append a job to the end of the queue. Duplicates are allowed.
    pub fn enqueue_job(&mut self, cid: impl Into<String>, tx_id: impl Into<String>) {
        let job = AggregatorJob::new(cid, tx_id);
        debug!("Enqueuing aggregation job: {}", job);
        self.jobs.push(job);
    }

    /// Remove the first job whose `cid` and `txID` both match.
    ///
    /// Returns `false` and leaves the queue untouched when nothing matches.
    pub fn dequeue_job(&mut self, cid: &str, tx_id: &str) -> bool {
        self.take_job(cid, tx_id).is_some()
    }

    /// Like [`Self::dequeue_job`], but hands back the removed job and the index it held
    pub fn take_job(&mut self, cid: &str, tx_id: &str) -> Option<(usize, AggregatorJob)> {
        match self.jobs.iter().position(|job| job.matches(cid, tx_id)) {
            Some(index) => {
                let job = self.jobs.remove(index);
                debug!("Dequeued aggregation job: {}", job);
                Some((index, job))
            }
            None => {
                debug!("No aggregation job matches {}/{}", cid, tx_id);
                None
            }
        }
    }

    /// Put a job back at `index` (clamped to the queue length), undoing [`Self::take_job`]
    pub fn insert_job(&mut self, index: usize, job: AggregatorJob) {
        let index = index.min(self.jobs.len());
        debug!("Reinserting aggregation job {} at {}", job, index);
        self.jobs.insert(index, job);
    }

    /// Remove the most recently enqueued job
    pub fn pop_job(&mut self) -> Option<AggregatorJob> {
        self.jobs.pop()
    }

    pub fn jobs(&self) -> &[AggregatorJob] {
        &self.jobs
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn contains(&self, cid: &str, tx_id: &str) -> bool {
        self.jobs.iter().any(|job| job.matches(cid, tx_id))
    }

    pub fn state(&self) -> QueueState {
        if self.jobs.is_empty() {
            QueueState::Empty
        } else {
            QueueState::Populated
        }
    }

    /// Replace the whole collection, e.g. with jobs read back from disk
    pub fn replace_jobs(&mut self, jobs: Vec<AggregatorJob>) {
        debug!(
            "Replacing {} queued jobs with {} jobs",
            self.jobs.len(),
            jobs.len()
        );
        self.jobs = jobs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_queue_is_empty() {
        let queue = AggregatorQueue::new();
        assert!(queue.is_empty());
        assert_eq!(queue.state(), QueueState::Empty);
    }

    #[test]
    fn test_enqueue_preserves_order() {
        let mut queue = AggregatorQueue::new();
        queue.enqueue_job("a", "ta");
        queue.enqueue_job("b", "tb");

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.state(), QueueState::Populated);
        assert_eq!(queue.jobs()[0], AggregatorJob::new("a", "ta"));
        assert_eq!(queue.jobs()[1], AggregatorJob::new("b", "tb"));
    }

    #[test]
    fn test_dequeue_exact_match() {
        let mut queue = AggregatorQueue::new();
        queue.enqueue_job("testcid", "testtxid");
        queue.enqueue_job("testcid3", "testtxid3");

        // Swapped and partial keys do not match
        assert!(!queue.dequeue_job("testtxid", "testcid"));
        assert!(!queue.dequeue_job("testcid", "testtxid3"));
        assert_eq!(queue.len(), 2);

        assert!(queue.dequeue_job("testcid3", "testtxid3"));
        assert_eq!(queue.jobs(), &[AggregatorJob::new("testcid", "testtxid")]);
    }

    #[test]
    fn test_dequeue_missing_key_is_noop() {
        let mut queue = AggregatorQueue::new();
        assert!(!queue.dequeue_job("nothing", "here"));
        assert!(queue.is_empty());

        queue.enqueue_job("a", "ta");
        assert!(!queue.dequeue_job("b", "tb"));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_dequeue_removes_single_duplicate() {
        let mut queue = AggregatorQueue::new();
        queue.enqueue_job("dup", "tx");
        queue.enqueue_job("other", "tx2");
        queue.enqueue_job("dup", "tx");

        assert!(queue.dequeue_job("dup", "tx"));
        assert_eq!(queue.len(), 2);
        // The first occurrence goes, the later duplicate keeps its place
        assert_eq!(queue.jobs()[0], AggregatorJob::new("other", "tx2"));
        assert_eq!(queue.jobs()[1], AggregatorJob::new("dup", "tx"));
    }

    #[test]
    fn test_dequeue_last_job_empties_queue() {
        let mut queue = AggregatorQueue::new();
        queue.enqueue_job("a", "ta");
        assert!(queue.dequeue_job("a", "ta"));
        assert_eq!(queue.state(), QueueState::Empty);
    }

    #[test]
    fn test_take_and_insert_job_restore_order() {
        let mut queue = AggregatorQueue::new();
        queue.enqueue_job("a", "1");
        queue.enqueue_job("b", "2");
        queue.enqueue_job("c", "3");
        let before = queue.clone();

        let (index, job) = queue.take_job("b", "2").unwrap();
        assert_eq!(index, 1);
        assert_eq!(queue.len(), 2);

        queue.insert_job(index, job);
        assert_eq!(queue, before);
        assert!(queue.take_job("2", "b").is_none());
    }

    #[test]
    fn test_pop_job() {
        let mut queue = AggregatorQueue::new();
        assert!(queue.pop_job().is_none());
        queue.enqueue_job("a", "1");
        queue.enqueue_job("b", "2");
        assert_eq!(queue.pop_job(), Some(AggregatorJob::new("b", "2")));
        assert_eq!(queue.jobs(), &[AggregatorJob::new("a", "1")]);
    }

    #[test]
    fn test_replace_jobs() {
        let mut queue = AggregatorQueue::new();
        queue.enqueue_job("old", "tx");
        queue.replace_jobs(vec![AggregatorJob::new("new", "tx")]);
        assert!(queue.contains("new", "tx"));
        assert!(!queue.contains("old", "tx"));
    }
}
