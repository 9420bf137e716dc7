use std::collections::VecDeque;

use crate::scheduler::job::Job;
use crate::scheduler::pool::WorkerPool;

#[derive(Debug)]
struct QueuedJob {
    job: Job,
    /// Retry passes this job has already failed.
    failed_attempts: u32,
}

/// Result of one retry pass over the queue.
#[derive(Debug, Default)]
pub struct DrainResult {
    /// Jobs placed this pass, with the index of the node that took them.
    pub placed: Vec<(Job, usize)>,
    /// Jobs evicted this pass for exceeding the retry limit.
    pub rejected: Vec<Job>,
}

/// FIFO of jobs that could not be placed on arrival. Decouples immediate
/// placement failure from permanent rejection.
#[derive(Debug)]
pub struct RetryQueue {
    entries: VecDeque<QueuedJob>,
    max_retries: Option<u32>,
}

impl RetryQueue {
    pub fn new(max_retries: Option<u32>) -> Self {
        Self {
            entries: VecDeque::new(),
            max_retries,
        }
    }

    pub fn enqueue(&mut self, job: Job) {
        self.entries.push_back(QueuedJob {
            job,
            failed_attempts: 0,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// One retry pass: snapshots the queue length at entry and attempts
    /// placement for exactly that many jobs, head first. Failures go back
    /// to the tail, so each queued job gets at most one attempt per pass.
    /// With a retry limit configured, a job failing its final allowed pass
    /// is evicted instead of requeued.
    pub fn drain_and_retry(&mut self, pool: &mut WorkerPool) -> DrainResult {
        let mut result = DrainResult::default();
        let snapshot = self.entries.len();
        for _ in 0..snapshot {
            let mut entry = match self.entries.pop_front() {
                Some(entry) => entry,
                None => break,
            };
            match pool.place_first_fit(&entry.job) {
                Some(node) => result.placed.push((entry.job, node)),
                None => {
                    entry.failed_attempts += 1;
                    match self.max_retries {
                        Some(limit) if entry.failed_attempts >= limit => {
                            result.rejected.push(entry.job);
                        }
                        _ => self.entries.push_back(entry),
                    }
                }
            }
        }
        result
    }
}
