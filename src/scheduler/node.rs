use tracing::trace;

use crate::scheduler::job::{Job, JobId};

#[derive(Debug, Clone)]
struct RunningJob {
    job: Job,
    remaining: u32,
}

/// A single worker node with fixed total capacity. Tracks available
/// capacity and the jobs currently running on it with their remaining
/// execution time.
#[derive(Debug, Clone)]
pub struct WorkerNode {
    total_cores: u32,
    total_memory: u32,
    available_cores: u32,
    available_memory: u32,
    running: Vec<RunningJob>,
}

impl WorkerNode {
    pub fn new(total_cores: u32, total_memory: u32) -> Self {
        Self {
            total_cores,
            total_memory,
            available_cores: total_cores,
            available_memory: total_memory,
            running: Vec::new(),
        }
    }

    pub fn total_cores(&self) -> u32 {
        self.total_cores
    }

    pub fn total_memory(&self) -> u32 {
        self.total_memory
    }

    pub fn available_cores(&self) -> u32 {
        self.available_cores
    }

    pub fn available_memory(&self) -> u32 {
        self.available_memory
    }

    /// Number of jobs currently running on this node.
    pub fn running_len(&self) -> usize {
        self.running.len()
    }

    /// Remaining execution time of a running job, if it runs here.
    pub fn remaining_time(&self, job_id: JobId) -> Option<u32> {
        self.running
            .iter()
            .find(|entry| entry.job.id == job_id)
            .map(|entry| entry.remaining)
    }

    pub fn can_accommodate(&self, job: &Job) -> bool {
        self.available_cores >= job.cpu_demand && self.available_memory >= job.memory_demand
    }

    /// All-or-nothing reservation: succeeds iff both available quantities
    /// cover the job's demands, in which case the job starts running here
    /// with its full execution duration remaining. No side effect on failure.
    pub fn allocate(&mut self, job: &Job) -> bool {
        if !self.can_accommodate(job) {
            return false;
        }
        self.available_cores -= job.cpu_demand;
        self.available_memory -= job.memory_demand;
        self.running.push(RunningJob {
            remaining: job.execution_duration,
            job: job.clone(),
        });
        self.assert_conserved();
        true
    }

    /// Advances every running job by one tick. Jobs whose remaining time
    /// reaches zero are released exactly once and removed; their ids are
    /// returned. Completion order within a tick carries no meaning.
    pub fn age_running_jobs(&mut self) -> Vec<JobId> {
        for entry in &mut self.running {
            entry.remaining = entry.remaining.saturating_sub(1);
        }
        let (done, still): (Vec<_>, Vec<_>) = self
            .running
            .drain(..)
            .partition(|entry| entry.remaining == 0);
        self.running = still;

        let mut completed = Vec::with_capacity(done.len());
        for entry in done {
            self.available_cores += entry.job.cpu_demand;
            self.available_memory += entry.job.memory_demand;
            trace!(job_id = entry.job.id, "job completed, resources released");
            completed.push(entry.job.id);
        }
        self.assert_conserved();
        completed
    }

    // Capacity conservation: available + demand of running jobs == total,
    // for both resources. Violation is a programmer error.
    fn assert_conserved(&self) {
        let cores: u32 = self.running.iter().map(|e| e.job.cpu_demand).sum();
        let memory: u32 = self.running.iter().map(|e| e.job.memory_demand).sum();
        debug_assert_eq!(self.available_cores + cores, self.total_cores);
        debug_assert_eq!(self.available_memory + memory, self.total_memory);
    }
}
