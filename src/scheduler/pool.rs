use crate::config::SimConfig;
use crate::scheduler::job::{Job, JobId};
use crate::scheduler::node::WorkerNode;

/// Ordered, fixed-size collection of worker nodes. Index order is the
/// first-fit scan order and never changes for the life of the pool.
#[derive(Debug)]
pub struct WorkerPool {
    nodes: Vec<WorkerNode>,
}

impl WorkerPool {
    /// Builds a pool of `size` uniform nodes.
    pub fn new(size: usize, node_cores: u32, node_memory: u32) -> Self {
        Self {
            nodes: (0..size)
                .map(|_| WorkerNode::new(node_cores, node_memory))
                .collect(),
        }
    }

    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(config.pool_size, config.node_cores, config.node_memory)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, index: usize) -> Option<&WorkerNode> {
        self.nodes.get(index)
    }

    pub fn nodes(&self) -> &[WorkerNode] {
        &self.nodes
    }

    /// Total number of jobs currently running across the pool.
    pub fn running_total(&self) -> usize {
        self.nodes.iter().map(WorkerNode::running_len).sum()
    }

    /// First-fit placement: scans nodes in index order and reserves on
    /// the first node that accepts the job, returning its index. A full
    /// scan with no acceptor returns `None` and mutates nothing.
    pub fn place_first_fit(&mut self, job: &Job) -> Option<usize> {
        self.nodes
            .iter_mut()
            .position(|node| node.allocate(job))
    }

    /// True iff at least one node's *total* capacity covers the demand.
    /// A job for which this is false can never be placed, no matter how
    /// long it waits.
    pub fn can_ever_fit(&self, job: &Job) -> bool {
        self.nodes.iter().any(|node| {
            node.total_cores() >= job.cpu_demand && node.total_memory() >= job.memory_demand
        })
    }

    /// Ages every node by one tick and returns the ids of all jobs that
    /// completed pool-wide.
    pub fn age_all(&mut self) -> Vec<JobId> {
        let mut completed = Vec::new();
        for node in &mut self.nodes {
            completed.extend(node.age_running_jobs());
        }
        completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(id: JobId, mem: u32, cpu: u32, duration: u32) -> Job {
        Job::new(id, 0, 0, mem, cpu, duration)
    }

    #[test]
    fn first_fit_prefers_lowest_index() {
        let mut pool = WorkerPool::new(3, 24, 64);
        assert_eq!(pool.place_first_fit(&job(1, 8, 4, 2)), Some(0));
        // Node 0 still has spare capacity, so the next job lands there too
        // even though nodes 1 and 2 are completely idle.
        assert_eq!(pool.place_first_fit(&job(2, 8, 4, 2)), Some(0));
        assert_eq!(pool.node(1).unwrap().running_len(), 0);
        assert_eq!(pool.node(2).unwrap().running_len(), 0);
    }

    #[test]
    fn first_fit_skips_full_nodes() {
        let mut pool = WorkerPool::new(2, 24, 64);
        assert_eq!(pool.place_first_fit(&job(1, 64, 24, 5)), Some(0));
        assert_eq!(pool.place_first_fit(&job(2, 8, 4, 1)), Some(1));
    }

    #[test]
    fn failed_scan_mutates_nothing() {
        let mut pool = WorkerPool::new(2, 24, 64);
        assert_eq!(pool.place_first_fit(&job(1, 1, 25, 1)), None);
        for node in pool.nodes() {
            assert_eq!(node.available_cores(), 24);
            assert_eq!(node.available_memory(), 64);
            assert_eq!(node.running_len(), 0);
        }
    }

    #[test]
    fn can_ever_fit_checks_total_capacity() {
        let pool = WorkerPool::new(2, 24, 64);
        assert!(pool.can_ever_fit(&job(1, 64, 24, 1)));
        assert!(!pool.can_ever_fit(&job(2, 1, 25, 1)));
        assert!(!pool.can_ever_fit(&job(3, 65, 1, 1)));
    }

    #[test]
    fn age_all_aggregates_completions() {
        let mut pool = WorkerPool::new(2, 24, 64);
        assert_eq!(pool.place_first_fit(&job(1, 64, 24, 1)), Some(0));
        assert_eq!(pool.place_first_fit(&job(2, 8, 4, 1)), Some(1));
        assert_eq!(pool.place_first_fit(&job(3, 8, 4, 2)), Some(1));
        let mut completed = pool.age_all();
        completed.sort_unstable();
        assert_eq!(completed, vec![1, 2]);
        assert_eq!(pool.running_total(), 1);
    }

    #[test]
    fn age_all_on_idle_pool_is_noop() {
        let mut pool = WorkerPool::new(4, 24, 64);
        assert!(pool.age_all().is_empty());
        assert_eq!(pool.running_total(), 0);
    }
}
