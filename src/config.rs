use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

pub const DEFAULT_POOL_SIZE: usize = 128;
pub const DEFAULT_NODE_CORES: u32 = 24;
pub const DEFAULT_NODE_MEMORY: u32 = 64;

/// How the simulated clock advances relative to arriving jobs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClockPolicy {
    /// One simulated hour per processed job, regardless of the job's own
    /// arrival stamp. Running jobs age once per arrival.
    #[default]
    PerJob,
    /// The clock snaps forward to each job's `arrival_day`/`arrival_hour`
    /// (never backwards). Running jobs age once per elapsed simulated hour.
    ArrivalStamped,
}

#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Number of worker nodes in the pool. Scan order is node index order.
    pub pool_size: usize,
    /// Cores per node, uniform across the pool.
    pub node_cores: u32,
    /// Memory units per node, uniform across the pool.
    pub node_memory: u32,
    pub clock_policy: ClockPolicy,
    /// When set, a queued job that fails this many retry passes is evicted
    /// with a `Rejected` outcome. `None` means jobs queue indefinitely.
    pub max_retries: Option<u32>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            pool_size: DEFAULT_POOL_SIZE,
            node_cores: DEFAULT_NODE_CORES,
            node_memory: DEFAULT_NODE_MEMORY,
            clock_policy: ClockPolicy::default(),
            max_retries: None,
        }
    }
}

impl SimConfig {
    pub fn new(pool_size: usize, node_cores: u32, node_memory: u32) -> Self {
        Self {
            pool_size,
            node_cores,
            node_memory,
            ..Default::default()
        }
    }

    pub fn with_clock_policy(mut self, policy: ClockPolicy) -> Self {
        self.clock_policy = policy;
        self
    }

    pub fn with_max_retries(mut self, max_retries: Option<u32>) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.pool_size == 0 {
            return Err(SimError::InvalidConfig(
                "pool size must be at least 1".to_string(),
            ));
        }
        if self.node_cores == 0 || self.node_memory == 0 {
            return Err(SimError::InvalidConfig(
                "node capacity must be positive for both cores and memory".to_string(),
            ));
        }
        if self.max_retries == Some(0) {
            return Err(SimError::InvalidConfig(
                "max retries must be at least 1 when set".to_string(),
            ));
        }
        Ok(())
    }
}
