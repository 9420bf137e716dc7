use serde::{Deserialize, Serialize};

pub type JobId = u64;

/// An arriving unit of work. Immutable after creation; the remaining
/// execution time of a placed job is tracked by the node it runs on,
/// not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    /// Arrival stamp from the trace. Descriptive metadata under the
    /// default clock policy; drives the clock under `ArrivalStamped`.
    pub arrival_day: u32,
    pub arrival_hour: u32,
    /// Memory units requested, fixed for the job's lifetime.
    pub memory_demand: u32,
    /// Cores requested, fixed for the job's lifetime.
    pub cpu_demand: u32,
    /// Ticks the job occupies a node once placed.
    pub execution_duration: u32,
}

impl Job {
    pub fn new(
        id: JobId,
        arrival_day: u32,
        arrival_hour: u32,
        memory_demand: u32,
        cpu_demand: u32,
        execution_duration: u32,
    ) -> Self {
        Self {
            id,
            arrival_day,
            arrival_hour,
            memory_demand,
            cpu_demand,
            execution_duration,
        }
    }
}
