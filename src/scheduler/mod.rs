pub mod engine;
pub mod job;
pub mod node;
pub mod pool;
pub mod queue;

pub use engine::{SchedulerEngine, SimClock, SimSummary};
pub use job::{Job, JobId};
pub use node::WorkerNode;
pub use pool::WorkerPool;
pub use queue::RetryQueue;
