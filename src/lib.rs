pub mod config;
pub mod error;
pub mod report;
pub mod scheduler;
pub mod source;

pub use config::{ClockPolicy, SimConfig};
pub use error::{Result, SimError};
