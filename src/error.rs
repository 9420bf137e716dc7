use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("malformed job record at line {line}: {reason}")]
    ParseJob { line: usize, reason: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
