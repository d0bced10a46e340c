use thiserror::Error;

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
    #[error("Invalid event: {0}")]
    InvalidEvent(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Unknown event: {0}")]
    UnknownEvent(String),
    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),
}
