//! Error types for courier-events.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EventError {
    #[error("payload does not match the event shape: {0}")]
    Validation(#[from] serde_json::Error),

    #[error("expected a JSON object payload but received {found}")]
    NotAnObject { found: &'static str },
}

pub type Result<T> = std::result::Result<T, EventError>;
