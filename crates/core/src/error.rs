// Central Error Type for the Application

use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Domain error: {0}")]
    Domain(#[from] crate::domain::DomainError),

    #[error("Sample error: {0}")]
    Sample(#[from] crate::port::SampleError),

    #[error("Spawn error: {0}")]
    Spawn(#[from] crate::port::SpawnError),

    #[error("Queue error: {0}")]
    Queue(#[from] crate::port::QueueError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] crate::port::FetchError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
