// Domain Layer - Pure business logic and entities

pub mod error;
pub mod worker;

// Re-exports
pub use error::DomainError;
pub use worker::{Role, WorkerHandle, WorkerPid, WorkerState};
