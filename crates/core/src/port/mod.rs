// Port Layer - Interfaces for external dependencies

pub mod fetcher;
pub mod launcher;
pub mod queue;
pub mod resource_sampler;

// Re-exports
pub use fetcher::{FetchError, PageFetcher, PageSummary};
pub use launcher::{ProcessLauncher, SpawnError, WorkerExit};
pub use queue::{QueueError, QueueSubscription, WorkQueue};
pub use resource_sampler::{ResourceSample, ResourceSampler, SampleError};
