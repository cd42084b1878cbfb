// Application Layer - Control loop and role bodies

pub mod constants;
pub mod consumer;
pub mod pool;
pub mod producer;
pub mod scheduler;
pub mod shutdown;

// Re-exports
pub use consumer::ConsumerLoop;
pub use pool::WorkerPool;
pub use producer::ProducerLoop;
pub use scheduler::{decide, AdaptiveScheduler, ScaleAction, ScalingLimits};
pub use shutdown::{shutdown_channel, ShutdownSender, ShutdownToken};
