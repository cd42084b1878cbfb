// Resource sampling port
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Instantaneous resource utilization, produced fresh on each tick
///
/// Both fields are recomputed independently per sample; no smoothing or
/// averaging across ticks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResourceSample {
    /// CPU utilization of the supervising process, 0-100 (may exceed 100
    /// on multi-core attribution)
    pub cpu_percent: f32,
    /// System-wide memory utilization: (total - free) / total * 100
    pub memory_percent: f32,
}

/// Sampling errors
#[derive(Error, Debug)]
pub enum SampleError {
    #[error("process stats unavailable for pid {0}")]
    ProcessStats(u32),

    #[error("memory stats unavailable")]
    MemoryStats,
}

/// Resource sampler port
///
/// Reads host counters on demand; a failed sample must make the caller
/// skip that tick's scaling decision (fail-open, pool size unchanged).
#[async_trait]
pub trait ResourceSampler: Send + Sync {
    /// Take a fresh sample of CPU and memory utilization
    async fn sample(&self) -> Result<ResourceSample, SampleError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Mock ResourceSampler for testing
    pub struct MockResourceSampler {
        sample: Arc<Mutex<ResourceSample>>,
        fail: Arc<Mutex<bool>>,
    }

    impl MockResourceSampler {
        pub fn new(cpu_percent: f32, memory_percent: f32) -> Self {
            Self {
                sample: Arc::new(Mutex::new(ResourceSample {
                    cpu_percent,
                    memory_percent,
                })),
                fail: Arc::new(Mutex::new(false)),
            }
        }

        pub fn set_sample(&self, cpu_percent: f32, memory_percent: f32) {
            *self.sample.lock().unwrap() = ResourceSample {
                cpu_percent,
                memory_percent,
            };
        }

        /// Make the next samples fail with SampleError
        pub fn set_failing(&self, fail: bool) {
            *self.fail.lock().unwrap() = fail;
        }
    }

    #[async_trait]
    impl ResourceSampler for MockResourceSampler {
        async fn sample(&self) -> Result<ResourceSample, SampleError> {
            if *self.fail.lock().unwrap() {
                return Err(SampleError::ProcessStats(0));
            }
            Ok(*self.sample.lock().unwrap())
        }
    }
}
