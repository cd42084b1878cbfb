// Resource sampler implementation
// reason: sysinfo for cross-platform system monitoring
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use sysinfo::{Pid, ProcessRefreshKind, System};
use tracing::debug;

use scrapeflow_core::port::resource_sampler::{ResourceSample, ResourceSampler, SampleError};

/// Resource sampler backed by sysinfo
///
/// CPU utilization is attributed to the supervising process only (and may
/// exceed 100 on multi-core hosts); memory utilization is system-wide,
/// (total - free) / total. The asymmetry is intentional and load-bearing
/// for the scaling behavior.
pub struct SysinfoSampler {
    system: Arc<Mutex<System>>,
    pid: Pid,
}

impl SysinfoSampler {
    /// Create a sampler attributing CPU to the current process
    pub fn new() -> Self {
        Self::for_pid(std::process::id())
    }

    /// Create a sampler attributing CPU to an explicit pid
    pub fn for_pid(pid: u32) -> Self {
        Self {
            system: Arc::new(Mutex::new(System::new_all())),
            pid: Pid::from_u32(pid),
        }
    }
}

impl Default for SysinfoSampler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResourceSampler for SysinfoSampler {
    async fn sample(&self) -> Result<ResourceSample, SampleError> {
        let mut sys = self.system.lock().unwrap();

        sys.refresh_memory();
        sys.refresh_process_specifics(self.pid, ProcessRefreshKind::new().with_cpu());

        let total = sys.total_memory();
        let free = sys.free_memory();
        if total == 0 {
            return Err(SampleError::MemoryStats);
        }
        let memory_percent = (total - free) as f32 / total as f32 * 100.0;

        let cpu_percent = sys
            .process(self.pid)
            .ok_or(SampleError::ProcessStats(self.pid.as_u32()))?
            .cpu_usage();

        debug!(
            cpu = %cpu_percent,
            mem = %memory_percent,
            "Resource sample collected"
        );

        Ok(ResourceSample {
            cpu_percent,
            memory_percent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sample_own_process() {
        let sampler = SysinfoSampler::new();
        let sample = sampler.sample().await.unwrap();

        // Basic sanity checks; exact values depend on the host
        assert!(sample.memory_percent > 0.0);
        assert!(sample.memory_percent <= 100.0);
        assert!(sample.cpu_percent >= 0.0);
    }

    #[tokio::test]
    async fn test_sample_unknown_pid_fails() {
        // Pid from the far end of the 32-bit range, nothing should own it
        let sampler = SysinfoSampler::for_pid(u32::MAX - 1);
        let result = sampler.sample().await;

        assert!(matches!(result, Err(SampleError::ProcessStats(_))));
    }
}
