//! Supervising-process wiring: initial pool, adaptive scheduler, shutdown.

use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info, warn};

use scrapeflow_core::application::constants::{
    MAX_CPU_PERCENT, MAX_MEMORY_PERCENT, TICK_INTERVAL,
};
use scrapeflow_core::application::{shutdown_channel, AdaptiveScheduler, ScalingLimits, WorkerPool};
use scrapeflow_core::domain::Role;
use scrapeflow_infra_system::{ChildProcessLauncher, SysinfoSampler};

/// Run the supervising process until an interrupt signal
pub async fn run(role: Role, workers: usize) -> Result<()> {
    // Minimum enforced to 1
    let workers = workers.max(1);
    let target_workers = num_cpus::get();

    info!(
        role = %role,
        workers = %workers,
        target_workers = %target_workers,
        "Scrapeflow v{} running as {} with {} worker(s)",
        super::VERSION,
        role,
        workers
    );

    // Wiring: adapters behind the core's ports
    let launcher = Arc::new(ChildProcessLauncher::from_current_exe()?);
    let sampler = Arc::new(SysinfoSampler::new());

    let mut pool = WorkerPool::new(launcher);
    for _ in 0..workers {
        if let Err(e) = pool.spawn_one(role).await {
            warn!(error = %e, "Initial worker spawn failed");
        }
    }

    let limits = ScalingLimits {
        max_cpu_percent: MAX_CPU_PERCENT,
        max_memory_percent: MAX_MEMORY_PERCENT,
        target_workers,
    };
    let scheduler = AdaptiveScheduler::new(sampler, pool, limits, role, TICK_INTERVAL);

    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for interrupt signal");
            return;
        }
        info!("Shutdown signal received. Exiting gracefully...");
        shutdown_tx.shutdown();
    });

    info!("Monitoring resources every {:?}. Press Ctrl+C to shutdown", TICK_INTERVAL);
    scheduler.run(shutdown_rx).await;

    info!("Shutdown complete.");
    Ok(())
}
