//! AdaptiveScheduler - the periodic control loop deciding pool size
//!
//! Once per tick: sample resources, compare against the ceilings, and grow
//! or shrink the pool by exactly one worker. The scheduler itself keeps no
//! state across ticks (no hysteresis, no moving average, no cooldown); every
//! tick is an independent, idempotent decision.

use crate::application::pool::WorkerPool;
use crate::application::shutdown::ShutdownToken;
use crate::domain::Role;
use crate::port::{ResourceSample, ResourceSampler};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Ceilings and target size, fixed for the supervising process's lifetime
#[derive(Debug, Clone, Copy)]
pub struct ScalingLimits {
    pub max_cpu_percent: f32,
    pub max_memory_percent: f32,
    pub target_workers: usize,
}

/// Single-unit action for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleAction {
    Grow,
    Shrink,
    Hold,
}

/// Pure tick decision: same sample and count always yield the same action
///
/// Growth requires BOTH utilizations strictly below their ceilings
/// (conjunctive gate; at-ceiling counts as breached) and the pool below
/// target. A breach shrinks only while there is something to shrink.
/// Grow and shrink are mutually exclusive within one tick.
pub fn decide(sample: &ResourceSample, active: usize, limits: &ScalingLimits) -> ScaleAction {
    if sample.cpu_percent < limits.max_cpu_percent
        && sample.memory_percent < limits.max_memory_percent
    {
        if active < limits.target_workers {
            ScaleAction::Grow
        } else {
            // Already at target; do not over-provision
            ScaleAction::Hold
        }
    } else if active > 0 {
        ScaleAction::Shrink
    } else {
        ScaleAction::Hold
    }
}

/// Periodic control loop owning the worker pool's size
pub struct AdaptiveScheduler {
    sampler: Arc<dyn ResourceSampler>,
    pool: WorkerPool,
    limits: ScalingLimits,
    role: Role,
    tick_interval: Duration,
}

impl AdaptiveScheduler {
    pub fn new(
        sampler: Arc<dyn ResourceSampler>,
        pool: WorkerPool,
        limits: ScalingLimits,
        role: Role,
        tick_interval: Duration,
    ) -> Self {
        Self {
            sampler,
            pool,
            limits,
            role,
            tick_interval,
        }
    }

    /// Execute one tick of the control loop
    ///
    /// A failed sample skips the scaling decision entirely (fail-open); a
    /// failed spawn is logged and retried by the next tick on its own.
    pub async fn tick(&mut self) {
        self.pool.reconcile_exits();

        let sample = match self.sampler.sample().await {
            Ok(s) => s,
            Err(e) => {
                warn!(error = %e, "Resource sample failed, skipping tick");
                return;
            }
        };

        info!(
            cpu_percent = %sample.cpu_percent,
            memory_percent = %sample.memory_percent,
            workers = %self.pool.active_count(),
            "Resource sample"
        );

        match decide(&sample, self.pool.active_count(), &self.limits) {
            ScaleAction::Grow => {
                if let Err(e) = self.pool.spawn_one(self.role).await {
                    warn!(error = %e, "Worker spawn failed, will retry next tick");
                }
            }
            ScaleAction::Shrink => {
                // None cannot happen here (decide saw a non-empty pool), but
                // the shrink path stays a no-op on an empty set regardless
                let _ = self.pool.terminate_one();
            }
            ScaleAction::Hold => {}
        }
    }

    /// Run the control loop until shutdown
    ///
    /// Ticks are serialized: a slow tick body delays the next tick, it is
    /// never overlapped by it.
    pub async fn run(mut self, mut shutdown: ShutdownToken) {
        let mut interval = tokio::time::interval(self.tick_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // Consume the immediate first fire so the initial pool observes a
        // full interval before the first scaling decision
        interval.tick().await;

        loop {
            tokio::select! {
                _ = interval.tick() => self.tick().await,
                _ = shutdown.wait() => {
                    info!("Scheduler shutting down");
                    break;
                }
            }
        }

        // Best-effort teardown of whatever is still running; workers handle
        // the signal themselves, exit is not awaited
        self.pool.reconcile_exits();
        while self.pool.terminate_one().is_some() {}
    }

    /// Current active worker count, for observability and tests
    pub fn active_count(&self) -> usize {
        self.pool.active_count()
    }
}
