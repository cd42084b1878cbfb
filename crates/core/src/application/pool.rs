//! WorkerPool - single owner of the active worker set
//!
//! All mutation of the set funnels through this component: the scheduler's
//! tick grows or shrinks it, and the exit-reconciliation path cleans up
//! after self-initiated exits. Both run on the same control loop, so the
//! set needs no lock.

use crate::domain::{Role, WorkerHandle, WorkerPid};
use crate::port::{ProcessLauncher, SpawnError};
use std::sync::Arc;
use tracing::{info, warn};

/// Owns and mutates the active set of worker handles
pub struct WorkerPool {
    launcher: Arc<dyn ProcessLauncher>,
    handles: Vec<WorkerHandle>,
}

impl WorkerPool {
    pub fn new(launcher: Arc<dyn ProcessLauncher>) -> Self {
        Self {
            launcher,
            handles: Vec::new(),
        }
    }

    /// Launch one new worker running as `role` and add it to the active set
    pub async fn spawn_one(&mut self, role: Role) -> Result<WorkerHandle, SpawnError> {
        let pid = self.launcher.spawn(role).await?;

        let mut handle = WorkerHandle::new(pid, role);
        // Launch returned a live pid, promote immediately
        if let Err(e) = handle.promote() {
            warn!(pid = %pid, error = %e, "Freshly spawned handle refused promotion");
        }

        info!(pid = %pid, role = %role, "Forked a new worker");
        self.handles.push(handle.clone());
        Ok(handle)
    }

    /// Terminate the most recently spawned running worker (LIFO)
    ///
    /// The newest worker is sacrificed first, it has accrued the least
    /// useful state. The handle is removed from the active set immediately;
    /// the signal is fire-and-forget, confirmed exit is reconciled later.
    /// Returns None on an empty pool: nothing to shrink, not an error.
    pub fn terminate_one(&mut self) -> Option<WorkerHandle> {
        let idx = self
            .handles
            .iter()
            .rposition(|h| h.state == crate::domain::WorkerState::Running)?;

        let mut handle = self.handles.remove(idx);
        if let Err(e) = handle.begin_termination() {
            warn!(pid = %handle.pid, error = %e, "Handle refused termination transition");
        }

        if let Err(e) = self.launcher.signal_terminate(handle.pid) {
            warn!(pid = %handle.pid, error = %e, "Termination signal failed");
        }

        info!(pid = %handle.pid, "Killed worker");
        Some(handle)
    }

    /// Current size of the active set (Starting + Running)
    pub fn active_count(&self) -> usize {
        self.handles.iter().filter(|h| h.is_active()).count()
    }

    /// Reconcile process-exit notifications
    ///
    /// Logs each exited worker and removes any stale entry still present.
    /// An entry killed via terminate_one is already gone; self-initiated
    /// exits are cleaned up here.
    pub fn reconcile_exits(&mut self) {
        for exit in self.launcher.reap_exited() {
            info!(pid = %exit.pid, exit_code = ?exit.exit_code, "Worker exited");

            if let Some(idx) = self.find_handle(exit.pid) {
                let mut handle = self.handles.remove(idx);
                if let Err(e) = handle.mark_exited() {
                    warn!(pid = %handle.pid, error = %e, "Stale handle refused exit transition");
                }
            }
        }
    }

    fn find_handle(&self, pid: WorkerPid) -> Option<usize> {
        self.handles.iter().position(|h| h.pid == pid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::launcher::mocks::MockProcessLauncher;

    fn pool_with_mock() -> (WorkerPool, Arc<MockProcessLauncher>) {
        let launcher = Arc::new(MockProcessLauncher::new());
        (WorkerPool::new(launcher.clone()), launcher)
    }

    #[tokio::test]
    async fn test_spawn_grows_active_set() {
        let (mut pool, launcher) = pool_with_mock();
        assert_eq!(pool.active_count(), 0);

        let handle = pool.spawn_one(Role::Consumer).await.unwrap();
        assert_eq!(pool.active_count(), 1);
        assert_eq!(handle.role, Role::Consumer);
        assert_eq!(launcher.spawned().len(), 1);
    }

    #[tokio::test]
    async fn test_terminate_is_lifo() {
        let (mut pool, launcher) = pool_with_mock();

        let first = pool.spawn_one(Role::Consumer).await.unwrap();
        let second = pool.spawn_one(Role::Consumer).await.unwrap();
        let third = pool.spawn_one(Role::Consumer).await.unwrap();
        assert_eq!(pool.active_count(), 3);

        let killed = pool.terminate_one().unwrap();
        assert_eq!(killed.pid, third.pid, "newest worker goes first");
        assert_eq!(pool.active_count(), 2);

        let killed = pool.terminate_one().unwrap();
        assert_eq!(killed.pid, second.pid);

        let killed = pool.terminate_one().unwrap();
        assert_eq!(killed.pid, first.pid);
        assert_eq!(pool.active_count(), 0);

        assert_eq!(launcher.terminated(), vec![third.pid, second.pid, first.pid]);
    }

    #[tokio::test]
    async fn test_terminate_empty_pool_is_noop() {
        let (mut pool, launcher) = pool_with_mock();
        assert!(pool.terminate_one().is_none());
        assert_eq!(pool.active_count(), 0);
        assert!(launcher.terminated().is_empty());
    }

    #[tokio::test]
    async fn test_spawn_failure_leaves_set_unchanged() {
        let (mut pool, launcher) = pool_with_mock();
        launcher.set_fail_spawn(true);

        assert!(pool.spawn_one(Role::Producer).await.is_err());
        assert_eq!(pool.active_count(), 0);
    }

    #[tokio::test]
    async fn test_reconcile_removes_self_exited() {
        let (mut pool, launcher) = pool_with_mock();

        let handle = pool.spawn_one(Role::Producer).await.unwrap();
        pool.spawn_one(Role::Producer).await.unwrap();
        assert_eq!(pool.active_count(), 2);

        launcher.push_exit(handle.pid, Some(0));
        pool.reconcile_exits();
        assert_eq!(pool.active_count(), 1);
    }

    #[tokio::test]
    async fn test_reconcile_tolerates_unknown_pid() {
        let (mut pool, launcher) = pool_with_mock();
        pool.spawn_one(Role::Producer).await.unwrap();

        // Exit of a worker already removed by terminate_one
        launcher.push_exit(9999, None);
        pool.reconcile_exits();
        assert_eq!(pool.active_count(), 1);
    }
}
