// Process launch port
// Abstraction over the host's process-creation capability

use crate::domain::{Role, WorkerPid};
use async_trait::async_trait;
use thiserror::Error;

/// Exit notification for a worker process
#[derive(Debug, Clone)]
pub struct WorkerExit {
    pub pid: WorkerPid,
    /// None when the process was terminated by a signal
    pub exit_code: Option<i32>,
}

/// Launch and signal errors
#[derive(Error, Debug)]
pub enum SpawnError {
    #[error("process launch failed: {0}")]
    LaunchFailed(String),

    #[error("signal delivery to pid {pid} failed: {reason}")]
    SignalFailed { pid: WorkerPid, reason: String },
}

/// Process launcher port
///
/// Implementations:
/// - ChildProcessLauncher: re-executes the current binary as a worker
#[async_trait]
pub trait ProcessLauncher: Send + Sync {
    /// Launch a new worker process configured to run as `role`
    ///
    /// # Errors
    /// - SpawnError::LaunchFailed if the process cannot be started
    async fn spawn(&self, role: Role) -> Result<WorkerPid, SpawnError>;

    /// Send a termination signal to a worker
    ///
    /// Fire-and-forget: returns as soon as the signal is delivered, it does
    /// not wait for the process to exit.
    fn signal_terminate(&self, pid: WorkerPid) -> Result<(), SpawnError>;

    /// Collect exit notifications for workers that have terminated
    ///
    /// Non-blocking; each exited worker is reported exactly once.
    fn reap_exited(&self) -> Vec<WorkerExit>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Mock ProcessLauncher for testing
    ///
    /// Hands out monotonically increasing fake pids and records every
    /// spawn and termination request.
    pub struct MockProcessLauncher {
        next_pid: Arc<Mutex<WorkerPid>>,
        spawned: Arc<Mutex<Vec<(WorkerPid, Role)>>>,
        terminated: Arc<Mutex<Vec<WorkerPid>>>,
        pending_exits: Arc<Mutex<Vec<WorkerExit>>>,
        fail_spawn: Arc<Mutex<bool>>,
    }

    impl MockProcessLauncher {
        pub fn new() -> Self {
            Self {
                next_pid: Arc::new(Mutex::new(100)),
                spawned: Arc::new(Mutex::new(Vec::new())),
                terminated: Arc::new(Mutex::new(Vec::new())),
                pending_exits: Arc::new(Mutex::new(Vec::new())),
                fail_spawn: Arc::new(Mutex::new(false)),
            }
        }

        pub fn set_fail_spawn(&self, fail: bool) {
            *self.fail_spawn.lock().unwrap() = fail;
        }

        /// Simulate a self-initiated worker exit, reported on the next reap
        pub fn push_exit(&self, pid: WorkerPid, exit_code: Option<i32>) {
            self.pending_exits
                .lock()
                .unwrap()
                .push(WorkerExit { pid, exit_code });
        }

        pub fn spawned(&self) -> Vec<(WorkerPid, Role)> {
            self.spawned.lock().unwrap().clone()
        }

        pub fn terminated(&self) -> Vec<WorkerPid> {
            self.terminated.lock().unwrap().clone()
        }
    }

    impl Default for MockProcessLauncher {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl ProcessLauncher for MockProcessLauncher {
        async fn spawn(&self, role: Role) -> Result<WorkerPid, SpawnError> {
            if *self.fail_spawn.lock().unwrap() {
                return Err(SpawnError::LaunchFailed("mock spawn failure".to_string()));
            }
            let mut next = self.next_pid.lock().unwrap();
            let pid = *next;
            *next += 1;
            self.spawned.lock().unwrap().push((pid, role));
            Ok(pid)
        }

        fn signal_terminate(&self, pid: WorkerPid) -> Result<(), SpawnError> {
            self.terminated.lock().unwrap().push(pid);
            Ok(())
        }

        fn reap_exited(&self) -> Vec<WorkerExit> {
            std::mem::take(&mut *self.pending_exits.lock().unwrap())
        }
    }
}
