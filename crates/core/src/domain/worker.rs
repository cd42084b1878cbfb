// Worker Domain Model

use serde::{Deserialize, Serialize};

use super::error::{DomainError, Result};

/// OS-level process identifier of a worker
pub type WorkerPid = u32;

/// Role a worker process runs as, fixed at spawn time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Producer,
    Consumer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Producer => "producer",
            Role::Consumer => "consumer",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "producer" => Ok(Role::Producer),
            "consumer" => Ok(Role::Consumer),
            other => Err(DomainError::UnknownRole(other.to_string())),
        }
    }
}

/// Worker lifecycle state
///
/// Starting -> Running -> Terminating -> Exited. Exited is terminal; a
/// handle in Exited is removed from the active set and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Starting,
    Running,
    Terminating,
    Exited,
}

impl std::fmt::Display for WorkerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkerState::Starting => write!(f, "STARTING"),
            WorkerState::Running => write!(f, "RUNNING"),
            WorkerState::Terminating => write!(f, "TERMINATING"),
            WorkerState::Exited => write!(f, "EXITED"),
        }
    }
}

/// Record binding a worker process identity to its lifecycle state
///
/// Exclusively owned by the pool's active set; no other component keeps a
/// live reference.
#[derive(Debug, Clone)]
pub struct WorkerHandle {
    pub pid: WorkerPid,
    pub role: Role,
    pub state: WorkerState,
}

impl WorkerHandle {
    pub fn new(pid: WorkerPid, role: Role) -> Self {
        Self {
            pid,
            role,
            state: WorkerState::Starting,
        }
    }

    /// Starting -> Running, once the launch call returned a live pid
    pub fn promote(&mut self) -> Result<()> {
        match self.state {
            WorkerState::Starting => {
                self.state = WorkerState::Running;
                Ok(())
            }
            other => Err(DomainError::InvalidStateTransition {
                from: other.to_string(),
                to: WorkerState::Running.to_string(),
            }),
        }
    }

    /// Running -> Terminating, on an explicit kill request
    pub fn begin_termination(&mut self) -> Result<()> {
        match self.state {
            WorkerState::Running => {
                self.state = WorkerState::Terminating;
                Ok(())
            }
            other => Err(DomainError::InvalidStateTransition {
                from: other.to_string(),
                to: WorkerState::Terminating.to_string(),
            }),
        }
    }

    /// Any live state -> Exited, on a process-exit notification
    pub fn mark_exited(&mut self) -> Result<()> {
        match self.state {
            WorkerState::Exited => Err(DomainError::InvalidStateTransition {
                from: WorkerState::Exited.to_string(),
                to: WorkerState::Exited.to_string(),
            }),
            _ => {
                self.state = WorkerState::Exited;
                Ok(())
            }
        }
    }

    /// Handles counted toward the pool's active size
    pub fn is_active(&self) -> bool {
        matches!(self.state, WorkerState::Starting | WorkerState::Running)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_handle_lifecycle() {
        let mut handle = WorkerHandle::new(42, Role::Consumer);
        assert_eq!(handle.state, WorkerState::Starting);
        assert!(handle.is_active());

        assert!(handle.promote().is_ok());
        assert_eq!(handle.state, WorkerState::Running);
        assert!(handle.is_active());

        assert!(handle.begin_termination().is_ok());
        assert_eq!(handle.state, WorkerState::Terminating);
        assert!(!handle.is_active());

        assert!(handle.mark_exited().is_ok());
        assert_eq!(handle.state, WorkerState::Exited);
    }

    #[test]
    fn test_invalid_transitions() {
        let mut handle = WorkerHandle::new(7, Role::Producer);

        // Cannot terminate before the launch is confirmed
        assert!(handle.begin_termination().is_err());

        handle.promote().unwrap();

        // Cannot promote twice
        assert!(handle.promote().is_err());

        // Self-initiated exit straight from Running is legal
        assert!(handle.mark_exited().is_ok());

        // Exited is terminal
        assert!(handle.mark_exited().is_err());
    }

    #[test]
    fn test_role_round_trip() {
        assert_eq!(Role::from_str("producer").unwrap(), Role::Producer);
        assert_eq!(Role::from_str("consumer").unwrap(), Role::Consumer);
        assert!(Role::from_str("publisher").is_err());
        assert_eq!(Role::Producer.to_string(), "producer");
    }
}
