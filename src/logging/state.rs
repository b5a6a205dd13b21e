//! Lifecycle of a session log

use std::sync::Mutex;

/// Where a session log is in its lifecycle
///
/// `Running → ShuttingDown → Drained → Closed` is strictly forward. `Degraded`
/// (initialisation failed) and `Failed` (flush worker stopped early) are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Running,
    ShuttingDown,
    Drained,
    Closed,
    Degraded,
    Failed,
}

impl SessionState {
    fn rank(self) -> Option<u8> {
        match self {
            SessionState::Running => Some(0),
            SessionState::ShuttingDown => Some(1),
            SessionState::Drained => Some(2),
            SessionState::Closed => Some(3),
            SessionState::Degraded | SessionState::Failed => None,
        }
    }

    /// Whether moving from `self` to `next` is a legal transition
    pub fn can_advance_to(self, next: SessionState) -> bool {
        match (self.rank(), next) {
            (None, _) => false,
            (Some(3), _) => false,
            (Some(_), SessionState::Failed) => true,
            (Some(current), next) => next.rank().is_some_and(|n| n > current),
        }
    }
}

/// Shared, monotonic holder of a [`SessionState`]
#[derive(Debug)]
pub struct StateCell {
    state: Mutex<SessionState>,
}

impl StateCell {
    pub fn new(initial: SessionState) -> Self {
        Self {
            state: Mutex::new(initial),
        }
    }

    pub fn get(&self) -> SessionState {
        self.state
            .lock()
            .map(|s| *s)
            .unwrap_or(SessionState::Failed)
    }

    /// Move to `next` if that is a forward transition; returns whether it moved
    pub fn advance(&self, next: SessionState) -> bool {
        let Ok(mut state) = self.state.lock() else {
            return false;
        };
        if state.can_advance_to(next) {
            tracing::debug!(from = ?*state, to = ?next, "Session log state change");
            *state = next;
            true
        } else {
            false
        }
    }
}
