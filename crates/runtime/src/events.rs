//! Session lifecycle events published by the scheduler.

use event_core::{Completion, OwnerId};

use crate::scheduler::SessionId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Started { id: SessionId, owner: OwnerId },

    /// Fired from the session's completion callback, exactly once per run.
    Completed(SessionCompleted),

    /// The session was cancelled; no completion follows.
    Stopped { id: SessionId, owner: OwnerId },
}

impl SessionEvent {
    pub fn session(&self) -> SessionId {
        match self {
            Self::Started { id, .. } | Self::Stopped { id, .. } => *id,
            Self::Completed(completed) => completed.id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionCompleted {
    pub id: SessionId,
    pub completion: Completion,
}
