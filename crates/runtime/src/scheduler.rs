//! Cooperative scheduler over many interpreter sessions.
//!
//! Every session is advanced by exactly one interpreter tick per
//! [`SessionScheduler::tick`], in ascending [`SessionId`] order, so runs are
//! reproducible no matter how many sessions share the game state.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use event_core::{
    CommandDescriptor, CommandFactory, EventHost, GameStateContext, Interpreter,
    InterpreterServices, InterpreterStatus, OwnerId, TickReport,
};
use tokio::sync::broadcast;

use crate::config::RuntimeConfig;
use crate::error::{Result, RuntimeError};
use crate::events::{SessionCompleted, SessionEvent};

/// Scheduler-assigned session identifier, increasing in spawn order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session#{}", self.0)
    }
}

pub struct SessionScheduler {
    config: RuntimeConfig,
    services: InterpreterServices,
    sessions: BTreeMap<SessionId, Interpreter>,
    next_id: u64,
    ticks: u64,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionScheduler {
    /// Creates a scheduler with a fresh factory and pool sized from `config`.
    pub fn new(
        config: RuntimeConfig,
        state: Arc<dyn GameStateContext>,
        host: Arc<dyn EventHost>,
    ) -> Self {
        let services = InterpreterServices::with_config(state, host, &config.interpreter);
        Self::with_services(config, services)
    }

    /// Creates a scheduler over existing collaborators, e.g. a factory with a
    /// custom registry.
    pub fn with_services(config: RuntimeConfig, services: InterpreterServices) -> Self {
        let (events, _) = broadcast::channel(config.event_buffer_size.max(1));
        Self {
            config,
            services,
            sessions: BTreeMap::new(),
            next_id: 1,
            ticks: 0,
            events,
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn factory(&self) -> &Arc<CommandFactory> {
        &self.services.factory
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Builds and starts a new session owned by `owner`.
    pub fn spawn(&mut self, owner: OwnerId, descriptors: &[CommandDescriptor]) -> Result<SessionId> {
        if let Some(limit) = self.config.max_sessions
            && self.sessions.len() >= limit
        {
            return Err(RuntimeError::TooManySessions { limit });
        }

        let id = SessionId(self.next_id);
        let mut interpreter =
            Interpreter::new(self.services.clone(), self.config.interpreter).with_owner(owner);

        let events = self.events.clone();
        interpreter.start_interpretation(descriptors, move |completion| {
            publish(
                &events,
                SessionEvent::Completed(SessionCompleted {
                    id,
                    completion: *completion,
                }),
            );
        })?;

        self.next_id += 1;
        self.sessions.insert(id, interpreter);
        tracing::info!(%id, %owner, "session spawned");
        publish(&self.events, SessionEvent::Started { id, owner });
        Ok(id)
    }

    /// Cancels a session. Its in-flight command is aborted.
    pub fn stop(&mut self, id: SessionId) -> Result<()> {
        let mut interpreter = self
            .sessions
            .remove(&id)
            .ok_or(RuntimeError::UnknownSession(id))?;
        interpreter.stop_interpretation();
        publish(
            &self.events,
            SessionEvent::Stopped {
                id,
                owner: interpreter.owner(),
            },
        );
        Ok(())
    }

    /// Stops every session, in id order.
    pub fn stop_all(&mut self) {
        let ids: Vec<_> = self.sessions.keys().copied().collect();
        for id in ids {
            // Ids come from the map itself.
            let _ = self.stop(id);
        }
    }

    pub fn pause(&mut self, id: SessionId) -> Result<()> {
        self.session_mut(id)?.set_paused(true);
        Ok(())
    }

    pub fn resume(&mut self, id: SessionId) -> Result<()> {
        self.session_mut(id)?.set_paused(false);
        Ok(())
    }

    /// Advances every session by one tick and removes the finished ones.
    pub fn tick(&mut self) -> Vec<SessionCompleted> {
        self.ticks += 1;
        let mut completed = Vec::new();
        for (id, interpreter) in &mut self.sessions {
            if let TickReport::Completed(completion) = interpreter.update() {
                completed.push(SessionCompleted {
                    id: *id,
                    completion,
                });
            }
        }
        for finished in &completed {
            self.sessions.remove(&finished.id);
            tracing::debug!(id = %finished.id, reason = %finished.completion.reason, "session removed");
        }
        completed
    }

    /// Ticks until no session is left, at most `max_ticks` times.
    ///
    /// Returns the completions in the order they happened.
    pub fn run_until_idle(&mut self, max_ticks: u64) -> Result<Vec<SessionCompleted>> {
        let mut completed = Vec::new();
        for _ in 0..max_ticks {
            if self.is_idle() {
                return Ok(completed);
            }
            completed.extend(self.tick());
        }
        if self.is_idle() {
            Ok(completed)
        } else {
            Err(RuntimeError::TickBudgetExhausted {
                ticks: max_ticks,
                active: self.sessions.len(),
            })
        }
    }

    pub fn active_sessions(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_idle(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Total calls to [`tick`](Self::tick).
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn status(&self, id: SessionId) -> Option<InterpreterStatus> {
        self.sessions.get(&id).map(Interpreter::status)
    }

    pub fn current_index(&self, id: SessionId) -> Option<usize> {
        self.sessions.get(&id).and_then(Interpreter::current_index)
    }

    fn session_mut(&mut self, id: SessionId) -> Result<&mut Interpreter> {
        self.sessions
            .get_mut(&id)
            .ok_or(RuntimeError::UnknownSession(id))
    }
}

impl fmt::Debug for SessionScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionScheduler")
            .field("sessions", &self.sessions.keys().collect::<Vec<_>>())
            .field("ticks", &self.ticks)
            .finish_non_exhaustive()
    }
}

fn publish(events: &broadcast::Sender<SessionEvent>, event: SessionEvent) {
    if events.send(event).is_err() {
        // No subscribers - this is normal, not an error
        tracing::trace!("no subscribers for session events");
    }
}
