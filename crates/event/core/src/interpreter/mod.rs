//! Interpreter - drives one program at a time, one command per tick.
//!
//! ```text
//! Idle ──start──▶ Running ◀──set_paused──▶ Paused
//!   ▲                │
//!   └──stop──────────┤ end of program / exit / fault
//!                    ▼
//!                Completed ──start──▶ Running
//! ```
//!
//! Exactly one command runs per [`Interpreter::update`] call. A suspended
//! command is resumed with its token on the next unpaused tick, so pausing
//! never restarts or reconstructs an in-flight command.

mod errors;
mod session;

pub use errors::InterpreterError;
pub use session::{Completion, CompletionCallback, CompletionReason, TickReport};

use std::sync::Arc;

use crate::config::InterpreterConfig;
use crate::context::{EventHost, ExecutionContext, GameStateContext, OwnerId};
use crate::program::Program;
use crate::registry::{CommandDescriptor, CommandFactory};

use session::{Session, Step};

/// Collaborators injected into an interpreter.
#[derive(Clone)]
pub struct InterpreterServices {
    pub state: Arc<dyn GameStateContext>,
    pub host: Arc<dyn EventHost>,
    /// Also gives access to the shared command pool.
    pub factory: Arc<CommandFactory>,
}

impl InterpreterServices {
    pub fn new(
        state: Arc<dyn GameStateContext>,
        host: Arc<dyn EventHost>,
        factory: Arc<CommandFactory>,
    ) -> Self {
        Self {
            state,
            host,
            factory,
        }
    }

    /// Collaborators with a fresh built-in factory whose pool is sized by
    /// `config.pool_capacity_per_kind`.
    pub fn with_config(
        state: Arc<dyn GameStateContext>,
        host: Arc<dyn EventHost>,
        config: &InterpreterConfig,
    ) -> Self {
        let factory = CommandFactory::with_capacity(config.pool_capacity_per_kind);
        Self::new(state, host, Arc::new(factory))
    }
}

impl std::fmt::Debug for InterpreterServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterpreterServices")
            .field("factory", &self.factory)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum InterpreterStatus {
    #[default]
    Idle,
    Running,
    Paused,
    Completed,
}

pub struct Interpreter {
    services: InterpreterServices,
    config: InterpreterConfig,
    owner: OwnerId,
    session: Option<Session>,
    completed: bool,
}

impl Interpreter {
    pub fn new(services: InterpreterServices, config: InterpreterConfig) -> Self {
        Self {
            services,
            config,
            owner: OwnerId::GLOBAL,
            session: None,
            completed: false,
        }
    }

    /// Sets the event whose self switches this interpreter uses.
    #[must_use]
    pub fn with_owner(mut self, owner: OwnerId) -> Self {
        self.owner = owner;
        self
    }

    pub fn owner(&self) -> OwnerId {
        self.owner
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    /// Builds a program from `descriptors` and starts running it.
    ///
    /// Rejected without any state change while a session is active. A
    /// malformed program is rejected outright; nothing of it runs.
    pub fn start_interpretation<F>(
        &mut self,
        descriptors: &[CommandDescriptor],
        on_complete: F,
    ) -> Result<(), InterpreterError>
    where
        F: FnOnce(&Completion) + Send + 'static,
    {
        if self.session.is_some() {
            return Err(InterpreterError::AlreadyRunning);
        }
        let program = self
            .services
            .factory
            .build_program(descriptors, self.config.execution_mode)?;
        self.begin(program, Some(Box::new(on_complete)));
        Ok(())
    }

    /// Starts a program that was built beforehand.
    ///
    /// A rejected program is returned to the pool.
    pub fn start_program(
        &mut self,
        program: Program,
        on_complete: Option<CompletionCallback>,
    ) -> Result<(), InterpreterError> {
        if self.session.is_some() {
            self.services
                .factory
                .pool()
                .release_all(program.into_commands());
            return Err(InterpreterError::AlreadyRunning);
        }
        self.begin(program, on_complete);
        Ok(())
    }

    fn begin(&mut self, program: Program, on_complete: Option<CompletionCallback>) {
        tracing::info!(owner = %self.owner, commands = program.len(), "interpretation started");
        self.completed = false;
        self.session = Some(Session::new(program, on_complete));
    }

    /// Advances the active session by one tick.
    pub fn update(&mut self) -> TickReport {
        let Some(session) = self.session.as_mut() else {
            return TickReport::Inactive;
        };
        if session.paused {
            return TickReport::Paused;
        }

        session.ticks += 1;
        let step = match self.config.max_ticks_per_session {
            Some(limit) if session.ticks > limit => {
                tracing::warn!(owner = %self.owner, limit, "session exceeded its tick limit");
                abort_in_flight(session, &self.services, self.owner);
                Step::Complete(CompletionReason::Faulted)
            }
            _ => session.step(
                self.services.state.as_ref(),
                self.services.host.as_ref(),
                self.owner,
            ),
        };

        match step {
            Step::Report(report) => report,
            Step::Complete(reason) => self.complete_interpretation(reason),
        }
    }

    /// Aborts the command at the cursor and discards the session.
    ///
    /// The completion callback is not invoked. Returns `false` if nothing was
    /// running.
    pub fn stop_interpretation(&mut self) -> bool {
        let Some(mut session) = self.session.take() else {
            return false;
        };

        abort_in_flight(&mut session, &self.services, self.owner);
        session.stack.clear();
        self.release(session.program);
        self.completed = false;
        tracing::info!(owner = %self.owner, "interpretation stopped");
        true
    }

    /// Pauses or resumes the active session. Has no effect when idle.
    pub fn set_paused(&mut self, paused: bool) {
        if let Some(session) = self.session.as_mut() {
            if session.paused != paused {
                tracing::debug!(owner = %self.owner, paused, "pause toggled");
            }
            session.paused = paused;
        }
    }

    /// True while a session is active, paused or not.
    pub fn is_running(&self) -> bool {
        self.session.is_some()
    }

    pub fn is_paused(&self) -> bool {
        self.session.as_ref().is_some_and(|session| session.paused)
    }

    /// Cursor of the active session.
    pub fn current_index(&self) -> Option<usize> {
        self.session.as_ref().map(|session| session.cursor)
    }

    pub fn status(&self) -> InterpreterStatus {
        match &self.session {
            Some(session) if session.paused => InterpreterStatus::Paused,
            Some(_) => InterpreterStatus::Running,
            None if self.completed => InterpreterStatus::Completed,
            None => InterpreterStatus::Idle,
        }
    }

    fn complete_interpretation(&mut self, reason: CompletionReason) -> TickReport {
        let Some(mut session) = self.session.take() else {
            return TickReport::Inactive;
        };

        let completion = session.completion(self.owner, reason);
        session.stack.clear();
        let on_complete = session.on_complete.take();
        self.release(session.program);
        self.completed = true;

        tracing::info!(
            owner = %self.owner,
            %reason,
            ticks = completion.ticks,
            executed = completion.executed,
            "interpretation completed"
        );
        if let Some(callback) = on_complete {
            callback(&completion);
        }
        TickReport::Completed(completion)
    }

    fn release(&self, program: Program) {
        self.services
            .factory
            .pool()
            .release_all(program.into_commands());
    }
}

/// Aborts the command at the cursor of a session that is being cut short.
fn abort_in_flight(session: &mut Session, services: &InterpreterServices, owner: OwnerId) {
    let cursor = session.cursor;
    if let Some(command) = session.program.get_mut(cursor) {
        let ctx = ExecutionContext::new(services.state.as_ref(), services.host.as_ref(), owner)
            .at_tick(session.ticks);
        if command.abort(&ctx) {
            tracing::debug!(%owner, index = cursor, "aborted in-flight command");
        }
    }
}

impl std::fmt::Debug for Interpreter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interpreter")
            .field("owner", &self.owner)
            .field("status", &self.status())
            .field("cursor", &self.current_index())
            .finish_non_exhaustive()
    }
}
