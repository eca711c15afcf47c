//! Live state of one interpretation and the per-tick step.

use crate::command::{CommandKind, Progress, ResumeToken};
use crate::context::{EventHost, ExecutionContext, GameStateContext, OwnerId};
use crate::error::EventError;
use crate::flow::{self, ControlStack, Resolution};
use crate::program::Program;

/// Why a session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum CompletionReason {
    /// The cursor ran past the last command.
    EndOfProgram,
    /// `exit_event_processing` fired.
    Exited,
    /// The resolver failed or the tick limit was hit.
    Faulted,
}

/// Summary handed to the completion callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Completion {
    pub owner: OwnerId,
    pub reason: CompletionReason,
    /// Ticks the session was updated while running, including the last one.
    pub ticks: u64,
    /// Commands that ran to completion (disabled commands excluded).
    pub executed: usize,
}

/// Called exactly once when a session completes. Not called on stop.
pub type CompletionCallback = Box<dyn FnOnce(&Completion) + Send>;

/// What one call to [`Interpreter::update`](super::Interpreter::update) did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TickReport {
    /// No session is active.
    Inactive,
    Paused,
    /// The command at `index` is disabled and was stepped over.
    Skipped { index: usize },
    /// The command at `index` needs more ticks.
    Suspended { index: usize },
    /// The command at `index` completed and the cursor moved to `next`.
    Executed {
        index: usize,
        kind: CommandKind,
        next: usize,
    },
    Completed(Completion),
}

pub(super) struct Session {
    pub(super) program: Program,
    pub(super) cursor: usize,
    pub(super) stack: ControlStack,
    pub(super) pending: Option<ResumeToken>,
    pub(super) paused: bool,
    pub(super) on_complete: Option<CompletionCallback>,
    pub(super) ticks: u64,
    pub(super) executed: usize,
}

pub(super) enum Step {
    Report(TickReport),
    Complete(CompletionReason),
}

impl Session {
    pub(super) fn new(program: Program, on_complete: Option<CompletionCallback>) -> Self {
        Self {
            program,
            cursor: 0,
            stack: ControlStack::new(),
            pending: None,
            paused: false,
            on_complete,
            ticks: 0,
            executed: 0,
        }
    }

    pub(super) fn completion(&self, owner: OwnerId, reason: CompletionReason) -> Completion {
        Completion {
            owner,
            reason,
            ticks: self.ticks,
            executed: self.executed,
        }
    }

    /// Runs exactly one command for one tick and applies its flow effect.
    pub(super) fn step(
        &mut self,
        state: &dyn GameStateContext,
        host: &dyn EventHost,
        owner: OwnerId,
    ) -> Step {
        let index = self.cursor;
        let Some(command) = self.program.get_mut(index) else {
            return Step::Complete(CompletionReason::EndOfProgram);
        };

        if !command.is_enabled() {
            self.cursor += 1;
            tracing::trace!(index, name = command.name(), "skipped disabled command");
            return Step::Report(TickReport::Skipped { index });
        }

        let ctx = ExecutionContext::new(state, host, owner).at_tick(self.ticks);
        let progress = match self.pending.take() {
            Some(token) => command.resume(token, &ctx),
            None => command.execute(&ctx),
        };

        match progress {
            Ok(Progress::Suspended(token)) => {
                self.pending = Some(token);
                return Step::Report(TickReport::Suspended { index });
            }
            Ok(Progress::Completed) => {}
            Err(error) => {
                let severity = error.severity();
                if severity.is_internal() {
                    tracing::error!(
                        %owner,
                        index,
                        command = command.name(),
                        severity = severity.as_str(),
                        code = error.error_code(),
                        %error,
                        "command failed, continuing with the next one"
                    );
                } else {
                    tracing::warn!(
                        %owner,
                        index,
                        command = command.name(),
                        severity = severity.as_str(),
                        code = error.error_code(),
                        %error,
                        "command failed, continuing with the next one"
                    );
                }
            }
        }

        let kind = command.kind();
        let action = command.post_execute();
        // Loops revisit commands, so every completed instance is made ready
        // for its next entry.
        command.reset();
        self.executed += 1;

        match flow::resolve(&action, &self.program, index, &mut self.stack) {
            Ok(Resolution::Advance) => self.cursor = index + 1,
            Ok(Resolution::MoveTo(target)) => self.cursor = target,
            Ok(Resolution::Halt) => return Step::Complete(CompletionReason::Exited),
            Err(error) => {
                tracing::error!(
                    %owner,
                    index,
                    severity = error.severity().as_str(),
                    code = error.error_code(),
                    %error,
                    "flow control failed"
                );
                return Step::Complete(CompletionReason::Faulted);
            }
        }

        tracing::debug!(%owner, index, %kind, next = self.cursor, "command completed");
        Step::Report(TickReport::Executed {
            index,
            kind,
            next: self.cursor,
        })
    }
}
