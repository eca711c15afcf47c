//! Commands - the units of execution of an event program.
//!
//! # Architecture
//!
//! This module uses the same **Enum + Struct hybrid** approach as the rest of
//! the crate:
//! - Each variant is a struct in [`kinds`] implementing [`EventCommand`]
//! - [`CommandVariant`] wraps them for decoding and static dispatch
//! - [`Command`] adds the runtime envelope (name, enabled flag, state)
//!
//! # Execution model
//!
//! ```text
//! Idle ──execute()──▶ Executing ──Completed──▶ Complete
//!   │                    │  ▲
//!   │                    └──┘ Suspended(token) → resume(token) next tick
//!   └────────abort()─────┴──────────────▶ Aborted
//! ```
//!
//! Side effects are applied against collaborators while executing and are not
//! rolled back by [`Command::abort`]; aborting only stops further progress.

mod kind;
pub mod kinds;
mod variant;

pub use kind::{CommandCategory, CommandKind};
pub use variant::CommandVariant;

use crate::context::ExecutionContext;
use crate::error::{ErrorSeverity, EventError};

/// Opaque continuation handed back to a suspended command on the next tick.
///
/// Commands choose what the payload means (remaining ticks, a host handle).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ResumeToken(u64);

impl ResumeToken {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u64 {
        self.0
    }
}

/// Result of running a command for one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Progress {
    /// The command needs more ticks; resume it with this token.
    Suspended(ResumeToken),
    /// The command finished.
    Completed,
}

/// Cursor effect requested by a command after it completes.
///
/// The interpreter hands this to the flow-control resolver, which computes the
/// new cursor position.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum FlowControl {
    /// Continue with the next command.
    #[default]
    None,
    /// Branch condition failed: continue after the matching `else` or `end_if`.
    SkipFalseBranch,
    /// True branch finished at an `else`: continue after the matching `end_if`.
    SkipToEndIf,
    /// Entering a loop body.
    PushLoopFrame,
    /// Leave the nearest enclosing loop.
    BreakLoop,
    /// Reached the end of a loop body: take the back-edge.
    EndLoop,
    /// Continue after the named label.
    Jump(String),
    /// End the session now.
    Halt,
}

/// Execution state of a command instance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ExecutionState {
    #[default]
    Idle,
    Executing,
    Complete,
    Aborted,
}

impl ExecutionState {
    /// Returns true for `Complete` and `Aborted`.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Aborted)
    }
}

/// Failures raised while a command executes.
///
/// The interpreter logs these and treats the command as completed so that one
/// bad instruction cannot freeze a scripted sequence.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("division by zero while updating variable `{variable}`")]
    DivisionByZero { variable: String },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("command `{name}` cannot run from state {state:?}")]
    NotRunnable {
        name: String,
        state: ExecutionState,
    },
}

impl EventError for CommandError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::DivisionByZero { .. } | Self::InvalidParameter(_) => ErrorSeverity::Recoverable,
            Self::NotRunnable { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::DivisionByZero { .. } => "COMMAND_DIVISION_BY_ZERO",
            Self::InvalidParameter(_) => "COMMAND_INVALID_PARAMETER",
            Self::NotRunnable { .. } => "COMMAND_NOT_RUNNABLE",
        }
    }
}

pub type CommandResult<T> = Result<T, CommandError>;

/// Behavior implemented by every command variant.
pub trait EventCommand {
    fn kind(&self) -> CommandKind;

    /// Runs the command for the first time.
    fn execute(&mut self, ctx: &ExecutionContext<'_>) -> CommandResult<Progress>;

    /// Continues a suspended command with the token it returned last tick.
    fn resume(
        &mut self,
        _token: ResumeToken,
        _ctx: &ExecutionContext<'_>,
    ) -> CommandResult<Progress> {
        Ok(Progress::Completed)
    }

    /// Cursor effect to apply once the command completed.
    fn post_execute(&self) -> FlowControl {
        FlowControl::None
    }

    /// Releases host resources held by an executing command.
    fn abort(&mut self, _ctx: &ExecutionContext<'_>) {}

    /// Clears runtime fields, keeping the configured parameters.
    fn reset(&mut self) {}
}

/// Runtime command instance: a variant plus its execution envelope.
///
/// Cloning yields an independent `Idle` instance with identical configured
/// parameters; runtime fields are never copied. This allows the same authored
/// definition to run in two sessions at once.
#[derive(Debug)]
pub struct Command {
    name: String,
    enabled: bool,
    state: ExecutionState,
    variant: CommandVariant,
}

impl Command {
    pub fn new(variant: impl Into<CommandVariant>) -> Self {
        let variant = variant.into();
        Self {
            name: variant.kind().display_name().to_owned(),
            enabled: true,
            state: ExecutionState::Idle,
            variant,
        }
    }

    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Diagnostic name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn state(&self) -> ExecutionState {
        self.state
    }

    pub fn kind(&self) -> CommandKind {
        self.variant.kind()
    }

    pub fn variant(&self) -> &CommandVariant {
        &self.variant
    }

    /// Returns true if both commands have identical configuration, ignoring
    /// execution state and runtime fields.
    pub fn same_configuration(&self, other: &Command) -> bool {
        self.enabled == other.enabled && self.clone().variant == other.clone().variant
    }

    /// Starts the command. Only valid from `Idle`.
    pub fn execute(&mut self, ctx: &ExecutionContext<'_>) -> CommandResult<Progress> {
        if self.state != ExecutionState::Idle {
            return Err(self.not_runnable());
        }
        self.state = ExecutionState::Executing;
        let progress = self.variant.execute(ctx);
        self.settle(progress)
    }

    /// Continues the command. Only valid from `Executing`.
    pub fn resume(
        &mut self,
        token: ResumeToken,
        ctx: &ExecutionContext<'_>,
    ) -> CommandResult<Progress> {
        if self.state != ExecutionState::Executing {
            return Err(self.not_runnable());
        }
        let progress = self.variant.resume(token, ctx);
        self.settle(progress)
    }

    pub fn post_execute(&self) -> FlowControl {
        self.variant.post_execute()
    }

    /// Moves any non-complete command to `Aborted`.
    ///
    /// Variant cleanup runs only for an executing command. Returns `false` if
    /// the command had already finished or been aborted.
    pub fn abort(&mut self, ctx: &ExecutionContext<'_>) -> bool {
        match self.state {
            ExecutionState::Complete | ExecutionState::Aborted => false,
            ExecutionState::Executing => {
                self.variant.abort(ctx);
                self.state = ExecutionState::Aborted;
                true
            }
            ExecutionState::Idle => {
                self.state = ExecutionState::Aborted;
                true
            }
        }
    }

    /// Returns the instance to `Idle`, keeping its configuration.
    pub fn reset(&mut self) {
        self.state = ExecutionState::Idle;
        self.variant.reset();
    }

    /// Replaces the configuration of a pooled instance.
    pub(crate) fn configure(&mut self, variant: CommandVariant, enabled: bool, name: &str) {
        self.variant = variant;
        self.enabled = enabled;
        self.state = ExecutionState::Idle;
        name.clone_into(&mut self.name);
    }

    /// Erases every trace of the previous use before the instance is pooled.
    pub(crate) fn recycle(&mut self) {
        let kind = self.kind();
        self.configure(CommandVariant::default_for(kind), true, kind.display_name());
    }

    fn settle(&mut self, progress: CommandResult<Progress>) -> CommandResult<Progress> {
        match progress {
            Ok(Progress::Suspended(token)) => Ok(Progress::Suspended(token)),
            Ok(Progress::Completed) => {
                self.state = ExecutionState::Complete;
                Ok(Progress::Completed)
            }
            Err(error) => {
                self.state = ExecutionState::Complete;
                Err(error)
            }
        }
    }

    fn not_runnable(&self) -> CommandError {
        CommandError::NotRunnable {
            name: self.name.clone(),
            state: self.state,
        }
    }
}

impl Clone for Command {
    fn clone(&self) -> Self {
        let mut variant = self.variant.clone();
        variant.reset();
        Self {
            name: self.name.clone(),
            enabled: self.enabled,
            state: ExecutionState::Idle,
            variant,
        }
    }
}
