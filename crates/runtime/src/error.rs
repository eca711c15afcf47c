//! Errors surfaced by the scheduler and the tick driver.

use event_core::{ErrorSeverity, EventError, InterpreterError};
use thiserror::Error;

use crate::scheduler::SessionId;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Interpreter(#[from] InterpreterError),

    #[error("session limit of {limit} reached")]
    TooManySessions { limit: usize },

    #[error("no session with id {0}")]
    UnknownSession(SessionId),

    #[error("{active} session(s) still running after {ticks} ticks")]
    TickBudgetExhausted { ticks: u64, active: usize },

    #[error("tick driver join failed")]
    DriverJoin(#[source] tokio::task::JoinError),
}

impl EventError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Interpreter(error) => error.severity(),
            Self::TooManySessions { .. } | Self::UnknownSession(_) => ErrorSeverity::Validation,
            Self::TickBudgetExhausted { .. } => ErrorSeverity::Recoverable,
            Self::DriverJoin(_) => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Interpreter(error) => error.error_code(),
            Self::TooManySessions { .. } => "RUNTIME_TOO_MANY_SESSIONS",
            Self::UnknownSession(_) => "RUNTIME_UNKNOWN_SESSION",
            Self::TickBudgetExhausted { .. } => "RUNTIME_TICK_BUDGET_EXHAUSTED",
            Self::DriverJoin(_) => "RUNTIME_DRIVER_JOIN",
        }
    }
}
