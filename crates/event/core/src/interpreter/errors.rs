use crate::error::{ErrorSeverity, EventError};
use crate::program::ProgramError;

/// Errors returned when a session cannot be started.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InterpreterError {
    #[error("interpreter is already running a session")]
    AlreadyRunning,

    #[error("malformed program: {0}")]
    MalformedProgram(#[from] ProgramError),
}

impl EventError for InterpreterError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::AlreadyRunning => "INTERPRETER_ALREADY_RUNNING",
            Self::MalformedProgram(error) => error.error_code(),
        }
    }
}
