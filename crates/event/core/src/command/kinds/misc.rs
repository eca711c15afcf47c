//! Exit Event Processing and Comment.

use serde::{Deserialize, Serialize};

use crate::command::{CommandKind, CommandResult, EventCommand, FlowControl, Progress};
use crate::context::ExecutionContext;

/// Ends the session immediately, as if the cursor reached the end.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitEventProcessing;

impl EventCommand for ExitEventProcessing {
    fn kind(&self) -> CommandKind {
        CommandKind::ExitEventProcessing
    }

    fn execute(&mut self, _ctx: &ExecutionContext<'_>) -> CommandResult<Progress> {
        Ok(Progress::Completed)
    }

    fn post_execute(&self) -> FlowControl {
        FlowControl::Halt
    }
}

/// Author note. No effect.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub text: String,
}

impl Comment {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl EventCommand for Comment {
    fn kind(&self) -> CommandKind {
        CommandKind::Comment
    }

    fn execute(&mut self, _ctx: &ExecutionContext<'_>) -> CommandResult<Progress> {
        Ok(Progress::Completed)
    }
}
