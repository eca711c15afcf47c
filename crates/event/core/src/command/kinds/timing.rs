//! Wait command.

use serde::{Deserialize, Serialize};

use super::{continue_countdown, countdown};
use crate::command::{CommandKind, CommandResult, EventCommand, Progress, ResumeToken};
use crate::context::ExecutionContext;

/// Delays the program by `ticks` scheduler ticks.
///
/// `Wait { ticks: 0 }` completes on its first tick; every additional tick of
/// delay is one more suspension.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wait {
    pub ticks: u32,
}

impl Wait {
    pub fn new(ticks: u32) -> Self {
        Self { ticks }
    }
}

impl EventCommand for Wait {
    fn kind(&self) -> CommandKind {
        CommandKind::Wait
    }

    fn execute(&mut self, _ctx: &ExecutionContext<'_>) -> CommandResult<Progress> {
        Ok(countdown(self.ticks))
    }

    fn resume(&mut self, token: ResumeToken, _ctx: &ExecutionContext<'_>) -> CommandResult<Progress> {
        Ok(continue_countdown(token))
    }
}
