//! Loop, Break Loop, and End Loop (Repeat Above).

use serde::{Deserialize, Serialize};

use crate::command::{CommandKind, CommandResult, EventCommand, FlowControl, Progress};
use crate::context::ExecutionContext;

/// Opens a loop body and records a loop frame.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loop;

impl EventCommand for Loop {
    fn kind(&self) -> CommandKind {
        CommandKind::Loop
    }

    fn execute(&mut self, _ctx: &ExecutionContext<'_>) -> CommandResult<Progress> {
        Ok(Progress::Completed)
    }

    fn post_execute(&self) -> FlowControl {
        FlowControl::PushLoopFrame
    }
}

/// Leaves the nearest enclosing loop.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakLoop;

impl EventCommand for BreakLoop {
    fn kind(&self) -> CommandKind {
        CommandKind::BreakLoop
    }

    fn execute(&mut self, _ctx: &ExecutionContext<'_>) -> CommandResult<Progress> {
        Ok(Progress::Completed)
    }

    fn post_execute(&self) -> FlowControl {
        FlowControl::BreakLoop
    }
}

/// Closes a loop body; jumps back to the first command of the body while the
/// loop frame is active.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndLoop;

impl EventCommand for EndLoop {
    fn kind(&self) -> CommandKind {
        CommandKind::EndLoop
    }

    fn execute(&mut self, _ctx: &ExecutionContext<'_>) -> CommandResult<Progress> {
        Ok(Progress::Completed)
    }

    fn post_execute(&self) -> FlowControl {
        FlowControl::EndLoop
    }
}
