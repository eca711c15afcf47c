//! Label and Jump to Label.

use serde::{Deserialize, Serialize};

use crate::command::{CommandKind, CommandResult, EventCommand, FlowControl, Progress};
use crate::context::ExecutionContext;

/// Named jump target. Label names are unique within a program.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
}

impl Label {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl EventCommand for Label {
    fn kind(&self) -> CommandKind {
        CommandKind::Label
    }

    fn execute(&mut self, _ctx: &ExecutionContext<'_>) -> CommandResult<Progress> {
        Ok(Progress::Completed)
    }
}

/// Continues execution after the named label.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JumpToLabel {
    pub label: String,
}

impl JumpToLabel {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl EventCommand for JumpToLabel {
    fn kind(&self) -> CommandKind {
        CommandKind::JumpToLabel
    }

    fn execute(&mut self, _ctx: &ExecutionContext<'_>) -> CommandResult<Progress> {
        Ok(Progress::Completed)
    }

    fn post_execute(&self) -> FlowControl {
        FlowControl::Jump(self.label.clone())
    }
}
