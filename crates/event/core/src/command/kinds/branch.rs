//! Conditional Branch, Else, and End If.

use serde::{Deserialize, Serialize};

use crate::command::{CommandKind, CommandResult, EventCommand, FlowControl, Progress};
use crate::context::{ConditionSet, ExecutionContext};

/// Evaluates a condition set once per entry and skips the body when false.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionalBranch {
    pub conditions: ConditionSet,
    #[serde(skip)]
    outcome: Option<bool>,
}

impl ConditionalBranch {
    pub fn new(conditions: ConditionSet) -> Self {
        Self {
            conditions,
            outcome: None,
        }
    }

    /// Result of the last evaluation, if the branch has run.
    pub fn outcome(&self) -> Option<bool> {
        self.outcome
    }
}

impl EventCommand for ConditionalBranch {
    fn kind(&self) -> CommandKind {
        CommandKind::ConditionalBranch
    }

    fn execute(&mut self, ctx: &ExecutionContext<'_>) -> CommandResult<Progress> {
        let outcome = ctx.state.evaluate_conditions(ctx.owner, &self.conditions);
        tracing::trace!(outcome, "conditional branch evaluated");
        self.outcome = Some(outcome);
        Ok(Progress::Completed)
    }

    fn post_execute(&self) -> FlowControl {
        match self.outcome {
            Some(false) => FlowControl::SkipFalseBranch,
            _ => FlowControl::None,
        }
    }

    fn reset(&mut self) {
        self.outcome = None;
    }
}

/// Start of the false branch.
///
/// Reached only when the true branch ran to its end, so execution continues
/// after the matching `end_if`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Else;

impl EventCommand for Else {
    fn kind(&self) -> CommandKind {
        CommandKind::Else
    }

    fn execute(&mut self, _ctx: &ExecutionContext<'_>) -> CommandResult<Progress> {
        Ok(Progress::Completed)
    }

    fn post_execute(&self) -> FlowControl {
        FlowControl::SkipToEndIf
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndIf;

impl EventCommand for EndIf {
    fn kind(&self) -> CommandKind {
        CommandKind::EndIf
    }

    fn execute(&mut self, _ctx: &ExecutionContext<'_>) -> CommandResult<Progress> {
        Ok(Progress::Completed)
    }
}
