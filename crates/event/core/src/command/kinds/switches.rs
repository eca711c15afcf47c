//! Control Switches and Control Self Switch commands.

use serde::{Deserialize, Serialize};

use crate::command::{CommandKind, CommandResult, EventCommand, Progress};
use crate::context::ExecutionContext;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwitchOperation {
    #[default]
    On,
    Off,
    Toggle,
}

impl SwitchOperation {
    pub const fn apply(self, current: bool) -> bool {
        match self {
            Self::On => true,
            Self::Off => false,
            Self::Toggle => !current,
        }
    }
}

/// Applies one operation to a batch of game switches.
///
/// All writes happen within a single tick, so other sessions never observe a
/// partially updated batch between ticks.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlSwitches {
    pub switches: Vec<String>,
    pub operation: SwitchOperation,
}

impl ControlSwitches {
    pub fn new(switches: Vec<String>, operation: SwitchOperation) -> Self {
        Self {
            switches,
            operation,
        }
    }

    pub fn single(name: impl Into<String>, operation: SwitchOperation) -> Self {
        Self::new(vec![name.into()], operation)
    }
}

impl EventCommand for ControlSwitches {
    fn kind(&self) -> CommandKind {
        CommandKind::ControlSwitches
    }

    fn execute(&mut self, ctx: &ExecutionContext<'_>) -> CommandResult<Progress> {
        for name in &self.switches {
            let value = self.operation.apply(ctx.state.switch(name));
            ctx.state.set_switch(name, value);
        }
        Ok(Progress::Completed)
    }
}

/// Sets a self switch of the owning event.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlSelfSwitch {
    pub name: String,
    pub value: bool,
}

impl ControlSelfSwitch {
    pub fn new(name: impl Into<String>, value: bool) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

impl EventCommand for ControlSelfSwitch {
    fn kind(&self) -> CommandKind {
        CommandKind::ControlSelfSwitch
    }

    fn execute(&mut self, ctx: &ExecutionContext<'_>) -> CommandResult<Progress> {
        ctx.state.set_self_switch(ctx.owner, &self.name, self.value);
        Ok(Progress::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{GameStateContext, InMemoryGameState, NullHost, OwnerId};

    #[test]
    fn toggle_flips_each_switch() {
        let state = InMemoryGameState::new().with_switch("a", true);
        let ctx = ExecutionContext::new(&state, &NullHost, OwnerId::GLOBAL);

        let mut command = ControlSwitches::new(
            vec!["a".to_owned(), "b".to_owned()],
            SwitchOperation::Toggle,
        );
        command.execute(&ctx).unwrap();
        assert!(!state.switch("a"));
        assert!(state.switch("b"));
    }

    #[test]
    fn self_switch_uses_context_owner() {
        let state = InMemoryGameState::new();
        let ctx = ExecutionContext::new(&state, &NullHost, OwnerId(9));

        ControlSelfSwitch::new("A", true).execute(&ctx).unwrap();
        assert!(state.self_switch(OwnerId(9), "A"));
        assert!(!state.self_switch(OwnerId::GLOBAL, "A"));
    }
}
