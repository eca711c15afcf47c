//! Show Choices command.

use serde::{Deserialize, Serialize};

use crate::command::{CommandError, CommandKind, CommandResult, EventCommand, Progress, ResumeToken};
use crate::context::{ChoiceHandle, ChoiceRequest, ChoiceResult, ExecutionContext};

/// Presents a list of choices and stores the answer in a variable.
///
/// The selected index (0-based) is written to `result_variable`. A cancelled
/// prompt writes `cancel_index`, or `-1` when the prompt is not cancellable.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowChoices {
    pub choices: Vec<String>,
    pub result_variable: String,
    pub cancel_index: Option<i32>,
    #[serde(skip)]
    open: Option<ChoiceHandle>,
}

impl ShowChoices {
    pub fn new(choices: Vec<String>, result_variable: impl Into<String>) -> Self {
        Self {
            choices,
            result_variable: result_variable.into(),
            cancel_index: None,
            open: None,
        }
    }

    pub fn cancellable(mut self, cancel_index: i32) -> Self {
        self.cancel_index = Some(cancel_index);
        self
    }

    fn poll(&mut self, handle: ChoiceHandle, ctx: &ExecutionContext<'_>) -> CommandResult<Progress> {
        let Some(answer) = ctx.host.choice_result(handle) else {
            self.open = Some(handle);
            return Ok(Progress::Suspended(ResumeToken::new(handle.0)));
        };
        self.open = None;

        let value = match answer {
            ChoiceResult::Selected(index) if index < self.choices.len() => {
                i32::try_from(index).map_err(|_| {
                    CommandError::InvalidParameter(format!("choice index {index} out of range"))
                })?
            }
            ChoiceResult::Selected(index) => {
                return Err(CommandError::InvalidParameter(format!(
                    "host selected choice {index} of {}",
                    self.choices.len()
                )));
            }
            ChoiceResult::Cancelled => self.cancel_index.unwrap_or(-1),
        };
        ctx.state.set_variable(&self.result_variable, value);
        Ok(Progress::Completed)
    }
}

impl EventCommand for ShowChoices {
    fn kind(&self) -> CommandKind {
        CommandKind::ShowChoices
    }

    fn execute(&mut self, ctx: &ExecutionContext<'_>) -> CommandResult<Progress> {
        if self.choices.is_empty() {
            return Err(CommandError::InvalidParameter(
                "show_choices requires at least one choice".to_owned(),
            ));
        }
        let handle = ctx.host.show_choices(&ChoiceRequest {
            owner: ctx.owner,
            choices: &self.choices,
            cancellable: self.cancel_index.is_some(),
        });
        self.poll(handle, ctx)
    }

    fn resume(&mut self, token: ResumeToken, ctx: &ExecutionContext<'_>) -> CommandResult<Progress> {
        self.poll(ChoiceHandle(token.value()), ctx)
    }

    fn abort(&mut self, ctx: &ExecutionContext<'_>) {
        if let Some(handle) = self.open.take() {
            ctx.host.cancel_choices(handle);
        }
    }

    fn reset(&mut self) {
        self.open = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{GameStateContext, InMemoryGameState, RecordingHost};

    fn yes_no() -> ShowChoices {
        ShowChoices::new(vec!["Yes".to_owned(), "No".to_owned()], "answer")
    }

    #[test]
    fn stores_selected_index_once_answered() {
        let state = InMemoryGameState::new();
        let host = RecordingHost::new();
        let ctx = ExecutionContext::new(&state, &host, Default::default());

        let mut command = yes_no();
        let Ok(Progress::Suspended(token)) = command.execute(&ctx) else {
            panic!("prompt should wait for an answer");
        };
        host.queue_choice(ChoiceResult::Selected(1));
        assert_eq!(command.resume(token, &ctx), Ok(Progress::Completed));
        assert_eq!(state.variable("answer"), 1);
    }

    #[test]
    fn cancel_writes_cancel_index() {
        let state = InMemoryGameState::new().with_variable("answer", 7);
        let host = RecordingHost::new();
        host.queue_choice(ChoiceResult::Cancelled);
        let ctx = ExecutionContext::new(&state, &host, Default::default());

        let mut command = yes_no().cancellable(1);
        assert_eq!(command.execute(&ctx), Ok(Progress::Completed));
        assert_eq!(state.variable("answer"), 1);
    }

    #[test]
    fn out_of_range_selection_is_an_error() {
        let state = InMemoryGameState::new();
        let host = RecordingHost::new();
        host.queue_choice(ChoiceResult::Selected(5));
        let ctx = ExecutionContext::new(&state, &host, Default::default());

        assert!(matches!(
            yes_no().execute(&ctx),
            Err(CommandError::InvalidParameter(_))
        ));
    }
}
