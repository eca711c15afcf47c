//! Show Message command.

use serde::{Deserialize, Serialize};

use crate::command::{CommandKind, CommandResult, EventCommand, Progress, ResumeToken};
use crate::context::{ExecutionContext, MessageHandle, MessageRequest};

/// Opens a message window on the host.
///
/// With `wait_for_input` the command stays suspended until the host reports
/// the window closed; otherwise it completes on the tick it was shown.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowMessage {
    pub speaker: Option<String>,
    pub text: String,
    pub wait_for_input: bool,
    #[serde(skip)]
    open: Option<MessageHandle>,
}

impl ShowMessage {
    /// Creates a message that waits for the player to dismiss it.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            speaker: None,
            text: text.into(),
            wait_for_input: true,
            open: None,
        }
    }

    pub fn with_speaker(mut self, speaker: impl Into<String>) -> Self {
        self.speaker = Some(speaker.into());
        self
    }

    /// Continue immediately after the message is shown.
    pub fn without_wait(mut self) -> Self {
        self.wait_for_input = false;
        self
    }

    fn poll(&mut self, handle: MessageHandle, ctx: &ExecutionContext<'_>) -> Progress {
        if ctx.host.is_message_closed(handle) {
            self.open = None;
            Progress::Completed
        } else {
            self.open = Some(handle);
            Progress::Suspended(ResumeToken::new(handle.0))
        }
    }
}

impl EventCommand for ShowMessage {
    fn kind(&self) -> CommandKind {
        CommandKind::ShowMessage
    }

    fn execute(&mut self, ctx: &ExecutionContext<'_>) -> CommandResult<Progress> {
        let handle = ctx.host.show_message(&MessageRequest {
            owner: ctx.owner,
            speaker: self.speaker.as_deref(),
            text: &self.text,
        });
        if !self.wait_for_input {
            return Ok(Progress::Completed);
        }
        Ok(self.poll(handle, ctx))
    }

    fn resume(&mut self, token: ResumeToken, ctx: &ExecutionContext<'_>) -> CommandResult<Progress> {
        Ok(self.poll(MessageHandle(token.value()), ctx))
    }

    fn abort(&mut self, ctx: &ExecutionContext<'_>) {
        if let Some(handle) = self.open.take() {
            ctx.host.close_message(handle);
        }
    }

    fn reset(&mut self) {
        self.open = None;
    }
}
