//! Presentation-side collaborator.
//!
//! Rendering, audio, and UI are out of scope for the interpreter. Commands
//! only issue requests through [`EventHost`] and poll for completion across
//! ticks; the host decides how (and whether) anything is shown.

use serde::{Deserialize, Serialize};

use super::OwnerId;

/// Host-assigned identifier of an open message window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MessageHandle(pub u64);

/// Host-assigned identifier of an open choice prompt.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ChoiceHandle(pub u64);

#[derive(Clone, Copy, Debug)]
pub struct MessageRequest<'a> {
    pub owner: OwnerId,
    pub speaker: Option<&'a str>,
    pub text: &'a str,
}

#[derive(Clone, Copy, Debug)]
pub struct ChoiceRequest<'a> {
    pub owner: OwnerId,
    pub choices: &'a [String],
    pub cancellable: bool,
}

/// Outcome of a choice prompt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChoiceResult {
    Selected(usize),
    Cancelled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransferRequest {
    pub owner: OwnerId,
    pub map_id: u32,
    pub x: i32,
    pub y: i32,
    pub fade: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FadeDirection {
    #[default]
    Out,
    In,
}

/// Full-screen effects requested by cutscene commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScreenEffect {
    Fade {
        direction: FadeDirection,
        duration_ticks: u32,
    },
    Shake {
        power: u8,
        speed: u8,
        duration_ticks: u32,
    },
}

/// Presentation layer driven by message, transfer, and screen commands.
pub trait EventHost: Send + Sync {
    /// Opens a message window and returns a handle for polling.
    fn show_message(&self, request: &MessageRequest<'_>) -> MessageHandle;

    /// Returns `true` once the player dismissed the message.
    fn is_message_closed(&self, _handle: MessageHandle) -> bool {
        true
    }

    /// Closes a message programmatically (used when a session is stopped).
    fn close_message(&self, _handle: MessageHandle) {}

    /// Opens a choice prompt and returns a handle for polling.
    fn show_choices(&self, request: &ChoiceRequest<'_>) -> ChoiceHandle;

    /// Returns the player's answer once available.
    fn choice_result(&self, handle: ChoiceHandle) -> Option<ChoiceResult>;

    /// Withdraws an open prompt without an answer.
    fn cancel_choices(&self, _handle: ChoiceHandle) {}

    fn transfer_player(&self, _request: &TransferRequest) {}

    fn screen_effect(&self, _effect: &ScreenEffect) {}
}

/// Host that presents nothing and completes every request immediately.
///
/// Choice prompts resolve as cancelled.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullHost;

impl EventHost for NullHost {
    fn show_message(&self, _request: &MessageRequest<'_>) -> MessageHandle {
        MessageHandle::default()
    }

    fn show_choices(&self, _request: &ChoiceRequest<'_>) -> ChoiceHandle {
        ChoiceHandle::default()
    }

    fn choice_result(&self, _handle: ChoiceHandle) -> Option<ChoiceResult> {
        Some(ChoiceResult::Cancelled)
    }
}
