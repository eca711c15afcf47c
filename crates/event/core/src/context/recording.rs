//! Host that records every presentation request.

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use super::host::{
    ChoiceHandle, ChoiceRequest, ChoiceResult, EventHost, MessageHandle, MessageRequest,
    ScreenEffect, TransferRequest,
};

/// A presentation request observed by [`RecordingHost`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostEvent {
    MessageShown {
        handle: MessageHandle,
        speaker: Option<String>,
        text: String,
    },
    /// Closed by the interpreter (e.g. on stop), not by the player.
    MessageClosed(MessageHandle),
    ChoicesShown {
        handle: ChoiceHandle,
        choices: Vec<String>,
    },
    ChoicesCancelled(ChoiceHandle),
    Transfer(TransferRequest),
    Screen(ScreenEffect),
}

/// Recording host with player input under test control.
///
/// Messages stay open until [`dismiss`](Self::dismiss) or
/// [`dismiss_all`](Self::dismiss_all) is called, unless the host was built
/// with [`auto_close`](Self::auto_close). Choice prompts resolve with answers
/// queued through [`queue_choice`](Self::queue_choice), in order.
#[derive(Debug, Default)]
pub struct RecordingHost {
    auto_close: bool,
    next_handle: AtomicU64,
    events: Mutex<Vec<HostEvent>>,
    open_messages: Mutex<HashSet<MessageHandle>>,
    pending_choices: Mutex<HashSet<ChoiceHandle>>,
    answers: Mutex<VecDeque<ChoiceResult>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Host whose messages are dismissed as soon as they are shown.
    pub fn auto_close() -> Self {
        Self {
            auto_close: true,
            ..Self::default()
        }
    }

    /// Simulates the player dismissing one message.
    pub fn dismiss(&self, handle: MessageHandle) {
        self.open_messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&handle);
    }

    /// Simulates the player dismissing every open message.
    pub fn dismiss_all(&self) {
        self.open_messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn queue_choice(&self, answer: ChoiceResult) {
        self.answers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(answer);
    }

    pub fn open_message_count(&self) -> usize {
        self.open_messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn events(&self) -> Vec<HostEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Texts of every message shown so far, in order.
    pub fn messages(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                HostEvent::MessageShown { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    fn record(&self, event: HostEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }

    fn allocate(&self) -> u64 {
        self.next_handle.fetch_add(1, Ordering::Relaxed) + 1
    }
}

impl EventHost for RecordingHost {
    fn show_message(&self, request: &MessageRequest<'_>) -> MessageHandle {
        let handle = MessageHandle(self.allocate());
        if !self.auto_close {
            self.open_messages
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(handle);
        }
        self.record(HostEvent::MessageShown {
            handle,
            speaker: request.speaker.map(str::to_owned),
            text: request.text.to_owned(),
        });
        handle
    }

    fn is_message_closed(&self, handle: MessageHandle) -> bool {
        !self
            .open_messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&handle)
    }

    fn close_message(&self, handle: MessageHandle) {
        self.dismiss(handle);
        self.record(HostEvent::MessageClosed(handle));
    }

    fn show_choices(&self, request: &ChoiceRequest<'_>) -> ChoiceHandle {
        let handle = ChoiceHandle(self.allocate());
        self.pending_choices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(handle);
        self.record(HostEvent::ChoicesShown {
            handle,
            choices: request.choices.to_vec(),
        });
        handle
    }

    fn choice_result(&self, handle: ChoiceHandle) -> Option<ChoiceResult> {
        let mut pending = self
            .pending_choices
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if !pending.contains(&handle) {
            return None;
        }
        let answer = self
            .answers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()?;
        pending.remove(&handle);
        Some(answer)
    }

    fn cancel_choices(&self, handle: ChoiceHandle) {
        self.pending_choices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&handle);
        self.record(HostEvent::ChoicesCancelled(handle));
    }

    fn transfer_player(&self, request: &TransferRequest) {
        self.record(HostEvent::Transfer(*request));
    }

    fn screen_effect(&self, effect: &ScreenEffect) {
        self.record(HostEvent::Screen(*effect));
    }
}
