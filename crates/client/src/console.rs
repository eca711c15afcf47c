//! Host that narrates presentation requests as text lines.

use std::collections::VecDeque;
use std::fmt;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use event_core::{
    ChoiceHandle, ChoiceRequest, ChoiceResult, EventHost, FadeDirection, MessageHandle,
    MessageRequest, ScreenEffect, TransferRequest,
};

/// Console presentation layer.
///
/// Messages close as soon as they are printed. Choice prompts take their
/// answers from a preset queue and fall back to the first choice.
pub struct ConsoleHost {
    out: Mutex<Box<dyn Write + Send>>,
    answers: Mutex<VecDeque<usize>>,
    next_handle: AtomicU64,
}

impl ConsoleHost {
    pub fn stdout() -> Self {
        Self::with_writer(Box::new(io::stdout()))
    }

    pub fn with_writer(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
            answers: Mutex::new(VecDeque::new()),
            next_handle: AtomicU64::new(1),
        }
    }

    #[must_use]
    pub fn with_answers(self, answers: impl IntoIterator<Item = usize>) -> Self {
        self.answers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(answers);
        self
    }

    fn emit(&self, line: fmt::Arguments<'_>) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(error) = writeln!(out, "{line}").and_then(|()| out.flush()) {
            tracing::warn!(%error, "failed to write console output");
        }
    }

    fn allocate(&self) -> u64 {
        self.next_handle.fetch_add(1, Ordering::Relaxed)
    }
}

impl EventHost for ConsoleHost {
    fn show_message(&self, request: &MessageRequest<'_>) -> MessageHandle {
        match request.speaker {
            Some(speaker) => self.emit(format_args!("[{}] {speaker}: {}", request.owner, request.text)),
            None => self.emit(format_args!("[{}] {}", request.owner, request.text)),
        }
        MessageHandle(self.allocate())
    }

    fn show_choices(&self, request: &ChoiceRequest<'_>) -> ChoiceHandle {
        for (index, choice) in request.choices.iter().enumerate() {
            self.emit(format_args!("[{}]   {index}) {choice}", request.owner));
        }
        ChoiceHandle(self.allocate())
    }

    fn choice_result(&self, _handle: ChoiceHandle) -> Option<ChoiceResult> {
        let answer = self
            .answers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or(0);
        self.emit(format_args!("  > {answer}"));
        Some(ChoiceResult::Selected(answer))
    }

    fn transfer_player(&self, request: &TransferRequest) {
        self.emit(format_args!(
            "[{}] -- transfer to map {} at ({}, {})",
            request.owner, request.map_id, request.x, request.y
        ));
    }

    fn screen_effect(&self, effect: &ScreenEffect) {
        match effect {
            ScreenEffect::Fade {
                direction,
                duration_ticks,
            } => {
                let direction = match direction {
                    FadeDirection::Out => "out",
                    FadeDirection::In => "in",
                };
                self.emit(format_args!("-- fade {direction} ({duration_ticks} ticks)"));
            }
            ScreenEffect::Shake {
                power,
                speed,
                duration_ticks,
            } => self.emit(format_args!(
                "-- shake power {power} speed {speed} ({duration_ticks} ticks)"
            )),
        }
    }
}
