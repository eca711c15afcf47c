//! Concrete command variants.
//!
//! Each struct holds the configured parameters of one variant; fields marked
//! `#[serde(skip)]` are runtime-only and cleared by `reset()`.

mod branch;
mod choices;
mod labels;
mod loops;
mod message;
mod misc;
mod screen;
mod switches;
mod timing;
mod transfer;
mod variables;

pub use branch::{ConditionalBranch, Else, EndIf};
pub use choices::ShowChoices;
pub use labels::{JumpToLabel, Label};
pub use loops::{BreakLoop, EndLoop, Loop};
pub use message::ShowMessage;
pub use misc::{Comment, ExitEventProcessing};
pub use screen::{FadeScreen, ShakeScreen};
pub use switches::{ControlSelfSwitch, ControlSwitches, SwitchOperation};
pub use timing::Wait;
pub use transfer::TransferPlayer;
pub use variables::{ControlVariables, Operand, VariableOperation};

use crate::command::{Progress, ResumeToken};

/// Counts down `remaining` ticks through resume tokens.
///
/// A countdown of `n` occupies `n` extra ticks after the first one.
pub(crate) fn countdown(remaining: u32) -> Progress {
    if remaining == 0 {
        Progress::Completed
    } else {
        Progress::Suspended(ResumeToken::new(u64::from(remaining - 1)))
    }
}

/// Continues a countdown started with [`countdown`].
pub(crate) fn continue_countdown(token: ResumeToken) -> Progress {
    match token.value() {
        0 => Progress::Completed,
        left => Progress::Suspended(ResumeToken::new(left - 1)),
    }
}
