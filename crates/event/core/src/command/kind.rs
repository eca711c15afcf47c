//! Command type tags and their static lookup tables.

use serde::{Deserialize, Serialize};

/// Closed set of command variants.
///
/// The snake_case string form (`show_message`, `conditional_branch`, ...) is
/// the `type_tag` stored in a [`CommandDescriptor`](crate::CommandDescriptor).
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CommandKind {
    // Message
    ShowMessage,
    ShowChoices,

    // Game progression
    ControlSwitches,
    ControlVariables,
    ControlSelfSwitch,

    // Flow control
    ConditionalBranch,
    Else,
    EndIf,
    Loop,
    BreakLoop,
    EndLoop,
    Label,
    JumpToLabel,
    ExitEventProcessing,
    Comment,

    // Timing
    Wait,

    // Movement
    TransferPlayer,

    // Screen (cutscene-only)
    FadeScreen,
    ShakeScreen,
}

/// Editor grouping of commands. Has no effect on execution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum CommandCategory {
    Message,
    GameProgression,
    FlowControl,
    Timing,
    Movement,
    Screen,
    Other,
}

impl CommandKind {
    /// String tag used in descriptors.
    pub fn type_tag(self) -> &'static str {
        self.into()
    }

    pub const fn category(self) -> CommandCategory {
        use CommandKind::*;
        match self {
            ShowMessage | ShowChoices => CommandCategory::Message,
            ControlSwitches | ControlVariables | ControlSelfSwitch => {
                CommandCategory::GameProgression
            }
            ConditionalBranch | Else | EndIf | Loop | BreakLoop | EndLoop | Label | JumpToLabel
            | ExitEventProcessing => CommandCategory::FlowControl,
            Comment => CommandCategory::Other,
            Wait => CommandCategory::Timing,
            TransferPlayer => CommandCategory::Movement,
            FadeScreen | ShakeScreen => CommandCategory::Screen,
        }
    }

    /// Human-readable name shown by tooling and used in diagnostics.
    pub const fn display_name(self) -> &'static str {
        use CommandKind::*;
        match self {
            ShowMessage => "Show Message",
            ShowChoices => "Show Choices",
            ControlSwitches => "Control Switches",
            ControlVariables => "Control Variables",
            ControlSelfSwitch => "Control Self Switch",
            ConditionalBranch => "Conditional Branch",
            Else => "Else",
            EndIf => "End If",
            Loop => "Loop",
            BreakLoop => "Break Loop",
            EndLoop => "Repeat Above",
            Label => "Label",
            JumpToLabel => "Jump to Label",
            ExitEventProcessing => "Exit Event Processing",
            Comment => "Comment",
            Wait => "Wait",
            TransferPlayer => "Transfer Player",
            FadeScreen => "Fade Screen",
            ShakeScreen => "Shake Screen",
        }
    }

    /// Commands that only make sense on a cutscene timeline.
    pub const fn is_cutscene_only(self) -> bool {
        matches!(self, Self::FadeScreen | Self::ShakeScreen)
    }
}
