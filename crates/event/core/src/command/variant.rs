//! Static dispatch over the closed set of command variants.

use crate::context::ExecutionContext;

use super::kinds::{
    BreakLoop, Comment, ConditionalBranch, ControlSelfSwitch, ControlSwitches, ControlVariables,
    Else, EndIf, EndLoop, ExitEventProcessing, FadeScreen, JumpToLabel, Label, Loop, ShakeScreen,
    ShowChoices, ShowMessage, TransferPlayer, Wait,
};
use super::{CommandKind, CommandResult, EventCommand, FlowControl, Progress, ResumeToken};

macro_rules! command_variants {
    ($($variant:ident),+ $(,)?) => {
        /// A command variant with its configured parameters.
        ///
        /// Each variant delegates to its corresponding struct implementation.
        #[derive(Clone, Debug, PartialEq)]
        pub enum CommandVariant {
            $($variant($variant),)+
        }

        impl CommandVariant {
            pub fn kind(&self) -> CommandKind {
                match self {
                    $(Self::$variant(_) => CommandKind::$variant,)+
                }
            }

            /// Default-constructed variant for a tag.
            pub fn default_for(kind: CommandKind) -> Self {
                match kind {
                    $(CommandKind::$variant => Self::$variant($variant::default()),)+
                }
            }

            /// Decodes a parameter blob into the variant selected by `kind`.
            pub fn decode(kind: CommandKind, parameters: &[u8]) -> bincode::Result<Self> {
                match kind {
                    $(CommandKind::$variant => {
                        bincode::deserialize::<$variant>(parameters).map(Self::$variant)
                    })+
                }
            }

            /// Deserializes the fields of the variant selected by `kind` from any
            /// self-describing format (e.g. a JSON script).
            pub fn from_params<'de, D>(kind: CommandKind, deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                match kind {
                    $(CommandKind::$variant => {
                        <$variant as serde::Deserialize>::deserialize(deserializer).map(Self::$variant)
                    })+
                }
            }

            /// Encodes the configured parameters (runtime fields are skipped).
            pub fn encode(&self) -> bincode::Result<Vec<u8>> {
                match self {
                    $(Self::$variant(command) => bincode::serialize(command),)+
                }
            }

            pub(crate) fn execute(&mut self, ctx: &ExecutionContext<'_>) -> CommandResult<Progress> {
                match self {
                    $(Self::$variant(command) => command.execute(ctx),)+
                }
            }

            pub(crate) fn resume(
                &mut self,
                token: ResumeToken,
                ctx: &ExecutionContext<'_>,
            ) -> CommandResult<Progress> {
                match self {
                    $(Self::$variant(command) => command.resume(token, ctx),)+
                }
            }

            pub(crate) fn post_execute(&self) -> FlowControl {
                match self {
                    $(Self::$variant(command) => command.post_execute(),)+
                }
            }

            pub(crate) fn abort(&mut self, ctx: &ExecutionContext<'_>) {
                match self {
                    $(Self::$variant(command) => command.abort(ctx),)+
                }
            }

            pub(crate) fn reset(&mut self) {
                match self {
                    $(Self::$variant(command) => command.reset(),)+
                }
            }
        }

        $(
            impl From<$variant> for CommandVariant {
                fn from(command: $variant) -> Self {
                    Self::$variant(command)
                }
            }
        )+
    };
}

command_variants!(
    ShowMessage,
    ShowChoices,
    ControlSwitches,
    ControlVariables,
    ControlSelfSwitch,
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
    Wait,
    TransferPlayer,
    FadeScreen,
    ShakeScreen,
);
