pub mod command;
pub mod config;
pub mod context;
pub mod error;
pub mod flow;
pub mod interpreter;
pub mod pool;
pub mod program;
pub mod registry;

pub use command::kinds::{
    BreakLoop, Comment, ConditionalBranch, ControlSelfSwitch, ControlSwitches, ControlVariables,
    Else, EndIf, EndLoop, ExitEventProcessing, FadeScreen, JumpToLabel, Label, Loop, Operand,
    ShakeScreen, ShowChoices, ShowMessage, SwitchOperation, TransferPlayer, VariableOperation,
    Wait,
};
pub use command::{
    Command, CommandCategory, CommandError, CommandKind, CommandResult, CommandVariant,
    EventCommand, ExecutionState, FlowControl, Progress, ResumeToken,
};
pub use config::InterpreterConfig;
pub use context::{
    ChoiceHandle, ChoiceRequest, ChoiceResult, Comparison, Condition, ConditionMode, ConditionSet,
    EventHost, ExecutionContext, FadeDirection, GameStateContext, HostEvent, InMemoryGameState,
    MessageHandle, MessageRequest, NullHost, OwnerId, RecordingHost, ScreenEffect,
    TransferRequest,
};
pub use error::{ErrorSeverity, EventError};
pub use flow::{ControlStack, FlowError, LoopFrame, Resolution};
pub use interpreter::{
    Completion, CompletionCallback, CompletionReason, Interpreter, InterpreterError,
    InterpreterServices, InterpreterStatus, TickReport,
};
pub use pool::{CommandPool, PoolStats};
pub use program::{Program, ProgramError};
pub use registry::{
    CommandDescriptor, CommandFactory, CommandRegistry, ExecutionMode, FactoryError,
    filter_commands_by_mode,
};
