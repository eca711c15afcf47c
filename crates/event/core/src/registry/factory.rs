//! Builds commands and programs from descriptors.

use std::sync::Arc;

use super::{CommandDescriptor, CommandRegistry, ExecutionMode, filter_commands_by_mode};
use crate::command::{Command, CommandVariant};
use crate::error::{ErrorSeverity, EventError};
use crate::pool::CommandPool;
use crate::program::{Program, ProgramError};

/// Errors raised while turning descriptors into commands and back.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FactoryError {
    #[error("unknown command type `{tag}`")]
    UnknownCommandType { tag: String },

    #[error("failed to decode parameters of `{tag}`: {reason}")]
    ParameterDecode { tag: String, reason: String },

    #[error("failed to encode parameters of `{tag}`: {reason}")]
    ParameterEncode { tag: String, reason: String },
}

impl EventError for FactoryError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownCommandType { .. } | Self::ParameterDecode { .. } => {
                ErrorSeverity::Recoverable
            }
            Self::ParameterEncode { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownCommandType { .. } => "FACTORY_UNKNOWN_COMMAND_TYPE",
            Self::ParameterDecode { .. } => "FACTORY_PARAMETER_DECODE",
            Self::ParameterEncode { .. } => "FACTORY_PARAMETER_ENCODE",
        }
    }
}

/// Turns descriptors into pooled command instances.
///
/// One factory (and its pool) is typically shared by every interpreter of a
/// host through an `Arc`.
#[derive(Debug)]
pub struct CommandFactory {
    registry: CommandRegistry,
    pool: Arc<CommandPool>,
}

impl CommandFactory {
    pub fn new(registry: CommandRegistry, pool: Arc<CommandPool>) -> Self {
        Self { registry, pool }
    }

    /// Factory over the built-in registry and a fresh pool.
    pub fn with_capacity(capacity_per_kind: usize) -> Self {
        Self::new(
            CommandRegistry::builtin(),
            Arc::new(CommandPool::new(capacity_per_kind)),
        )
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn pool(&self) -> &Arc<CommandPool> {
        &self.pool
    }

    /// Creates a command from a descriptor.
    ///
    /// Parameters are decoded before an instance is taken from the pool, so a
    /// failed decode leaves the pool untouched.
    pub fn create_command(&self, descriptor: &CommandDescriptor) -> Result<Command, FactoryError> {
        let tag = descriptor.type_tag.as_str();
        let Some(kind) = self.registry.lookup(tag) else {
            tracing::warn!(tag, "unknown command type");
            return Err(FactoryError::UnknownCommandType {
                tag: tag.to_owned(),
            });
        };

        let variant = CommandVariant::decode(kind, &descriptor.parameters).map_err(|error| {
            FactoryError::ParameterDecode {
                tag: tag.to_owned(),
                reason: error.to_string(),
            }
        })?;

        let mut command = self.pool.acquire(kind);
        command.configure(variant, descriptor.enabled, kind.display_name());
        Ok(command)
    }

    /// Build-time policy: unknown tags are dropped and undecodable parameters
    /// fall back to the default-constructed variant.
    pub fn create_command_or_default(&self, descriptor: &CommandDescriptor) -> Option<Command> {
        match self.create_command(descriptor) {
            Ok(command) => Some(command),
            Err(FactoryError::UnknownCommandType { .. }) => None,
            Err(error) => {
                tracing::warn!(%error, "using default parameters");
                let kind = self.registry.lookup(&descriptor.type_tag)?;
                let mut command = self.pool.acquire(kind);
                command.configure(
                    CommandVariant::default_for(kind),
                    descriptor.enabled,
                    kind.display_name(),
                );
                Some(command)
            }
        }
    }

    /// Encodes the configured fields of `command` into a descriptor.
    ///
    /// Execution state and runtime fields are not part of the encoding.
    pub fn create_command_data(&self, command: &Command) -> Result<CommandDescriptor, FactoryError> {
        let tag = command.kind().type_tag();
        let parameters = command
            .variant()
            .encode()
            .map_err(|error| FactoryError::ParameterEncode {
                tag: tag.to_owned(),
                reason: error.to_string(),
            })?;
        Ok(CommandDescriptor {
            type_tag: tag.to_owned(),
            parameters,
            enabled: command.is_enabled(),
        })
    }

    /// Filters, creates, and validates a whole program.
    ///
    /// When validation fails every created command goes back to the pool.
    pub fn build_program(
        &self,
        descriptors: &[CommandDescriptor],
        mode: ExecutionMode,
    ) -> Result<Program, ProgramError> {
        let admitted = filter_commands_by_mode(&self.registry, descriptors, mode);
        let commands: Vec<Command> = admitted
            .iter()
            .filter_map(|descriptor| self.create_command_or_default(descriptor))
            .collect();

        let dropped = descriptors.len() - commands.len();
        tracing::debug!(
            built = commands.len(),
            dropped,
            %mode,
            "program commands created"
        );

        match Program::validate(&commands) {
            Ok(labels) => Ok(Program::from_parts(commands, labels)),
            Err(error) => {
                tracing::warn!(%error, "rejecting malformed program");
                self.pool.release_all(commands);
                Err(error)
            }
        }
    }
}

impl Default for CommandFactory {
    fn default() -> Self {
        Self::with_capacity(crate::config::InterpreterConfig::DEFAULT_POOL_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::kinds::{
        ConditionalBranch, ControlVariables, FadeScreen, Operand, ShowChoices, ShowMessage,
        VariableOperation, Wait,
    };
    use crate::command::{CommandKind, ExecutionState};
    use crate::context::{Comparison, Condition, ConditionSet, FadeDirection};

    fn encode(command: impl Into<CommandVariant>) -> CommandDescriptor {
        let factory = CommandFactory::default();
        factory.create_command_data(&Command::new(command)).unwrap()
    }

    #[test]
    fn round_trip_preserves_configuration() {
        let factory = CommandFactory::default();
        let originals = vec![
            Command::new(ShowMessage::new("Welcome!").with_speaker("Innkeeper")),
            Command::new(ShowChoices::new(vec!["Yes".into(), "No".into()], "answer").cancellable(1)),
            Command::new(ControlVariables::new(
                "gold",
                VariableOperation::Add,
                Operand::Variable("reward".into()),
            )),
            Command::new(ConditionalBranch::new(ConditionSet::any(vec![
                Condition::switch_on("met_king"),
                Condition::variable("gold", Comparison::Less, 10),
            ]))),
            Command::new(FadeScreen::new(FadeDirection::In, 20)).disabled(),
        ];

        for original in &originals {
            let descriptor = factory.create_command_data(original).unwrap();
            let rebuilt = factory.create_command(&descriptor).unwrap();
            assert!(rebuilt.same_configuration(original), "{original:?}");
            assert_eq!(rebuilt.state(), ExecutionState::Idle);
        }
    }

    #[test]
    fn unknown_tag_is_rejected_and_dropped() {
        let factory = CommandFactory::default();
        let descriptor = CommandDescriptor::new("play_movie", Vec::new());
        assert_eq!(
            factory.create_command(&descriptor).unwrap_err(),
            FactoryError::UnknownCommandType {
                tag: "play_movie".into()
            }
        );
        assert!(factory.create_command_or_default(&descriptor).is_none());
    }

    #[test]
    fn undecodable_parameters_fall_back_to_default() {
        let factory = CommandFactory::default();
        let descriptor = CommandDescriptor::new("wait", vec![0xff]).disabled();

        let error = factory.create_command(&descriptor).unwrap_err();
        assert!(matches!(error, FactoryError::ParameterDecode { .. }));
        assert!(error.severity().is_recoverable());

        let command = factory.create_command_or_default(&descriptor).unwrap();
        assert_eq!(command.kind(), CommandKind::Wait);
        assert!(!command.is_enabled());
        assert!(command.same_configuration(&Command::new(Wait::default()).disabled()));
    }

    #[test]
    fn build_drops_unknown_descriptors() {
        let factory = CommandFactory::default();
        let descriptors = vec![
            encode(ShowMessage::new("A")),
            CommandDescriptor::new("play_movie", Vec::new()),
            encode(Wait::new(2)),
        ];
        let program = factory
            .build_program(&descriptors, ExecutionMode::Auto)
            .unwrap();
        let kinds: Vec<_> = program.iter().map(Command::kind).collect();
        assert_eq!(kinds, vec![CommandKind::ShowMessage, CommandKind::Wait]);
    }

    #[test]
    fn malformed_program_returns_commands_to_pool() {
        let factory = CommandFactory::default();
        let descriptors = vec![
            encode(ConditionalBranch::default()),
            encode(ShowMessage::new("never closed")),
        ];
        let error = factory
            .build_program(&descriptors, ExecutionMode::Auto)
            .unwrap_err();
        assert!(matches!(error, ProgramError::UnterminatedBlock { index: 0, .. }));
        assert_eq!(factory.pool().idle_count(CommandKind::ConditionalBranch), 1);
        assert_eq!(factory.pool().idle_count(CommandKind::ShowMessage), 1);
    }
}
