//! Built, validated command sequences.

use std::collections::HashMap;

use crate::command::{Command, CommandKind, CommandVariant};
use crate::error::{ErrorSeverity, EventError};
use crate::registry::{CommandDescriptor, CommandFactory, ExecutionMode};

/// Structural defects found when a program is validated.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ProgramError {
    #[error("`{marker}` at {index} has no matching opener")]
    UnmatchedMarker { index: usize, marker: CommandKind },

    #[error("second `else` at {index} for the branch opened at {branch}")]
    DuplicateElse { index: usize, branch: usize },

    #[error("`break_loop` at {index} is not inside a loop")]
    BreakOutsideLoop { index: usize },

    #[error("`{opener}` at {index} is never closed")]
    UnterminatedBlock { index: usize, opener: CommandKind },

    #[error("jump at {index} targets unknown label `{label}`")]
    UnknownLabel { index: usize, label: String },

    #[error("label `{label}` at {index} already defined at {first}")]
    DuplicateLabel {
        index: usize,
        label: String,
        first: usize,
    },
}

impl EventError for ProgramError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnmatchedMarker { .. } => "PROGRAM_UNMATCHED_MARKER",
            Self::DuplicateElse { .. } => "PROGRAM_DUPLICATE_ELSE",
            Self::BreakOutsideLoop { .. } => "PROGRAM_BREAK_OUTSIDE_LOOP",
            Self::UnterminatedBlock { .. } => "PROGRAM_UNTERMINATED_BLOCK",
            Self::UnknownLabel { .. } => "PROGRAM_UNKNOWN_LABEL",
            Self::DuplicateLabel { .. } => "PROGRAM_DUPLICATE_LABEL",
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Block {
    Branch { index: usize, else_at: Option<usize> },
    Loop { index: usize },
}

impl Block {
    fn opened_at(self) -> (usize, CommandKind) {
        match self {
            Self::Branch { index, .. } => (index, CommandKind::ConditionalBranch),
            Self::Loop { index } => (index, CommandKind::Loop),
        }
    }
}

/// Ordered commands of one run plus the label index.
///
/// A `Program` is only constructed from a sequence that passed
/// [`Program::validate`]: every branch and loop is closed, blocks nest
/// properly, and every jump has a target.
#[derive(Debug)]
pub struct Program {
    commands: Vec<Command>,
    labels: HashMap<String, usize>,
}

impl Program {
    /// Creates, filters, and validates commands through `factory`.
    pub fn build(
        factory: &CommandFactory,
        descriptors: &[CommandDescriptor],
        mode: ExecutionMode,
    ) -> Result<Self, ProgramError> {
        factory.build_program(descriptors, mode)
    }

    /// Validates already-created commands.
    pub fn from_commands(commands: Vec<Command>) -> Result<Self, ProgramError> {
        let labels = Self::validate(&commands)?;
        Ok(Self::from_parts(commands, labels))
    }

    pub(crate) fn from_parts(commands: Vec<Command>, labels: HashMap<String, usize>) -> Self {
        Self { commands, labels }
    }

    /// Scans the sequence once for balanced markers and resolvable jumps.
    ///
    /// Returns the label index on success.
    pub fn validate(commands: &[Command]) -> Result<HashMap<String, usize>, ProgramError> {
        let mut blocks: Vec<Block> = Vec::new();
        let mut labels: HashMap<String, usize> = HashMap::new();
        let mut jumps: Vec<(usize, &str)> = Vec::new();

        for (index, command) in commands.iter().enumerate() {
            let unmatched = ProgramError::UnmatchedMarker {
                index,
                marker: command.kind(),
            };
            match command.variant() {
                CommandVariant::ConditionalBranch(_) => blocks.push(Block::Branch {
                    index,
                    else_at: None,
                }),
                CommandVariant::Else(_) => match blocks.last_mut() {
                    Some(Block::Branch { else_at: Some(_), index: branch }) => {
                        return Err(ProgramError::DuplicateElse {
                            index,
                            branch: *branch,
                        });
                    }
                    Some(Block::Branch { else_at, .. }) => *else_at = Some(index),
                    _ => return Err(unmatched),
                },
                CommandVariant::EndIf(_) => match blocks.pop() {
                    Some(Block::Branch { .. }) => {}
                    _ => return Err(unmatched),
                },
                CommandVariant::Loop(_) => blocks.push(Block::Loop { index }),
                CommandVariant::EndLoop(_) => match blocks.pop() {
                    Some(Block::Loop { .. }) => {}
                    _ => return Err(unmatched),
                },
                CommandVariant::BreakLoop(_) => {
                    if !blocks.iter().any(|block| matches!(block, Block::Loop { .. })) {
                        return Err(ProgramError::BreakOutsideLoop { index });
                    }
                }
                CommandVariant::Label(label) => {
                    if let Some(&first) = labels.get(&label.name) {
                        return Err(ProgramError::DuplicateLabel {
                            index,
                            label: label.name.clone(),
                            first,
                        });
                    }
                    labels.insert(label.name.clone(), index);
                }
                CommandVariant::JumpToLabel(jump) => jumps.push((index, jump.label.as_str())),
                _ => {}
            }
        }

        if let Some(block) = blocks.pop() {
            let (index, opener) = block.opened_at();
            return Err(ProgramError::UnterminatedBlock { index, opener });
        }

        if let Some((index, label)) = jumps
            .into_iter()
            .find(|(_, label)| !labels.contains_key(*label))
        {
            return Err(ProgramError::UnknownLabel {
                index,
                label: label.to_owned(),
            });
        }

        Ok(labels)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Command> {
        self.commands.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Command> {
        self.commands.get_mut(index)
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Index of the `label` command named `name`.
    pub fn label_index(&self, name: &str) -> Option<usize> {
        self.labels.get(name).copied()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Command> {
        self.commands.iter()
    }

    /// Hands the instances back, e.g. for releasing them to a pool.
    pub fn into_commands(self) -> Vec<Command> {
        self.commands
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a Command;
    type IntoIter = std::slice::Iter<'a, Command>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::kinds::{
        BreakLoop, Comment, ConditionalBranch, Else, EndIf, EndLoop, JumpToLabel, Label, Loop,
    };

    fn program(commands: Vec<Command>) -> Result<Program, ProgramError> {
        Program::from_commands(commands)
    }

    #[test]
    fn nested_blocks_validate() {
        let result = program(vec![
            Command::new(Loop),
            Command::new(ConditionalBranch::default()),
            Command::new(BreakLoop),
            Command::new(Else),
            Command::new(Label::new("inner")),
            Command::new(EndIf),
            Command::new(EndLoop),
            Command::new(JumpToLabel::new("inner")),
        ]);
        let program = result.unwrap();
        assert_eq!(program.len(), 8);
        assert_eq!(program.label_index("inner"), Some(4));
    }

    #[test]
    fn stray_markers_are_rejected() {
        assert_eq!(
            program(vec![Command::new(Else)]).unwrap_err(),
            ProgramError::UnmatchedMarker {
                index: 0,
                marker: CommandKind::Else
            }
        );
        assert_eq!(
            program(vec![Command::new(Comment::default()), Command::new(EndLoop)]).unwrap_err(),
            ProgramError::UnmatchedMarker {
                index: 1,
                marker: CommandKind::EndLoop
            }
        );
    }

    #[test]
    fn interleaved_blocks_are_rejected() {
        let error = program(vec![
            Command::new(Loop),
            Command::new(ConditionalBranch::default()),
            Command::new(EndLoop),
            Command::new(EndIf),
        ])
        .unwrap_err();
        assert_eq!(
            error,
            ProgramError::UnmatchedMarker {
                index: 2,
                marker: CommandKind::EndLoop
            }
        );
    }

    #[test]
    fn second_else_is_rejected() {
        let error = program(vec![
            Command::new(ConditionalBranch::default()),
            Command::new(Else),
            Command::new(Else),
            Command::new(EndIf),
        ])
        .unwrap_err();
        assert_eq!(error, ProgramError::DuplicateElse { index: 2, branch: 0 });
    }

    #[test]
    fn break_needs_an_enclosing_loop() {
        let error = program(vec![
            Command::new(ConditionalBranch::default()),
            Command::new(BreakLoop),
            Command::new(EndIf),
        ])
        .unwrap_err();
        assert_eq!(error, ProgramError::BreakOutsideLoop { index: 1 });
    }

    #[test]
    fn unterminated_block_reports_innermost_opener() {
        let error = program(vec![
            Command::new(Loop),
            Command::new(ConditionalBranch::default()),
        ])
        .unwrap_err();
        assert_eq!(
            error,
            ProgramError::UnterminatedBlock {
                index: 1,
                opener: CommandKind::ConditionalBranch
            }
        );
    }

    #[test]
    fn labels_must_be_unique_and_resolvable() {
        let error = program(vec![Command::new(JumpToLabel::new("missing"))]).unwrap_err();
        assert_eq!(
            error,
            ProgramError::UnknownLabel {
                index: 0,
                label: "missing".into()
            }
        );

        let error = program(vec![
            Command::new(Label::new("a")),
            Command::new(Label::new("a")),
        ])
        .unwrap_err();
        assert_eq!(
            error,
            ProgramError::DuplicateLabel {
                index: 1,
                label: "a".into(),
                first: 0
            }
        );
    }
}
