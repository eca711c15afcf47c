//! Flow-control resolver.
//!
//! Pure cursor arithmetic applied after a command completes. The scans are
//! depth-aware: nested branches and loops are stepped over as a whole.
//!
//! | Action            | Result                                             |
//! |-------------------|----------------------------------------------------|
//! | `None`            | advance by one                                     |
//! | `SkipFalseBranch` | after the matching `else`, or after the `end_if`   |
//! | `SkipToEndIf`     | after the `end_if` matching this `else`            |
//! | `PushLoopFrame`   | push a frame, advance                              |
//! | `BreakLoop`       | pop the nearest frame, after its `end_loop`        |
//! | `EndLoop`         | back to the first body command while looping       |
//! | `Jump(label)`     | after the label, dropping frames left behind       |
//! | `Halt`            | end the session                                    |

use crate::command::{Command, CommandKind, FlowControl};
use crate::error::{ErrorSeverity, EventError};
use crate::program::Program;

/// Cursor update computed by [`resolve`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    Advance,
    MoveTo(usize),
    Halt,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FlowError {
    #[error("no matching marker for `{opener}` at {from}")]
    UnterminatedScan { from: usize, opener: CommandKind },

    #[error("jump to unknown label `{0}`")]
    UnknownLabel(String),
}

impl EventError for FlowError {
    fn severity(&self) -> ErrorSeverity {
        // Validated programs never produce these.
        ErrorSeverity::Internal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnterminatedScan { .. } => "FLOW_UNTERMINATED_SCAN",
            Self::UnknownLabel(_) => "FLOW_UNKNOWN_LABEL",
        }
    }
}

/// Loop entry recorded on the control stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoopFrame {
    /// Index of the `loop` command.
    pub start_index: usize,
}

/// Stack of active loop frames of one session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ControlStack {
    frames: Vec<LoopFrame>,
}

impl ControlStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, frame: LoopFrame) {
        self.frames.push(frame);
    }

    pub fn pop(&mut self) -> Option<LoopFrame> {
        self.frames.pop()
    }

    pub fn top(&self) -> Option<LoopFrame> {
        self.frames.last().copied()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    /// Frames from outermost to innermost.
    pub fn frames(&self) -> &[LoopFrame] {
        &self.frames
    }
}

fn kind_at(commands: &[Command], index: usize) -> CommandKind {
    commands[index].kind()
}

/// Target after a false branch condition at `cursor`.
///
/// Enters the false body (`else + 1`) when the branch has an `else` at its
/// own depth, otherwise lands right after the matching `end_if`.
pub fn skip_false_branch(commands: &[Command], cursor: usize) -> Result<usize, FlowError> {
    let mut depth = 1usize;
    for index in cursor + 1..commands.len() {
        match kind_at(commands, index) {
            CommandKind::ConditionalBranch => depth += 1,
            CommandKind::Else if depth == 1 => return Ok(index + 1),
            CommandKind::EndIf => {
                depth -= 1;
                if depth == 0 {
                    return Ok(index + 1);
                }
            }
            _ => {}
        }
    }
    Err(FlowError::UnterminatedScan {
        from: cursor,
        opener: CommandKind::ConditionalBranch,
    })
}

/// Target after the true body of a branch ended at the `else` at `else_index`.
pub fn skip_else_body(commands: &[Command], else_index: usize) -> Result<usize, FlowError> {
    let mut depth = 1usize;
    for index in else_index + 1..commands.len() {
        match kind_at(commands, index) {
            CommandKind::ConditionalBranch => depth += 1,
            CommandKind::EndIf => {
                depth -= 1;
                if depth == 0 {
                    return Ok(index + 1);
                }
            }
            _ => {}
        }
    }
    Err(FlowError::UnterminatedScan {
        from: else_index,
        opener: CommandKind::Else,
    })
}

/// Index just past the `end_loop` closing the loop that encloses `cursor`.
///
/// `cursor` is either the `loop` command itself or any command in its body.
pub fn find_loop_exit(commands: &[Command], cursor: usize) -> Result<usize, FlowError> {
    let mut depth = 1usize;
    for index in cursor + 1..commands.len() {
        match kind_at(commands, index) {
            CommandKind::Loop => depth += 1,
            CommandKind::EndLoop => {
                depth -= 1;
                if depth == 0 {
                    return Ok(index + 1);
                }
            }
            _ => {}
        }
    }
    Err(FlowError::UnterminatedScan {
        from: cursor,
        opener: CommandKind::Loop,
    })
}

/// Index of the `loop` command opening the body closed at `end_index`.
pub fn find_loop_start(commands: &[Command], end_index: usize) -> Option<usize> {
    let mut depth = 1usize;
    for index in (0..end_index).rev() {
        match kind_at(commands, index) {
            CommandKind::EndLoop => depth += 1,
            CommandKind::Loop => {
                depth -= 1;
                if depth == 0 {
                    return Some(index);
                }
            }
            _ => {}
        }
    }
    None
}

/// Pops frames of loops that `position` is no longer inside of.
///
/// A loop whose `end_loop` is disabled finishes without popping its frame;
/// such frames are dropped here before the stack is consulted.
fn discard_frames_outside(
    commands: &[Command],
    position: usize,
    stack: &mut ControlStack,
) -> Result<(), FlowError> {
    while let Some(frame) = stack.top() {
        let exit = find_loop_exit(commands, frame.start_index)?;
        if frame.start_index < position && position < exit {
            break;
        }
        stack.pop();
    }
    Ok(())
}

/// Applies `action` emitted by the command at `cursor`.
pub fn resolve(
    action: &FlowControl,
    program: &Program,
    cursor: usize,
    stack: &mut ControlStack,
) -> Result<Resolution, FlowError> {
    let commands = program.commands();
    match action {
        FlowControl::None => Ok(Resolution::Advance),
        FlowControl::SkipFalseBranch => skip_false_branch(commands, cursor).map(Resolution::MoveTo),
        FlowControl::SkipToEndIf => skip_else_body(commands, cursor).map(Resolution::MoveTo),
        FlowControl::PushLoopFrame => {
            stack.push(LoopFrame {
                start_index: cursor,
            });
            Ok(Resolution::Advance)
        }
        FlowControl::BreakLoop => {
            // The nearest enclosing frame is the innermost loop that is
            // actually running; a break inside a disabled loop falls back to
            // the syntactic one.
            discard_frames_outside(commands, cursor, stack)?;
            let from = stack.pop().map_or(cursor, |frame| frame.start_index);
            find_loop_exit(commands, from).map(Resolution::MoveTo)
        }
        FlowControl::EndLoop => {
            let start = find_loop_start(commands, cursor);
            discard_frames_outside(commands, cursor, stack)?;
            match stack.top() {
                Some(frame) if Some(frame.start_index) == start => {
                    Ok(Resolution::MoveTo(frame.start_index + 1))
                }
                _ => Ok(Resolution::Advance),
            }
        }
        FlowControl::Jump(label) => {
            let target = program
                .label_index(label)
                .ok_or_else(|| FlowError::UnknownLabel(label.clone()))?;
            discard_frames_outside(commands, target, stack)?;
            Ok(Resolution::MoveTo(target + 1))
        }
        FlowControl::Halt => Ok(Resolution::Halt),
    }
}
