//! Control Variables command.

use serde::{Deserialize, Serialize};

use crate::command::{CommandError, CommandKind, CommandResult, EventCommand, Progress};
use crate::context::ExecutionContext;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VariableOperation {
    #[default]
    Set,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

/// Right-hand side of a variable operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operand {
    Constant(i32),
    Variable(String),
}

impl Default for Operand {
    fn default() -> Self {
        Self::Constant(0)
    }
}

/// Updates one game variable.
///
/// Arithmetic saturates at the `i32` bounds. Division or modulo by zero is a
/// command error and leaves the variable untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlVariables {
    pub variable: String,
    pub operation: VariableOperation,
    pub operand: Operand,
}

impl ControlVariables {
    pub fn new(variable: impl Into<String>, operation: VariableOperation, operand: Operand) -> Self {
        Self {
            variable: variable.into(),
            operation,
            operand,
        }
    }

    pub fn set(variable: impl Into<String>, value: i32) -> Self {
        Self::new(variable, VariableOperation::Set, Operand::Constant(value))
    }

    pub fn add(variable: impl Into<String>, value: i32) -> Self {
        Self::new(variable, VariableOperation::Add, Operand::Constant(value))
    }

    fn compute(&self, current: i32, operand: i32) -> CommandResult<i32> {
        let divides = matches!(self.operation, VariableOperation::Div | VariableOperation::Mod);
        if divides && operand == 0 {
            return Err(CommandError::DivisionByZero {
                variable: self.variable.clone(),
            });
        }
        Ok(match self.operation {
            VariableOperation::Set => operand,
            VariableOperation::Add => current.saturating_add(operand),
            VariableOperation::Sub => current.saturating_sub(operand),
            VariableOperation::Mul => current.saturating_mul(operand),
            VariableOperation::Div => current.saturating_div(operand),
            VariableOperation::Mod => current.wrapping_rem(operand),
        })
    }
}

impl EventCommand for ControlVariables {
    fn kind(&self) -> CommandKind {
        CommandKind::ControlVariables
    }

    fn execute(&mut self, ctx: &ExecutionContext<'_>) -> CommandResult<Progress> {
        let operand = match &self.operand {
            Operand::Constant(value) => *value,
            Operand::Variable(name) => ctx.state.variable(name),
        };
        let current = ctx.state.variable(&self.variable);
        let value = self.compute(current, operand)?;
        ctx.state.set_variable(&self.variable, value);
        Ok(Progress::Completed)
    }
}
