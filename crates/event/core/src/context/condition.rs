//! Plain-data condition sets consulted by conditional branches.

use serde::{Deserialize, Serialize};

/// Comparison operator for variable conditions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparison {
    #[default]
    Equal,
    NotEqual,
    Greater,
    GreaterOrEqual,
    Less,
    LessOrEqual,
}

impl Comparison {
    pub const fn compare(self, lhs: i32, rhs: i32) -> bool {
        match self {
            Self::Equal => lhs == rhs,
            Self::NotEqual => lhs != rhs,
            Self::Greater => lhs > rhs,
            Self::GreaterOrEqual => lhs >= rhs,
            Self::Less => lhs < rhs,
            Self::LessOrEqual => lhs <= rhs,
        }
    }
}

/// One predicate against game state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    Switch {
        name: String,
        expected: bool,
    },
    Variable {
        name: String,
        comparison: Comparison,
        value: i32,
    },
    SelfSwitch {
        name: String,
        expected: bool,
    },
}

impl Condition {
    pub fn switch_on(name: impl Into<String>) -> Self {
        Self::Switch {
            name: name.into(),
            expected: true,
        }
    }

    pub fn switch_off(name: impl Into<String>) -> Self {
        Self::Switch {
            name: name.into(),
            expected: false,
        }
    }

    pub fn variable(name: impl Into<String>, comparison: Comparison, value: i32) -> Self {
        Self::Variable {
            name: name.into(),
            comparison,
            value,
        }
    }

    pub fn self_switch(name: impl Into<String>, expected: bool) -> Self {
        Self::SelfSwitch {
            name: name.into(),
            expected,
        }
    }
}

/// How the conditions of a set combine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionMode {
    /// Every condition must hold. An empty set holds.
    #[default]
    All,
    /// At least one condition must hold. An empty set does not hold.
    Any,
}

/// Conditions evaluated once per branch entry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionSet {
    pub conditions: Vec<Condition>,
    pub mode: ConditionMode,
}

impl ConditionSet {
    pub fn all(conditions: Vec<Condition>) -> Self {
        Self {
            conditions,
            mode: ConditionMode::All,
        }
    }

    pub fn any(conditions: Vec<Condition>) -> Self {
        Self {
            conditions,
            mode: ConditionMode::Any,
        }
    }

    /// Single-condition shorthand.
    pub fn single(condition: Condition) -> Self {
        Self::all(vec![condition])
    }

    /// Combines per-condition results according to [`ConditionMode`].
    pub fn evaluate(&self, mut check: impl FnMut(&Condition) -> bool) -> bool {
        match self.mode {
            ConditionMode::All => self.conditions.iter().all(&mut check),
            ConditionMode::Any => self.conditions.iter().any(&mut check),
        }
    }
}
