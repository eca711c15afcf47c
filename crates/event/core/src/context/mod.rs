//! Collaborator interfaces consumed by commands.
//!
//! The interpreter never owns game state. Commands read and write switches and
//! variables through [`GameStateContext`] and ask the presentation layer for
//! messages, transitions, and screen effects through [`EventHost`]. Both are
//! injected as trait objects when an interpreter is constructed.
//!
//! Writes become visible immediately to every session sharing the same
//! context. There is no transactional isolation between sessions.

mod condition;
mod host;
mod memory;
mod recording;

pub use condition::{Comparison, Condition, ConditionMode, ConditionSet};
pub use host::{
    ChoiceHandle, ChoiceRequest, ChoiceResult, EventHost, FadeDirection, MessageHandle,
    MessageRequest, NullHost, ScreenEffect, TransferRequest,
};
pub use memory::InMemoryGameState;
pub use recording::{HostEvent, RecordingHost};

/// Identifier of the map event that owns an interpreter.
///
/// Self switches are scoped by owner, so two events can both have an `"A"`
/// self switch without interfering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct OwnerId(pub u32);

impl OwnerId {
    /// Owner used by interpreters that do not belong to a map event.
    pub const GLOBAL: Self = Self(0);
}

impl core::fmt::Display for OwnerId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "event#{}", self.0)
    }
}

/// Read/write access to switches and variables.
///
/// All methods take `&self`; implementations use interior mutability so the
/// same context can be shared by many sessions at once.
pub trait GameStateContext: Send + Sync {
    /// Returns the value of a game variable. Unset variables read as `0`.
    fn variable(&self, name: &str) -> i32;

    fn set_variable(&self, name: &str, value: i32);

    /// Returns the value of a game switch. Unset switches read as `false`.
    fn switch(&self, name: &str) -> bool;

    fn set_switch(&self, name: &str, value: bool);

    /// Returns a self switch scoped to `owner`.
    fn self_switch(&self, owner: OwnerId, name: &str) -> bool;

    fn set_self_switch(&self, owner: OwnerId, name: &str, value: bool);

    /// Evaluates a condition set for a branch entry.
    ///
    /// The default implementation checks each condition through the getters
    /// above. Hosts with richer predicates (items, party members, timers)
    /// override it.
    fn evaluate_conditions(&self, owner: OwnerId, conditions: &ConditionSet) -> bool {
        conditions.evaluate(|condition| match condition {
            Condition::Switch { name, expected } => self.switch(name) == *expected,
            Condition::Variable {
                name,
                comparison,
                value,
            } => comparison.compare(self.variable(name), *value),
            Condition::SelfSwitch { name, expected } => {
                self.self_switch(owner, name) == *expected
            }
        })
    }
}

/// Everything a command may touch while it runs for one tick.
pub struct ExecutionContext<'a> {
    pub state: &'a dyn GameStateContext,
    pub host: &'a dyn EventHost,
    /// Event owning the running interpreter.
    pub owner: OwnerId,
    /// Tick number within the current session, starting at 1.
    pub tick: u64,
}

impl<'a> ExecutionContext<'a> {
    pub fn new(state: &'a dyn GameStateContext, host: &'a dyn EventHost, owner: OwnerId) -> Self {
        Self {
            state,
            host,
            owner,
            tick: 0,
        }
    }

    #[must_use]
    pub fn at_tick(mut self, tick: u64) -> Self {
        self.tick = tick;
        self
    }
}
