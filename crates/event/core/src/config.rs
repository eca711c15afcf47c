use serde::{Deserialize, Serialize};

use crate::registry::ExecutionMode;

/// Interpreter tuning shared by every session of a host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpreterConfig {
    /// Filter applied to descriptors before a program is built.
    pub execution_mode: ExecutionMode,
    /// Idle instances kept per command kind in the shared pool.
    ///
    /// Read when the pool is created
    /// ([`InterpreterServices::with_config`](crate::InterpreterServices::with_config));
    /// an interpreter handed an existing factory keeps that factory's pool.
    pub pool_capacity_per_kind: usize,
    /// Completes a session as faulted after this many ticks.
    ///
    /// `None` lets loops run forever, which is what most map events want.
    pub max_ticks_per_session: Option<u64>,
}

impl InterpreterConfig {
    pub const DEFAULT_POOL_CAPACITY: usize = 16;

    pub fn new() -> Self {
        Self {
            execution_mode: ExecutionMode::Auto,
            pool_capacity_per_kind: Self::DEFAULT_POOL_CAPACITY,
            max_ticks_per_session: None,
        }
    }

    #[must_use]
    pub fn with_execution_mode(mut self, mode: ExecutionMode) -> Self {
        self.execution_mode = mode;
        self
    }

    #[must_use]
    pub fn with_max_ticks(mut self, max_ticks: u64) -> Self {
        self.max_ticks_per_session = Some(max_ticks);
        self
    }
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self::new()
    }
}
