//! Runtime configuration and environment loader.
use std::env;
use std::time::Duration;

use event_core::{ExecutionMode, InterpreterConfig};
use serde::{Deserialize, Serialize};

/// Configuration shared by the scheduler, its sessions, and the tick driver.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub interpreter: InterpreterConfig,
    /// Period of the async tick driver.
    pub tick_interval_ms: u64,
    /// Capacity of the session event broadcast channel.
    pub event_buffer_size: usize,
    /// Upper bound on concurrently active sessions.
    pub max_sessions: Option<usize>,
}

impl RuntimeConfig {
    pub const DEFAULT_TICK_INTERVAL_MS: u64 = 16;
    pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `EVENT_TICK_MS` - Tick driver period in milliseconds (default: 16)
    /// - `EVENT_EXECUTION_MODE` - `command`, `timeline`, `hybrid`, or `auto` (default: auto)
    /// - `EVENT_POOL_CAPACITY` - Pooled instances per command kind (default: 16)
    /// - `EVENT_MAX_SESSIONS` - Concurrent session limit (default: unlimited)
    /// - `EVENT_MAX_TICKS` - Ticks before a session is faulted (default: unlimited)
    /// - `EVENT_BUFFER` - Session event channel capacity (default: 100)
    ///
    /// Unparsable values are ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(ms) = read_env::<u64>("EVENT_TICK_MS") {
            config.tick_interval_ms = ms.max(1);
        }
        if let Some(mode) = read_env::<ExecutionMode>("EVENT_EXECUTION_MODE") {
            config.interpreter.execution_mode = mode;
        }
        if let Some(capacity) = read_env::<usize>("EVENT_POOL_CAPACITY") {
            config.interpreter.pool_capacity_per_kind = capacity;
        }
        if let Some(capacity) = read_env::<usize>("EVENT_BUFFER") {
            config.event_buffer_size = capacity.max(1);
        }
        config.max_sessions = read_env::<usize>("EVENT_MAX_SESSIONS");
        config.interpreter.max_ticks_per_session = read_env::<u64>("EVENT_MAX_TICKS");

        config
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            interpreter: InterpreterConfig::default(),
            tick_interval_ms: Self::DEFAULT_TICK_INTERVAL_MS,
            event_buffer_size: Self::DEFAULT_EVENT_BUFFER_SIZE,
            max_sessions: None,
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
