//! Console player for event scripts.
//!
//! The `event-player` binary is the composition root: it loads
//! configuration, installs logging, turns JSON scripts into descriptors, and
//! runs them as concurrent sessions on an [`event_runtime::SessionScheduler`]
//! against an in-memory game state and a [`ConsoleHost`].

pub mod config;
pub mod console;
pub mod logging;
pub mod script;

pub use config::{LogConfig, PlayerConfig};
pub use console::ConsoleHost;
pub use script::{Script, ScriptEntry};
