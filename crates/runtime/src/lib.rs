//! Runtime orchestration for event interpreter sessions.
//!
//! [`SessionScheduler`] owns many interpreters that share one game state,
//! one host, and one command pool, and advances them from a single tick
//! source. [`TickDriver`] supplies that source on a tokio interval.
//!
//! Modules are organized by responsibility:
//! - [`scheduler`] hosts the session table and tick loop
//! - [`driver`] runs the scheduler on a timer
//! - [`events`] describes the lifecycle events broadcast to subscribers
//! - [`config`] loads runtime settings from the environment
pub mod config;
pub mod driver;
pub mod error;
pub mod events;
pub mod scheduler;

pub use config::RuntimeConfig;
pub use driver::{DriverMode, TickDriver, TickDriverHandle};
pub use error::{Result, RuntimeError};
pub use events::{SessionCompleted, SessionEvent};
pub use scheduler::{SessionId, SessionScheduler};
