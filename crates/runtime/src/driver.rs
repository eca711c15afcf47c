//! Async tick source for a shared scheduler.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, oneshot};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::error::{Result, RuntimeError};
use crate::scheduler::SessionScheduler;

/// When the driver task ends on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DriverMode {
    /// Tick until [`TickDriverHandle::shutdown`] is called.
    #[default]
    UntilShutdown,
    /// Also stop once the scheduler has no sessions left.
    UntilIdle,
}

/// Periodically ticks a scheduler on a tokio interval.
pub struct TickDriver;

impl TickDriver {
    /// Spawns the driver task. Must be called within a tokio runtime.
    pub fn spawn(
        scheduler: Arc<Mutex<SessionScheduler>>,
        period: Duration,
        mode: DriverMode,
    ) -> TickDriverHandle {
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // A late tick must not be followed by a burst of catch-up ticks.
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut driven = 0u64;

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        tracing::debug!(driven, "tick driver shutdown requested");
                        break;
                    }
                    _ = interval.tick() => {
                        let mut scheduler = scheduler.lock().await;
                        scheduler.tick();
                        driven += 1;
                        if mode == DriverMode::UntilIdle && scheduler.is_idle() {
                            tracing::debug!(driven, "scheduler idle, tick driver exiting");
                            break;
                        }
                    }
                }
            }
            driven
        });

        TickDriverHandle {
            shutdown: Some(shutdown_tx),
            task,
        }
    }
}

/// Handle to a running [`TickDriver`] task.
pub struct TickDriverHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<u64>,
}

impl TickDriverHandle {
    /// Stops the driver and returns the number of ticks it drove.
    pub async fn shutdown(mut self) -> Result<u64> {
        if let Some(shutdown) = self.shutdown.take() {
            // The task may already have exited in `UntilIdle` mode.
            let _ = shutdown.send(());
        }
        self.task.await.map_err(RuntimeError::DriverJoin)
    }

    /// Waits for the driver to exit on its own.
    pub async fn join(self) -> Result<u64> {
        self.task.await.map_err(RuntimeError::DriverJoin)
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
