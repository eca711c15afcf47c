//! Free list of command instances keyed by kind.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, PoisonError};

use crate::command::{Command, CommandKind, CommandVariant};

/// Snapshot of pool usage.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Idle instances per kind.
    pub idle: BTreeMap<CommandKind, usize>,
    pub acquired: u64,
    /// Acquisitions served from the free list.
    pub reused: u64,
    /// Releases dropped because the free list was full.
    pub discarded: u64,
}

#[derive(Debug, Default)]
struct PoolInner {
    free: HashMap<CommandKind, Vec<Command>>,
    acquired: u64,
    reused: u64,
    discarded: u64,
}

/// Command pool shared across sessions.
///
/// Released commands are recycled (state `Idle`, default parameters, no
/// runtime fields) before they are stored, so an acquired instance never
/// carries anything from its previous use. [`release`](Self::release) takes
/// the command by value: an instance still owned by a running program cannot
/// be handed back.
#[derive(Debug)]
pub struct CommandPool {
    capacity_per_kind: usize,
    inner: Mutex<PoolInner>,
}

impl CommandPool {
    pub fn new(capacity_per_kind: usize) -> Self {
        Self {
            capacity_per_kind,
            inner: Mutex::new(PoolInner::default()),
        }
    }

    pub fn capacity_per_kind(&self) -> usize {
        self.capacity_per_kind
    }

    /// Returns an `Idle` instance of `kind` with default parameters.
    pub fn acquire(&self, kind: CommandKind) -> Command {
        let mut inner = self.lock();
        inner.acquired += 1;
        if let Some(command) = inner.free.get_mut(&kind).and_then(Vec::pop) {
            inner.reused += 1;
            return command;
        }
        drop(inner);
        Command::new(CommandVariant::default_for(kind))
    }

    pub fn release(&self, mut command: Command) {
        command.recycle();
        let mut inner = self.lock();
        let free = inner.free.entry(command.kind()).or_default();
        if free.len() < self.capacity_per_kind {
            free.push(command);
        } else {
            inner.discarded += 1;
        }
    }

    pub fn release_all(&self, commands: impl IntoIterator<Item = Command>) {
        for command in commands {
            self.release(command);
        }
    }

    pub fn idle_count(&self, kind: CommandKind) -> usize {
        self.lock().free.get(&kind).map_or(0, Vec::len)
    }

    pub fn stats(&self) -> PoolStats {
        let inner = self.lock();
        PoolStats {
            idle: inner
                .free
                .iter()
                .filter(|(_, free)| !free.is_empty())
                .map(|(kind, free)| (*kind, free.len()))
                .collect(),
            acquired: inner.acquired,
            reused: inner.reused,
            discarded: inner.discarded,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, PoolInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for CommandPool {
    fn default() -> Self {
        Self::new(crate::config::InterpreterConfig::DEFAULT_POOL_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::ExecutionState;
    use crate::command::kinds::{ShowMessage, Wait};
    use crate::context::{ExecutionContext, InMemoryGameState, RecordingHost};

    #[test]
    fn reused_instance_carries_no_previous_state() {
        let pool = CommandPool::new(4);
        let state = InMemoryGameState::new();
        let host = RecordingHost::new();
        let ctx = ExecutionContext::new(&state, &host, Default::default());

        let mut command = pool.acquire(CommandKind::ShowMessage);
        command.configure(ShowMessage::new("secret").into(), false, "Intro");
        command.execute(&ctx).unwrap();
        assert_eq!(command.state(), ExecutionState::Executing);
        pool.release(command);

        let reused = pool.acquire(CommandKind::ShowMessage);
        assert_eq!(reused.state(), ExecutionState::Idle);
        assert!(reused.is_enabled());
        assert_eq!(reused.name(), "Show Message");
        assert_eq!(
            reused.variant(),
            &CommandVariant::default_for(CommandKind::ShowMessage)
        );
        assert_eq!(pool.stats().reused, 1);
    }

    #[test]
    fn excess_releases_are_discarded() {
        let pool = CommandPool::new(1);
        pool.release(Command::new(Wait::new(3)));
        pool.release(Command::new(Wait::new(5)));

        let stats = pool.stats();
        assert_eq!(stats.idle.get(&CommandKind::Wait), Some(&1));
        assert_eq!(stats.discarded, 1);
    }

    #[test]
    fn empty_pool_constructs_fresh_instances() {
        let pool = CommandPool::new(2);
        let command = pool.acquire(CommandKind::Label);
        assert_eq!(command.kind(), CommandKind::Label);
        let stats = pool.stats();
        assert_eq!((stats.acquired, stats.reused), (1, 0));
    }
}
