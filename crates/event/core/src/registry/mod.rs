//! Command registry, execution-mode filter, and factory.
//!
//! The registry maps descriptor type tags to [`CommandKind`]s. Every built-in
//! tag is registered by [`CommandRegistry::builtin`]; hosts may add aliases
//! for tags produced by older authoring tools.

mod descriptor;
mod factory;

pub use descriptor::CommandDescriptor;
pub use factory::{CommandFactory, FactoryError};

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::command::{CommandCategory, CommandKind};

/// Which commands a program admits before it is built.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ExecutionMode {
    /// Map events: cutscene-only commands are excluded.
    Command,
    /// Cutscene timelines: only cutscene-only commands are kept.
    Timeline,
    Hybrid,
    #[default]
    Auto,
}

impl ExecutionMode {
    pub const fn admits(self, cutscene_only: bool) -> bool {
        match self {
            Self::Command => !cutscene_only,
            Self::Timeline => cutscene_only,
            Self::Hybrid | Self::Auto => true,
        }
    }
}

/// Tag → kind lookup table.
#[derive(Clone, Debug)]
pub struct CommandRegistry {
    entries: HashMap<String, CommandKind>,
}

impl CommandRegistry {
    /// Registry with every built-in tag.
    pub fn builtin() -> Self {
        let entries = CommandKind::iter()
            .map(|kind| (kind.type_tag().to_owned(), kind))
            .collect();
        Self { entries }
    }

    /// Registers `tag` as another name for `kind`.
    ///
    /// Returns the kind previously registered under `tag`, if any.
    pub fn register(&mut self, tag: impl Into<String>, kind: CommandKind) -> Option<CommandKind> {
        let tag = tag.into();
        tracing::debug!(%tag, %kind, "registered command tag");
        self.entries.insert(tag, kind)
    }

    pub fn lookup(&self, tag: &str) -> Option<CommandKind> {
        self.entries.get(tag).copied()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.entries.contains_key(tag)
    }

    pub fn category(&self, tag: &str) -> Option<CommandCategory> {
        self.lookup(tag).map(CommandKind::category)
    }

    pub fn display_name(&self, tag: &str) -> Option<&'static str> {
        self.lookup(tag).map(CommandKind::display_name)
    }

    /// Unknown tags are not cutscene-only.
    pub fn is_cutscene_only(&self, tag: &str) -> bool {
        self.lookup(tag).is_some_and(CommandKind::is_cutscene_only)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered tags in sorted order.
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<_> = self.entries.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Keeps the descriptors admitted by `mode`, in order.
///
/// Unknown tags survive every mode except `Timeline`; the factory drops them
/// with a diagnostic when the program is built.
pub fn filter_commands_by_mode(
    registry: &CommandRegistry,
    descriptors: &[CommandDescriptor],
    mode: ExecutionMode,
) -> Vec<CommandDescriptor> {
    descriptors
        .iter()
        .filter(|descriptor| mode.admits(registry.is_cutscene_only(&descriptor.type_tag)))
        .cloned()
        .collect()
}
