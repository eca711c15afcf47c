//! JSON event scripts.
//!
//! A script lists typed commands the way an authoring tool would export
//! them:
//!
//! ```json
//! {
//!   "owner": 3,
//!   "commands": [
//!     { "type": "show_message", "params": { "speaker": "Guard", "text": "Halt!", "wait_for_input": true } },
//!     { "type": "wait", "params": { "ticks": 10 } },
//!     { "type": "end_if" }
//!   ]
//! }
//! ```
//!
//! Entries without `params` use the default parameters of their kind.
//! Scripts are turned into [`CommandDescriptor`]s, so they run through the
//! same factory path as any authored content.

use std::path::Path;

use anyhow::{Context, Result};
use event_core::{Command, CommandDescriptor, CommandFactory, CommandVariant, OwnerId};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub name: Option<String>,
    /// Event that owns the session; `None` lets the player pick one.
    #[serde(default)]
    pub owner: Option<u32>,
    pub commands: Vec<ScriptEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScriptEntry {
    #[serde(rename = "type")]
    pub type_tag: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default)]
    pub params: Option<serde_json::Value>,
}

const fn enabled_by_default() -> bool {
    true
}

impl Script {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("failed to parse event script")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read script: {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("invalid script: {}", path.display()))
    }

    pub fn owner_or(&self, fallback: OwnerId) -> OwnerId {
        self.owner.map_or(fallback, OwnerId)
    }

    /// Encodes every entry into a descriptor.
    ///
    /// Unknown types are passed through untouched; the factory drops them
    /// with a diagnostic when the program is built.
    pub fn to_descriptors(&self, factory: &CommandFactory) -> Result<Vec<CommandDescriptor>> {
        self.commands
            .iter()
            .enumerate()
            .map(|(index, entry)| -> Result<CommandDescriptor> {
                let Some(kind) = factory.registry().lookup(&entry.type_tag) else {
                    tracing::warn!(index, tag = %entry.type_tag, "script uses an unknown command type");
                    let descriptor = CommandDescriptor::new(entry.type_tag.clone(), Vec::new());
                    return Ok(if entry.enabled {
                        descriptor
                    } else {
                        descriptor.disabled()
                    });
                };

                let variant = match entry.params.clone() {
                    None => CommandVariant::default_for(kind),
                    Some(params) => CommandVariant::from_params(kind, params).with_context(|| {
                        format!("invalid params for `{}` at entry {index}", entry.type_tag)
                    })?,
                };
                let mut command = Command::new(variant);
                if !entry.enabled {
                    command = command.disabled();
                }
                Ok(factory.create_command_data(&command)?)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use event_core::{CommandKind, ExecutionMode};

    const SCRIPT: &str = r#"{
        "name": "gatekeeper",
        "owner": 12,
        "commands": [
            { "type": "control_variables", "params": { "variable": "gold", "operation": "Add", "operand": { "Constant": 5 } } },
            { "type": "conditional_branch", "params": { "conditions": { "conditions": [ { "Variable": { "name": "gold", "comparison": "GreaterOrEqual", "value": 5 } } ], "mode": "All" } } },
            { "type": "show_message", "params": { "speaker": "Guard", "text": "Welcome.", "wait_for_input": false } },
            { "type": "end_if" },
            { "type": "play_movie" },
            { "type": "wait", "enabled": false, "params": { "ticks": 3 } }
        ]
    }"#;

    #[test]
    fn script_builds_into_a_program() {
        let factory = CommandFactory::default();
        let script = Script::from_json(SCRIPT).unwrap();
        assert_eq!(script.owner_or(OwnerId::GLOBAL), OwnerId(12));

        let descriptors = script.to_descriptors(&factory).unwrap();
        assert_eq!(descriptors.len(), 6);
        assert!(!descriptors[5].enabled);

        let program = factory
            .build_program(&descriptors, ExecutionMode::Auto)
            .unwrap();
        let kinds: Vec<_> = program.iter().map(Command::kind).collect();
        assert_eq!(
            kinds,
            vec![
                CommandKind::ControlVariables,
                CommandKind::ConditionalBranch,
                CommandKind::ShowMessage,
                CommandKind::EndIf,
                CommandKind::Wait,
            ]
        );
    }

    #[test]
    fn bad_params_are_reported_with_their_entry() {
        let factory = CommandFactory::default();
        let script = Script::from_json(
            r#"{ "commands": [ { "type": "wait", "params": { "ticks": "soon" } } ] }"#,
        )
        .unwrap();
        let error = script.to_descriptors(&factory).unwrap_err();
        assert!(format!("{error:#}").contains("entry 0"), "{error:#}");
    }
}
