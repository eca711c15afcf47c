use serde::{Deserialize, Serialize};

/// Authored instruction record: a type tag, an opaque parameter blob, and an
/// enabled flag.
///
/// The blob is the `bincode` encoding of the variant's configured fields. It
/// only ever decodes to plain data.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommandDescriptor {
    pub type_tag: String,
    #[serde(default)]
    pub parameters: Vec<u8>,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

const fn enabled_by_default() -> bool {
    true
}

impl CommandDescriptor {
    pub fn new(type_tag: impl Into<String>, parameters: Vec<u8>) -> Self {
        Self {
            type_tag: type_tag.into(),
            parameters,
            enabled: true,
        }
    }

    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}
