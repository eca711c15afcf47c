//! Player configuration: environment defaults, optional TOML file.
use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use event_runtime::RuntimeConfig;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub runtime: RuntimeConfig,
    pub log: LogConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Directory for log files (default: platform cache directory).
    pub directory: Option<PathBuf>,
    /// Mirror logs to stderr in addition to the log file.
    pub stderr: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            directory: None,
            stderr: true,
        }
    }
}

impl PlayerConfig {
    /// Construct configuration from process environment variables.
    ///
    /// See [`RuntimeConfig::from_env`] for the runtime keys. In addition:
    /// - `EVENT_LOG_DIR` - Directory for log files
    /// - `EVENT_LOG_STDERR` - Mirror logs to stderr (default: true)
    pub fn from_env() -> Self {
        let log = LogConfig {
            directory: env::var("EVENT_LOG_DIR").ok().map(PathBuf::from),
            stderr: env::var("EVENT_LOG_STDERR")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(true),
        };

        Self {
            runtime: RuntimeConfig::from_env(),
            log,
        }
    }

    /// Loads a TOML file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("invalid config: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use event_core::ExecutionMode;
    use std::io::Write;

    #[test]
    fn toml_overrides_only_given_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[runtime]
tick_interval_ms = 50
max_sessions = 4

[runtime.interpreter]
execution_mode = "command"

[log]
stderr = false
"#
        )
        .unwrap();

        let config = PlayerConfig::load(file.path()).unwrap();
        assert_eq!(config.runtime.tick_interval_ms, 50);
        assert_eq!(config.runtime.max_sessions, Some(4));
        assert_eq!(
            config.runtime.interpreter.execution_mode,
            ExecutionMode::Command
        );
        assert_eq!(
            config.runtime.event_buffer_size,
            RuntimeConfig::DEFAULT_EVENT_BUFFER_SIZE
        );
        assert!(!config.log.stderr);
        assert_eq!(config.log.directory, None);
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "runtime = 3").unwrap();
        assert!(PlayerConfig::load(file.path()).is_err());
    }
}
