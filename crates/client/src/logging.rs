//! Tracing setup for the player binary.
use std::path::PathBuf;

use anyhow::Result;
use tracing_subscriber::prelude::*;

use crate::config::LogConfig;

/// Installs the global subscriber and returns the log file path.
///
/// Logs always go to `<dir>/<session>/player.log`; stderr output is optional.
pub fn setup_logging(config: &LogConfig, session: &str) -> Result<PathBuf> {
    let log_dir = config.directory.clone().unwrap_or_else(default_log_directory);
    let session_dir = log_dir.join(session);
    std::fs::create_dir_all(&session_dir)?;

    let file_appender = tracing_appender::rolling::never(&session_dir, "player.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    let stderr_layer = config.stderr.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();

    // Keep the file writer alive for the rest of the process.
    std::mem::forget(guard);

    let log_file = session_dir.join("player.log");
    tracing::info!(session, log_file = %log_file.display(), "logging initialized");
    Ok(log_file)
}

/// Platform cache directory, e.g. `~/.cache/event-player/logs` on Linux.
pub fn default_log_directory() -> PathBuf {
    directories::ProjectDirs::from("", "", "event-player")
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| std::env::temp_dir().join("event-player"))
        .join("logs")
}

/// Session label derived from the current time.
pub fn session_label() -> String {
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default();
    format!("session_{secs}")
}
