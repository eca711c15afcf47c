use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use event_client::{ConsoleHost, PlayerConfig, Script, logging};
use event_core::{CompletionReason, ExecutionMode, GameStateContext, InMemoryGameState, OwnerId};
use event_runtime::{DriverMode, SessionEvent, SessionScheduler, TickDriver};
use tokio::sync::{Mutex, broadcast};

/// Runs JSON event scripts as concurrent interpreter sessions.
#[derive(Parser, Debug)]
#[command(name = "event-player", version, about)]
struct Cli {
    /// Script files; each one becomes its own session.
    #[arg(required = true)]
    scripts: Vec<PathBuf>,

    /// TOML configuration file (replaces environment defaults).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Command filtering mode: command, timeline, hybrid, or auto.
    #[arg(long)]
    mode: Option<ExecutionMode>,

    /// Tick period in milliseconds.
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Fault any session still running after this many ticks.
    #[arg(long)]
    max_ticks: Option<u64>,

    /// Preset choice answers, consumed in order (e.g. `1,0,2`).
    #[arg(long, value_delimiter = ',')]
    answers: Vec<usize>,

    /// Initial variable value, `NAME=VALUE`. Repeatable.
    #[arg(long = "var", value_parser = parse_assignment::<i32>)]
    variables: Vec<(String, i32)>,

    /// Initial switch value, `NAME=true|false`. Repeatable.
    #[arg(long = "switch", value_parser = parse_assignment::<bool>)]
    switches: Vec<(String, bool)>,

    /// Print variables and switches as JSON once every session has ended.
    #[arg(long)]
    dump_state: bool,
}

fn parse_assignment<T>(raw: &str) -> Result<(String, T), String>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got `{raw}`"))?;
    if name.is_empty() {
        return Err(format!("missing name in `{raw}`"));
    }
    let value = value
        .parse()
        .map_err(|error| format!("invalid value for `{name}`: {error}"))?;
    Ok((name.to_owned(), value))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => PlayerConfig::load(path)?,
        None => PlayerConfig::from_env(),
    };
    if let Some(mode) = cli.mode {
        config.runtime.interpreter.execution_mode = mode;
    }
    if let Some(ms) = cli.tick_ms {
        config.runtime.tick_interval_ms = ms.max(1);
    }
    if cli.max_ticks.is_some() {
        config.runtime.interpreter.max_ticks_per_session = cli.max_ticks;
    }

    logging::setup_logging(&config.log, &logging::session_label())?;

    let state = Arc::new(InMemoryGameState::new());
    for (name, value) in &cli.variables {
        state.set_variable(name, *value);
    }
    for (name, value) in &cli.switches {
        state.set_switch(name, *value);
    }
    let host = Arc::new(ConsoleHost::stdout().with_answers(cli.answers.iter().copied()));

    let mut scheduler = SessionScheduler::new(config.runtime.clone(), state.clone(), host);
    let mut events = scheduler.subscribe();

    let mut outstanding = 0usize;
    for (index, path) in cli.scripts.iter().enumerate() {
        let script = Script::load(path)?;
        let descriptors = script.to_descriptors(scheduler.factory())?;
        let fallback = OwnerId(u32::try_from(index + 1).unwrap_or(u32::MAX));
        let owner = script.owner_or(fallback);
        let id = scheduler
            .spawn(owner, &descriptors)
            .with_context(|| format!("failed to start {}", path.display()))?;
        tracing::info!(%id, %owner, script = %path.display(), "script started");
        outstanding += 1;
    }

    let scheduler = Arc::new(Mutex::new(scheduler));
    let driver = TickDriver::spawn(
        scheduler.clone(),
        config.runtime.tick_interval(),
        DriverMode::UntilIdle,
    );

    let mut faulted = 0usize;
    while outstanding > 0 {
        tokio::select! {
            received = events.recv() => match received {
                Ok(SessionEvent::Completed(done)) => {
                    outstanding -= 1;
                    let completion = done.completion;
                    tracing::info!(
                        id = %done.id,
                        owner = %completion.owner,
                        reason = %completion.reason,
                        ticks = completion.ticks,
                        executed = completion.executed,
                        "session completed"
                    );
                    if completion.reason == CompletionReason::Faulted {
                        faulted += 1;
                    }
                }
                Ok(SessionEvent::Stopped { id, .. }) => {
                    outstanding -= 1;
                    tracing::info!(%id, "session stopped");
                }
                Ok(SessionEvent::Started { .. }) => {}
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "session events lagged");
                    outstanding = scheduler.lock().await.active_sessions();
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted, stopping all sessions");
                scheduler.lock().await.stop_all();
                break;
            }
        }
    }

    let ticks = driver.shutdown().await?;
    tracing::info!(ticks, "player finished");

    if cli.dump_state {
        let snapshot = serde_json::json!({
            "variables": state.variables(),
            "switches": state.switches(),
        });
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    }

    if faulted > 0 {
        bail!("{faulted} session(s) faulted");
    }
    Ok(())
}
