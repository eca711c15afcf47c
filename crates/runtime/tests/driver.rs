use std::sync::Arc;
use std::time::Duration;

use event_core::{
    Command, CommandDescriptor, ControlVariables, EndLoop, GameStateContext, InMemoryGameState,
    Loop, OwnerId, RecordingHost, ShowMessage, Wait,
};
use event_runtime::{DriverMode, RuntimeConfig, SessionEvent, SessionScheduler, TickDriver};
use tokio::sync::Mutex;

fn scheduler(state: Arc<InMemoryGameState>) -> SessionScheduler {
    SessionScheduler::new(
        RuntimeConfig::default(),
        state,
        Arc::new(RecordingHost::auto_close()),
    )
}

fn script(scheduler: &SessionScheduler, commands: Vec<Command>) -> Vec<CommandDescriptor> {
    commands
        .iter()
        .map(|command| scheduler.factory().create_command_data(command).unwrap())
        .collect()
}

#[tokio::test]
async fn driver_runs_sessions_to_completion() {
    let state = Arc::new(InMemoryGameState::new());
    let mut scheduler = scheduler(state.clone());
    let mut events = scheduler.subscribe();
    let commands = script(
        &scheduler,
        vec![
            Command::new(ShowMessage::new("Dawn breaks.")),
            Command::new(Wait::new(3)),
            Command::new(ControlVariables::set("day", 2)),
        ],
    );
    let id = scheduler.spawn(OwnerId(1), &commands).unwrap();

    let scheduler = Arc::new(Mutex::new(scheduler));
    let driver = TickDriver::spawn(
        scheduler.clone(),
        Duration::from_millis(1),
        DriverMode::UntilIdle,
    );

    let driven = tokio::time::timeout(Duration::from_secs(5), driver.join())
        .await
        .expect("driver should finish")
        .unwrap();
    assert!(driven >= 6, "driven {driven} ticks");
    assert_eq!(state.variable("day"), 2);

    assert!(matches!(events.recv().await, Ok(SessionEvent::Started { .. })));
    let Ok(SessionEvent::Completed(done)) = events.recv().await else {
        panic!("expected completion");
    };
    assert_eq!(done.id, id);
    assert!(scheduler.lock().await.is_idle());
}

#[tokio::test]
async fn shutdown_stops_an_endless_driver() {
    let state = Arc::new(InMemoryGameState::new());
    let mut scheduler = scheduler(state.clone());
    let commands = script(
        &scheduler,
        vec![
            Command::new(Loop),
            Command::new(ControlVariables::add("spins", 1)),
            Command::new(EndLoop),
        ],
    );
    scheduler.spawn(OwnerId(1), &commands).unwrap();

    let scheduler = Arc::new(Mutex::new(scheduler));
    let driver = TickDriver::spawn(
        scheduler.clone(),
        Duration::from_millis(1),
        DriverMode::UntilShutdown,
    );
    tokio::time::sleep(Duration::from_millis(30)).await;

    let driven = driver.shutdown().await.unwrap();
    assert!(driven > 0);
    let ticks = scheduler.lock().await.ticks();
    assert_eq!(ticks, driven);
    assert_eq!(scheduler.lock().await.active_sessions(), 1);
    assert!(state.variable("spins") > 0);
}
