use std::sync::Arc;

use event_core::{
    Command, CommandDescriptor, Comparison, Condition, ConditionSet, ConditionalBranch,
    ControlSwitches, ControlVariables, EndIf, EndLoop, HostEvent, InMemoryGameState,
    InterpreterStatus, Loop, OwnerId, RecordingHost, ShowMessage, SwitchOperation, Wait,
};
use event_core::{CompletionReason, GameStateContext};
use event_runtime::{RuntimeConfig, RuntimeError, SessionEvent, SessionId, SessionScheduler};

struct World {
    state: Arc<InMemoryGameState>,
    host: Arc<RecordingHost>,
    scheduler: SessionScheduler,
}

impl World {
    fn new(config: RuntimeConfig, host: RecordingHost) -> Self {
        let state = Arc::new(InMemoryGameState::new());
        let host = Arc::new(host);
        let scheduler = SessionScheduler::new(config, state.clone(), host.clone());
        Self {
            state,
            host,
            scheduler,
        }
    }

    fn script(&self, commands: Vec<Command>) -> Vec<CommandDescriptor> {
        commands
            .iter()
            .map(|command| {
                self.scheduler
                    .factory()
                    .create_command_data(command)
                    .expect("built-in commands encode")
            })
            .collect()
    }
}

#[test]
fn writes_are_visible_to_later_sessions_in_the_same_tick() {
    let mut world = World::new(RuntimeConfig::default(), RecordingHost::auto_close());

    let writer = world.script(vec![Command::new(ControlVariables::set("alarm", 1))]);
    let reader = world.script(vec![
        Command::new(ConditionalBranch::new(ConditionSet::single(
            Condition::variable("alarm", Comparison::Equal, 1),
        ))),
        Command::new(ControlSwitches::single("guards_alerted", SwitchOperation::On)),
        Command::new(EndIf),
    ]);

    let first = world.scheduler.spawn(OwnerId(1), &writer).unwrap();
    let second = world.scheduler.spawn(OwnerId(2), &reader).unwrap();
    assert!(first < second);

    let completed = world.scheduler.run_until_idle(20).unwrap();
    assert!(world.state.switch("guards_alerted"));

    let order: Vec<SessionId> = completed.iter().map(|done| done.id).collect();
    assert_eq!(order, vec![first, second]);
}

#[test]
fn completion_events_are_broadcast_once() {
    let mut world = World::new(RuntimeConfig::default(), RecordingHost::auto_close());
    let mut events = world.scheduler.subscribe();

    let script = world.script(vec![
        Command::new(ShowMessage::new("Hello")),
        Command::new(Wait::new(2)),
    ]);
    let id = world.scheduler.spawn(OwnerId(4), &script).unwrap();
    world.scheduler.run_until_idle(20).unwrap();

    assert_eq!(
        events.try_recv().unwrap(),
        SessionEvent::Started {
            id,
            owner: OwnerId(4)
        }
    );
    let SessionEvent::Completed(done) = events.try_recv().unwrap() else {
        panic!("expected a completion event");
    };
    assert_eq!(done.id, id);
    assert_eq!(done.completion.reason, CompletionReason::EndOfProgram);
    assert!(events.try_recv().is_err());
    assert!(world.scheduler.is_idle());
}

#[test]
fn stopping_a_session_aborts_its_message() {
    let mut world = World::new(RuntimeConfig::default(), RecordingHost::new());
    let mut events = world.scheduler.subscribe();

    let script = world.script(vec![Command::new(ShowMessage::new("Wait for me"))]);
    let id = world.scheduler.spawn(OwnerId(9), &script).unwrap();
    world.scheduler.tick();
    world.scheduler.tick();
    assert_eq!(world.scheduler.status(id), Some(InterpreterStatus::Running));

    world.scheduler.stop(id).unwrap();
    assert!(matches!(
        world.host.events().last(),
        Some(HostEvent::MessageClosed(_))
    ));
    assert!(matches!(
        world.scheduler.stop(id),
        Err(RuntimeError::UnknownSession(missing)) if missing == id
    ));

    let received: Vec<_> = std::iter::from_fn(|| events.try_recv().ok()).collect();
    assert_eq!(
        received,
        vec![
            SessionEvent::Started {
                id,
                owner: OwnerId(9)
            },
            SessionEvent::Stopped {
                id,
                owner: OwnerId(9)
            },
        ]
    );
}

#[test]
fn paused_sessions_hold_their_cursor() {
    let mut world = World::new(RuntimeConfig::default(), RecordingHost::auto_close());
    let script = world.script(vec![
        Command::new(ControlVariables::add("steps", 1)),
        Command::new(ControlVariables::add("steps", 1)),
        Command::new(ControlVariables::add("steps", 1)),
    ]);

    let id = world.scheduler.spawn(OwnerId(1), &script).unwrap();
    world.scheduler.tick();
    world.scheduler.pause(id).unwrap();
    for _ in 0..5 {
        world.scheduler.tick();
    }
    assert_eq!(world.scheduler.current_index(id), Some(1));
    assert_eq!(world.scheduler.status(id), Some(InterpreterStatus::Paused));
    assert_eq!(world.state.variable("steps"), 1);

    world.scheduler.resume(id).unwrap();
    world.scheduler.run_until_idle(10).unwrap();
    assert_eq!(world.state.variable("steps"), 3);
}

#[test]
fn session_limit_is_enforced() {
    let config = RuntimeConfig {
        max_sessions: Some(1),
        ..RuntimeConfig::default()
    };
    let mut world = World::new(config, RecordingHost::auto_close());
    let script = world.script(vec![Command::new(Wait::new(5))]);

    world.scheduler.spawn(OwnerId(1), &script).unwrap();
    assert!(matches!(
        world.scheduler.spawn(OwnerId(2), &script),
        Err(RuntimeError::TooManySessions { limit: 1 })
    ));
}

#[test]
fn malformed_scripts_are_rejected_at_spawn() {
    let mut world = World::new(RuntimeConfig::default(), RecordingHost::auto_close());
    let script = world.script(vec![Command::new(Loop)]);

    assert!(matches!(
        world.scheduler.spawn(OwnerId(1), &script),
        Err(RuntimeError::Interpreter(_))
    ));
    assert!(world.scheduler.is_idle());
}

#[test]
fn run_until_idle_reports_runaway_sessions() {
    let mut world = World::new(RuntimeConfig::default(), RecordingHost::auto_close());
    let script = world.script(vec![
        Command::new(Loop),
        Command::new(ControlVariables::add("spins", 1)),
        Command::new(EndLoop),
    ]);

    world.scheduler.spawn(OwnerId(1), &script).unwrap();
    assert!(matches!(
        world.scheduler.run_until_idle(30),
        Err(RuntimeError::TickBudgetExhausted {
            ticks: 30,
            active: 1
        })
    ));
    assert!(world.state.variable("spins") > 1);

    world.scheduler.stop_all();
    assert!(world.scheduler.is_idle());
}
