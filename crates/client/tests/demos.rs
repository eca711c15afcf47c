use std::path::PathBuf;
use std::sync::Arc;

use event_client::Script;
use event_core::{
    ChoiceResult, CompletionReason, GameStateContext, InMemoryGameState, OwnerId, RecordingHost,
};
use event_runtime::{RuntimeConfig, SessionScheduler};

fn demo(name: &str) -> Script {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../demos")
        .join(name);
    Script::load(&path).unwrap()
}

#[test]
fn demo_scripts_run_to_completion() {
    let state = Arc::new(InMemoryGameState::new().with_variable("gold", 12));
    let host = Arc::new(RecordingHost::auto_close());
    host.queue_choice(ChoiceResult::Selected(0));

    let mut scheduler = SessionScheduler::new(RuntimeConfig::default(), state.clone(), host.clone());
    for name in ["gatekeeper.json", "countdown.json"] {
        let script = demo(name);
        let descriptors = script.to_descriptors(scheduler.factory()).unwrap();
        scheduler
            .spawn(script.owner_or(OwnerId::GLOBAL), &descriptors)
            .unwrap();
    }

    let completed = scheduler.run_until_idle(1_000).unwrap();
    assert_eq!(completed.len(), 2);
    let reasons: Vec<_> = completed
        .iter()
        .map(|done| (done.completion.owner, done.completion.reason))
        .collect();
    assert!(reasons.contains(&(OwnerId(3), CompletionReason::EndOfProgram)));
    assert!(reasons.contains(&(OwnerId(7), CompletionReason::Exited)));

    assert_eq!(state.variable("gold"), 2);
    assert!(state.switch("gate_open"));
    assert!(state.self_switch(OwnerId(3), "A"));
    assert_eq!(state.variable("counter"), 0);

    let messages = host.messages();
    assert_eq!(messages.iter().filter(|text| *text == "tick...").count(), 3);
    assert!(messages.iter().any(|text| text == "Pass, traveller."));
    assert!(!messages.iter().any(|text| text.contains("never shown")));
}
