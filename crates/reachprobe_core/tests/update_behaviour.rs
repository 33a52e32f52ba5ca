use std::sync::Once;

use reachprobe_core::{
    candidates_for_host, update, AppState, CandidateEndpoint, Effect, Msg, ScreenPhase,
    BUTTON_IDLE_LABEL, BUTTON_RUNNING_LABEL,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

fn fresh_state() -> AppState {
    AppState::new(candidates_for_host("h.example.dev").unwrap())
}

fn start(state: AppState) -> (AppState, Vec<Effect>) {
    update(state, Msg::TestClicked)
}

#[test]
fn initial_view_is_ready_and_enabled() {
    init_logging();
    let view = fresh_state().view();
    assert_eq!(
        view.transcript,
        "BeeTagged Connection Test Ready\n\n\
         Click 'Test All Connections' to begin testing multiple URL formats.\n\n"
    );
    assert_eq!(view.button_label, BUTTON_IDLE_LABEL);
    assert!(view.button_enabled);
    assert!(!view.running);
}

#[test]
fn test_click_starts_run_with_all_candidates() {
    init_logging();
    let state = fresh_state();
    let expected: Vec<CandidateEndpoint> = state.candidates().to_vec();

    let (next, effects) = start(state);
    let view = next.view();

    assert_eq!(next.phase(), ScreenPhase::Running { run_id: 1 });
    assert_eq!(view.transcript, "Starting connection tests...\n\n");
    assert_eq!(view.button_label, BUTTON_RUNNING_LABEL);
    assert!(!view.button_enabled);
    assert_eq!(
        effects,
        vec![Effect::StartProbe {
            run_id: 1,
            candidates: expected,
        }]
    );
}

#[test]
fn test_click_ignored_while_running() {
    init_logging();
    let (mut state, _) = start(fresh_state());
    assert!(state.consume_dirty());

    let (mut next, effects) = start(state);
    assert!(effects.is_empty());
    assert_eq!(next.phase(), ScreenPhase::Running { run_id: 1 });
    assert!(!next.consume_dirty());
}

#[test]
fn progress_replaces_transcript_for_current_run_only() {
    init_logging();
    let (state, _) = start(fresh_state());

    let (state, effects) = update(
        state,
        Msg::ProbeProgress {
            run_id: 1,
            transcript: "Test 1: https://h.example.dev/\n".to_string(),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.view().transcript, "Test 1: https://h.example.dev/\n");

    let (state, _) = update(
        state,
        Msg::ProbeProgress {
            run_id: 99,
            transcript: "stale".to_string(),
        },
    );
    assert_eq!(state.view().transcript, "Test 1: https://h.example.dev/\n");
}

#[test]
fn finish_restores_control_and_allows_next_run() {
    init_logging();
    let (state, _) = start(fresh_state());
    let (state, _) = update(
        state,
        Msg::ProbeFinished {
            run_id: 1,
            report: "final".to_string(),
        },
    );
    let view = state.view();
    assert_eq!(view.transcript, "final");
    assert_eq!(view.button_label, BUTTON_IDLE_LABEL);
    assert!(view.button_enabled);

    let (state, effects) = start(state);
    assert_eq!(state.phase(), ScreenPhase::Running { run_id: 2 });
    assert!(matches!(
        effects.as_slice(),
        [Effect::StartProbe { run_id: 2, .. }]
    ));
}

#[test]
fn closing_mid_run_discards_session_and_ignores_late_events() {
    init_logging();
    let (state, _) = start(fresh_state());
    let (state, effects) = update(state, Msg::ScreenClosed);
    assert_eq!(effects, vec![Effect::DiscardSession { run_id: 1 }]);
    assert_eq!(state.phase(), ScreenPhase::Closed);

    let (state, _) = update(
        state,
        Msg::ProbeFinished {
            run_id: 1,
            report: "late".to_string(),
        },
    );
    assert_ne!(state.view().transcript, "late");

    let (state, effects) = start(state);
    assert!(effects.is_empty());
    assert_eq!(state.phase(), ScreenPhase::Closed);
}

#[test]
fn closing_when_idle_emits_nothing() {
    init_logging();
    let (state, effects) = update(fresh_state(), Msg::ScreenClosed);
    assert!(effects.is_empty());
    assert_eq!(state.phase(), ScreenPhase::Closed);
    let (_state, effects) = update(state, Msg::ScreenClosed);
    assert!(effects.is_empty());
}

#[test]
fn tick_mid_run_leaves_state_untouched() {
    init_logging();
    let (running, _) = start(fresh_state());
    let before = running.view();

    let (after, effects) = update(running, Msg::Tick);

    assert!(effects.is_empty());
    assert_eq!(after.phase(), ScreenPhase::Running { run_id: 1 });
    assert_eq!(after.view(), before);
}
