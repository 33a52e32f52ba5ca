use crate::{AppState, Effect, Msg, ScreenPhase};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::TestClicked => {
            // One run at a time; the control is disabled while running.
            if state.phase() != ScreenPhase::Ready {
                return (state, Vec::new());
            }
            let run_id = state.begin_run();
            vec![Effect::StartProbe {
                run_id,
                candidates: state.candidates().to_vec(),
            }]
        }
        Msg::ProbeProgress { run_id, transcript } => {
            if state.is_current_run(run_id) {
                state.replace_transcript(transcript);
            }
            Vec::new()
        }
        Msg::ProbeFinished { run_id, report } => {
            if state.is_current_run(run_id) {
                state.finish_run(report);
            }
            Vec::new()
        }
        Msg::ScreenClosed => {
            let discard = match state.phase() {
                ScreenPhase::Running { run_id } => vec![Effect::DiscardSession { run_id }],
                ScreenPhase::Ready | ScreenPhase::Closed => Vec::new(),
            };
            if state.phase() != ScreenPhase::Closed {
                state.close();
            }
            discard
        }
        Msg::Tick => Vec::new(),
    };

    (state, effects)
}
