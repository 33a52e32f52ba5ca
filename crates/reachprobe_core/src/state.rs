use crate::view_model::{ScreenViewModel, BUTTON_IDLE_LABEL, BUTTON_RUNNING_LABEL};
use crate::CandidateEndpoint;

pub type RunId = u64;

pub(crate) const READY_TEXT: &str = "BeeTagged Connection Test Ready\n\n\
    Click 'Test All Connections' to begin testing multiple URL formats.\n\n";
pub(crate) const STARTING_TEXT: &str = "Starting connection tests...\n\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScreenPhase {
    #[default]
    Ready,
    Running {
        run_id: RunId,
    },
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    candidates: Vec<CandidateEndpoint>,
    transcript: String,
    phase: ScreenPhase,
    next_run_id: RunId,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl AppState {
    pub fn new(candidates: Vec<CandidateEndpoint>) -> Self {
        Self {
            candidates,
            transcript: READY_TEXT.to_string(),
            phase: ScreenPhase::Ready,
            next_run_id: 1,
            dirty: true,
        }
    }

    pub fn view(&self) -> ScreenViewModel {
        let running = matches!(self.phase, ScreenPhase::Running { .. });
        ScreenViewModel {
            transcript: self.transcript.clone(),
            button_label: if running {
                BUTTON_RUNNING_LABEL
            } else {
                BUTTON_IDLE_LABEL
            },
            button_enabled: self.phase == ScreenPhase::Ready,
            running,
            dirty: self.dirty,
        }
    }

    pub fn phase(&self) -> ScreenPhase {
        self.phase
    }

    pub fn candidates(&self) -> &[CandidateEndpoint] {
        &self.candidates
    }

    /// Returns whether anything changed since the last call, clearing the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn begin_run(&mut self) -> RunId {
        let run_id = self.next_run_id;
        self.next_run_id += 1;
        self.phase = ScreenPhase::Running { run_id };
        self.transcript = STARTING_TEXT.to_string();
        self.dirty = true;
        run_id
    }

    pub(crate) fn is_current_run(&self, run_id: RunId) -> bool {
        self.phase == ScreenPhase::Running { run_id }
    }

    pub(crate) fn replace_transcript(&mut self, text: String) {
        self.transcript = text;
        self.dirty = true;
    }

    pub(crate) fn finish_run(&mut self, report: String) {
        self.transcript = report;
        self.phase = ScreenPhase::Ready;
        self.dirty = true;
    }

    pub(crate) fn close(&mut self) {
        self.phase = ScreenPhase::Closed;
        self.dirty = true;
    }
}
