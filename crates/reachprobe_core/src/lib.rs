//! Reachprobe core: candidate endpoints, probe classification, report text,
//! eviction policy and the pure diagnostic-screen state machine.
mod candidate;
mod classify;
mod effect;
mod eviction;
mod msg;
mod report;
mod session;
mod state;
mod update;
mod view_model;

pub use candidate::{candidates_for_host, CandidateEndpoint, CandidateError, CANDIDATE_PORTS};
pub use classify::{classify, DiagnosticCategory};
pub use effect::Effect;
pub use eviction::{
    CacheAction, EvictionPolicy, EvictionTier, LifecycleTrigger, MemorySample, PolicyError,
};
pub use msg::Msg;
pub use report::{
    body_preview, format_progress, format_record, format_report, format_summary,
    BODY_PREVIEW_CHARS,
};
pub use session::{ProbeOutcome, ProbeRecord, ProbeSession, SummaryPolicy};
pub use state::{AppState, RunId, ScreenPhase};
pub use update::update;
pub use view_model::{ScreenViewModel, BUTTON_IDLE_LABEL, BUTTON_RUNNING_LABEL};
