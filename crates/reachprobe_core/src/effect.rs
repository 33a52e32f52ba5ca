use crate::{CandidateEndpoint, RunId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    StartProbe {
        run_id: RunId,
        candidates: Vec<CandidateEndpoint>,
    },
    DiscardSession { run_id: RunId },
}
