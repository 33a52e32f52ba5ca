use crate::{classify, CandidateEndpoint, DiagnosticCategory};

/// Result of attempting one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The transport call completed; any status code lands here, 4xx and 5xx included.
    Success {
        status_code: u16,
        status_message: String,
        content_type: Option<String>,
        body_preview: String,
    },
    Failure {
        error_message: String,
    },
}

/// Which successful records count towards the session summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SummaryPolicy {
    /// Only records whose status line reads exactly `Status: 200`.
    #[default]
    ExactStatus200,
    /// Any record with a 2xx status.
    Any2xx,
}

impl SummaryPolicy {
    fn counts(self, outcome: &ProbeOutcome) -> bool {
        match (self, outcome) {
            (SummaryPolicy::ExactStatus200, ProbeOutcome::Success { status_code, .. }) => {
                crate::report::status_line(*status_code) == "Status: 200"
            }
            (SummaryPolicy::Any2xx, ProbeOutcome::Success { status_code, .. }) => {
                (200..300).contains(status_code)
            }
            (_, ProbeOutcome::Failure { .. }) => false,
        }
    }
}

/// One probe attempt. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeRecord {
    candidate: CandidateEndpoint,
    outcome: ProbeOutcome,
    category: Option<DiagnosticCategory>,
}

impl ProbeRecord {
    /// Builds a record, classifying failures. Successes never carry a category.
    pub fn new(candidate: CandidateEndpoint, outcome: ProbeOutcome) -> Self {
        let category = match &outcome {
            ProbeOutcome::Failure { error_message } => Some(classify(error_message)),
            ProbeOutcome::Success { .. } => None,
        };
        Self {
            candidate,
            outcome,
            category,
        }
    }

    pub fn candidate(&self) -> &CandidateEndpoint {
        &self.candidate
    }

    pub fn outcome(&self) -> &ProbeOutcome {
        &self.outcome
    }

    pub fn category(&self) -> Option<DiagnosticCategory> {
        self.category
    }

    pub fn is_transport_success(&self) -> bool {
        matches!(self.outcome, ProbeOutcome::Success { .. })
    }
}

/// Ordered results of one complete run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProbeSession {
    records: Vec<ProbeRecord>,
    successful_endpoints: Vec<CandidateEndpoint>,
    policy: SummaryPolicy,
}

impl ProbeSession {
    pub fn new(policy: SummaryPolicy) -> Self {
        Self {
            records: Vec::new(),
            successful_endpoints: Vec::new(),
            policy,
        }
    }

    /// Appends a record, adding its candidate to the roll-up when the policy accepts it.
    pub fn push(&mut self, record: ProbeRecord) {
        if self.policy.counts(record.outcome()) {
            self.successful_endpoints.push(record.candidate().clone());
        }
        self.records.push(record);
    }

    pub fn records(&self) -> &[ProbeRecord] {
        &self.records
    }

    pub fn successful_endpoints(&self) -> &[CandidateEndpoint] {
        &self.successful_endpoints
    }

    pub fn policy(&self) -> SummaryPolicy {
        self.policy
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
