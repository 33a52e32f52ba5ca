use std::sync::Arc;

use engine_logging::{engine_debug, engine_info};
use reachprobe_core::{
    body_preview, format_record, CandidateEndpoint, ProbeOutcome, ProbeRecord, ProbeSession,
};
use tokio::sync::Notify;

use crate::{ProbeSettings, Transport};

/// Receives the cumulative transcript after every probe.
pub trait ProgressSink: Send + Sync {
    fn on_progress(&self, transcript: &str);
}

/// Probes candidates one after another and builds the session.
pub struct ProbeRunner {
    transport: Arc<dyn Transport>,
    settings: ProbeSettings,
    pause_interrupt: Arc<Notify>,
}

impl ProbeRunner {
    pub fn new(transport: Arc<dyn Transport>, settings: ProbeSettings) -> Self {
        Self {
            transport,
            settings,
            pause_interrupt: Arc::new(Notify::new()),
        }
    }

    /// Notifying this cuts short the pause currently in progress. The run continues.
    pub fn pause_interrupt(&self) -> Arc<Notify> {
        self.pause_interrupt.clone()
    }

    /// Attempts every candidate exactly once, in order. Never fails: transport
    /// errors become `Failure` records.
    pub async fn run(
        &self,
        candidates: &[CandidateEndpoint],
        sink: &dyn ProgressSink,
    ) -> ProbeSession {
        engine_info!("probe run started candidates={}", candidates.len());
        let mut session = ProbeSession::new(self.settings.summary_policy);
        let mut transcript = String::new();

        for (index, candidate) in candidates.iter().enumerate() {
            let record = ProbeRecord::new(candidate.clone(), self.probe_one(candidate).await);
            log_record(&record);

            transcript.push_str(&format_record(index + 1, &record));
            transcript.push('\n');
            session.push(record);
            sink.on_progress(&transcript);

            self.pause().await;
        }

        engine_info!(
            "probe run finished records={} successful={}",
            session.len(),
            session.successful_endpoints().len()
        );
        session
    }

    async fn probe_one(&self, candidate: &CandidateEndpoint) -> ProbeOutcome {
        match self.transport.probe(candidate.url()).await {
            Ok(response) => ProbeOutcome::Success {
                status_code: response.status_code,
                status_message: response.status_message,
                content_type: response.content_type,
                body_preview: body_preview(&response.body, self.settings.preview_chars),
            },
            Err(err) => ProbeOutcome::Failure {
                error_message: err.message,
            },
        }
    }

    async fn pause(&self) {
        if self.settings.pause.is_zero() {
            return;
        }
        tokio::select! {
            _ = tokio::time::sleep(self.settings.pause) => {}
            _ = self.pause_interrupt.notified() => {
                engine_debug!("inter-probe pause interrupted");
            }
        }
    }
}

fn log_record(record: &ProbeRecord) {
    match record.outcome() {
        ProbeOutcome::Success { status_code, .. } => {
            engine_info!("probe url={} status={}", record.candidate(), status_code);
        }
        ProbeOutcome::Failure { error_message } => {
            engine_info!(
                "probe url={} failed category={:?} error={}",
                record.candidate(),
                record.category(),
                error_message
            );
        }
    }
}
