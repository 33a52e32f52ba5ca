use std::time::Duration;

use engine_logging::{engine_info, engine_warn};
use reachprobe_core::{Effect, Msg};
use reachprobe_engine::{EngineError, ProbeEvent, ProbeHandle, ProbeSettings};

/// Executes core effects against the probe worker and turns its events back into messages.
pub struct EffectRunner {
    probe: ProbeHandle,
}

impl EffectRunner {
    pub fn new(settings: ProbeSettings) -> Result<Self, EngineError> {
        Ok(Self {
            probe: ProbeHandle::new(settings)?,
        })
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartProbe { run_id, candidates } => {
                    engine_info!(
                        "StartProbe run_id={} candidates={}",
                        run_id,
                        candidates.len()
                    );
                    self.probe.start(run_id, candidates);
                }
                Effect::DiscardSession { run_id } => {
                    engine_info!("DiscardSession run_id={}", run_id);
                    self.probe.discard(run_id);
                    self.probe.cancel_pause();
                }
            }
        }
    }

    /// Waits up to `timeout` for the next engine event.
    pub fn poll(&self, timeout: Duration) -> Option<Msg> {
        let event = self.probe.recv_timeout(timeout)?;
        Some(match event {
            ProbeEvent::Progress { run_id, transcript } => {
                Msg::ProbeProgress { run_id, transcript }
            }
            ProbeEvent::Completed {
                run_id,
                session,
                report,
            } => {
                if session.successful_endpoints().is_empty() {
                    engine_warn!("run {} found no successful connections", run_id);
                }
                Msg::ProbeFinished { run_id, report }
            }
        })
    }

    pub fn shutdown(&mut self) {
        self.probe.shutdown();
    }
}
