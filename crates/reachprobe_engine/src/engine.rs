use std::collections::HashMap;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use engine_logging::{engine_info, engine_warn};
use reachprobe_core::{format_report, CandidateEndpoint, RunId};
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

use crate::runner::{ProbeRunner, ProgressSink};
use crate::{EngineError, ProbeEvent, ProbeSettings, ReqwestTransport, Transport};

enum ProbeCommand {
    Start {
        run_id: RunId,
        candidates: Vec<CandidateEndpoint>,
        discard: CancellationToken,
    },
}

type RunRegistry = Arc<Mutex<HashMap<RunId, CancellationToken>>>;

/// Owns the single probe worker. Runs queue up and execute one at a time.
pub struct ProbeHandle {
    cmd_tx: Option<mpsc::Sender<ProbeCommand>>,
    event_rx: mpsc::Receiver<ProbeEvent>,
    pause_interrupt: Arc<Notify>,
    runs: RunRegistry,
    worker: Option<thread::JoinHandle<()>>,
}

impl ProbeHandle {
    pub fn new(settings: ProbeSettings) -> Result<Self, EngineError> {
        let transport = ReqwestTransport::new(&settings)?;
        Self::with_transport(Arc::new(transport), settings)
    }

    pub fn with_transport(
        transport: Arc<dyn Transport>,
        settings: ProbeSettings,
    ) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runner = ProbeRunner::new(transport, settings);
        let pause_interrupt = runner.pause_interrupt();
        let runs: RunRegistry = Arc::new(Mutex::new(HashMap::new()));
        let worker_runs = runs.clone();

        let worker = thread::Builder::new()
            .name("probe-worker".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    runtime.block_on(handle_command(&runner, command, &event_tx, &worker_runs));
                }
            })?;

        Ok(Self {
            cmd_tx: Some(cmd_tx),
            event_rx,
            pause_interrupt,
            runs,
            worker: Some(worker),
        })
    }

    /// Queues a run over `candidates`.
    pub fn start(&self, run_id: RunId, candidates: Vec<CandidateEndpoint>) {
        let Some(cmd_tx) = self.cmd_tx.as_ref() else {
            engine_warn!("start run_id={} ignored: worker shut down", run_id);
            return;
        };
        let discard = CancellationToken::new();
        if let Ok(mut runs) = self.runs.lock() {
            runs.insert(run_id, discard.clone());
        }
        if cmd_tx
            .send(ProbeCommand::Start {
                run_id,
                candidates,
                discard,
            })
            .is_err()
        {
            engine_warn!("start run_id={} ignored: worker gone", run_id);
        }
    }

    /// Drops a queued or running session. No `Completed` event follows.
    pub fn discard(&self, run_id: RunId) {
        if let Ok(runs) = self.runs.lock() {
            if let Some(token) = runs.get(&run_id) {
                token.cancel();
            }
        }
    }

    /// Cuts short the inter-probe pause in progress, if any.
    pub fn cancel_pause(&self) {
        self.pause_interrupt.notify_waiters();
    }

    pub fn try_recv(&self) -> Option<ProbeEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<ProbeEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    /// Discards outstanding runs and joins the worker. Safe to call repeatedly.
    pub fn shutdown(&mut self) {
        if let Ok(runs) = self.runs.lock() {
            runs.values().for_each(CancellationToken::cancel);
        }
        self.cmd_tx = None;
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                engine_warn!("probe worker panicked during shutdown");
            }
        }
    }
}

impl Drop for ProbeHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

struct ChannelProgressSink {
    run_id: RunId,
    tx: mpsc::Sender<ProbeEvent>,
}

impl ProgressSink for ChannelProgressSink {
    fn on_progress(&self, transcript: &str) {
        let _ = self.tx.send(ProbeEvent::Progress {
            run_id: self.run_id,
            transcript: transcript.to_string(),
        });
    }
}

async fn handle_command(
    runner: &ProbeRunner,
    command: ProbeCommand,
    event_tx: &mpsc::Sender<ProbeEvent>,
    runs: &RunRegistry,
) {
    match command {
        ProbeCommand::Start {
            run_id,
            candidates,
            discard,
        } => {
            engine_logging::set_run_id(run_id);
            if discard.is_cancelled() {
                engine_info!("session discarded before start");
            } else {
                let sink = ChannelProgressSink {
                    run_id,
                    tx: event_tx.clone(),
                };
                tokio::select! {
                    session = runner.run(&candidates, &sink) => {
                        let report = format_report(&session);
                        let _ = event_tx.send(ProbeEvent::Completed { run_id, session, report });
                    }
                    _ = discard.cancelled() => {
                        engine_info!("session discarded mid-run");
                    }
                }
            }
            if let Ok(mut runs) = runs.lock() {
                runs.remove(&run_id);
            }
            engine_logging::set_run_id(0);
        }
    }
}
