use std::fmt;
use std::time::Duration;

use reachprobe_core::{ProbeSession, RunId, SummaryPolicy, BODY_PREVIEW_CHARS};

pub const USER_AGENT: &str = "BeeTagged-Android-Test/1.0";

#[derive(Debug, Clone)]
pub struct ProbeSettings {
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub write_timeout: Duration,
    /// Pause after every probe, success or failure.
    pub pause: Duration,
    pub user_agent: String,
    pub preview_chars: usize,
    /// Upper bound on body bytes read to build the preview.
    pub max_body_bytes: usize,
    pub summary_policy: SummaryPolicy,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(10),
            write_timeout: Duration::from_secs(10),
            pause: Duration::from_secs(1),
            user_agent: USER_AGENT.to_string(),
            preview_chars: BODY_PREVIEW_CHARS,
            max_body_bytes: 64 * 1024,
            summary_policy: SummaryPolicy::ExactStatus200,
        }
    }
}

/// What the transport saw when a request completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResponse {
    pub status_code: u16,
    pub status_message: String,
    pub content_type: Option<String>,
    pub body: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    InvalidUrl,
    Timeout,
    Tls,
    Connect,
    Body,
    Request,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportErrorKind::InvalidUrl => write!(f, "invalid url"),
            TransportErrorKind::Timeout => write!(f, "timeout"),
            TransportErrorKind::Tls => write!(f, "tls"),
            TransportErrorKind::Connect => write!(f, "connect"),
            TransportErrorKind::Body => write!(f, "body"),
            TransportErrorKind::Request => write!(f, "request"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to start worker runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("failed to build http client: {0}")]
    Transport(#[from] TransportError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeEvent {
    /// Cumulative transcript after the latest probe.
    Progress { run_id: RunId, transcript: String },
    /// The run went through every candidate.
    Completed {
        run_id: RunId,
        session: ProbeSession,
        report: String,
    },
}
