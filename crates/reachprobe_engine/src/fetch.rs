use std::error::Error as _;

use futures_util::StreamExt;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};

use crate::{ProbeResponse, ProbeSettings, TransportError, TransportErrorKind};

const TLS_MARKERS: [&str; 4] = ["tls", "certificate", "handshake", "corrupt message"];
const SOCKET_MARKERS: [&str; 3] = ["refused", "dns error", "failed to lookup address"];

#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Performs one GET. Any completed exchange is `Ok`, whatever the status code.
    async fn probe(&self, url: &str) -> Result<ProbeResponse, TransportError>;
}

/// reqwest-backed transport. One client is shared by every candidate of a run.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    user_agent: String,
    max_body_bytes: usize,
}

impl ReqwestTransport {
    pub fn new(settings: &ProbeSettings) -> Result<Self, TransportError> {
        // reqwest has no write timeout; it is folded into the overall deadline.
        let overall = settings.connect_timeout + settings.read_timeout + settings.write_timeout;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .read_timeout(settings.read_timeout)
            .timeout(overall)
            .build()
            .map_err(|err| TransportError::new(TransportErrorKind::Request, error_chain(&err)))?;
        Ok(Self {
            client,
            user_agent: settings.user_agent.clone(),
            max_body_bytes: settings.max_body_bytes,
        })
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn probe(&self, url: &str) -> Result<ProbeResponse, TransportError> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|err| TransportError::new(TransportErrorKind::InvalidUrl, err.to_string()))?;
        let is_https = parsed.scheme() == "https";

        let response = self
            .client
            .get(parsed)
            .header(USER_AGENT, self.user_agent.as_str())
            .send()
            .await
            .map_err(|err| map_reqwest_error(&err, is_https))?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|err| map_reqwest_error(&err, is_https))?;
            let room = self.max_body_bytes.saturating_sub(bytes.len());
            bytes.extend_from_slice(&chunk[..chunk.len().min(room)]);
            if bytes.len() >= self.max_body_bytes {
                break;
            }
        }

        Ok(ProbeResponse {
            status_code: status.as_u16(),
            status_message: status.canonical_reason().unwrap_or("").to_string(),
            content_type,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }
}

/// Joins the error with its whole source chain so the root cause
/// (e.g. "Connection refused") shows up in the message.
fn error_chain(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

/// The source chain below the top-level error. Unlike `error_chain` it never
/// includes the request url.
fn cause_chain(err: &reqwest::Error) -> String {
    let mut causes = Vec::new();
    let mut source = err.source();
    while let Some(cause) = source {
        causes.push(cause.to_string());
        source = cause.source();
    }
    causes.join(": ")
}

fn map_reqwest_error(err: &reqwest::Error, is_https: bool) -> TransportError {
    let chain = error_chain(err);
    if err.is_timeout() {
        return TransportError::new(TransportErrorKind::Timeout, format!("timeout: {chain}"));
    }
    let causes = cause_chain(err);
    if err.is_connect() && is_socket_failure(&causes) {
        return TransportError::new(TransportErrorKind::Connect, chain);
    }
    if is_https && looks_like_tls_failure(&causes) {
        return TransportError::new(
            TransportErrorKind::Tls,
            format!("SSL handshake failed: {chain}"),
        );
    }
    if err.is_connect() {
        return TransportError::new(TransportErrorKind::Connect, chain);
    }
    if err.is_body() || err.is_decode() {
        return TransportError::new(TransportErrorKind::Body, chain);
    }
    TransportError::new(TransportErrorKind::Request, chain)
}

/// Refused connections and name resolution failures happen before any handshake.
fn is_socket_failure(causes: &str) -> bool {
    let lowered = causes.to_ascii_lowercase();
    SOCKET_MARKERS.iter().any(|marker| lowered.contains(marker))
}

fn looks_like_tls_failure(causes: &str) -> bool {
    let lowered = causes.to_ascii_lowercase();
    TLS_MARKERS.iter().any(|marker| lowered.contains(marker))
}
