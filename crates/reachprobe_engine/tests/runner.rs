use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pretty_assertions::assert_eq;
use reachprobe_core::{
    format_progress, CandidateEndpoint, DiagnosticCategory, ProbeOutcome, SummaryPolicy,
};
use reachprobe_engine::{
    ProbeResponse, ProbeRunner, ProbeSettings, ProgressSink, ReqwestTransport, Transport,
    TransportError, TransportErrorKind,
};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct TestSink {
    transcripts: Mutex<Vec<String>>,
}

impl TestSink {
    fn take(&self) -> Vec<String> {
        self.transcripts.lock().unwrap().drain(..).collect()
    }
}

impl ProgressSink for TestSink {
    fn on_progress(&self, transcript: &str) {
        self.transcripts.lock().unwrap().push(transcript.to_string());
    }
}

/// Answers from a fixed script and remembers the order of requests.
#[derive(Default)]
struct ScriptedTransport {
    script: HashMap<String, Result<ProbeResponse, TransportError>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    fn respond(mut self, url: &str, status_code: u16, body: &str) -> Self {
        self.script.insert(
            url.to_string(),
            Ok(ProbeResponse {
                status_code,
                status_message: "OK".to_string(),
                content_type: Some("text/plain".to_string()),
                body: body.to_string(),
            }),
        );
        self
    }

    fn fail(mut self, url: &str, message: &str) -> Self {
        self.script.insert(
            url.to_string(),
            Err(TransportError::new(TransportErrorKind::Connect, message)),
        );
        self
    }
}

#[async_trait::async_trait]
impl Transport for ScriptedTransport {
    async fn probe(&self, url: &str) -> Result<ProbeResponse, TransportError> {
        self.calls.lock().unwrap().push(url.to_string());
        self.script
            .get(url)
            .cloned()
            .unwrap_or_else(|| Err(TransportError::new(TransportErrorKind::Request, "unscripted")))
    }
}

fn quick_settings() -> ProbeSettings {
    ProbeSettings {
        pause: Duration::ZERO,
        ..ProbeSettings::default()
    }
}

fn candidates(urls: &[&str]) -> Vec<CandidateEndpoint> {
    urls.iter().map(|url| CandidateEndpoint::new(*url)).collect()
}

#[tokio::test]
async fn two_candidate_scenario_success_then_refused() {
    let transport = Arc::new(
        ScriptedTransport::default()
            .respond("https://h/", 200, "welcome")
            .fail("http://h/", "tcp connect error: Connection refused (os error 111)"),
    );
    let runner = ProbeRunner::new(transport.clone(), quick_settings());
    let sink = TestSink::default();

    let session = runner.run(&candidates(&["https://h/", "http://h/"]), &sink).await;

    assert_eq!(session.len(), 2);
    assert_eq!(
        session.successful_endpoints(),
        &[CandidateEndpoint::new("https://h/")]
    );
    assert_eq!(session.records()[0].category(), None);
    assert_eq!(
        session.records()[1].category(),
        Some(DiagnosticCategory::ConnectionRefused)
    );
    assert_eq!(*transport.calls.lock().unwrap(), vec!["https://h/", "http://h/"]);
}

#[tokio::test]
async fn every_candidate_attempted_in_order_without_early_exit() {
    let urls = ["https://a/", "https://b/", "https://c/", "http://a/"];
    let transport = Arc::new(
        ScriptedTransport::default()
            .respond("https://a/", 200, "")
            .respond("https://b/", 200, "")
            .fail("https://c/", "timeout: operation timed out")
            .respond("http://a/", 502, "bad gateway"),
    );
    let runner = ProbeRunner::new(transport.clone(), quick_settings());
    let sink = TestSink::default();

    let session = runner.run(&candidates(&urls), &sink).await;

    let attempted: Vec<&str> = session
        .records()
        .iter()
        .map(|record| record.candidate().url())
        .collect();
    assert_eq!(attempted, urls.to_vec());
    assert_eq!(*transport.calls.lock().unwrap(), urls.to_vec());
    assert_eq!(session.successful_endpoints().len(), 2);
}

#[tokio::test]
async fn progress_is_emitted_after_each_probe_and_grows_monotonically() {
    let transport = Arc::new(
        ScriptedTransport::default()
            .respond("https://a/", 200, "x")
            .fail("https://b/", "502 Bad Gateway")
            .fail("https://c/", "certificate SSL failure"),
    );
    let runner = ProbeRunner::new(transport, quick_settings());
    let sink = TestSink::default();

    let session = runner
        .run(&candidates(&["https://a/", "https://b/", "https://c/"]), &sink)
        .await;

    let transcripts = sink.take();
    assert_eq!(transcripts.len(), 3);
    for pair in transcripts.windows(2) {
        assert!(pair[1].starts_with(&pair[0]));
    }
    assert_eq!(transcripts.last().unwrap(), &format_progress(&session));
    assert!(transcripts[1].contains("→ Bad Gateway: Server routing issue"));
    assert!(transcripts[2].contains("→ SSL Issue: Try HTTP version"));
}

#[tokio::test]
async fn empty_candidate_list_yields_empty_session() {
    let runner = ProbeRunner::new(Arc::new(ScriptedTransport::default()), quick_settings());
    let sink = TestSink::default();
    let session = runner.run(&[], &sink).await;
    assert!(session.is_empty());
    assert!(sink.take().is_empty());
}

#[tokio::test]
async fn reqwest_transport_reports_status_headers_and_preview() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("User-Agent", "BeeTagged-Android-Test/1.0"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("z".repeat(250), "text/html; charset=utf-8"),
        )
        .mount(&server)
        .await;

    let settings = quick_settings();
    let transport = Arc::new(ReqwestTransport::new(&settings).unwrap());
    let runner = ProbeRunner::new(transport, settings);
    let sink = TestSink::default();
    let url = format!("{}/", server.uri());

    let session = runner.run(&candidates(&[url.as_str()]), &sink).await;

    match session.records()[0].outcome() {
        ProbeOutcome::Success {
            status_code,
            status_message,
            content_type,
            body_preview,
        } => {
            assert_eq!(*status_code, 200);
            assert_eq!(status_message, "OK");
            assert!(content_type.as_deref().unwrap().starts_with("text/html"));
            assert_eq!(body_preview, &format!("{}...", "z".repeat(100)));
        }
        other => panic!("expected success, got {other:?}"),
    }
    assert_eq!(session.successful_endpoints().len(), 1);
}

#[tokio::test]
async fn non_200_is_a_success_record_but_not_summary_successful() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let settings = quick_settings();
    let transport = Arc::new(ReqwestTransport::new(&settings).unwrap());
    let runner = ProbeRunner::new(transport, settings);
    let sink = TestSink::default();
    let url = format!("{}/", server.uri());

    let session = runner.run(&candidates(&[url.as_str()]), &sink).await;

    assert!(session.records()[0].is_transport_success());
    assert!(sink.take()[0].contains("Status: 404\n"));
    assert!(session.successful_endpoints().is_empty());
}

#[tokio::test]
async fn any_2xx_policy_counts_no_content() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let settings = ProbeSettings {
        summary_policy: SummaryPolicy::Any2xx,
        ..quick_settings()
    };
    let transport = Arc::new(ReqwestTransport::new(&settings).unwrap());
    let runner = ProbeRunner::new(transport, settings);
    let url = format!("{}/", server.uri());

    let session = runner.run(&candidates(&[url.as_str()]), &TestSink::default()).await;
    assert_eq!(session.successful_endpoints().len(), 1);
}

#[tokio::test]
async fn slow_server_is_recorded_as_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(500))
                .set_body_string("slow"),
        )
        .mount(&server)
        .await;

    let settings = ProbeSettings {
        connect_timeout: Duration::from_millis(50),
        read_timeout: Duration::from_millis(50),
        write_timeout: Duration::from_millis(50),
        ..quick_settings()
    };
    let transport = Arc::new(ReqwestTransport::new(&settings).unwrap());
    let runner = ProbeRunner::new(transport, settings);
    let url = format!("{}/", server.uri());

    let session = runner.run(&candidates(&[url.as_str()]), &TestSink::default()).await;
    assert_eq!(
        session.records()[0].category(),
        Some(DiagnosticCategory::Timeout)
    );
}

#[tokio::test]
async fn closed_port_is_recorded_as_refused_and_run_continues() {
    let closed = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let settings = quick_settings();
    let transport = Arc::new(ReqwestTransport::new(&settings).unwrap());
    let runner = ProbeRunner::new(transport, settings);
    let refused_url = format!("http://127.0.0.1:{closed}/");
    let ok_url = format!("{}/", server.uri());

    let session = runner
        .run(&candidates(&[refused_url.as_str(), ok_url.as_str()]), &TestSink::default())
        .await;

    assert_eq!(session.len(), 2);
    assert!(!session.records()[0].is_transport_success());
    assert_eq!(
        session.records()[0].category(),
        Some(DiagnosticCategory::ConnectionRefused)
    );
    assert_eq!(
        session.successful_endpoints(),
        &[CandidateEndpoint::new(ok_url)]
    );
}

#[tokio::test]
async fn malformed_url_becomes_a_failure_record() {
    let settings = quick_settings();
    let transport = Arc::new(ReqwestTransport::new(&settings).unwrap());
    let runner = ProbeRunner::new(transport, settings);

    let session = runner
        .run(&candidates(&["not a url"]), &TestSink::default())
        .await;
    assert!(matches!(
        session.records()[0].outcome(),
        ProbeOutcome::Failure { .. }
    ));
}

#[tokio::test]
async fn tls_words_in_the_url_do_not_turn_refusals_into_ssl_failures() {
    let closed = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let settings = quick_settings();
    let transport = Arc::new(ReqwestTransport::new(&settings).unwrap());
    let url = format!("https://127.0.0.1:{closed}/tls/certificate/handshake/");

    let err = transport.probe(&url).await.unwrap_err();
    assert_eq!(err.kind, TransportErrorKind::Connect);
    assert!(!err.message.starts_with("SSL"));

    let runner = ProbeRunner::new(transport, settings);
    let session = runner
        .run(&candidates(&[url.as_str()]), &TestSink::default())
        .await;
    assert_eq!(
        session.records()[0].category(),
        Some(DiagnosticCategory::ConnectionRefused)
    );
}
