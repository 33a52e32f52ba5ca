/// Best-effort diagnosis of a failed probe, derived from the transport error text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCategory {
    GatewayError,
    Timeout,
    ProtocolMismatch,
    ConnectionRefused,
    Unclassified,
}

impl DiagnosticCategory {
    /// Operator-facing hint printed under the error line. `Unclassified` has none.
    pub fn hint(self) -> Option<&'static str> {
        match self {
            DiagnosticCategory::GatewayError => Some("Bad Gateway: Server routing issue"),
            DiagnosticCategory::Timeout => Some("Timeout: Server may be overloaded"),
            DiagnosticCategory::ProtocolMismatch => Some("SSL Issue: Try HTTP version"),
            DiagnosticCategory::ConnectionRefused => Some("Connection Refused: Port may be closed"),
            DiagnosticCategory::Unclassified => None,
        }
    }
}

// Order matters: the first matching rule wins.
const RULES: [(&str, DiagnosticCategory); 4] = [
    ("502", DiagnosticCategory::GatewayError),
    ("timeout", DiagnosticCategory::Timeout),
    ("SSL", DiagnosticCategory::ProtocolMismatch),
    ("refused", DiagnosticCategory::ConnectionRefused),
];

/// Maps a transport error message to a category using case-sensitive substring rules.
pub fn classify(error_message: &str) -> DiagnosticCategory {
    RULES
        .iter()
        .find(|(needle, _)| error_message.contains(needle))
        .map(|(_, category)| *category)
        .unwrap_or(DiagnosticCategory::Unclassified)
}
