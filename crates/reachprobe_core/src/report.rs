//! Text rendering of a probe session.
//!
//! The transcript is append-only: the rendering of the first `k` records is a
//! prefix of the rendering of the first `k + 1`, and the progress text is a
//! prefix of the final report.

use std::fmt::Write as _;

use crate::{ProbeOutcome, ProbeRecord, ProbeSession};

/// Maximum number of body characters kept in a preview.
pub const BODY_PREVIEW_CHARS: usize = 100;

const ELLIPSIS: &str = "...";
const RECORD_SEPARATOR: &str = "---\n";
const UNKNOWN_CONTENT_TYPE: &str = "unknown";

/// Truncates `body` to `max_chars` characters, appending `...` when anything was cut.
pub fn body_preview(body: &str, max_chars: usize) -> String {
    match body.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &body[..cut]),
        None => body.to_string(),
    }
}

pub(crate) fn status_line(status_code: u16) -> String {
    format!("Status: {status_code}")
}

/// Renders one record block. `ordinal` is 1-based.
pub fn format_record(ordinal: usize, record: &ProbeRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Test {ordinal}: {}", record.candidate());
    match record.outcome() {
        ProbeOutcome::Success {
            status_code,
            status_message,
            content_type,
            body_preview,
        } => {
            out.push_str("✅ SUCCESS\n");
            let _ = writeln!(out, "{}", status_line(*status_code));
            let _ = writeln!(out, "Message: {status_message}");
            let _ = writeln!(
                out,
                "Content-Type: {}",
                content_type.as_deref().unwrap_or(UNKNOWN_CONTENT_TYPE)
            );
            let _ = writeln!(out, "Content: {body_preview}");
        }
        ProbeOutcome::Failure { error_message } => {
            out.push_str("❌ FAILED\n");
            let _ = writeln!(out, "Error: {error_message}");
            if let Some(hint) = record.category().and_then(|category| category.hint()) {
                let _ = writeln!(out, "→ {hint}");
            }
        }
    }
    out.push_str(RECORD_SEPARATOR);
    out
}

/// Renders every record so far, each block followed by a blank line.
pub fn format_progress(session: &ProbeSession) -> String {
    session
        .records()
        .iter()
        .enumerate()
        .fold(String::new(), |mut out, (index, record)| {
            out.push_str(&format_record(index + 1, record));
            out.push('\n');
            out
        })
}

/// Renders the closing summary block.
pub fn format_summary(session: &ProbeSession) -> String {
    let mut out = String::from("\n=== SUMMARY ===\n");
    let successful = session.successful_endpoints();
    if successful.is_empty() {
        out.push_str("❌ No successful connections found\n");
        out.push_str("This suggests a network or server configuration issue.\n");
    } else {
        out.push_str("✅ Successful connections:\n");
        for endpoint in successful {
            let _ = writeln!(out, "• {endpoint}");
        }
        out.push_str("\nUse these URLs for your Android app integration.\n");
    }
    out
}

/// Full report: progress transcript followed by the summary.
pub fn format_report(session: &ProbeSession) -> String {
    let mut out = format_progress(session);
    out.push_str(&format_summary(session));
    out
}
