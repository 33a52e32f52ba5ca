use std::fmt;

use url::Url;

/// Port suffixes probed for every scheme, in probe order. `None` is the scheme default.
pub const CANDIDATE_PORTS: [Option<u16>; 3] = [None, Some(5000), Some(3000)];

const CANDIDATE_SCHEMES: [&str; 2] = ["https", "http"];

/// One URL variant whose reachability is being tested.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CandidateEndpoint {
    url: String,
}

impl CandidateEndpoint {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for CandidateEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CandidateError {
    #[error("host is empty")]
    EmptyHost,
    #[error("invalid host {host:?}: {message}")]
    InvalidHost { host: String, message: String },
}

/// Builds the fixed candidate list for `host`: every scheme crossed with every
/// port suffix, https first, each with a trailing `/` path.
pub fn candidates_for_host(host: &str) -> Result<Vec<CandidateEndpoint>, CandidateError> {
    let host = validate_host(host)?;
    let candidates = CANDIDATE_SCHEMES
        .iter()
        .flat_map(|scheme| {
            let host = host.as_str();
            CANDIDATE_PORTS.iter().map(move |port| match port {
                Some(port) => CandidateEndpoint::new(format!("{scheme}://{host}:{port}/")),
                None => CandidateEndpoint::new(format!("{scheme}://{host}/")),
            })
        })
        .collect();
    Ok(candidates)
}

fn validate_host(raw: &str) -> Result<String, CandidateError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CandidateError::EmptyHost);
    }
    let invalid = |message: &str| CandidateError::InvalidHost {
        host: trimmed.to_string(),
        message: message.to_string(),
    };

    let parsed =
        Url::parse(&format!("https://{trimmed}/")).map_err(|err| invalid(&err.to_string()))?;
    if parsed.port().is_some() {
        return Err(invalid("host must not carry a port"));
    }
    if parsed.path() != "/" || parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(invalid("host must not carry a path"));
    }
    if !parsed.username().is_empty() {
        return Err(invalid("host must not carry credentials"));
    }
    parsed
        .host_str()
        .map(ToOwned::to_owned)
        .ok_or_else(|| invalid("missing host"))
}
