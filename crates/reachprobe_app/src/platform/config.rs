use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::LevelFilter;
use reachprobe_core::SummaryPolicy;
use reachprobe_engine::ProbeSettings;
use serde::{Deserialize, Serialize};

use super::logging::{LogDestination, LogSettings, DEFAULT_LOG_FILE};

pub(crate) const DEFAULT_CONFIG_FILENAME: &str = "reachprobe.ron";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub(crate) enum SummaryMode {
    /// Only literal `Status: 200` lines count as successful.
    #[default]
    #[serde(rename = "exact_200")]
    Exact200,
    #[serde(rename = "any_2xx")]
    Any2xx,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct AppConfig {
    pub host: String,
    pub summary: SummaryMode,
    pub timeout_secs: u64,
    pub pause_ms: u64,
    pub log_destination: LogDestination,
    pub log_file: PathBuf,
    pub verbose: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            summary: SummaryMode::default(),
            timeout_secs: 10,
            pause_ms: 1000,
            log_destination: LogDestination::default(),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            verbose: false,
        }
    }
}

impl AppConfig {
    pub(crate) fn probe_settings(&self) -> ProbeSettings {
        let timeout = Duration::from_secs(self.timeout_secs);
        ProbeSettings {
            connect_timeout: timeout,
            read_timeout: timeout,
            write_timeout: timeout,
            pause: Duration::from_millis(self.pause_ms),
            summary_policy: match self.summary {
                SummaryMode::Exact200 => SummaryPolicy::ExactStatus200,
                SummaryMode::Any2xx => SummaryPolicy::Any2xx,
            },
            ..ProbeSettings::default()
        }
    }

    pub(crate) fn log_settings(&self) -> LogSettings {
        LogSettings {
            destination: self.log_destination,
            level: if self.verbose {
                LevelFilter::Debug
            } else {
                LevelFilter::Info
            },
            file: self.log_file.clone(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        source: ron::error::SpannedError,
    },
}

/// Loads the config at `path`. `None` when the file does not exist; a malformed
/// file is an error.
pub(crate) fn load_config(path: &Path) -> Result<Option<AppConfig>, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(None);
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.display().to_string(),
                source,
            })
        }
    };

    ron::from_str(&content)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
}
