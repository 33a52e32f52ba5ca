//! Logger setup driven by the `log_*` fields of the app config.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

pub(crate) const DEFAULT_LOG_FILE: &str = "reachprobe.log";

/// Where log lines go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogDestination {
    File,
    /// Stderr, so the transcript on stdout stays clean.
    #[default]
    Terminal,
    Both,
}

impl LogDestination {
    fn wants_terminal(self) -> bool {
        matches!(self, LogDestination::Terminal | LogDestination::Both)
    }

    fn wants_file(self) -> bool {
        matches!(self, LogDestination::File | LogDestination::Both)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LogSettings {
    pub destination: LogDestination,
    pub level: LevelFilter,
    pub file: PathBuf,
}

#[derive(Debug, thiserror::Error)]
#[error("could not open log file {path}: {source}")]
pub(crate) struct LogFileError {
    path: String,
    source: io::Error,
}

/// Installs the global logger. When the log file cannot be opened the
/// terminal logger is installed instead and the open error is returned so
/// the caller can report it through the logger that did come up.
pub(crate) fn initialize(settings: &LogSettings) -> Result<(), LogFileError> {
    let (loggers, file_error) = build_loggers(settings);
    let _ = CombinedLogger::init(loggers);
    match file_error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn build_loggers(settings: &LogSettings) -> (Vec<Box<dyn SharedLogger>>, Option<LogFileError>) {
    let config = line_format();
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    let mut file_error = None;

    if settings.destination.wants_file() {
        match open_append(&settings.file) {
            Ok(file) => loggers.push(WriteLogger::new(settings.level, config.clone(), file)),
            Err(err) => file_error = Some(err),
        }
    }
    if settings.destination.wants_terminal() || loggers.is_empty() {
        loggers.push(TermLogger::new(
            settings.level,
            config,
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ));
    }
    (loggers, file_error)
}

fn line_format() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .add_filter_ignore_str("hyper_util")
        .add_filter_ignore_str("rustls")
        .build()
}

fn open_append(path: &Path) -> Result<File, LogFileError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| LogFileError {
            path: path.display().to_string(),
            source,
        })
}
