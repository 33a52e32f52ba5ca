#![deny(missing_docs)]
//! Shared logging utilities for the reachprobe workspace.
//!
//! This crate provides the `engine_*` logging macros used across the codebase,
//! a per-thread probe run tag, and a minimal test initializer for the global
//! logger.

use std::cell::Cell;

thread_local! {
    /// Thread-local storage for the probe run currently executing on this thread.
    static RUN_ID: Cell<u64> = const { Cell::new(0) };
}

/// Tags the current thread with the probe run it is executing.
/// The probe worker calls this before every run; `0` clears the tag.
pub fn set_run_id(run_id: u64) {
    RUN_ID.with(|v| v.set(run_id));
}

/// Retrieves the probe run tag for the current thread.
/// Returns 0 if no run is in progress on this thread.
pub fn current_run_id() -> u64 {
    RUN_ID.with(|v| v.get())
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! engine_trace {
    ($($arg:tt)*) => {{
        log::trace!("[run {}] {}", $crate::current_run_id(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! engine_info {
    ($($arg:tt)*) => {{
        log::info!("[run {}] {}", $crate::current_run_id(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! engine_debug {
    ($($arg:tt)*) => {{
        log::debug!("[run {}] {}", $crate::current_run_id(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! engine_warn {
    ($($arg:tt)*) => {{
        log::warn!("[run {}] {}", $crate::current_run_id(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! engine_error {
    ($($arg:tt)*) => {{
        log::error!("[run {}] {}", $crate::current_run_id(), format_args!($($arg)*));
    }};
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Another test may have installed the logger already.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
