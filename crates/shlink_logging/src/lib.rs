#![deny(missing_docs)]
//! Shared logging utilities for the Shlink client workspace.
//!
//! This crate provides the `shlink_*` logging macros used across the codebase,
//! level parsing for configuration files and a minimal test initializer for
//! the global logger.

use log::LevelFilter;

/// Log target used by every `shlink_*` macro.
pub const TARGET: &str = "shlink";

/// Logs a trace-level message under the shared target.
#[macro_export]
macro_rules! shlink_trace {
    ($($arg:tt)*) => {{
        log::trace!(target: $crate::TARGET, $($arg)*);
    }};
}

/// Logs a debug-level message under the shared target.
#[macro_export]
macro_rules! shlink_debug {
    ($($arg:tt)*) => {{
        log::debug!(target: $crate::TARGET, $($arg)*);
    }};
}

/// Logs an info-level message under the shared target.
#[macro_export]
macro_rules! shlink_info {
    ($($arg:tt)*) => {{
        log::info!(target: $crate::TARGET, $($arg)*);
    }};
}

/// Logs a warn-level message under the shared target.
#[macro_export]
macro_rules! shlink_warn {
    ($($arg:tt)*) => {{
        log::warn!(target: $crate::TARGET, $($arg)*);
    }};
}

/// Logs an error-level message under the shared target.
#[macro_export]
macro_rules! shlink_error {
    ($($arg:tt)*) => {{
        log::error!(target: $crate::TARGET, $($arg)*);
    }};
}

/// Parses a level name as written in configuration files.
///
/// Matching is case-insensitive; `None` is returned for unknown names so the
/// caller can decide on a fallback.
pub fn parse_level(name: &str) -> Option<LevelFilter> {
    match name.trim().to_ascii_lowercase().as_str() {
        "off" => Some(LevelFilter::Off),
        "error" => Some(LevelFilter::Error),
        "warn" | "warning" => Some(LevelFilter::Warn),
        "info" => Some(LevelFilter::Info),
        "debug" => Some(LevelFilter::Debug),
        "trace" => Some(LevelFilter::Trace),
        _ => None,
    }
}

/// Initializes a simple terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Debug builds get the loader's per-page messages.
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
