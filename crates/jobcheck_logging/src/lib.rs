#![deny(missing_docs)]
//! Shared logging utilities for the jobcheck workspace.
//!
//! This crate provides the `jc_*` logging macros used across the codebase,
//! a helper for bounding untrusted text before it is written to the log, and
//! a minimal test initializer for the global logger.

/// Marker appended by [`clip_for_log`] when text was cut.
pub const CLIP_MARKER: &str = "...[clipped]";

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! jc_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! jc_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! jc_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! jc_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! jc_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Returns at most `max_chars` characters of `text`, followed by
/// [`CLIP_MARKER`] when anything was dropped.
///
/// Server bodies end up in diagnostics verbatim; an HTML error page can be
/// large, so callers clip before logging.
pub fn clip_for_log(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => format!("{}{CLIP_MARKER}", &text[..end]),
        None => text.to_string(),
    }
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
