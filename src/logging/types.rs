//! Core logging types: console options and the [`Log`] trait.

/// Console presentation options, threaded explicitly from the CLI flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogOptions {
    /// Show debug-level messages on the console.
    pub debug: bool,
    /// Emit ANSI colour codes on the console.
    pub color: bool,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            debug: false,
            color: true,
        }
    }
}

/// Severity of a logged message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    /// Diagnostic detail, hidden on the console unless `--debug`.
    Debug,
    /// Normal progress output.
    Info,
    /// Section header for a major step.
    Stage,
    /// Something the user should look at; the run continues.
    Warn,
    /// A failure.
    Error,
}

/// Abstraction over logging backends.
///
/// [`Logger`](super::logger::Logger) forwards to `tracing`;
/// [`MemoryLog`](super::memory::MemoryLog) keeps messages in memory so tests
/// can assert on what a command reported.
pub trait Log: Send + Sync + std::fmt::Debug {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (suppressed on console unless debugging).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
}
