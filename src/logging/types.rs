//! Core logging types: status tags, task entries, and the [`Log`] trait.
use std::fmt;

use tracing::Level;

/// Bracketed tag that prefixes every reconciliation and status line.
///
/// Tags are part of the output contract: scripts grep for `[LINK]` and
/// `[MISMATCH]`, so their spelling never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    /// Informational note about a decision that was made.
    Info,
    /// Recoverable problem; the run continues.
    Warn,
    /// Failure of a single entry or of the run.
    Error,
    /// Nothing to do; the target is already correct.
    Skip,
    /// A link was created.
    Link,
    /// A file was generated or copied.
    Action,
    /// Target is already correct.
    Ok,
    /// Target is a symlink to somewhere else.
    Mismatch,
    /// Target exists and is not a link.
    Conflict,
    /// Optional target exists and is not a link.
    OptionalConflict,
    /// Target does not exist.
    Missing,
    /// Source does not exist.
    MissingSource,
}

impl Tag {
    /// Bracketed rendering, e.g. `[LINK]`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "[INFO]",
            Self::Warn => "[WARN]",
            Self::Error => "[ERROR]",
            Self::Skip => "[SKIP]",
            Self::Link => "[LINK]",
            Self::Action => "[ACTION]",
            Self::Ok => "[OK]",
            Self::Mismatch => "[MISMATCH]",
            Self::Conflict => "[CONFLICT]",
            Self::OptionalConflict => "[OPTIONAL_CONFLICT]",
            Self::Missing => "[MISSING]",
            Self::MissingSource => "[MISSING_SOURCE]",
        }
    }

    /// Tracing level the tag is emitted at.
    #[must_use]
    pub const fn level(self) -> Level {
        match self {
            Self::Warn => Level::WARN,
            Self::Error => Level::ERROR,
            _ => Level::INFO,
        }
    }

    /// ANSI color used on the console.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Ok | Self::Link | Self::Action => "\x1b[32m",
            Self::Warn | Self::Mismatch | Self::OptionalConflict | Self::Missing => "\x1b[33m",
            Self::Error | Self::Conflict | Self::MissingSource => "\x1b[31m",
            Self::Info => "\x1b[36m",
            Self::Skip => "\x1b[2m",
        }
    }

    /// Parse the bracketed rendering back into a tag.
    #[must_use]
    pub fn from_bracketed(s: &str) -> Option<Self> {
        ALL_TAGS.iter().copied().find(|t| t.as_str() == s)
    }
}

const ALL_TAGS: [Tag; 12] = [
    Tag::Info,
    Tag::Warn,
    Tag::Error,
    Tag::Skip,
    Tag::Link,
    Tag::Action,
    Tag::Ok,
    Tag::Mismatch,
    Tag::Conflict,
    Tag::OptionalConflict,
    Tag::Missing,
    Tag::MissingSource,
];

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task execution result for summary reporting.
#[derive(Debug, Clone)]
pub struct TaskEntry {
    /// Human-readable task name.
    pub name: String,
    /// Final status of the task.
    pub status: TaskStatus,
    /// Optional detail message (e.g., skip reason or error description).
    pub message: Option<String>,
}

/// Status of a completed task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Task completed successfully.
    Ok,
    /// Task does not apply to this platform or invocation.
    NotApplicable,
    /// Task was explicitly skipped (e.g., secrets not configured).
    Skipped,
    /// Task encountered an error and could not complete.
    Failed,
}

/// Abstraction over logging backends.
///
/// [`Logger`](super::logger::Logger) writes through `tracing`; tests swap in
/// a recorder that keeps the rendered lines in memory.
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log a tagged line, e.g. `[LINK] src -> dst (symlink)`.
    fn emit(&self, tag: Tag, msg: &str);
    /// Log a debug message (suppressed on console unless verbose).
    fn debug(&self, msg: &str);
    /// Record a task result for the summary.
    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>);

    /// Log an `[INFO]` line.
    fn info(&self, msg: &str) {
        self.emit(Tag::Info, msg);
    }
    /// Log a `[WARN]` line.
    fn warn(&self, msg: &str) {
        self.emit(Tag::Warn, msg);
    }
    /// Log an `[ERROR]` line.
    fn error(&self, msg: &str) {
        self.emit(Tag::Error, msg);
    }
}
