//! Tracing-backed logger with summary collection.
use std::path::PathBuf;
use std::sync::Mutex;

use super::types::{Log, Tag, TaskEntry, TaskStatus};
use super::utils::log_file_path;

/// Tracing target for tagged reconciliation and status lines.
pub(super) const STATUS_TARGET: &str = "link_dotfiles::status";
/// Tracing target for stage headers.
pub(super) const STAGE_TARGET: &str = "link_dotfiles::stage";

/// Logger that emits every line as a `tracing` event and collects task
/// results for the run summary.
///
/// Console and file rendering are handled by the subscriber installed with
/// [`init_subscriber`](super::subscriber::init_subscriber); every line also
/// lands in `$XDG_CACHE_HOME/link-dotfiles/<command>.log`.
#[derive(Debug)]
pub struct Logger {
    tasks: Mutex<Vec<TaskEntry>>,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create a new logger for `command`.
    ///
    /// Only remembers the log file path for the summary; the file itself is
    /// opened by the subscriber.
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self {
            tasks: Mutex::new(Vec::new()),
            log_file: log_file_path(command),
        }
    }

    /// Return a clone of all recorded task entries.
    #[must_use]
    pub fn task_entries(&self) -> Vec<TaskEntry> {
        self.tasks.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Print the summary of all recorded tasks.
    pub fn print_summary(&self) {
        let tasks = self.task_entries();
        if tasks.is_empty() {
            return;
        }

        self.stage("Summary");

        let mut ok = 0u32;
        let mut not_applicable = 0u32;
        let mut skipped = 0u32;
        let mut failed = 0u32;

        for task in &tasks {
            let (icon, color) = match task.status {
                TaskStatus::Ok => {
                    ok += 1;
                    ("✓", "\x1b[32m")
                }
                TaskStatus::NotApplicable => {
                    not_applicable += 1;
                    ("·", "\x1b[2m")
                }
                TaskStatus::Skipped => {
                    skipped += 1;
                    ("○", "\x1b[33m")
                }
                TaskStatus::Failed => {
                    failed += 1;
                    ("✗", "\x1b[31m")
                }
            };
            let suffix = task
                .message
                .as_ref()
                .map_or_else(String::new, |msg| format!(" ({msg})"));
            tracing::info!("{color}{icon} {}{suffix}\x1b[0m", task.name);
        }

        let total = ok + not_applicable + skipped + failed;
        tracing::info!(
            "{total} tasks: \x1b[32m{ok} ok\x1b[0m, \x1b[2m{not_applicable} n/a\x1b[0m, \x1b[33m{skipped} skipped\x1b[0m, \x1b[31m{failed} failed\x1b[0m"
        );

        if let Some(path) = &self.log_file {
            tracing::info!("\x1b[2mlog: {}\x1b[0m", path.display());
        }
    }
}

impl Log for Logger {
    fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    fn emit(&self, tag: Tag, msg: &str) {
        let level = tag.level();
        let tag = tag.as_str();
        if level == tracing::Level::ERROR {
            tracing::error!(target: STATUS_TARGET, tag, "{msg}");
        } else if level == tracing::Level::WARN {
            tracing::warn!(target: STATUS_TARGET, tag, "{msg}");
        } else {
            tracing::info!(target: STATUS_TARGET, tag, "{msg}");
        }
    }

    fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>) {
        if let Ok(mut guard) = self.tasks.lock() {
            guard.push(TaskEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }
}
