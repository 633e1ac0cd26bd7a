//! Named units of setup work that drive the link reconciler.
pub mod agent_links;
pub mod bin_scripts;
mod context;
pub mod dotfiles;
mod helpers;
pub mod project_agents;
pub mod status;
pub mod submodules;

pub use context::Context;

use anyhow::Result;

use crate::logging::TaskStatus;

/// Result of a single task execution.
///
/// # Examples
///
/// ```
/// use link_dotfiles::tasks::TaskResult;
///
/// let ok = TaskResult::Ok;
/// let skipped = TaskResult::Skipped("git not found".into());
///
/// assert!(matches!(ok, TaskResult::Ok));
/// assert!(matches!(skipped, TaskResult::Skipped(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskResult {
    /// Task completed successfully.
    Ok,
    /// Task chose not to do its work.
    Skipped(String),
}

/// Counters for tasks that reconcile several links.
///
/// # Examples
///
/// ```
/// use link_dotfiles::tasks::TaskStats;
///
/// let stats = TaskStats { changed: 1, already_ok: 2, skipped: 3 };
/// assert_eq!(stats.summary(), "1 changed, 2 already ok, 3 skipped");
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TaskStats {
    /// Links created.
    pub changed: u32,
    /// Links that were already correct.
    pub already_ok: u32,
    /// Entries not acted on (missing source, optional conflict, ...).
    pub skipped: u32,
}

impl TaskStats {
    /// Format the summary string, e.g. `"3 changed, 10 already ok"`.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.skipped > 0 {
            format!(
                "{} changed, {} already ok, {} skipped",
                self.changed, self.already_ok, self.skipped
            )
        } else {
            format!("{} changed, {} already ok", self.changed, self.already_ok)
        }
    }

    /// Log the summary at debug level and return [`TaskResult::Ok`].
    #[must_use]
    pub fn finish(self, ctx: &Context) -> TaskResult {
        ctx.log.debug(&self.summary());
        TaskResult::Ok
    }
}

/// A named, executable task.
pub trait Task: Send + Sync {
    /// Human-readable task name.
    fn name(&self) -> &str;

    /// Whether this task applies to the current platform and invocation.
    fn should_run(&self, ctx: &Context) -> bool {
        let _ = ctx;
        true
    }

    /// Execute the task.
    ///
    /// # Errors
    ///
    /// Returns an error if the task cannot complete; the flow it belongs to
    /// stops there.
    fn run(&self, ctx: &Context) -> Result<TaskResult>;
}

/// Execute a task, recording the result in the logger.
///
/// # Errors
///
/// Returns the task's error, with the task name as context, after logging
/// and recording it as failed.
pub fn execute(task: &dyn Task, ctx: &Context) -> Result<()> {
    if !task.should_run(ctx) {
        ctx.log
            .debug(&format!("skipping task: {} (not applicable)", task.name()));
        ctx.log
            .record_task(task.name(), TaskStatus::NotApplicable, None);
        return Ok(());
    }

    ctx.log.stage(task.name());

    match task.run(ctx) {
        Ok(TaskResult::Ok) => {
            ctx.log.record_task(task.name(), TaskStatus::Ok, None);
            Ok(())
        }
        Ok(TaskResult::Skipped(reason)) => {
            ctx.log.debug(&format!("skipped: {reason}"));
            ctx.log
                .record_task(task.name(), TaskStatus::Skipped, Some(&reason));
            Ok(())
        }
        Err(e) => {
            ctx.log.error(&format!("{}: {e:#}", task.name()));
            ctx.log
                .record_task(task.name(), TaskStatus::Failed, Some(&format!("{e:#}")));
            Err(e.context(format!("task '{}' failed", task.name())))
        }
    }
}

/// Execute tasks in order, stopping at the first failure.
///
/// # Errors
///
/// Returns the first task error.
pub fn run_all(tasks: &[Box<dyn Task>], ctx: &Context) -> Result<()> {
    for task in tasks {
        execute(task.as_ref(), ctx)?;
    }
    Ok(())
}
