//! Git submodule initialization.
use anyhow::Result;

use super::{Context, Task, TaskResult};

/// Run `git submodule update --init --recursive` in the dotfiles root.
///
/// Failure is reported as a warning; linking continues without submodules.
#[derive(Debug, Default)]
pub struct InitSubmodules {
    /// Set by `--skip-submodules`.
    pub disabled: bool,
}

impl Task for InitSubmodules {
    fn name(&self) -> &'static str {
        "Initialize git submodules"
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        if self.disabled {
            return Ok(TaskResult::Skipped("disabled by --skip-submodules".into()));
        }
        if !ctx.executor.which("git") {
            return Ok(TaskResult::Skipped("git not found".into()));
        }

        ctx.log.info("Initializing git submodules...");
        let result = ctx.executor.run_in_unchecked(
            ctx.root(),
            "git",
            &["submodule", "update", "--init", "--recursive"],
        )?;
        if result.success {
            ctx.log.info("Git submodules initialized");
        } else {
            let stderr = result.stderr.trim();
            let reason = if stderr.is_empty() { "unknown error" } else { stderr };
            ctx.log
                .warn(&format!("Failed to initialize submodules: {reason}"));
        }
        Ok(TaskResult::Ok)
    }
}
