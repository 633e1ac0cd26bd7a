//! Link the shared agents directory into a single project.
use std::path::PathBuf;

use anyhow::Result;

use super::{Context, Task, TaskResult};
use crate::config::dotfiles::{PROJECT_AGENTS_SOURCE, PROJECT_AGENTS_TARGET, under};
use crate::error::TaskError;
use crate::resources::LinkResource;

/// Link `<root>/agents` into `<project>/.claude/agents`.
#[derive(Debug)]
pub struct LinkProjectAgents {
    /// Project directory, as given on the command line.
    pub project: PathBuf,
}

impl LinkProjectAgents {
    /// Create the task for `project`.
    #[must_use]
    pub const fn new(project: PathBuf) -> Self {
        Self { project }
    }
}

impl Task for LinkProjectAgents {
    fn name(&self) -> &'static str {
        "Link project agents"
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let project = std::path::absolute(&self.project)?;
        ctx.log
            .info(&format!("Linking agents into project: {}", project.display()));

        let meta = std::fs::metadata(&project).map_err(|_| TaskError::InvalidProjectDir {
            path: project.clone(),
            reason: "does not exist",
        })?;
        if !meta.is_dir() {
            return Err(TaskError::InvalidProjectDir {
                path: project,
                reason: "is not a directory",
            }
            .into());
        }

        let source = under(ctx.root(), PROJECT_AGENTS_SOURCE);
        if !source.exists() {
            return Err(TaskError::MissingSource(source).into());
        }

        LinkResource::new(source, under(&project, PROJECT_AGENTS_TARGET)).reconcile(&ctx.reconciler)?;
        Ok(TaskResult::Ok)
    }
}
