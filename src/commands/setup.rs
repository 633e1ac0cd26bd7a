//! Command: run the setup phases.
use std::sync::Arc;

use anyhow::{Context as _, Result};

use crate::cli::{GlobalOpts, SetupOpts};
use crate::config::manifest::{self, LinkManifest};
use crate::logging::{Log as _, Logger};
use crate::tasks::{self, Context, Task};
use crate::tasks::agent_links::LinkAgentMappings;
use crate::tasks::bin_scripts::InstallBinScripts;
use crate::tasks::dotfiles::{LinkBaseDotfiles, LinkConfigDirs, LinkGitHubConfig, LinkWindowsExtras};
use crate::tasks::project_agents::LinkProjectAgents;
use crate::tasks::submodules::InitSubmodules;

/// An ordered group of tasks announced by one header line.
pub struct Phase {
    /// Line logged before the phase starts.
    pub header: &'static str,
    /// Tasks in execution order.
    pub tasks: Vec<Box<dyn Task>>,
}

impl std::fmt::Debug for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Phase")
            .field("header", &self.header)
            .field(
                "tasks",
                &self.tasks.iter().map(|t| t.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Tasks of the dotfiles phase.
///
/// With `--project-agents` the phase only links agents into that project.
#[must_use]
pub fn dotfiles_tasks(opts: &SetupOpts) -> Vec<Box<dyn Task>> {
    if let Some(project) = &opts.project_agents {
        return vec![Box::new(LinkProjectAgents::new(project.clone()))];
    }
    vec![
        Box::new(InitSubmodules {
            disabled: opts.skip_submodules,
        }),
        Box::new(LinkBaseDotfiles),
        Box::new(LinkGitHubConfig),
        Box::new(LinkConfigDirs),
        Box::new(LinkWindowsExtras),
        Box::new(InstallBinScripts),
    ]
}

/// Build the phases for `opts`.
///
/// `manifest` must be loaded whenever the mode includes the AI agents phase.
#[must_use]
pub fn plan(opts: &SetupOpts, manifest: Option<LinkManifest>) -> Vec<Phase> {
    let mut phases = Vec::new();
    if opts.mode.includes_dotfiles() {
        phases.push(Phase {
            header: "Running dotfiles setup...",
            tasks: dotfiles_tasks(opts),
        });
    }
    if let Some(manifest) = manifest {
        phases.push(Phase {
            header: "Running AI agents setup...",
            tasks: vec![Box::new(LinkAgentMappings::new(manifest))],
        });
    }
    phases
}

/// Run setup against an existing context.
///
/// The manifest is loaded before any phase runs, so a malformed manifest
/// fails without touching the filesystem.
///
/// # Errors
///
/// Returns an error if the manifest cannot be loaded or a required task
/// fails; later tasks are not run.
pub fn run_with(ctx: &Context, opts: &SetupOpts) -> Result<()> {
    let manifest = if opts.mode.includes_ai_agents() {
        let path = &ctx.settings.manifest;
        Some(manifest::load(path).with_context(|| format!("loading {}", path.display()))?)
    } else {
        None
    };

    for phase in plan(opts, manifest) {
        ctx.log.info(phase.header);
        tasks::run_all(&phase.tasks, ctx)?;
    }

    ctx.log.info("All linking tasks completed");
    Ok(())
}

/// Run the setup command.
///
/// # Errors
///
/// Returns an error if settings cannot be resolved, the manifest is invalid,
/// or a required task fails.
pub fn run(global: &GlobalOpts, opts: &SetupOpts, log: &Arc<Logger>) -> Result<()> {
    log.info(&format!("link-dotfiles {}", super::version::version()));
    let ctx = super::host_context(global, log)?;
    log.debug(&format!("mode: {}", opts.mode));

    let result = run_with(&ctx, opts);
    log.print_summary();
    result
}
