//! Fixed dotfile links from the repository into the home directory.
use anyhow::Result;

use super::helpers::{link_if_present, link_table};
use super::{Context, Task, TaskResult, TaskStats};
use crate::config::dotfiles::{
    BASE_DOTFILES, CONFIG_DIRS, GITHUB_CONFIG, POWERSHELL_PROFILE, POWERSHELL_PROFILE_TARGETS,
    TERMINAL_ROOTS, TERMINAL_SETTINGS, under,
};

/// Link shell and editor dotfiles into home.
#[derive(Debug)]
pub struct LinkBaseDotfiles;

impl Task for LinkBaseDotfiles {
    fn name(&self) -> &'static str {
        "Link base dotfiles"
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        ctx.log.info("Linking base dotfiles...");
        Ok(link_table(ctx, BASE_DOTFILES)?.finish(ctx))
    }
}

/// Link Copilot instructions, prompts, and agents into `~/.github`.
#[derive(Debug)]
pub struct LinkGitHubConfig;

impl Task for LinkGitHubConfig {
    fn name(&self) -> &'static str {
        "Link GitHub configuration"
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        ctx.log.info("Linking GitHub configuration...");
        Ok(link_table(ctx, GITHUB_CONFIG)?.finish(ctx))
    }
}

/// Link application configuration into `~/.config`.
#[derive(Debug)]
pub struct LinkConfigDirs;

impl Task for LinkConfigDirs {
    fn name(&self) -> &'static str {
        "Link configuration directories"
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        ctx.log.info("Linking configuration directories...");
        Ok(link_table(ctx, CONFIG_DIRS)?.finish(ctx))
    }
}

/// Link Windows Terminal settings and the PowerShell profile.
#[derive(Debug)]
pub struct LinkWindowsExtras;

impl Task for LinkWindowsExtras {
    fn name(&self) -> &'static str {
        "Link Windows configuration"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.platform.is_windows()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        ctx.log.info("Linking Windows-specific configuration...");
        let mut stats = TaskStats::default();

        let settings = under(ctx.root(), TERMINAL_SETTINGS);
        if settings.exists() {
            // Only terminals that have been launched once have a LocalState.
            for root in TERMINAL_ROOTS {
                let state = under(ctx.home(), root);
                if state.is_dir() {
                    link_if_present(ctx, &settings, &state.join("settings.json"), &mut stats)?;
                }
            }
        }

        let profile = under(ctx.root(), POWERSHELL_PROFILE);
        for target in POWERSHELL_PROFILE_TARGETS {
            link_if_present(ctx, &profile, &under(ctx.home(), target), &mut stats)?;
        }

        Ok(stats.finish(ctx))
    }
}
