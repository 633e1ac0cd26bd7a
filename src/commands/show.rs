//! Command: print the current link status.
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};

use crate::cli::GlobalOpts;
use crate::config::Settings;
use crate::config::dotfiles::{BASE_DOTFILES, under};
use crate::config::manifest;
use crate::logging::{Log, Logger};
use crate::resources::PathFlavor;
use crate::tasks::status::{StatusLine, report};

/// Everything the `show` command prints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowReport {
    /// Base dotfiles that are symlinks, as `(label, raw link text)`.
    pub dotfiles: Vec<(&'static str, PathBuf)>,
    /// One line per manifest target.
    pub mappings: Vec<StatusLine>,
}

/// Raw link text of `path` if it is a symlink.
fn link_text(path: &Path) -> Option<PathBuf> {
    std::fs::symlink_metadata(path)
        .ok()
        .filter(|m| m.file_type().is_symlink())
        .and_then(|_| std::fs::read_link(path).ok())
}

/// Gather link status without changing anything.
///
/// # Errors
///
/// Returns an error if the manifest cannot be loaded or a target cannot be
/// inspected.
pub fn collect(settings: &Settings, flavor: PathFlavor) -> Result<ShowReport> {
    let dotfiles = BASE_DOTFILES
        .iter()
        .filter_map(|entry| {
            link_text(&under(&settings.home, entry.target)).map(|text| (entry.target, text))
        })
        .collect();

    let manifest = manifest::load(&settings.manifest)
        .with_context(|| format!("loading {}", settings.manifest.display()))?;
    let mappings = report(&manifest, &settings.root, &settings.home, flavor)?;

    Ok(ShowReport { dotfiles, mappings })
}

/// Plain listing of symlinked base dotfiles, followed by the mapping header.
#[allow(clippy::print_stdout)]
fn print_dotfiles(dotfiles: &[(&'static str, PathBuf)]) {
    println!();
    for (label, text) in dotfiles {
        println!("  {label} -> {}", text.display());
    }
    println!("\nAI mappings:");
    println!("AI agent link status:");
}

/// Run the show command.
///
/// # Errors
///
/// Returns an error if settings cannot be resolved or the status cannot be
/// collected.
pub fn run(global: &GlobalOpts, log: &Arc<Logger>) -> Result<()> {
    let ctx = super::host_context(global, log)?;
    let status = collect(&ctx.settings, ctx.flavor())?;

    log.info("Current link status");
    print_dotfiles(&status.dotfiles);
    for line in &status.mappings {
        log.emit(line.status.tag(), &line.detail);
    }
    Ok(())
}
