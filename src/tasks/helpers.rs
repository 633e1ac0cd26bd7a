use std::path::Path;

use anyhow::Result;

use super::{Context, TaskStats};
use crate::config::dotfiles::{HomeLink, under};
use crate::resources::{LinkOutcome, LinkResource};

/// Link `source` to `target` when the source exists, counting the outcome.
///
/// A missing source is not an error; the fixed dotfile tables list entries
/// that only some checkouts carry.
pub fn link_if_present(ctx: &Context, source: &Path, target: &Path, stats: &mut TaskStats) -> Result<()> {
    if std::fs::symlink_metadata(source).is_err() {
        ctx.log
            .debug(&format!("source not present, skipping: {}", source.display()));
        stats.skipped += 1;
        return Ok(());
    }
    let resource = LinkResource::new(source.to_path_buf(), target.to_path_buf());
    match resource.reconcile(&ctx.reconciler)? {
        LinkOutcome::Skipped(_) => stats.already_ok += 1,
        LinkOutcome::Created(_) => stats.changed += 1,
    }
    Ok(())
}

/// Link every entry of a fixed home table whose source is present.
///
/// # Errors
///
/// Returns the first reconciliation error.
pub fn link_table(ctx: &Context, table: &[HomeLink]) -> Result<TaskStats> {
    let mut stats = TaskStats::default();
    for entry in table {
        link_if_present(
            ctx,
            &under(ctx.root(), entry.source),
            &under(ctx.home(), entry.target),
            &mut stats,
        )?;
    }
    Ok(stats)
}
