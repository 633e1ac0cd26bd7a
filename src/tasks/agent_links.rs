//! Apply the declarative link manifest.
use std::path::{Path, PathBuf};

use anyhow::Result;

use super::{Context, Task, TaskResult, TaskStats};
use crate::config::manifest::{LinkManifest, TargetSpec};
use crate::resources::paths::expand_home;
use crate::resources::{LinkOutcome, LinkResource};

/// Counters for one pass over the manifest.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ManifestStats {
    /// Created, already-correct, and skipped links.
    pub links: TaskStats,
    /// Targets naming a source key the manifest does not define.
    pub unknown_sources: u32,
    /// Optional targets whose reconciliation failed.
    pub optional_failures: u32,
}

/// Resolve a manifest target path to an absolute path under `home`.
///
/// # Errors
///
/// Returns an error if the current directory is needed and unavailable.
pub fn resolve_target(spec: &TargetSpec, home: &Path) -> Result<PathBuf> {
    Ok(std::path::absolute(expand_home(&spec.path, home))?)
}

/// Log the line reported for a target whose source key is not defined.
pub(crate) fn unknown_source_message(spec: &TargetSpec) -> String {
    format!(
        "Unknown source key '{}' for target '{}'",
        spec.source, spec.path
    )
}

/// Reconcile every manifest target in order.
///
/// Unknown keys, missing sources, foreign occupants of optional targets, and
/// failures on optional targets are reported and skipped.
///
/// # Errors
///
/// Returns the first failure on a required target; later targets are not
/// touched.
pub fn apply_manifest(manifest: &LinkManifest, ctx: &Context) -> Result<ManifestStats> {
    let mut stats = ManifestStats::default();

    for spec in &manifest.targets {
        let Some(source) = manifest.source_path(spec, ctx.root()) else {
            ctx.log.error(&unknown_source_message(spec));
            stats.unknown_sources += 1;
            continue;
        };
        if std::fs::symlink_metadata(&source).is_err() {
            ctx.log.warn(&format!(
                "Missing source path, skipping: {}",
                source.display()
            ));
            stats.links.skipped += 1;
            continue;
        }

        let target = resolve_target(spec, ctx.home())?;
        let resource = LinkResource::new(source, target);

        if spec.optional {
            let disposition = resource.disposition()?;
            if disposition.exists() && !disposition.is_link() {
                ctx.log.info(&format!(
                    "Optional target exists and is not a link; skipping: {}",
                    resource.target.display()
                ));
                stats.links.skipped += 1;
                continue;
            }
        }

        match resource.reconcile(&ctx.reconciler) {
            Ok(LinkOutcome::Skipped(_)) => stats.links.already_ok += 1,
            Ok(LinkOutcome::Created(_)) => stats.links.changed += 1,
            Err(e) if spec.optional => {
                ctx.log.warn(&format!(
                    "Optional target failed: {} ({e:#})",
                    resource.target.display()
                ));
                stats.optional_failures += 1;
            }
            Err(e) => return Err(e),
        }
    }

    Ok(stats)
}

/// Link AI agent configuration declared in the manifest.
#[derive(Debug)]
pub struct LinkAgentMappings {
    manifest: LinkManifest,
}

impl LinkAgentMappings {
    /// Create the task from an already loaded manifest, so a malformed file
    /// fails before any task runs.
    #[must_use]
    pub const fn new(manifest: LinkManifest) -> Self {
        Self { manifest }
    }
}

impl Task for LinkAgentMappings {
    fn name(&self) -> &'static str {
        "Link AI agent mappings"
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let stats = apply_manifest(&self.manifest, ctx)?;
        if stats.unknown_sources > 0 || stats.optional_failures > 0 {
            ctx.log.debug(&format!(
                "{} unknown source keys, {} optional failures",
                stats.unknown_sources, stats.optional_failures
            ));
        }
        Ok(stats.links.finish(ctx))
    }
}
