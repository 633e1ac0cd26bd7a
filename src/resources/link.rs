//! Link reconciliation: bring one target into the "linked to source" state.
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use chrono::{DateTime, Utc};

use super::helpers::fs::{ensure_parent_dir, remove_link};
use super::inspect::{LinkDisposition, inspect};
use super::paths::{PathFlavor, paths_match};
use super::strategy::{LinkMechanism, Linker};
use crate::logging::{Log, Tag};

/// Why reconciliation left a target untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The target is a symlink to the source.
    AlreadyLinked,
    /// The target is a hard link to the source.
    AlreadyLinkedHardlink,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyLinked => f.write_str("already-linked"),
            Self::AlreadyLinkedHardlink => f.write_str("already-linked-hardlink"),
        }
    }
}

/// Result of reconciling a single target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    /// Nothing was changed.
    Skipped(SkipReason),
    /// A new link was created with this mechanism.
    Created(LinkMechanism),
}

/// Path a foreign occupant of `target` is renamed to at time `now`.
///
/// The suffix has second granularity, so two backups of the same target
/// within one second collide.
#[must_use]
pub fn backup_path(target: &Path, now: DateTime<Utc>) -> PathBuf {
    let mut name = target.as_os_str().to_owned();
    name.push(format!(".backup.{}", now.format("%Y%m%dT%H%M%S")));
    PathBuf::from(name)
}

/// Shared machinery for reconciling links: the platform linker, the log, and
/// the path comparison rules.
pub struct Reconciler {
    linker: Arc<Linker>,
    log: Arc<dyn Log>,
    flavor: PathFlavor,
}

impl fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reconciler")
            .field("linker", &self.linker)
            .field("log", &"<dyn Log>")
            .field("flavor", &self.flavor)
            .finish()
    }
}

impl Reconciler {
    /// Build a reconciler.
    #[must_use]
    pub fn new(linker: Arc<Linker>, log: Arc<dyn Log>, flavor: PathFlavor) -> Self {
        Self {
            linker,
            log,
            flavor,
        }
    }

    /// Path comparison rules in effect.
    #[must_use]
    pub const fn flavor(&self) -> PathFlavor {
        self.flavor
    }
}

/// A desired link from `target` to `source`.
#[derive(Debug, Clone)]
pub struct LinkResource {
    /// What the link points at.
    pub source: PathBuf,
    /// Where the link lives.
    pub target: PathBuf,
}

impl LinkResource {
    /// Create a new link resource.
    #[must_use]
    pub const fn new(source: PathBuf, target: PathBuf) -> Self {
        Self { source, target }
    }

    /// Whether the source is a directory, following symlinks.
    #[must_use]
    pub fn source_is_dir(&self) -> bool {
        std::fs::metadata(&self.source).is_ok_and(|m| m.is_dir())
    }

    /// Classify the current occupant of the target.
    ///
    /// Hard-link identity is only considered for file sources.
    ///
    /// # Errors
    ///
    /// Returns an error if the target cannot be inspected.
    pub fn disposition(&self) -> Result<LinkDisposition> {
        let candidate = (!self.source_is_dir()).then_some(self.source.as_path());
        inspect(&self.target, candidate)
            .with_context(|| format!("inspect {}", self.target.display()))
    }

    /// Make the target a link to the source.
    ///
    /// Already-correct links are left alone. A stale symlink is removed; any
    /// other occupant is renamed to a timestamped backup first.
    ///
    /// # Errors
    ///
    /// Returns an error if the target cannot be inspected, cleared, or linked.
    /// Link creation failures carry a [`LinkError`](super::error::LinkError).
    pub fn reconcile(&self, reconciler: &Reconciler) -> Result<LinkOutcome> {
        let log = &reconciler.log;
        let target = &self.target;
        let source_is_dir = self.source_is_dir();

        let disposition = self.disposition()?;
        match &disposition {
            LinkDisposition::SymlinkTo(dest) if paths_match(dest, &self.source, reconciler.flavor) => {
                log.emit(Tag::Skip, &format!("Already linked: {}", target.display()));
                return Ok(LinkOutcome::Skipped(SkipReason::AlreadyLinked));
            }
            LinkDisposition::HardlinkMatch => {
                log.emit(
                    Tag::Skip,
                    &format!("Already linked (hardlink): {}", target.display()),
                );
                return Ok(LinkOutcome::Skipped(SkipReason::AlreadyLinkedHardlink));
            }
            _ => {}
        }

        ensure_parent_dir(target)?;

        match disposition {
            LinkDisposition::SymlinkTo(_) => {
                remove_link(target)?;
                log.info(&format!("Removed stale symlink: {}", target.display()));
            }
            LinkDisposition::ForeignEntry => {
                let backup = backup_path(target, Utc::now());
                std::fs::rename(target, &backup).with_context(|| {
                    format!("back up {} to {}", target.display(), backup.display())
                })?;
                log.info(&format!(
                    "Backed up existing path: {} -> {}",
                    target.display(),
                    backup.display()
                ));
            }
            LinkDisposition::Absent | LinkDisposition::HardlinkMatch => {}
        }

        let mechanism = reconciler
            .linker
            .create(&self.source, target, source_is_dir)?;
        if mechanism == LinkMechanism::Hardlink {
            log.info(&format!(
                "File symlink blocked by platform policy; using hardlink: {}",
                target.display()
            ));
        }
        log.emit(
            Tag::Link,
            &format!(
                "{} -> {} ({mechanism})",
                self.source.display(),
                target.display()
            ),
        );
        Ok(LinkOutcome::Created(mechanism))
    }
}
