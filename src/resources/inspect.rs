//! Classify what currently occupies a link target.
use std::io;
use std::path::{Path, PathBuf};

/// What a target path holds right now.
///
/// Always recomputed from the filesystem; never cached between entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkDisposition {
    /// Nothing exists at the target.
    Absent,
    /// A symlink (or junction) whose text resolves to this absolute path.
    SymlinkTo(PathBuf),
    /// A regular file sharing identity with the candidate source.
    HardlinkMatch,
    /// Anything else: a file, directory, or other entry we did not create.
    ForeignEntry,
}

impl LinkDisposition {
    /// Whether anything is present at the target.
    #[must_use]
    pub const fn exists(&self) -> bool {
        !matches!(self, Self::Absent)
    }

    /// Whether the target is one of our links, i.e. a symlink or a hard link
    /// to the source.
    #[must_use]
    pub const fn is_link(&self) -> bool {
        matches!(self, Self::SymlinkTo(_) | Self::HardlinkMatch)
    }
}

/// Inspect `target`, checking hard-link identity against `candidate_source`.
///
/// # Errors
///
/// Returns any I/O error other than not-found.
pub fn inspect(target: &Path, candidate_source: Option<&Path>) -> io::Result<LinkDisposition> {
    let meta = match std::fs::symlink_metadata(target) {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(LinkDisposition::Absent),
        Err(e) => return Err(e),
    };

    if meta.file_type().is_symlink() {
        let raw = std::fs::read_link(target)?;
        return Ok(LinkDisposition::SymlinkTo(resolve_link_text(target, &raw)));
    }

    if meta.is_file()
        && let Some(source) = candidate_source
        && is_same_file(source, target)?
    {
        return Ok(LinkDisposition::HardlinkMatch);
    }

    Ok(LinkDisposition::ForeignEntry)
}

/// Resolve raw link text against the directory containing the link.
fn resolve_link_text(link: &Path, raw: &Path) -> PathBuf {
    if raw.is_absolute() {
        return raw.to_path_buf();
    }
    link.parent()
        .map_or_else(|| raw.to_path_buf(), |parent| parent.join(raw))
}

/// Whether `a` and `b` are both regular files with the same identity.
///
/// Neither path is followed if it is a symlink. A missing path on either side
/// is reported as "not the same".
///
/// # Errors
///
/// Returns any I/O error other than not-found.
pub fn is_same_file(a: &Path, b: &Path) -> io::Result<bool> {
    let (Some(meta_a), Some(meta_b)) = (lstat_if_exists(a)?, lstat_if_exists(b)?) else {
        return Ok(false);
    };
    if !meta_a.is_file() || !meta_b.is_file() {
        return Ok(false);
    }
    same_identity(a, &meta_a, b, &meta_b)
}

fn lstat_if_exists(path: &Path) -> io::Result<Option<std::fs::Metadata>> {
    match std::fs::symlink_metadata(path) {
        Ok(meta) => Ok(Some(meta)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

#[cfg(unix)]
#[allow(clippy::unnecessary_wraps)]
fn same_identity(
    _a: &Path,
    meta_a: &std::fs::Metadata,
    _b: &Path,
    meta_b: &std::fs::Metadata,
) -> io::Result<bool> {
    use std::os::unix::fs::MetadataExt;
    Ok(meta_a.dev() == meta_b.dev() && meta_a.ino() == meta_b.ino())
}

/// Volume serial and file index are only reachable through an open handle on
/// Windows.
#[cfg(windows)]
fn same_identity(
    a: &Path,
    _meta_a: &std::fs::Metadata,
    b: &Path,
    _meta_b: &std::fs::Metadata,
) -> io::Result<bool> {
    same_file::is_same_file(a, b)
}
