//! File-system helpers shared by link and script resources.
use anyhow::{Context as _, Result};
use std::path::Path;

/// Ensure the parent directory of `path` exists, creating it (and any
/// ancestors) if necessary.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create parent: {}", parent.display()))?;
    }
    Ok(())
}

/// Remove the symlink or junction at `path` without touching what it points at.
///
/// Directory links on Windows must go through `remove_dir`; if that is
/// refused with access denied, `rmdir` in a separate process is tried.
///
/// # Errors
///
/// Returns an error if the link cannot be read or removed.
pub fn remove_link(path: &Path) -> Result<()> {
    let meta = std::fs::symlink_metadata(path)
        .with_context(|| format!("reading metadata: {}", path.display()))?;
    if is_dir_like(&meta) {
        match std::fs::remove_dir(path) {
            Ok(()) => {}
            #[cfg(windows)]
            Err(e) if e.raw_os_error() == Some(5) => remove_dir_fallback(path)?,
            Err(e) => {
                return Err(e).with_context(|| format!("removing link: {}", path.display()));
            }
        }
    } else {
        std::fs::remove_file(path).with_context(|| format!("removing link: {}", path.display()))?;
    }
    Ok(())
}

/// Remove a symlink at `path` if one exists; leave anything else alone.
///
/// Returns whether a symlink was removed.
///
/// # Errors
///
/// Returns an error if the symlink exists but cannot be removed.
pub fn remove_symlink_if_present(path: &Path) -> Result<bool> {
    match std::fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => {
            remove_link(path)?;
            Ok(true)
        }
        _ => Ok(false),
    }
}

/// Whether `meta` describes a directory-like entry.
///
/// On Windows, `symlink_metadata().is_dir()` is `false` for directory
/// symlinks and junctions, so the raw `FILE_ATTRIBUTE_DIRECTORY` bit is
/// checked instead.
fn is_dir_like(meta: &std::fs::Metadata) -> bool {
    #[cfg(windows)]
    {
        use std::os::windows::fs::MetadataExt;
        meta.file_attributes() & 0x10 != 0
    }
    #[cfg(not(windows))]
    {
        meta.is_dir()
    }
}

#[cfg(windows)]
fn remove_dir_fallback(path: &Path) -> Result<()> {
    use std::os::windows::process::CommandExt;
    const CREATE_NO_WINDOW: u32 = 0x0800_0000;
    let output = std::process::Command::new("cmd")
        .arg("/c")
        .arg("rmdir")
        .arg("/q")
        .arg(path)
        .creation_flags(CREATE_NO_WINDOW)
        .output()
        .context("failed to run rmdir")?;
    if !output.status.success() {
        anyhow::bail!(
            "remove directory link '{}': {}",
            path.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    Ok(())
}
