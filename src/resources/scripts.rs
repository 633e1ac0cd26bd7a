//! Helper scripts written into the user's bin directory.
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use super::helpers::fs::{ensure_parent_dir, remove_symlink_if_present};
use crate::logging::{Log, Tag};

/// Substitute every `(placeholder, value)` pair in `template`.
///
/// Placeholders are replaced literally in a single left-to-right pass, so a
/// substituted value is never rescanned for other placeholders. When two
/// placeholders start at the same offset the earlier pair wins.
#[must_use]
pub fn render_template(template: &str, replacements: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some((at, placeholder, value)) = replacements
        .iter()
        .filter(|(placeholder, _)| !placeholder.is_empty())
        .filter_map(|&(placeholder, value)| {
            rest.find(placeholder).map(|at| (at, placeholder, value))
        })
        .min_by_key(|(at, _, _)| *at)
    {
        out.push_str(rest.get(..at).unwrap_or_default());
        out.push_str(value);
        rest = rest.get(at + placeholder.len()..).unwrap_or_default();
    }
    out.push_str(rest);
    out
}

/// Where a script's contents come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptContents {
    /// Text rendered from a template.
    Rendered(String),
    /// A file copied verbatim.
    CopyOf(PathBuf),
}

/// A script to materialize at `target`.
#[derive(Debug, Clone)]
pub struct ScriptResource {
    /// Destination path.
    pub target: PathBuf,
    /// What to write there.
    pub contents: ScriptContents,
    /// Mark the file executable (Unix only).
    pub executable: bool,
}

impl ScriptResource {
    /// Script rendered from a template.
    #[must_use]
    pub const fn rendered(target: PathBuf, text: String, executable: bool) -> Self {
        Self {
            target,
            contents: ScriptContents::Rendered(text),
            executable,
        }
    }

    /// Script copied from `source`.
    #[must_use]
    pub const fn copied(source: PathBuf, target: PathBuf, executable: bool) -> Self {
        Self {
            target,
            contents: ScriptContents::CopyOf(source),
            executable,
        }
    }

    /// Write the script, replacing a symlink left at the target by an older
    /// link-based setup.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory, the file, or its permissions
    /// cannot be written.
    pub fn apply(&self, log: &dyn Log) -> Result<()> {
        let target = &self.target;
        ensure_parent_dir(target)?;
        if remove_symlink_if_present(target)? {
            log.debug(&format!("removed symlink at {}", target.display()));
        }

        let verb = match &self.contents {
            ScriptContents::Rendered(text) => {
                std::fs::write(target, text)
                    .with_context(|| format!("write {}", target.display()))?;
                "Generated"
            }
            ScriptContents::CopyOf(source) => {
                std::fs::copy(source, target).with_context(|| {
                    format!("copy {} to {}", source.display(), target.display())
                })?;
                "Copied"
            }
        };

        if self.executable {
            make_executable(target)?;
        }
        log.emit(Tag::Action, &format!("{verb}: {}", target.display()));
        Ok(())
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
        .with_context(|| format!("set permissions: {}", path.display()))
}

#[cfg(not(unix))]
#[allow(clippy::unnecessary_wraps)]
const fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}
