//! Read-only classification of manifest targets.
use std::fmt;
use std::path::Path;

use anyhow::{Context as _, Result};

use super::agent_links::{resolve_target, unknown_source_message};
use crate::config::manifest::LinkManifest;
use crate::logging::Tag;
use crate::resources::paths::{PathFlavor, paths_match};
use crate::resources::{LinkDisposition, LinkResource};

/// State of one manifest target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    /// Linked to the expected source.
    Ok,
    /// A symlink to somewhere else.
    Mismatch,
    /// Occupied by something that is not a link.
    Conflict,
    /// Like [`Conflict`](Self::Conflict), on a target that setup never
    /// displaces.
    OptionalConflict,
    /// Nothing at the target.
    Missing,
    /// The source does not exist in the dotfiles root.
    MissingSource,
    /// The target names a source key the manifest does not define.
    UnknownSource,
}

impl LinkStatus {
    /// Bracketed tag this status is printed with.
    #[must_use]
    pub const fn tag(self) -> Tag {
        match self {
            Self::Ok => Tag::Ok,
            Self::Mismatch => Tag::Mismatch,
            Self::Conflict => Tag::Conflict,
            Self::OptionalConflict => Tag::OptionalConflict,
            Self::Missing => Tag::Missing,
            Self::MissingSource => Tag::MissingSource,
            Self::UnknownSource => Tag::Error,
        }
    }
}

/// One line of the status report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    /// Classification.
    pub status: LinkStatus,
    /// Text printed after the tag.
    pub detail: String,
}

impl StatusLine {
    fn new(status: LinkStatus, detail: String) -> Self {
        Self { status, detail }
    }
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.status.tag(), self.detail)
    }
}

/// Classify every manifest target without touching the filesystem.
///
/// Symlink targets are shown with their raw link text.
///
/// # Errors
///
/// Returns an error if a target cannot be inspected.
pub fn report(
    manifest: &LinkManifest,
    root: &Path,
    home: &Path,
    flavor: PathFlavor,
) -> Result<Vec<StatusLine>> {
    let mut lines = Vec::with_capacity(manifest.targets.len());

    for spec in &manifest.targets {
        let Some(source) = manifest.source_path(spec, root) else {
            lines.push(StatusLine::new(
                LinkStatus::UnknownSource,
                unknown_source_message(spec),
            ));
            continue;
        };
        if std::fs::symlink_metadata(&source).is_err() {
            lines.push(StatusLine::new(
                LinkStatus::MissingSource,
                source.display().to_string(),
            ));
            continue;
        }

        let resource = LinkResource::new(source, resolve_target(spec, home)?);
        let (target, source) = (resource.target.display(), resource.source.display());
        let line = match resource.disposition()? {
            LinkDisposition::SymlinkTo(dest) => {
                let text = std::fs::read_link(&resource.target)
                    .with_context(|| format!("read link {target}"))?;
                if paths_match(&dest, &resource.source, flavor) {
                    StatusLine::new(LinkStatus::Ok, format!("{target} -> {}", text.display()))
                } else {
                    StatusLine::new(
                        LinkStatus::Mismatch,
                        format!("{target} -> {} (expected {source})", text.display()),
                    )
                }
            }
            LinkDisposition::HardlinkMatch => {
                StatusLine::new(LinkStatus::Ok, format!("{target} (hardlink to {source})"))
            }
            LinkDisposition::ForeignEntry => {
                let status = if spec.optional {
                    LinkStatus::OptionalConflict
                } else {
                    LinkStatus::Conflict
                };
                StatusLine::new(status, format!("{target} (exists but is not a symlink)"))
            }
            LinkDisposition::Absent => StatusLine::new(LinkStatus::Missing, target.to_string()),
        };
        lines.push(line);
    }

    Ok(lines)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::config::manifest::TargetSpec;
    use crate::platform::Platform;
    use crate::tasks::test_helpers::Sandbox;
    use std::fs;

    fn manifest(sources: &[(&str, &str)], targets: &[(&str, &str, bool)]) -> LinkManifest {
        LinkManifest {
            sources: sources
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
            targets: targets
                .iter()
                .map(|(source, path, optional)| TargetSpec {
                    source: (*source).to_string(),
                    path: (*path).to_string(),
                    optional: *optional,
                })
                .collect(),
        }
    }

    fn render(sandbox: &Sandbox, lines: &[StatusLine]) -> String {
        let root = sandbox.root.display().to_string();
        let home = sandbox.home.display().to_string();
        lines
            .iter()
            .map(|l| l.to_string().replace(&root, "<root>").replace(&home, "<home>"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn status_tags() {
        assert_eq!(LinkStatus::Ok.tag().as_str(), "[OK]");
        assert_eq!(
            LinkStatus::OptionalConflict.tag().as_str(),
            "[OPTIONAL_CONFLICT]"
        );
        assert_eq!(LinkStatus::UnknownSource.tag().as_str(), "[ERROR]");
    }

    #[cfg(unix)]
    #[test]
    fn report_classifies_every_state() {
        let sandbox = Sandbox::new();
        let agents = sandbox.mkdir("agents");
        let rules = sandbox.write("AGENTS.md", "rules");
        sandbox.write("settings.json", "{}");

        fs::create_dir_all(sandbox.home_path(".claude")).unwrap();
        std::os::unix::fs::symlink(&agents, sandbox.home_path(".claude/agents")).unwrap();
        fs::create_dir_all(sandbox.home_path(".codex")).unwrap();
        std::os::unix::fs::symlink("/elsewhere", sandbox.home_path(".codex/AGENTS.md")).unwrap();
        fs::hard_link(&rules, sandbox.home_path("AGENTS.md")).unwrap();
        fs::write(sandbox.home_path("settings.json"), "mine").unwrap();
        fs::write(sandbox.home_path("optional.json"), "mine").unwrap();

        let m = manifest(
            &[
                ("agents", "agents"),
                ("rules", "AGENTS.md"),
                ("settings", "settings.json"),
                ("skills", "skills"),
            ],
            &[
                ("agents", "~/.claude/agents", false),
                ("rules", "~/.codex/AGENTS.md", false),
                ("rules", "~/AGENTS.md", false),
                ("settings", "~/settings.json", false),
                ("settings", "~/optional.json", true),
                ("agents", "~/.gemini/agents", false),
                ("skills", "~/.codex/skills", false),
                ("nope", "~/.x", false),
            ],
        );

        let lines = report(&m, &sandbox.root, &sandbox.home, PathFlavor::Posix).unwrap();

        insta::assert_snapshot!(render(&sandbox, &lines), @r"
        [OK] <home>/.claude/agents -> <root>/agents
        [MISMATCH] <home>/.codex/AGENTS.md -> /elsewhere (expected <root>/AGENTS.md)
        [OK] <home>/AGENTS.md (hardlink to <root>/AGENTS.md)
        [CONFLICT] <home>/settings.json (exists but is not a symlink)
        [OPTIONAL_CONFLICT] <home>/optional.json (exists but is not a symlink)
        [MISSING] <home>/.gemini/agents
        [MISSING_SOURCE] <root>/skills
        [ERROR] Unknown source key 'nope' for target '~/.x'
        ");
    }

    #[cfg(unix)]
    #[test]
    fn report_accepts_trailing_separator_in_link_text() {
        let sandbox = Sandbox::new();
        let agents = sandbox.mkdir("agents");
        std::os::unix::fs::symlink(
            format!("{}/", agents.display()),
            sandbox.home_path("agents"),
        )
        .unwrap();
        let m = manifest(&[("agents", "agents")], &[("agents", "~/agents", false)]);

        let lines = report(&m, &sandbox.root, &sandbox.home, PathFlavor::Posix).unwrap();

        assert_eq!(lines[0].status, LinkStatus::Ok);
    }

    #[test]
    fn report_does_not_mutate() {
        let sandbox = Sandbox::new();
        sandbox.write("a.md", "a");
        let target = sandbox.home_path("a.md");
        fs::write(&target, "foreign").unwrap();
        let m = manifest(&[("a", "a.md")], &[("a", "~/a.md", false)]);

        report(&m, &sandbox.root, &sandbox.home, Platform::detect().path_flavor()).unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "foreign");
        assert_eq!(fs::read_dir(&sandbox.home).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn dangling_source_symlink_is_not_a_missing_source() {
        let sandbox = Sandbox::new();
        std::os::unix::fs::symlink(sandbox.root.join("gone"), sandbox.root.join("skills")).unwrap();
        let m = manifest(&[("skills", "skills")], &[("skills", "~/.codex/skills", false)]);

        let lines = report(&m, &sandbox.root, &sandbox.home, PathFlavor::Posix).unwrap();

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].status, LinkStatus::Missing);
    }
}
