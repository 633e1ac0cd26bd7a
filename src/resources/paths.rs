//! Path normalization for link comparison and `~` expansion.
//!
//! Everything here is a pure string transform: no filesystem access, so two
//! paths that compare equal are equal by spelling, not by resolution.
use std::path::{Path, PathBuf};

/// Comparison rules for a family of platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathFlavor {
    /// `/`-separated, case-sensitive.
    Posix,
    /// `\`-separated (also accepts `/`), case-insensitive, with device and
    /// extended-length prefixes.
    Windows,
}

/// Canonicalize `path` into a string suitable for equality comparison.
///
/// # Examples
///
/// ```
/// use link_dotfiles::resources::paths::{PathFlavor, normalize_for_compare};
///
/// assert_eq!(
///     normalize_for_compare("/home/me//dotfiles/./.vimrc/", PathFlavor::Posix),
///     "/home/me/dotfiles/.vimrc"
/// );
/// assert_eq!(
///     normalize_for_compare(r"\\?\C:\Users\Me\Dotfiles\", PathFlavor::Windows),
///     r"c:\users\me\dotfiles"
/// );
/// ```
#[must_use]
pub fn normalize_for_compare(path: &str, flavor: PathFlavor) -> String {
    match flavor {
        PathFlavor::Posix => normalize_posix(path),
        PathFlavor::Windows => normalize_windows(path),
    }
}

/// Whether two paths denote the same entry under `flavor`'s rules.
#[must_use]
pub fn paths_match(a: &Path, b: &Path, flavor: PathFlavor) -> bool {
    normalize_for_compare(&a.to_string_lossy(), flavor)
        == normalize_for_compare(&b.to_string_lossy(), flavor)
}

/// Replace a leading `~` with `home`.
///
/// Only `~` on its own or followed by a separator is expanded; `~user` and
/// paths without a leading tilde pass through unchanged.
#[must_use]
pub fn expand_home(path: &str, home: &Path) -> PathBuf {
    if path == "~" {
        return home.to_path_buf();
    }
    match path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        Some(rest) => home.join(rest),
        None => PathBuf::from(path),
    }
}

/// Resolve `.` and `..` against the segments seen so far.
///
/// `..` above a rooted path is dropped; above a relative path it is kept.
fn collapse_segments<'a>(segments: impl Iterator<Item = &'a str>, rooted: bool) -> Vec<&'a str> {
    let mut out: Vec<&str> = Vec::new();
    for segment in segments {
        match segment {
            "" | "." => {}
            ".." => {
                if out.last().is_some_and(|last| *last != "..") {
                    out.pop();
                } else if !rooted {
                    out.push("..");
                }
            }
            other => out.push(other),
        }
    }
    out
}

fn normalize_posix(path: &str) -> String {
    let rooted = path.starts_with('/');
    let segments = collapse_segments(path.split('/'), rooted);
    let joined = segments.join("/");
    match (rooted, joined.is_empty()) {
        (true, _) => format!("/{joined}"),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

fn normalize_windows(path: &str) -> String {
    let mut s = path.replace('/', "\\");
    if let Some(rest) = s.strip_prefix(r"\\?\").or_else(|| s.strip_prefix(r"\??\")) {
        s = rest.to_string();
    }
    if let Some(rest) = s.strip_prefix(r"UNC\") {
        s = format!(r"\\{rest}");
    }

    let (prefix, rest, rooted) = split_windows_prefix(&s);
    let segments = collapse_segments(rest.split('\\'), rooted);
    let mut out = prefix;
    if rooted {
        out.push('\\');
    }
    out.push_str(&segments.join("\\"));
    out.trim_end_matches('\\').to_lowercase()
}

/// Split a Windows path into `(prefix, remainder, rooted)`.
///
/// The prefix is `\\server\share` for UNC paths, `X:` for drive paths, and
/// empty otherwise.
fn split_windows_prefix(s: &str) -> (String, &str, bool) {
    if let Some(unc) = s.strip_prefix(r"\\") {
        let mut parts = unc.splitn(3, '\\');
        let server = parts.next().unwrap_or_default();
        let share = parts.next().unwrap_or_default();
        let rest = parts.next().unwrap_or_default();
        return (format!(r"\\{server}\{share}"), rest, true);
    }

    let mut chars = s.chars();
    if let (Some(drive), Some(':')) = (chars.next(), chars.next())
        && drive.is_ascii_alphabetic()
    {
        let rest = s.get(2..).unwrap_or_default();
        return (format!("{drive}:"), rest, rest.starts_with('\\'));
    }

    (String::new(), s, s.starts_with('\\'))
}
