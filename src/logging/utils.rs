//! Utility functions for log paths, ANSI stripping, and time formatting.
use std::path::PathBuf;

/// Strip ANSI escape sequences from a string.
///
/// Handles SGR sequences (ending in `m`) and other CSI sequences (ending
/// in any letter in the `@`..`~` range).
pub(super) fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            if let Some(next) = chars.next()
                && next == '['
            {
                for inner in chars.by_ref() {
                    if ('@'..='~').contains(&inner) {
                        break;
                    }
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Resolve the cache root from `XDG_CACHE_HOME`, then `HOME`/`USERPROFILE`.
fn cache_root(xdg_cache: Option<String>, home: Option<String>) -> Option<PathBuf> {
    xdg_cache
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| home.map(|h| PathBuf::from(h).join(".cache")))
}

/// Return the log file path under `$XDG_CACHE_HOME/link-dotfiles/`.
///
/// Does not touch the filesystem.
pub(super) fn log_file_path(command: &str) -> Option<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .ok();
    let root = cache_root(std::env::var("XDG_CACHE_HOME").ok(), home)?;
    Some(root.join("link-dotfiles").join(format!("{command}.log")))
}

/// Format the current UTC time as `YYYY-MM-DD HH:MM:SS`.
pub(super) fn format_utc_datetime() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Format the current UTC time as `HH:MM:SS`.
pub(super) fn format_utc_time() -> String {
    chrono::Utc::now().format("%H:%M:%S").to_string()
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn strip_ansi_removes_colors() {
        assert_eq!(strip_ansi("\x1b[32m[LINK]\x1b[0m a -> b"), "[LINK] a -> b");
        assert_eq!(strip_ansi("no codes here"), "no codes here");
        assert_eq!(
            strip_ansi("\x1b[1;34m==>\x1b[0m \x1b[1mstage\x1b[0m"),
            "==> stage"
        );
    }

    #[test]
    fn strip_ansi_handles_csi_sequences() {
        assert_eq!(strip_ansi("\x1b[2Jhello"), "hello");
        assert_eq!(strip_ansi("\x1b[Kworld"), "world");
        assert_eq!(strip_ansi("\x1bMtext"), "text");
    }

    #[test]
    fn cache_root_prefers_xdg() {
        assert_eq!(
            cache_root(Some("/xdg".into()), Some("/home/me".into())),
            Some(PathBuf::from("/xdg"))
        );
    }

    #[test]
    fn cache_root_falls_back_to_home() {
        assert_eq!(
            cache_root(None, Some("/home/me".into())),
            Some(PathBuf::from("/home/me/.cache"))
        );
        assert_eq!(
            cache_root(Some(String::new()), Some("/home/me".into())),
            Some(PathBuf::from("/home/me/.cache"))
        );
    }

    #[test]
    fn cache_root_none_without_any_variable() {
        assert_eq!(cache_root(None, None), None);
    }

    #[test]
    fn format_utc_time_has_correct_format() {
        let s = format_utc_time();
        assert_eq!(s.len(), 8);
        assert_eq!(&s[2..3], ":");
        assert_eq!(&s[5..6], ":");
    }

    #[test]
    fn format_utc_datetime_has_correct_format() {
        let s = format_utc_datetime();
        assert_eq!(s.len(), 19);
        assert_eq!(&s[10..11], " ");
    }
}
