//! Read `KEY = "value"` assignments from shell or PowerShell secrets files.
use std::path::Path;

use anyhow::{Context as _, Result};
use regex::Regex;

/// Find the first `key = "value"` assignment in `content`.
///
/// Whitespace around `=` is optional and the value must be non-empty and
/// double-quoted, which matches both `export KEY="v"` and `$env:KEY = "v"`.
///
/// # Errors
///
/// Returns an error if the pattern for `key` cannot be compiled.
pub fn find_value(content: &str, key: &str) -> Result<Option<String>> {
    let pattern = format!(r#"{}\s*=\s*"([^"]+)""#, regex::escape(key));
    let re = Regex::new(&pattern).with_context(|| format!("compile pattern for {key}"))?;
    Ok(re
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string()))
}

/// Read `key` from the secrets file at `path`.
///
/// A missing file yields `Ok(None)`.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read.
pub fn read_value(path: &Path, key: &str) -> Result<Option<String>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e).with_context(|| format!("read secrets: {}", path.display())),
    };
    find_value(&content, key)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn finds_shell_export() {
        let content = "#!/bin/sh\nexport ANTHROPIC_AUTH_TOKEN=\"sk-123\"\n";
        assert_eq!(
            find_value(content, "ANTHROPIC_AUTH_TOKEN").unwrap().as_deref(),
            Some("sk-123")
        );
    }

    #[test]
    fn finds_powershell_assignment_with_spaces() {
        let content = "$env:ANTHROPIC_BASE_URL = \"https://api.example/anthropic\"\r\n";
        assert_eq!(
            find_value(content, "ANTHROPIC_BASE_URL").unwrap().as_deref(),
            Some("https://api.example/anthropic")
        );
    }

    #[test]
    fn empty_or_unquoted_values_do_not_match() {
        assert_eq!(find_value("KEY=\"\"", "KEY").unwrap(), None);
        assert_eq!(find_value("KEY=value", "KEY").unwrap(), None);
    }

    #[test]
    fn first_assignment_wins() {
        let content = "KEY=\"one\"\nKEY=\"two\"\n";
        assert_eq!(find_value(content, "KEY").unwrap().as_deref(), Some("one"));
    }

    #[test]
    fn key_is_matched_literally() {
        assert_eq!(find_value("A_B=\"x\"", "A.B").unwrap(), None);
    }

    #[test]
    fn missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(read_value(&dir.path().join("glm.sh"), "KEY").unwrap(), None);
    }

    #[test]
    fn reads_value_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kimi.sh");
        std::fs::write(&path, "export ANTHROPIC_DEFAULT_SONNET_MODEL=\"kimi-k2\"\n").unwrap();
        assert_eq!(
            read_value(&path, "ANTHROPIC_DEFAULT_SONNET_MODEL")
                .unwrap()
                .as_deref(),
            Some("kimi-k2")
        );
    }
}
