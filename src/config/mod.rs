//! Run settings and the files that drive linking.
pub mod dotfiles;
pub mod manifest;
pub mod secrets;

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Manifest location used when `--config` is not given, relative to the root.
pub const DEFAULT_MANIFEST: &str = "scripts/ai-agent-links.json";

/// Environment variable naming the dotfiles root.
pub const ROOT_ENV: &str = "DOTFILES_ROOT";

/// Paths every task needs, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Dotfiles repository root (canonical).
    pub root: PathBuf,
    /// Link manifest file.
    pub manifest: PathBuf,
    /// Home directory targets are expanded against.
    pub home: PathBuf,
}

impl Settings {
    /// Resolve settings from CLI arguments and the process environment.
    ///
    /// The root is `dotfiles_dir`, else `$DOTFILES_ROOT`, else the current
    /// directory. The home directory is `$HOME`, else `$USERPROFILE`.
    ///
    /// # Errors
    ///
    /// Returns an error if the root does not exist or no home directory is set.
    pub fn resolve(dotfiles_dir: Option<&Path>, config: Option<&Path>) -> Result<Self, ConfigError> {
        let root = match dotfiles_dir {
            Some(dir) => dir.to_path_buf(),
            None => match std::env::var_os(ROOT_ENV).filter(|v| !v.is_empty()) {
                Some(dir) => PathBuf::from(dir),
                None => std::env::current_dir().map_err(|source| ConfigError::Io {
                    path: PathBuf::from("."),
                    source,
                })?,
            },
        };
        let home = std::env::var_os("HOME")
            .filter(|v| !v.is_empty())
            .or_else(|| std::env::var_os("USERPROFILE").filter(|v| !v.is_empty()))
            .map(PathBuf::from)
            .ok_or(ConfigError::MissingHome)?;
        Self::build(&root, config, home)
    }

    /// Build settings from explicit parts.
    ///
    /// `root` is canonicalized; a relative `config` resolves against it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRoot`] if `root` is not an existing
    /// directory.
    pub fn build(root: &Path, config: Option<&Path>, home: PathBuf) -> Result<Self, ConfigError> {
        let root = dunce::canonicalize(root)
            .ok()
            .filter(|p| p.is_dir())
            .ok_or_else(|| ConfigError::InvalidRoot(root.to_path_buf()))?;
        let manifest = config.map_or_else(
            || dotfiles::under(&root, DEFAULT_MANIFEST),
            |path| root.join(path),
        );
        Ok(Self {
            root,
            manifest,
            home,
        })
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn build_defaults_manifest_under_root() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::build(dir.path(), None, PathBuf::from("/home/me")).unwrap();
        let root = dunce::canonicalize(dir.path()).unwrap();
        assert_eq!(settings.root, root);
        assert_eq!(
            settings.manifest,
            root.join("scripts").join("ai-agent-links.json")
        );
        assert_eq!(settings.home, PathBuf::from("/home/me"));
    }

    #[test]
    fn relative_config_resolves_against_root() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::build(
            dir.path(),
            Some(Path::new("links.toml")),
            PathBuf::from("/h"),
        )
        .unwrap();
        assert_eq!(
            settings.manifest,
            dunce::canonicalize(dir.path()).unwrap().join("links.toml")
        );
    }

    #[test]
    fn absolute_config_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let abs = dir.path().join("elsewhere.json");
        let settings = Settings::build(dir.path(), Some(&abs), PathBuf::from("/h")).unwrap();
        assert_eq!(settings.manifest, abs);
    }

    #[test]
    fn missing_root_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::build(&dir.path().join("nope"), None, PathBuf::from("/h")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRoot(_)));
    }

    #[test]
    fn file_root_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file");
        std::fs::write(&file, "x").unwrap();
        assert!(matches!(
            Settings::build(&file, None, PathBuf::from("/h")).unwrap_err(),
            ConfigError::InvalidRoot(_)
        ));
    }
}
