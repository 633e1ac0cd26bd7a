//! Domain-specific error types.
//!
//! Library modules return these typed errors; task and command boundaries
//! wrap them in [`anyhow::Error`] with context. Link creation failures live
//! in [`LinkError`](crate::resources::LinkError).
//!
//! ```text
//! ConfigError  manifest and settings resolution
//! TaskError    setup preconditions and task failures
//! LinkError    link creation (resources::error)
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Errors that arise from settings resolution and manifest loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The manifest is structurally invalid.
    #[error("Invalid link manifest {}: {reason}", path.display())]
    InvalidManifest {
        /// Manifest file.
        path: PathBuf,
        /// What is wrong with it.
        reason: String,
    },

    /// The manifest could not be parsed as JSON or TOML.
    #[error("Failed to parse {}: {message}", path.display())]
    Parse {
        /// Manifest file.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// A configuration file could not be read.
    #[error("IO error reading {}: {source}", path.display())]
    Io {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Neither `HOME` nor `USERPROFILE` is set.
    #[error("Cannot determine home directory: set HOME or USERPROFILE")]
    MissingHome,

    /// The dotfiles root does not exist or is not a directory.
    #[error("Dotfiles directory not found: {}", .0.display())]
    InvalidRoot(PathBuf),
}

/// Errors that arise during task execution.
#[derive(Error, Debug)]
pub enum TaskError {
    /// The project directory given for agent linking is unusable.
    #[error("Project directory {} {reason}", path.display())]
    InvalidProjectDir {
        /// Directory that was given.
        path: PathBuf,
        /// `"does not exist"` or `"is not a directory"`.
        reason: &'static str,
    },

    /// A source the task cannot do without is missing from the dotfiles root.
    #[error("Required source not found: {}", .0.display())]
    MissingSource(PathBuf),
}
