//! External process execution behind an injectable [`Executor`].
use anyhow::{Context as _, Result};
use std::path::Path;
use std::process::{Command, Output};

/// Result of a command execution.
#[derive(Debug)]
pub struct ExecResult {
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
    /// Whether the process exited with status zero.
    pub success: bool,
    /// Exit code, if the process was not killed by a signal.
    pub code: Option<i32>,
}

impl From<Output> for ExecResult {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        }
    }
}

/// Runs external programs.
///
/// Tasks receive an `Arc<dyn Executor>` through their context so tests can
/// substitute canned responses.
pub trait Executor: Send + Sync + std::fmt::Debug {
    /// Run a command in `dir`, returning the result even on non-zero exit.
    ///
    /// # Errors
    ///
    /// Returns an error only if the program cannot be spawned.
    fn run_in_unchecked(&self, dir: &Path, program: &str, args: &[&str]) -> Result<ExecResult>;

    /// Check if a program is available on `PATH`.
    fn which(&self, program: &str) -> bool;
}

/// [`Executor`] that spawns real processes.
#[derive(Debug, Default)]
pub struct SystemExecutor;

impl Executor for SystemExecutor {
    fn run_in_unchecked(&self, dir: &Path, program: &str, args: &[&str]) -> Result<ExecResult> {
        let output = Command::new(program)
            .args(args)
            .current_dir(dir)
            .output()
            .with_context(|| format!("failed to execute: {program}"))?;
        Ok(ExecResult::from(output))
    }

    fn which(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn run_in_unchecked_captures_output() {
        let dir = tempfile::tempdir().unwrap();
        #[cfg(windows)]
        let result = SystemExecutor
            .run_in_unchecked(dir.path(), "cmd", &["/C", "echo", "hello"])
            .unwrap();
        #[cfg(not(windows))]
        let result = SystemExecutor
            .run_in_unchecked(dir.path(), "echo", &["hello"])
            .unwrap();
        assert!(result.success);
        assert_eq!(result.code, Some(0));
        assert_eq!(result.stdout.trim(), "hello");
    }

    #[test]
    fn run_in_unchecked_reports_failure() {
        let dir = std::env::temp_dir();
        #[cfg(windows)]
        let result = SystemExecutor
            .run_in_unchecked(&dir, "cmd", &["/C", "exit", "1"])
            .unwrap();
        #[cfg(not(windows))]
        let result = SystemExecutor.run_in_unchecked(&dir, "false", &[]).unwrap();
        assert!(!result.success);
    }

    #[test]
    fn run_in_unchecked_uses_directory() {
        let dir = tempfile::tempdir().unwrap();
        #[cfg(windows)]
        let result = SystemExecutor
            .run_in_unchecked(dir.path(), "cmd", &["/C", "cd"])
            .unwrap();
        #[cfg(not(windows))]
        let result = SystemExecutor
            .run_in_unchecked(dir.path(), "pwd", &[])
            .unwrap();
        let printed = dunce::canonicalize(result.stdout.trim()).unwrap();
        assert_eq!(printed, dunce::canonicalize(dir.path()).unwrap());
    }

    #[test]
    fn run_in_unchecked_missing_program_is_an_error() {
        let dir = std::env::temp_dir();
        let result =
            SystemExecutor.run_in_unchecked(&dir, "this-program-does-not-exist-12345", &[]);
        assert!(result.is_err());
    }

    #[test]
    fn which_missing_program() {
        assert!(!SystemExecutor.which("this-program-does-not-exist-12345"));
    }
}
