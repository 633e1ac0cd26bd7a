// Shared helpers for integration tests.
//
// Provides a temporary dotfiles root and home directory plus a fluent builder
// so each integration test can set up an isolated environment without
// repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use link_dotfiles::config::Settings;
use link_dotfiles::config::dotfiles::under;
use link_dotfiles::exec::{ExecResult, Executor};
use link_dotfiles::logging::{Log, Tag, TaskStatus};
use link_dotfiles::platform::Platform;
use link_dotfiles::tasks::Context;

/// A [`Log`] that keeps every tagged line in memory.
#[derive(Debug, Default)]
pub struct CapturedLog {
    lines: Mutex<Vec<String>>,
    tasks: Mutex<Vec<(String, TaskStatus)>>,
}

impl CapturedLog {
    /// Tagged lines rendered as `[TAG] message`.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().expect("lines lock").clone()
    }

    /// Lines carrying `tag`.
    pub fn lines_with(&self, tag: Tag) -> Vec<String> {
        let prefix = format!("{tag} ");
        self.lines()
            .into_iter()
            .filter(|l| l.starts_with(&prefix))
            .collect()
    }

    /// Recorded task names and statuses.
    pub fn tasks(&self) -> Vec<(String, TaskStatus)> {
        self.tasks.lock().expect("tasks lock").clone()
    }
}

impl Log for CapturedLog {
    fn stage(&self, _msg: &str) {}

    fn emit(&self, tag: Tag, msg: &str) {
        self.lines
            .lock()
            .expect("lines lock")
            .push(format!("{tag} {msg}"));
    }

    fn debug(&self, _msg: &str) {}

    fn record_task(&self, name: &str, status: TaskStatus, _message: Option<&str>) {
        self.tasks
            .lock()
            .expect("tasks lock")
            .push((name.to_string(), status));
    }
}

/// An [`Executor`] for hosts without git: every lookup misses.
#[derive(Debug)]
pub struct NoGit;

impl Executor for NoGit {
    fn run_in_unchecked(
        &self,
        _dir: &Path,
        program: &str,
        _args: &[&str],
    ) -> anyhow::Result<ExecResult> {
        anyhow::bail!("unexpected command: {program}")
    }

    fn which(&self, _program: &str) -> bool {
        false
    }
}

/// An isolated dotfiles root and home directory.
pub struct TestDotfiles {
    dir: tempfile::TempDir,
    /// Canonical dotfiles root.
    pub root: PathBuf,
    /// Canonical home directory.
    pub home: PathBuf,
}

impl TestDotfiles {
    /// Start building a sandbox.
    pub fn builder() -> TestDotfilesBuilder {
        TestDotfilesBuilder::default()
    }

    /// Path under the home directory.
    pub fn home_path(&self, relative: &str) -> PathBuf {
        under(&self.home, relative)
    }

    /// Path under the dotfiles root.
    pub fn root_path(&self, relative: &str) -> PathBuf {
        under(&self.root, relative)
    }

    /// Scratch path outside both root and home.
    pub fn scratch(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Settings using `scripts/ai-agent-links.json` under the root.
    pub fn settings(&self) -> Settings {
        Settings::build(&self.root, None, self.home.clone()).expect("settings")
    }

    /// Context for the host platform with a captured log.
    pub fn context(&self) -> (Context, Arc<CapturedLog>) {
        let log = Arc::new(CapturedLog::default());
        let ctx = Context::new(
            self.settings(),
            Platform::detect(),
            Arc::clone(&log) as Arc<dyn Log>,
            Arc::new(NoGit),
        );
        (ctx, log)
    }
}

/// Fluent builder for [`TestDotfiles`].
#[derive(Default)]
pub struct TestDotfilesBuilder {
    files: Vec<(String, Vec<u8>)>,
    dirs: Vec<String>,
    manifest: Option<String>,
}

impl TestDotfilesBuilder {
    /// Add a file under the dotfiles root.
    pub fn file(mut self, relative: &str, contents: &str) -> Self {
        self.files
            .push((relative.to_string(), contents.as_bytes().to_vec()));
        self
    }

    /// Add a directory under the dotfiles root.
    pub fn dir(mut self, relative: &str) -> Self {
        self.dirs.push(relative.to_string());
        self
    }

    /// Write the default manifest with this JSON body.
    pub fn manifest(mut self, json: &str) -> Self {
        self.manifest = Some(json.to_string());
        self
    }

    /// Create the directories and files.
    pub fn build(self) -> TestDotfiles {
        let dir = tempfile::tempdir().expect("create temp dir");
        let root = dir.path().join("dotfiles");
        let home = dir.path().join("home");
        std::fs::create_dir_all(&root).expect("create root");
        std::fs::create_dir_all(&home).expect("create home");
        let root = dunce::canonicalize(&root).expect("canonical root");
        let home = dunce::canonicalize(&home).expect("canonical home");

        for relative in &self.dirs {
            std::fs::create_dir_all(under(&root, relative)).expect("create dir");
        }
        let manifest = self
            .manifest
            .map(|json| ("scripts/ai-agent-links.json".to_string(), json.into_bytes()));
        for (relative, contents) in self.files.iter().chain(manifest.iter()) {
            let path = under(&root, relative);
            std::fs::create_dir_all(path.parent().expect("parent")).expect("create parent");
            std::fs::write(&path, contents).expect("write file");
        }

        TestDotfiles { dir, root, home }
    }
}
