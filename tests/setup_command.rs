#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::wildcard_imports,
    clippy::indexing_slicing
)]
//! Integration tests for the `setup` command.
//!
//! These tests drive [`setup::run_with`] against a temporary dotfiles root and
//! home directory and check the filesystem afterwards: fresh links, stale
//! link replacement, foreign file backup, optional target protection, and
//! idempotence across runs.

mod common;

use std::fs;

use common::TestDotfiles;
use link_dotfiles::cli::{SetupMode, SetupOpts};
use link_dotfiles::commands::setup;
use link_dotfiles::logging::{Tag, TaskStatus};

const MANIFEST: &str = r#"{
  "sources": {
    "agents": "agents",
    "rules": "AGENTS.md",
    "settings": "gemini/settings.json"
  },
  "targets": [
    { "source": "agents", "path": "~/.claude/agents" },
    { "source": "rules", "path": "~/.codex/AGENTS.md" },
    { "source": "settings", "path": "~/.gemini/settings.json", "optional": true },
    { "source": "missing", "path": "~/.nowhere" }
  ]
}"#;

fn sandbox() -> TestDotfiles {
    TestDotfiles::builder()
        .dir("agents")
        .file("agents/reviewer.md", "# reviewer")
        .file("AGENTS.md", "# rules")
        .file("gemini/settings.json", "{\"theme\":\"dark\"}")
        .file(".vimrc", "set number")
        .manifest(MANIFEST)
        .build()
}

fn ai_agents() -> SetupOpts {
    SetupOpts {
        mode: SetupMode::AiAgents,
        ..SetupOpts::default()
    }
}

fn backups_in(dir: &std::path::Path) -> Vec<std::path::PathBuf> {
    fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.to_string_lossy().contains(".backup."))
        .collect()
}

// ---------------------------------------------------------------------------
// Fresh link
// ---------------------------------------------------------------------------

#[test]
fn fresh_home_gets_every_link() {
    let t = sandbox();
    let (ctx, log) = t.context();

    setup::run_with(&ctx, &ai_agents()).unwrap();

    assert_eq!(
        fs::read_to_string(t.home_path(".claude/agents/reviewer.md")).unwrap(),
        "# reviewer"
    );
    assert_eq!(
        fs::read_to_string(t.home_path(".codex/AGENTS.md")).unwrap(),
        "# rules"
    );
    assert_eq!(
        fs::read_to_string(t.home_path(".gemini/settings.json")).unwrap(),
        "{\"theme\":\"dark\"}"
    );
    assert_eq!(log.lines_with(Tag::Link).len(), 3);
    assert_eq!(
        log.lines_with(Tag::Error),
        vec!["[ERROR] Unknown source key 'missing' for target '~/.nowhere'"]
    );
}

#[test]
fn second_run_changes_nothing() {
    let t = sandbox();
    let (ctx, log) = t.context();

    setup::run_with(&ctx, &ai_agents()).unwrap();
    let links_after_first = log.lines_with(Tag::Link).len();
    setup::run_with(&ctx, &ai_agents()).unwrap();

    assert_eq!(log.lines_with(Tag::Link).len(), links_after_first);
    assert_eq!(log.lines_with(Tag::Skip).len(), 3);
    assert!(backups_in(&t.home).is_empty());
    assert!(backups_in(&t.home_path(".codex")).is_empty());
}

// ---------------------------------------------------------------------------
// Stale symlink and foreign file
// ---------------------------------------------------------------------------

#[cfg(unix)]
#[test]
fn stale_symlink_is_replaced_without_backup() {
    let t = sandbox();
    let elsewhere = t.scratch("old-agents");
    fs::create_dir(&elsewhere).unwrap();
    fs::create_dir_all(t.home_path(".claude")).unwrap();
    std::os::unix::fs::symlink(&elsewhere, t.home_path(".claude/agents")).unwrap();
    let (ctx, log) = t.context();

    setup::run_with(&ctx, &ai_agents()).unwrap();

    assert_eq!(
        fs::read_link(t.home_path(".claude/agents")).unwrap(),
        t.root_path("agents")
    );
    assert!(backups_in(&t.home_path(".claude")).is_empty());
    assert!(elsewhere.is_dir(), "the old link destination is untouched");
    assert!(log.lines().contains(&format!(
        "[INFO] Removed stale symlink: {}",
        t.home_path(".claude/agents").display()
    )));
}

#[test]
fn foreign_file_is_backed_up_byte_for_byte() {
    let t = sandbox();
    let target = t.home_path(".codex/AGENTS.md");
    fs::create_dir_all(target.parent().unwrap()).unwrap();
    let original: &[u8] = b"my own rules\r\n\x00\xfe";
    fs::write(&target, original).unwrap();
    let (ctx, log) = t.context();

    setup::run_with(&ctx, &ai_agents()).unwrap();

    let backups = backups_in(target.parent().unwrap());
    assert_eq!(backups.len(), 1);
    assert_eq!(fs::read(&backups[0]).unwrap(), original);
    assert_eq!(fs::read_to_string(&target).unwrap(), "# rules");
    assert!(
        log.lines()
            .iter()
            .any(|l| l.starts_with("[INFO] Backed up existing path: "))
    );
}

#[test]
fn optional_target_with_foreign_file_is_left_alone() {
    let t = sandbox();
    let target = t.home_path(".gemini/settings.json");
    fs::create_dir_all(target.parent().unwrap()).unwrap();
    fs::write(&target, "{\"theme\":\"light\"}").unwrap();
    let (ctx, _log) = t.context();

    setup::run_with(&ctx, &ai_agents()).unwrap();

    assert_eq!(fs::read_to_string(&target).unwrap(), "{\"theme\":\"light\"}");
    assert!(backups_in(target.parent().unwrap()).is_empty());
}

// ---------------------------------------------------------------------------
// Manifest validation and phases
// ---------------------------------------------------------------------------

#[test]
fn malformed_manifest_fails_before_any_change() {
    let t = TestDotfiles::builder()
        .file(".vimrc", "set number")
        .manifest(r#"{"sources": {"a": "a"}, "targets": {"not": "a list"}}"#)
        .build();
    let (ctx, log) = t.context();

    let err = setup::run_with(&ctx, &SetupOpts::default()).unwrap_err();

    assert!(format!("{err:#}").contains("Invalid link manifest"));
    assert!(log.tasks().is_empty());
    assert!(!t.home_path(".vimrc").exists());
}

#[test]
fn both_mode_links_dotfiles_then_manifest() {
    let t = sandbox();
    let (ctx, log) = t.context();

    setup::run_with(&ctx, &SetupOpts::default()).unwrap();

    assert!(t.home_path(".vimrc").exists());
    assert!(t.home_path(".claude/agents").exists());
    let lines = log.lines();
    let dotfiles = lines
        .iter()
        .position(|l| l == "[INFO] Running dotfiles setup...")
        .unwrap();
    let agents = lines
        .iter()
        .position(|l| l == "[INFO] Running AI agents setup...")
        .unwrap();
    assert!(dotfiles < agents);
    assert_eq!(
        lines.last().map(String::as_str),
        Some("[INFO] All linking tasks completed")
    );

    let submodules = log
        .tasks()
        .into_iter()
        .find(|(name, _)| name == "Initialize git submodules")
        .unwrap();
    assert_eq!(submodules.1, TaskStatus::Skipped, "no git on this executor");
}

#[test]
fn project_agents_only_links_into_project() {
    let t = sandbox();
    let project = t.scratch("project");
    fs::create_dir(&project).unwrap();
    let (ctx, _log) = t.context();
    let opts = SetupOpts {
        mode: SetupMode::Dotfiles,
        project_agents: Some(project.clone()),
        skip_submodules: true,
    };

    setup::run_with(&ctx, &opts).unwrap();

    assert!(project.join(".claude").join("agents").join("reviewer.md").exists());
    assert!(!t.home_path(".vimrc").exists());
}

#[test]
fn project_agents_rejects_missing_directory() {
    let t = sandbox();
    let (ctx, log) = t.context();
    let opts = SetupOpts {
        mode: SetupMode::Dotfiles,
        project_agents: Some(t.scratch("does-not-exist")),
        skip_submodules: true,
    };

    let err = setup::run_with(&ctx, &opts).unwrap_err();

    assert!(format!("{err:#}").contains("does not exist"));
    assert_eq!(log.tasks()[0].1, TaskStatus::Failed);
}
