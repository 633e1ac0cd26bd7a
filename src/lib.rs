//! Dotfiles link reconciliation.
//!
//! Links a canonical dotfiles repository into the home directory and into
//! project directories, and renders secret-bearing helper scripts from
//! templates. Existing targets are inspected before every change: correct
//! links are left alone, stale links are replaced, and anything else is
//! backed up first.
//!
//! The public API is organised into four layers:
//!
//! - **[`config`]**: settings, the link manifest, fixed dotfile tables, secrets
//! - **[`resources`]**: path comparison, link inspection, creation, and reconciliation
//! - **[`tasks`]**: named units of setup work wired to resources
//! - **[`commands`]**: top-level subcommand orchestration (`setup`, `show`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod logging;
pub mod platform;
pub mod resources;
pub mod tasks;
