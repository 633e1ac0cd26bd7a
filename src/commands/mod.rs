//! Subcommand entry points.
pub mod setup;
pub mod show;
pub mod version;

use std::sync::Arc;

use anyhow::Result;

use crate::cli::GlobalOpts;
use crate::config::Settings;
use crate::exec::SystemExecutor;
use crate::logging::{Log, Logger};
use crate::platform::Platform;
use crate::tasks::Context;

/// Resolve settings from the global options and build a context for the
/// host platform.
///
/// # Errors
///
/// Returns an error if the dotfiles root or home directory cannot be
/// determined.
pub fn host_context(global: &GlobalOpts, log: &Arc<Logger>) -> Result<Context> {
    let settings = Settings::resolve(global.dotfiles_dir.as_deref(), global.config.as_deref())?;
    log.debug(&format!("dotfiles root: {}", settings.root.display()));
    log.debug(&format!("manifest: {}", settings.manifest.display()));
    Ok(Context::new(
        settings,
        Platform::detect(),
        Arc::clone(log) as Arc<dyn Log>,
        Arc::new(SystemExecutor),
    ))
}
