use std::path::Path;
use std::sync::Arc;

use crate::config::Settings;
use crate::exec::Executor;
use crate::logging::Log;
use crate::platform::Platform;
use crate::resources::{Linker, PathFlavor, Reconciler};

/// Shared context for task execution.
pub struct Context {
    /// Resolved root, manifest, and home paths.
    pub settings: Arc<Settings>,
    /// Detected platform information.
    pub platform: Arc<Platform>,
    /// Logger for output and task recording.
    pub log: Arc<dyn Log>,
    /// Command executor (for testing or real system calls).
    pub executor: Arc<dyn Executor>,
    /// Link reconciler bound to this context's linker and log.
    pub reconciler: Arc<Reconciler>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("settings", &self.settings)
            .field("platform", &self.platform)
            .field("log", &"<dyn Log>")
            .field("executor", &"<dyn Executor>")
            .field("reconciler", &self.reconciler)
            .finish()
    }
}

impl Context {
    /// Create a context whose links are created with the platform's probed
    /// capabilities.
    #[must_use]
    pub fn new(
        settings: Settings,
        platform: Platform,
        log: Arc<dyn Log>,
        executor: Arc<dyn Executor>,
    ) -> Self {
        let linker = Linker::for_platform(&platform);
        let reconciler = Reconciler::new(Arc::new(linker), Arc::clone(&log), platform.path_flavor());
        Self {
            settings: Arc::new(settings),
            platform: Arc::new(platform),
            log,
            executor,
            reconciler: Arc::new(reconciler),
        }
    }

    /// Replace the linker, e.g. with one backed by mocked link operations.
    #[must_use]
    pub fn with_linker(mut self, linker: Linker) -> Self {
        self.reconciler = Arc::new(Reconciler::new(
            Arc::new(linker),
            Arc::clone(&self.log),
            self.platform.path_flavor(),
        ));
        self
    }

    /// Dotfiles repository root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.settings.root
    }

    /// Home directory.
    #[must_use]
    pub fn home(&self) -> &Path {
        &self.settings.home
    }

    /// Path comparison rules for this platform.
    #[must_use]
    pub fn flavor(&self) -> PathFlavor {
        self.reconciler.flavor()
    }
}
