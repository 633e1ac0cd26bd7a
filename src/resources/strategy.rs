//! Platform-appropriate link creation.
//!
//! [`LinkCapabilities`] is probed once at startup and decides which
//! mechanism a [`Linker`] uses. The raw filesystem calls sit behind
//! [`LinkOps`] so the selection logic can be exercised on any host.
use std::fmt;
use std::io;
use std::path::Path;
use std::sync::Arc;

use super::error::{LinkError, PERMISSION_HINT};
use crate::platform::{Os, Platform};

/// How a link was created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkMechanism {
    /// A symbolic link (file or directory).
    Symlink,
    /// A Windows directory junction.
    Junction,
    /// A hard link, used when file symlinks are not permitted.
    Hardlink,
}

impl LinkMechanism {
    /// Lowercase name used in log lines.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Symlink => "symlink",
            Self::Junction => "junction",
            Self::Hardlink => "hardlink",
        }
    }
}

impl fmt::Display for LinkMechanism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which link mechanisms the host allows without elevation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkCapabilities {
    /// Directory symlinks can be created directly.
    pub dir_symlinks: bool,
    /// Directory junctions are available.
    pub junctions: bool,
    /// File symlink creation may be refused by policy; retry as a hard link.
    pub hardlink_fallback: bool,
}

impl LinkCapabilities {
    /// Capabilities of a POSIX host: symlinks everywhere, no fallback needed.
    pub const POSIX: Self = Self {
        dir_symlinks: true,
        junctions: false,
        hardlink_fallback: false,
    };

    /// Capabilities of a Windows host without Developer Mode assumptions:
    /// junctions for directories, symlink-then-hardlink for files.
    pub const WINDOWS: Self = Self {
        dir_symlinks: false,
        junctions: true,
        hardlink_fallback: true,
    };

    /// Probe the capabilities of `platform`.
    #[must_use]
    pub const fn probe(platform: &Platform) -> Self {
        match platform.os {
            Os::Windows => Self::WINDOWS,
            Os::Linux | Os::MacOs => Self::POSIX,
        }
    }
}

/// Raw link-creation primitives.
///
/// Each call creates `target` pointing at `source` and reports the OS error
/// unchanged.
#[cfg_attr(test, mockall::automock)]
pub trait LinkOps: Send + Sync {
    /// Create a symlink to a file.
    ///
    /// # Errors
    ///
    /// Returns the OS error from the link call.
    fn symlink_file(&self, source: &Path, target: &Path) -> io::Result<()>;

    /// Create a symlink to a directory.
    ///
    /// # Errors
    ///
    /// Returns the OS error from the link call.
    fn symlink_dir(&self, source: &Path, target: &Path) -> io::Result<()>;

    /// Create a directory junction.
    ///
    /// # Errors
    ///
    /// Returns an error if junctions are unavailable or creation fails.
    fn junction(&self, source: &Path, target: &Path) -> io::Result<()>;

    /// Create a hard link.
    ///
    /// # Errors
    ///
    /// Returns the OS error from the link call.
    fn hard_link(&self, source: &Path, target: &Path) -> io::Result<()>;
}

/// [`LinkOps`] backed by the real filesystem.
#[derive(Debug, Default)]
pub struct SystemLinkOps;

impl LinkOps for SystemLinkOps {
    fn symlink_file(&self, source: &Path, target: &Path) -> io::Result<()> {
        #[cfg(unix)]
        {
            std::os::unix::fs::symlink(source, target)
        }
        #[cfg(windows)]
        {
            std::os::windows::fs::symlink_file(source, target)
        }
    }

    fn symlink_dir(&self, source: &Path, target: &Path) -> io::Result<()> {
        #[cfg(unix)]
        {
            std::os::unix::fs::symlink(source, target)
        }
        #[cfg(windows)]
        {
            std::os::windows::fs::symlink_dir(source, target)
        }
    }

    fn junction(&self, source: &Path, target: &Path) -> io::Result<()> {
        #[cfg(windows)]
        {
            create_junction(source, target)
        }
        #[cfg(not(windows))]
        {
            let _ = (source, target);
            Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "junctions are only available on Windows",
            ))
        }
    }

    fn hard_link(&self, source: &Path, target: &Path) -> io::Result<()> {
        std::fs::hard_link(source, target)
    }
}

/// Create a junction with `mklink /J` in a separate, windowless process.
#[cfg(windows)]
fn create_junction(source: &Path, target: &Path) -> io::Result<()> {
    use std::os::windows::process::CommandExt;
    const CREATE_NO_WINDOW: u32 = 0x0800_0000;
    let output = std::process::Command::new("cmd")
        .arg("/c")
        .arg("mklink")
        .arg("/J")
        .arg(target)
        .arg(source)
        .creation_flags(CREATE_NO_WINDOW)
        .output()?;
    if output.status.success() {
        return Ok(());
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    let kind = if stderr.contains("Access is denied") {
        io::ErrorKind::PermissionDenied
    } else {
        io::ErrorKind::Other
    };
    Err(io::Error::new(
        kind,
        format!("mklink /J failed: {}", stderr.trim()),
    ))
}

/// Whether `e` means the caller lacks the privilege to create the link.
fn is_permission_error(e: &io::Error) -> bool {
    if e.kind() == io::ErrorKind::PermissionDenied {
        return true;
    }
    // ERROR_PRIVILEGE_NOT_HELD is what symlink creation reports without
    // Developer Mode.
    cfg!(windows) && e.raw_os_error() == Some(1314)
}

/// Creates links using the mechanism allowed by the probed capabilities.
pub struct Linker {
    capabilities: LinkCapabilities,
    ops: Arc<dyn LinkOps>,
}

impl fmt::Debug for Linker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Linker")
            .field("capabilities", &self.capabilities)
            .field("ops", &"<dyn LinkOps>")
            .finish()
    }
}

impl Linker {
    /// Build a linker with explicit capabilities and primitives.
    #[must_use]
    pub fn new(capabilities: LinkCapabilities, ops: Arc<dyn LinkOps>) -> Self {
        Self { capabilities, ops }
    }

    /// Build a linker for `platform` backed by the real filesystem.
    #[must_use]
    pub fn for_platform(platform: &Platform) -> Self {
        Self::new(LinkCapabilities::probe(platform), Arc::new(SystemLinkOps))
    }

    /// Create `target` as a link to `source`.
    ///
    /// The target must not exist and its parent directory must.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::PermissionDenied`] when a restricted platform
    /// refuses the link after the fallback, [`LinkError::Unsupported`] when no
    /// directory mechanism exists, and [`LinkError::Io`] otherwise.
    pub fn create(
        &self,
        source: &Path,
        target: &Path,
        source_is_dir: bool,
    ) -> Result<LinkMechanism, LinkError> {
        if source_is_dir {
            self.create_dir_link(source, target)
        } else {
            self.create_file_link(source, target)
        }
    }

    fn create_dir_link(&self, source: &Path, target: &Path) -> Result<LinkMechanism, LinkError> {
        if self.capabilities.dir_symlinks {
            self.ops
                .symlink_dir(source, target)
                .map_err(|e| self.classify(target, e))?;
            return Ok(LinkMechanism::Symlink);
        }
        if self.capabilities.junctions {
            self.ops
                .junction(source, target)
                .map_err(|e| self.classify(target, e))?;
            return Ok(LinkMechanism::Junction);
        }
        Err(LinkError::Unsupported {
            kind: "directory",
            target: target.to_path_buf(),
        })
    }

    fn create_file_link(&self, source: &Path, target: &Path) -> Result<LinkMechanism, LinkError> {
        match self.ops.symlink_file(source, target) {
            Ok(()) => Ok(LinkMechanism::Symlink),
            Err(e) if self.capabilities.hardlink_fallback && is_permission_error(&e) => {
                self.ops
                    .hard_link(source, target)
                    .map_err(|e| self.classify(target, e))?;
                Ok(LinkMechanism::Hardlink)
            }
            Err(e) => Err(self.classify(target, e)),
        }
    }

    /// Attach the permission hint to permission failures on restricted hosts.
    fn classify(&self, target: &Path, error: io::Error) -> LinkError {
        if self.capabilities.hardlink_fallback && is_permission_error(&error) {
            return LinkError::PermissionDenied {
                target: target.to_path_buf(),
                hint: PERMISSION_HINT,
                source: error,
            };
        }
        LinkError::Io {
            target: target.to_path_buf(),
            source: error,
        }
    }
}
