//! Typed errors for link creation.
//!
//! Reconciliation code returns these through [`anyhow::Error`]; callers that
//! need to tell a permission failure apart from other I/O can
//! `downcast_ref::<LinkError>()`.

use std::path::PathBuf;

use thiserror::Error;

/// Explanation appended to permission failures on platforms that restrict
/// unprivileged symlink creation.
pub const PERMISSION_HINT: &str = "Directory links use junctions (no elevation); file links may need Developer Mode or an elevated shell";

/// Errors that arise while creating a link.
#[derive(Error, Debug)]
pub enum LinkError {
    /// Link creation was denied and no fallback succeeded.
    #[error("permission denied while linking {}: {hint}", target.display())]
    PermissionDenied {
        /// The link path that could not be created.
        target: PathBuf,
        /// How to grant the missing privilege.
        hint: &'static str,
        /// Underlying error from the last attempt.
        source: std::io::Error,
    },

    /// The platform offers no mechanism for this kind of source.
    #[error("no link mechanism available for {kind} source at {}", target.display())]
    Unsupported {
        /// `"directory"` or `"file"`.
        kind: &'static str,
        /// The link path that could not be created.
        target: PathBuf,
    },

    /// Any other I/O failure while creating the link.
    #[error("failed to link {}: {source}", target.display())]
    Io {
        /// The link path that could not be created.
        target: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn permission_denied_display_carries_hint() {
        let e = LinkError::PermissionDenied {
            target: PathBuf::from(r"C:\Users\me\.vimrc"),
            hint: PERMISSION_HINT,
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        let msg = e.to_string();
        assert!(msg.contains(".vimrc"));
        assert!(msg.contains("junctions"));
        assert!(msg.contains("Developer Mode"));
    }

    #[test]
    fn unsupported_display() {
        let e = LinkError::Unsupported {
            kind: "directory",
            target: PathBuf::from("/home/me/.config/nvim"),
        };
        assert_eq!(
            e.to_string(),
            "no link mechanism available for directory source at /home/me/.config/nvim"
        );
    }

    #[test]
    fn io_has_source() {
        use std::error::Error as _;
        let e = LinkError::Io {
            target: PathBuf::from("/x"),
            source: io::Error::other("disk on fire"),
        };
        assert!(e.source().is_some());
        assert!(e.to_string().contains("disk on fire"));
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn link_error_is_send_sync() {
        assert_send_sync::<LinkError>();
    }

    #[test]
    fn link_error_converts_to_anyhow() {
        let e = LinkError::Unsupported {
            kind: "file",
            target: PathBuf::from("/x"),
        };
        let err: anyhow::Error = e.into();
        assert!(err.downcast_ref::<LinkError>().is_some());
    }
}
