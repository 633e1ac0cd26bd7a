//! Filesystem primitives: path comparison, link inspection and creation,
//! reconciliation, and script materialization.
pub mod error;
pub mod helpers;
pub mod inspect;
pub mod link;
pub mod paths;
pub mod scripts;
pub mod strategy;

pub use error::LinkError;
pub use inspect::LinkDisposition;
pub use link::{LinkOutcome, LinkResource, Reconciler, SkipReason};
pub use paths::PathFlavor;
pub use strategy::{LinkCapabilities, LinkMechanism, LinkOps, Linker, SystemLinkOps};
