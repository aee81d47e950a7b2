//! Filesystem probe operations used as steps of fs-semantics tests.
//!
//! Every operation is a thin wrapper over the OS call it names. The wrappers
//! log what they did at DEBUG level and keep the OS error kind intact so
//! tests can assert on it.

#![cfg(unix)]

pub mod acl;
pub mod error;
pub mod probe_dir;

pub type Result<T> = std::result::Result<T, error::ProbeError>;

pub use acl::{AceType, Nfs4Ace, Nfs4AclTool};
pub use error::ProbeError;
pub use probe_dir::{Access, ProbeDir};

use uuid::Uuid;

/// Generate a file name that is unique across runs, e.g. `new_file-<uuid>`.
pub fn unique_name(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4())
}

/// Random content for round-trip checks.
pub fn random_content() -> String {
    Uuid::new_v4().to_string()
}

/// Whether the process runs with an effective uid of root.
///
/// Root bypasses permission bits, so denial checks cannot hold for it.
pub fn is_privileged() -> bool {
    nix::unistd::geteuid().is_root()
}
