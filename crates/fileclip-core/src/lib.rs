//! FileClip Core — extended-attribute editing engine
//!
//! This crate loads the extended-attribute set of a single filesystem
//! object, materializes it as an ordered snapshot, and commits
//! per-attribute additions, value changes, and removals back through
//! direct xattr syscalls. Presentation layers drive it through
//! [`AttrSession`]; the session writes through an [`AttributeStore`] and
//! refreshes its snapshot after every mutation, so callers always
//! observe authoritative filesystem state.

pub mod config;
pub mod error;
pub mod session;
pub mod snapshot;
pub mod store;
pub mod types;

// Re-export key types for convenience
pub use config::{SessionConfig, StoreLimits};
pub use error::{AttrError, AttrResult};
pub use session::{AttrSession, NEW_ATTR_PLACEHOLDER};
pub use snapshot::AttrSnapshot;
pub use store::{AttributeStore, MemStore, XattrStore};
pub use types::{AttrEntry, AttrName, ValueDisplay, MAX_NAME_LEN};
