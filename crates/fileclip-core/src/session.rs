//! Read-modify-commit sessions over one target's attribute set.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::SessionConfig;
use crate::error::{AttrError, AttrResult};
use crate::snapshot::AttrSnapshot;
use crate::store::{AttributeStore, XattrStore};
use crate::types::{AttrEntry, AttrName};

/// Value seeded into a newly added attribute so the row is immediately
/// visible and editable.
pub const NEW_ATTR_PLACEHOLDER: &[u8] = b"_";

/// The single entry point for presentation layers: owns one resolved
/// target, one store handle, and the live snapshot.
///
/// A session only exists in the open state; [`AttrSession::open`] either
/// returns a fully populated session or an error, and
/// [`AttrSession::close`] consumes the value. Operations are not
/// internally locked; callers needing concurrent edits serialize onto
/// one session themselves.
pub struct AttrSession {
    store: Arc<dyn AttributeStore>,
    target: PathBuf,
    config: SessionConfig,
    snapshot: AttrSnapshot,
}

impl AttrSession {
    /// Open a session on `target` through the platform xattr syscalls.
    pub fn open(target: impl AsRef<Path>) -> AttrResult<Self> {
        Self::open_with(
            Arc::new(XattrStore::new()),
            target,
            SessionConfig::default(),
        )
    }

    /// Open a session through an explicit store.
    ///
    /// The target is resolved once here; renames of the underlying
    /// object are invisible to the session afterwards.
    pub fn open_with(
        store: Arc<dyn AttributeStore>,
        target: impl AsRef<Path>,
        config: SessionConfig,
    ) -> AttrResult<Self> {
        let target = store.resolve(target.as_ref())?;
        let snapshot = AttrSnapshot::load(store.as_ref(), &target, config.limits)?;
        tracing::debug!(path = %target.display(), entries = snapshot.len(), "session opened");
        Ok(Self {
            store,
            target,
            config,
            snapshot,
        })
    }

    /// The resolved path this session operates on.
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Read-only view of the current snapshot; never touches the
    /// filesystem.
    pub fn entries(&self) -> &[AttrEntry] {
        self.snapshot.entries()
    }

    /// Commit an edited row.
    ///
    /// An empty `new_value` is a removal request; anything else creates
    /// or overwrites the attribute. On store success the snapshot is
    /// refreshed; on store failure it is left untouched and the error is
    /// returned. Removing a row whose attribute is already gone reports
    /// [`AttrError::RaceLost`].
    pub fn apply(&mut self, name: &AttrName, new_value: &[u8]) -> AttrResult<()> {
        if new_value.is_empty() {
            match self.store.remove_value(&self.target, name) {
                Ok(()) => {}
                Err(AttrError::AttributeNotFound { name }) => {
                    return Err(AttrError::RaceLost { name });
                }
                Err(err) => return Err(err),
            }
        } else {
            self.store.set_value(&self.target, name, new_value)?;
        }
        self.refresh()
    }

    /// Add a new attribute seeded with [`NEW_ATTR_PLACEHOLDER`].
    ///
    /// Rejected with [`AttrError::DuplicateName`] when the name is
    /// already present, either in the current snapshot or on the target
    /// itself (the write is create-only, so a concurrent external create
    /// loses nothing).
    pub fn add_new(&mut self, name: &AttrName) -> AttrResult<()> {
        if self.snapshot.contains(name) {
            return Err(AttrError::DuplicateName {
                name: name.to_string(),
            });
        }
        self.store
            .create_value(&self.target, name, NEW_ATTR_PLACEHOLDER)?;
        self.refresh()
    }

    /// Rebuild the snapshot from the store.
    ///
    /// Hosts that abandon an in-flight mutation must call this before
    /// using the session again; the abandoned call's effect on the
    /// filesystem is unknown.
    pub fn refresh(&mut self) -> AttrResult<()> {
        self.snapshot
            .refresh(self.store.as_ref(), &self.target, self.config.limits)
    }

    /// Release the session's hold on the target.
    pub fn close(self) {}
}
