//! Point-in-time materialization of one target's attribute set.

use std::path::Path;

use crate::config::StoreLimits;
use crate::error::{AttrError, AttrResult};
use crate::store::AttributeStore;
use crate::types::{AttrEntry, AttrName};

/// An ordered, read-only view of a target's attributes at one instant.
///
/// Entry order is the store's enumeration order. Names are unique within
/// a snapshot because the underlying facility keys attributes by name.
#[derive(Debug, Default)]
pub struct AttrSnapshot {
    entries: Vec<AttrEntry>,
}

impl AttrSnapshot {
    /// Build a snapshot by listing names, then reading each value.
    ///
    /// A name that vanishes between the listing and its value read is
    /// dropped; it belonged to a set this snapshot never observed. Any
    /// other per-name failure aborts the build and reports the offending
    /// name.
    pub fn load(
        store: &dyn AttributeStore,
        target: &Path,
        limits: StoreLimits,
    ) -> AttrResult<Self> {
        let names = store.list_names(target)?;
        let mut entries = Vec::with_capacity(names.len());
        for name in names {
            match store.get_value(target, &name, limits.max_value_len) {
                Ok(value) => entries.push(AttrEntry::new(name, value)),
                Err(AttrError::AttributeNotFound { .. }) => {
                    tracing::debug!(name = %name, "attribute removed during snapshot build");
                }
                Err(err) => return Err(AttrError::snapshot(name.as_str(), err)),
            }
        }
        Ok(Self { entries })
    }

    /// Rebuild the whole entry sequence from the store.
    ///
    /// The previous entries are replaced only once the new sequence is
    /// fully built; a failed refresh leaves this snapshot untouched.
    pub fn refresh(
        &mut self,
        store: &dyn AttributeStore,
        target: &Path,
        limits: StoreLimits,
    ) -> AttrResult<()> {
        *self = Self::load(store, target, limits)?;
        Ok(())
    }

    pub fn entries(&self) -> &[AttrEntry] {
        &self.entries
    }

    pub fn get(&self, name: &AttrName) -> Option<&AttrEntry> {
        self.entries.iter().find(|e| e.name() == name)
    }

    pub fn contains(&self, name: &AttrName) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
