// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Event-scoped hit collection
//!
//! Append-only. Records are addressed by [`HitIndex`], which stays valid until
//! the collection is replaced at the next event start.

use core::fmt;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::error::{HitError, Result};
use crate::hit::{HitKey, HitRecord};

/// Position of a record in its collection (insertion order)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HitIndex(pub usize);

impl fmt::Display for HitIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hit({})", self.0)
    }
}

/// Collection shared between the detector and the per-event registry
pub type SharedHitCollection = Arc<RwLock<HitCollection>>;

#[derive(Debug, Clone, Default)]
pub struct HitCollection {
    collection_name: String,
    hits: Vec<HitRecord>,
    sealed: bool,
}

impl HitCollection {
    pub fn new(collection_name: impl Into<String>) -> Self {
        Self {
            collection_name: collection_name.into(),
            hits: Vec::new(),
            sealed: false,
        }
    }

    pub fn into_shared(self) -> SharedHitCollection {
        Arc::new(RwLock::new(self))
    }

    pub fn name(&self) -> &str {
        &self.collection_name
    }

    /// Append a record; refused once the collection is sealed
    pub fn insert(&mut self, hit: HitRecord) -> Result<HitIndex> {
        if self.sealed {
            return Err(HitError::CollectionSealed {
                key: hit.key(),
                collection: self.collection_name.clone(),
            });
        }
        self.hits.push(hit);
        Ok(HitIndex(self.hits.len() - 1))
    }

    /// First record with exactly this key, in insertion order
    pub fn find(&self, key: &HitKey) -> Option<HitIndex> {
        self.hits
            .iter()
            .position(|hit| {
                hit.track_id() == key.track_id
                    && hit.time_slice_id() == key.time_slice_id
                    && hit.unit_id() == key.unit_id
            })
            .map(HitIndex)
    }

    pub fn get(&self, index: HitIndex) -> Option<&HitRecord> {
        self.hits.get(index.0)
    }

    pub(crate) fn get_mut(&mut self, index: HitIndex) -> Option<&mut HitRecord> {
        self.hits.get_mut(index.0)
    }

    pub fn entries(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HitRecord> + '_ {
        self.hits.iter()
    }

    /// Finalize: no further inserts this event
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }
}
