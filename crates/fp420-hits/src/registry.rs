// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Per-event collection registry
//!
//! The host keeps one registry per event; each sensitive detector adds its
//! collection under an id resolved from the collection name.

use ahash::AHashMap;
use core::fmt;

use crate::collection::SharedHitCollection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollectionId(pub u32);

impl fmt::Display for CollectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Collection({})", self.0)
    }
}

/// Host side of collection registration
pub trait HitCollectionRegistry {
    /// Id for a collection name, stable across events
    fn collection_id(&mut self, name: &str) -> CollectionId;

    fn add_hits_collection(&mut self, id: CollectionId, collection: SharedHitCollection);
}

/// In-memory registry: ids are assigned on first lookup
#[derive(Debug, Default)]
pub struct HitsCollectionsOfEvent {
    ids: AHashMap<String, CollectionId>,
    collections: AHashMap<CollectionId, SharedHitCollection>,
}

impl HitsCollectionsOfEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: CollectionId) -> Option<SharedHitCollection> {
        self.collections.get(&id).cloned()
    }

    pub fn get_by_name(&self, name: &str) -> Option<SharedHitCollection> {
        self.ids.get(name).and_then(|id| self.get(*id))
    }

    /// Number of collections added for the current event
    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    /// Drop this event's collections; name-to-id assignments are kept
    pub fn clear(&mut self) {
        self.collections.clear();
    }
}

impl HitCollectionRegistry for HitsCollectionsOfEvent {
    fn collection_id(&mut self, name: &str) -> CollectionId {
        let next = CollectionId(self.ids.len() as u32);
        *self.ids.entry(name.to_string()).or_insert(next)
    }

    fn add_hits_collection(&mut self, id: CollectionId, collection: SharedHitCollection) {
        self.collections.insert(id, collection);
    }
}
