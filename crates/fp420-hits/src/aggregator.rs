// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Hit Aggregator
//!
//! Host-agnostic merge policy for one detector's hit stream within one event.
//!
//! ## Per step
//! 1. **Continue**: same time slice and unit as the previous step. The track
//!    id is not compared; consecutive steps of different tracks in the same
//!    slice and unit land in one record. Downstream output depends on this.
//! 2. **Match**: a record with the exact (track, slice, unit) key already
//!    exists in the event collection (first in insertion order).
//! 3. **New**: otherwise, a record is created if the step deposited energy.
//!
//! A change of track id between steps refreshes the per-primary entry state
//! before the collection scan.
//!
//! ## Per event
//! `begin_event` swaps in an empty collection and clears the memo;
//! `end_event` seals the collection and hands up to `max_hits_per_event`
//! records to the downstream slave. Repeating it before the next
//! `begin_event` returns the first summary and hands nothing further.

use tracing::{debug, warn};

use fp420_config::DEFAULT_MAX_HITS_PER_EVENT;

use crate::collection::{HitCollection, HitIndex, SharedHitCollection};
use crate::error::{HitError, Result};
use crate::geometry::ThreeVector;
use crate::hit::{HitKey, HitRecord};
use crate::registry::{CollectionId, HitCollectionRegistry};
use crate::slave::TrackingSlave;
use crate::snapshot::StepSnapshot;

/// Entry state captured when a new primary is seen
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PrimaryEntry {
    /// Pre-step point in the pre-step volume frame
    pub entrance_point: ThreeVector,
    /// Post-step point in the post-step volume frame
    pub exit_point: ThreeVector,
    /// Pre-step kinetic energy, stamped on records created for this primary
    pub incident_energy: f64,
}

/// Memo of the last processed step plus the record being written
///
/// `None` is the no-match sentinel.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AggregatorState {
    pub last_time_slice_id: Option<i32>,
    pub last_primary_track_id: Option<i32>,
    pub last_unit_id: Option<u32>,
    pub current_hit: Option<HitIndex>,
    pub primary_entry: PrimaryEntry,
}

impl AggregatorState {
    fn continues(&self, snapshot: &StepSnapshot) -> bool {
        self.last_time_slice_id == Some(snapshot.time_slice_id)
            && self.last_unit_id == Some(snapshot.unit_id)
    }

    fn refresh_memo(&mut self, snapshot: &StepSnapshot) {
        self.last_time_slice_id = Some(snapshot.time_slice_id);
        self.last_primary_track_id = Some(snapshot.track_id);
        self.last_unit_id = Some(snapshot.unit_id);
    }

    fn reset(&mut self) {
        self.last_time_slice_id = None;
        self.last_primary_track_id = None;
        self.last_unit_id = None;
        self.current_hit = None;
    }
}

/// Where a step's deposit goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Continue,
    Match(HitIndex),
    New,
}

/// What processing a step did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Fast path; `None` when the record being continued was never stored
    Continued(Option<HitIndex>),
    Matched(HitIndex),
    Created(HitIndex),
    /// No record and no deposit: nothing happened
    Ignored,
    /// A new record was built but refused by the store guard
    Rejected,
    /// The event is already finalized
    Finalized,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventSummary {
    /// Records in the collection
    pub hits: usize,
    /// Records handed downstream
    pub persisted: usize,
    /// Records past the cap
    pub dropped: usize,
}

pub struct HitAggregator {
    detector_name: String,
    collection_name: String,
    collection_id: Option<CollectionId>,
    collection: SharedHitCollection,
    state: AggregatorState,
    last_summary: EventSummary,
    max_hits_per_event: usize,
    verbosity: i32,
}

impl HitAggregator {
    pub fn new(detector_name: impl Into<String>, collection_name: impl Into<String>) -> Self {
        let detector_name = detector_name.into();
        let collection_name = collection_name.into();
        let collection = HitCollection::new(&collection_name).into_shared();
        Self {
            detector_name,
            collection_name,
            collection_id: None,
            collection,
            state: AggregatorState::default(),
            last_summary: EventSummary::default(),
            max_hits_per_event: DEFAULT_MAX_HITS_PER_EVENT,
            verbosity: 0,
        }
    }

    pub fn with_max_hits_per_event(mut self, max_hits_per_event: usize) -> Self {
        self.max_hits_per_event = max_hits_per_event;
        self
    }

    pub fn with_verbosity(mut self, verbosity: i32) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn collection(&self) -> SharedHitCollection {
        self.collection.clone()
    }

    pub fn state(&self) -> &AggregatorState {
        &self.state
    }

    pub fn max_hits_per_event(&self) -> usize {
        self.max_hits_per_event
    }

    /// Replace the collection, register it and clear the memo
    pub fn begin_event(&mut self, registry: &mut dyn HitCollectionRegistry) {
        self.collection = HitCollection::new(&self.collection_name).into_shared();

        let id = match self.collection_id {
            Some(id) => id,
            None => {
                let id = registry.collection_id(&self.collection_name);
                self.collection_id = Some(id);
                id
            }
        };
        registry.add_hits_collection(id, self.collection.clone());

        self.state.reset();
        self.last_summary = EventSummary::default();
    }

    /// Fold one step into the event's hits
    pub fn process_step(&mut self, snapshot: &StepSnapshot) -> StepOutcome {
        if self.collection.read().is_sealed() {
            warn!(
                target: "fp420_hits",
                detector = %self.detector_name,
                "FP420SD: step received after end of event, ignored"
            );
            return StepOutcome::Finalized;
        }

        match self.resolve(snapshot) {
            Resolution::Continue => {
                let current = self.state.current_hit;
                self.update(current, snapshot);
                StepOutcome::Continued(current)
            }
            Resolution::Match(index) => {
                self.state.current_hit = Some(index);
                self.update(Some(index), snapshot);
                StepOutcome::Matched(index)
            }
            Resolution::New if snapshot.energy_deposit > 0.0 => self.create(snapshot),
            Resolution::New => StepOutcome::Ignored,
        }
    }

    /// Decide where the step goes; refreshes the per-primary entry on a new track
    pub fn resolve(&mut self, snapshot: &StepSnapshot) -> Resolution {
        if snapshot.track_id < 1 {
            warn!(
                target: "fp420_hits",
                track_id = snapshot.track_id,
                "***** FP420SD error: primaryID = {} maybe detector name changed",
                snapshot.track_id
            );
        }

        if self.state.continues(snapshot) {
            return Resolution::Continue;
        }

        if self.state.last_primary_track_id != Some(snapshot.track_id) {
            self.reset_for_new_primary(snapshot);
        }

        match self.collection.read().find(&HitKey::of(snapshot)) {
            Some(index) => Resolution::Match(index),
            None => Resolution::New,
        }
    }

    fn reset_for_new_primary(&mut self, snapshot: &StepSnapshot) {
        self.state.primary_entry = PrimaryEntry {
            entrance_point: snapshot.entry_local,
            exit_point: snapshot.exit_local_post,
            incident_energy: snapshot.incident_energy,
        };
    }

    fn create(&mut self, snapshot: &StepSnapshot) -> StepOutcome {
        if self.verbosity > 0 {
            debug!(
                target: "fp420_hits",
                unit_id = snapshot.unit_id,
                track_id = snapshot.track_id,
                time_slice_id = snapshot.time_slice_id,
                pdg = snapshot.particle_type,
                kind = ?snapshot.deposit_kind,
                parent_id = snapshot.parent_id,
                "FP420SD CreateNewHit"
            );
        }

        let mut hit = HitRecord::from_snapshot(snapshot, self.state.primary_entry.incident_energy);
        Self::apply_deposit(&mut hit, snapshot);
        self.state.refresh_memo(snapshot);

        match self.store(hit) {
            Ok(index) => {
                self.state.current_hit = Some(index);
                StepOutcome::Created(index)
            }
            Err(err) => {
                warn!(target: "fp420_hits", "FP420SD: {}", err);
                self.state.current_hit = None;
                StepOutcome::Rejected
            }
        }
    }

    /// Accumulate into the target and refresh the memo
    ///
    /// A `None` target still refreshes the memo.
    fn update(&mut self, target: Option<HitIndex>, snapshot: &StepSnapshot) {
        if snapshot.energy_loss > 0.0 {
            if let Some(index) = target {
                let mut collection = self.collection.write();
                if let Some(hit) = collection.get_mut(index) {
                    Self::apply_deposit(hit, snapshot);
                    if self.verbosity > 0 {
                        debug!(
                            target: "fp420_hits",
                            %index,
                            eloss = snapshot.energy_loss,
                            "updateHit: add eloss"
                        );
                    }
                }
            }
        }

        self.state.refresh_memo(snapshot);
    }

    fn apply_deposit(hit: &mut HitRecord, snapshot: &StepSnapshot) {
        if snapshot.energy_loss > 0.0 {
            hit.add_energy_deposit(snapshot.deposit_em, snapshot.deposit_had);
            hit.set_energy_loss(snapshot.energy_loss);
        }
    }

    fn store(&mut self, hit: HitRecord) -> Result<HitIndex> {
        match self.state.last_primary_track_id {
            Some(track_id) if track_id >= 0 => self.collection.write().insert(hit),
            last_primary => Err(HitError::StoreRejected {
                key: hit.key(),
                last_primary,
            }),
        }
    }

    /// Seal the collection and hand records downstream, up to the cap
    ///
    /// Once sealed, further calls warn and return the summary of the first.
    pub fn end_event(&mut self, slave: &mut dyn TrackingSlave) -> EventSummary {
        let mut collection = self.collection.write();
        if collection.is_sealed() {
            warn!(
                target: "fp420_hits",
                detector = %self.detector_name,
                "FP420SD: end of event already processed, ignored"
            );
            return self.last_summary;
        }
        collection.seal();

        let hits = collection.entries();
        if hits > self.max_hits_per_event {
            warn!(
                target: "fp420_hits",
                hits,
                cap = self.max_hits_per_event,
                "FP420SD: warning!!! Number of hits exceed {} and = {}",
                self.max_hits_per_event,
                hits
            );
        }

        let mut persisted = 0;
        for hit in collection.iter().take(self.max_hits_per_event) {
            slave.process_hits(hit);
            persisted += 1;
        }

        self.state.current_hit = None;

        self.last_summary = EventSummary {
            hits,
            persisted,
            dropped: hits - persisted,
        };
        self.last_summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::HitsCollectionsOfEvent;
    use crate::slave::TrackingSlaveCollector;

    fn snap(track_id: i32, time_slice: f64, unit_id: u32, em: f64, had: f64) -> StepSnapshot {
        StepSnapshot {
            track_id,
            time_slice,
            time_slice_id: time_slice as i32,
            unit_id,
            energy_deposit: em + had,
            deposit_em: em,
            deposit_had: had,
            energy_loss: em + had,
            ..Default::default()
        }
    }

    fn aggregator() -> (HitAggregator, HitsCollectionsOfEvent) {
        let mut registry = HitsCollectionsOfEvent::new();
        let mut aggregator = HitAggregator::new("FP420SI", "FP420SI");
        aggregator.begin_event(&mut registry);
        (aggregator, registry)
    }

    #[test]
    fn test_first_step_creates() {
        let (mut agg, registry) = aggregator();
        assert_eq!(agg.process_step(&snap(1, 3.0, 7, 2.0, 0.0)), StepOutcome::Created(HitIndex(0)));
        assert_eq!(agg.state().current_hit, Some(HitIndex(0)));
        assert_eq!(agg.state().last_primary_track_id, Some(1));
        assert_eq!(registry.get_by_name("FP420SI").unwrap().read().entries(), 1);
    }

    #[test]
    fn test_consecutive_steps_continue() {
        let (mut agg, _registry) = aggregator();
        agg.process_step(&snap(1, 3.0, 7, 2.0, 0.0));
        assert_eq!(
            agg.process_step(&snap(1, 3.4, 7, 1.0, 0.0)),
            StepOutcome::Continued(Some(HitIndex(0)))
        );
        let collection = agg.collection();
        let collection = collection.read();
        let hit = collection.get(HitIndex(0)).unwrap();
        assert_eq!(hit.em(), 3.0);
        assert_eq!(hit.energy_loss(), 1.0);
    }

    #[test]
    fn test_returning_to_earlier_key_matches() {
        let (mut agg, _registry) = aggregator();
        agg.process_step(&snap(1, 3.0, 7, 0.0, 1.0));
        agg.process_step(&snap(1, 3.0, 8, 0.0, 1.0));
        assert_eq!(agg.process_step(&snap(1, 3.0, 7, 0.0, 0.5)), StepOutcome::Matched(HitIndex(0)));
        assert_eq!(agg.state().current_hit, Some(HitIndex(0)));
        assert_eq!(agg.collection().read().get(HitIndex(0)).unwrap().hadr(), 1.5);
    }

    #[test]
    fn test_zero_deposit_without_record_is_ignored() {
        let (mut agg, _registry) = aggregator();
        assert_eq!(agg.process_step(&snap(1, 3.0, 7, 0.0, 0.0)), StepOutcome::Ignored);
        assert!(agg.collection().read().is_empty());
        assert_eq!(agg.state().last_time_slice_id, None);
    }

    #[test]
    fn test_ignored_step_leaves_memo_untouched() {
        let (mut agg, _registry) = aggregator();
        agg.process_step(&snap(1, 3.0, 7, 2.0, 0.0));
        assert_eq!(agg.process_step(&snap(1, 5.0, 9, 0.0, 0.0)), StepOutcome::Ignored);
        assert_eq!(agg.state().last_time_slice_id, Some(3));
        assert_eq!(agg.state().last_unit_id, Some(7));

        // memo still points at (3, 7), so this continues the first record
        assert_eq!(
            agg.process_step(&snap(1, 3.5, 7, 0.0, 0.0)),
            StepOutcome::Continued(Some(HitIndex(0)))
        );
        let hit = agg.collection().read().get(HitIndex(0)).cloned().unwrap();
        assert_eq!(hit.em(), 2.0);
        assert_eq!(hit.energy_loss(), 2.0);
    }

    #[test]
    fn test_zero_loss_match_refreshes_memo_only() {
        let (mut agg, _registry) = aggregator();
        agg.process_step(&snap(1, 3.0, 7, 2.0, 0.0));
        agg.process_step(&snap(1, 3.0, 8, 2.0, 0.0));

        assert_eq!(agg.process_step(&snap(1, 3.0, 7, 0.0, 0.0)), StepOutcome::Matched(HitIndex(0)));
        assert_eq!(agg.state().last_unit_id, Some(7));
        let hit = agg.collection().read().get(HitIndex(0)).cloned().unwrap();
        assert_eq!(hit.em(), 2.0);
        assert_eq!(hit.energy_loss(), 2.0);
    }

    #[test]
    fn test_new_primary_refreshes_entry() {
        let (mut agg, _registry) = aggregator();
        let mut first = snap(1, 0.0, 7, 0.0, 1.0);
        first.incident_energy = 7000.0;
        first.entry_local = ThreeVector::new(0.0, 0.0, -0.15);
        agg.process_step(&first);
        assert_eq!(agg.state().primary_entry.incident_energy, 7000.0);

        let mut second = snap(2, 1.0, 7, 0.0, 1.0);
        second.incident_energy = 12.0;
        assert_eq!(agg.process_step(&second), StepOutcome::Created(HitIndex(1)));
        assert_eq!(agg.state().primary_entry.incident_energy, 12.0);
        assert_eq!(agg.collection().read().get(HitIndex(1)).unwrap().incident_energy(), 12.0);
        assert_eq!(agg.collection().read().get(HitIndex(0)).unwrap().incident_energy(), 7000.0);
    }

    #[test]
    fn test_negative_track_is_rejected_by_store_guard() {
        let (mut agg, _registry) = aggregator();
        assert_eq!(agg.process_step(&snap(-1, 0.0, 7, 1.0, 0.0)), StepOutcome::Rejected);
        assert!(agg.collection().read().is_empty());
        assert_eq!(agg.state().current_hit, None);

        // the memo still advanced, so the next step in the same slice and unit continues nothing
        assert_eq!(agg.process_step(&snap(-1, 0.0, 7, 1.0, 0.0)), StepOutcome::Continued(None));
        assert!(agg.collection().read().is_empty());
    }

    #[test]
    fn test_track_zero_is_stored_with_warning() {
        let (mut agg, _registry) = aggregator();
        assert_eq!(agg.process_step(&snap(0, 0.0, 7, 1.0, 0.0)), StepOutcome::Created(HitIndex(0)));
    }

    #[test]
    fn test_end_event_seals_and_persists() {
        let (mut agg, _registry) = aggregator();
        agg.process_step(&snap(1, 0.0, 7, 1.0, 0.0));
        agg.process_step(&snap(2, 0.0, 8, 1.0, 0.0));

        let mut slave = TrackingSlaveCollector::new("FP420SI");
        let summary = agg.end_event(&mut slave);
        assert_eq!(
            summary,
            EventSummary {
                hits: 2,
                persisted: 2,
                dropped: 0
            }
        );
        assert_eq!(slave.hits().len(), 2);

        assert_eq!(agg.process_step(&snap(3, 0.0, 9, 1.0, 0.0)), StepOutcome::Finalized);
        assert_eq!(agg.collection().read().entries(), 2);
    }

    #[test]
    fn test_repeated_end_event_hands_nothing_further() {
        let (mut agg, mut registry) = aggregator();
        agg.process_step(&snap(1, 0.0, 7, 1.0, 0.0));
        agg.process_step(&snap(2, 0.0, 8, 1.0, 0.0));

        let mut slave = TrackingSlaveCollector::new("FP420SI");
        let first = agg.end_event(&mut slave);
        let second = agg.end_event(&mut slave);
        assert_eq!(first, second);
        assert_eq!(second.persisted, 2);
        assert_eq!(slave.hits().len(), 2);

        agg.begin_event(&mut registry);
        assert_eq!(agg.end_event(&mut slave), EventSummary::default());
        assert_eq!(slave.hits().len(), 2);
    }

    #[test]
    fn test_end_event_on_empty_collection_is_noop() {
        let (mut agg, _registry) = aggregator();
        let mut slave = TrackingSlaveCollector::new("FP420SI");
        assert_eq!(agg.end_event(&mut slave), EventSummary::default());
        assert!(slave.hits().is_empty());
    }

    #[test]
    fn test_cap_limits_persisted_hits() {
        let mut registry = HitsCollectionsOfEvent::new();
        let mut agg = HitAggregator::new("FP420SI", "FP420SI").with_max_hits_per_event(3);
        agg.begin_event(&mut registry);
        for unit in 1..=5 {
            agg.process_step(&snap(1, 0.0, unit, 1.0, 0.0));
        }

        let mut slave = TrackingSlaveCollector::new("FP420SI");
        let summary = agg.end_event(&mut slave);
        assert_eq!(summary.persisted, 3);
        assert_eq!(summary.dropped, 2);
        let units: Vec<u32> = slave.hits().iter().map(|h| h.unit_id).collect();
        assert_eq!(units, vec![1, 2, 3]);
    }

    #[test]
    fn test_begin_event_resets_memo_and_collection() {
        let (mut agg, mut registry) = aggregator();
        agg.process_step(&snap(1, 3.0, 7, 1.0, 0.0));
        let previous = agg.collection();

        agg.begin_event(&mut registry);
        assert_eq!(agg.state().last_time_slice_id, None);
        assert_eq!(agg.state().last_unit_id, None);
        assert_eq!(agg.state().last_primary_track_id, None);
        assert_eq!(agg.state().current_hit, None);
        assert!(agg.collection().read().is_empty());
        assert_eq!(previous.read().entries(), 1);

        let registered = registry.get_by_name("FP420SI").unwrap();
        assert!(std::sync::Arc::ptr_eq(&registered, &agg.collection()));
    }
}
