// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! FP420 sensitive detector
//!
//! Thin adapter between the transport engine's callbacks and [`HitAggregator`].

use tracing::{debug, info};

use fp420_config::SensitiveDetectorConfig;

use crate::aggregator::{EventSummary, HitAggregator, StepOutcome};
use crate::catalog::SensitiveDetectorCatalog;
use crate::collection::SharedHitCollection;
use crate::numbering::NumberingScheme;
use crate::registry::HitCollectionRegistry;
use crate::slave::{SimHit, TrackingSlave, TrackingSlaveCollector};
use crate::snapshot::StepSnapshot;
use crate::step::TransportStep;

/// Callbacks the transport engine drives, in order:
/// `initialize`, `process_hits`*, `end_of_event`
pub trait SensitiveDetector {
    fn name(&self) -> &str;

    /// Event start: set up this event's collection
    fn initialize(&mut self, registry: &mut dyn HitCollectionRegistry);

    /// Returns `true` once the step is handled; an absent step is a no-op
    fn process_hits(&mut self, step: Option<&dyn TransportStep>) -> bool;

    fn end_of_event(&mut self);

    fn clear(&mut self) {}

    fn draw_all(&self) {}

    fn print_all(&self) {}
}

/// Begin-of-event notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeginOfEvent {
    pub event_id: i32,
}

/// End-of-event notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndOfEvent {
    pub event_id: i32,
}

/// Receives run/event notifications from the host dispatcher
pub trait Observer<T> {
    fn update(&mut self, notification: &T);
}

pub struct Fp420SensitiveDetector<S: TrackingSlave = TrackingSlaveCollector> {
    name: String,
    collection_names: Vec<String>,
    logical_volumes: Vec<String>,
    numbering: NumberingScheme,
    aggregator: HitAggregator,
    slave: S,
    verbosity: i32,
    event_no: i32,
    last_summary: EventSummary,
}

impl Fp420SensitiveDetector<TrackingSlaveCollector> {
    /// Build the detector, bind its logical volumes and select the numbering scheme
    pub fn new(name: &str, catalog: &SensitiveDetectorCatalog, config: &SensitiveDetectorConfig) -> Self {
        Self::with_slave(name, catalog, config, TrackingSlaveCollector::new(name))
    }
}

impl<S: TrackingSlave> Fp420SensitiveDetector<S> {
    pub fn with_slave(
        name: &str,
        catalog: &SensitiveDetectorCatalog,
        config: &SensitiveDetectorConfig,
        slave: S,
    ) -> Self {
        let verbosity = config.verbosity;
        debug!(
            target: "fp420_hits",
            detector = name,
            verbosity,
            "Constructing a FP420SD with name {}",
            name
        );

        let logical_volumes = catalog.logical_names(name).to_vec();
        for volume in &logical_volumes {
            info!(target: "fp420_hits", "FP420SD : Assigns SD to LV {}", volume);
        }

        let numbering = NumberingScheme::for_detector(name);

        let collection_names = vec![name.to_string()];
        let aggregator = HitAggregator::new(name, collection_names[0].as_str())
            .with_max_hits_per_event(config.max_hits_per_event)
            .with_verbosity(verbosity);

        info!(target: "fp420_hits", detector = name, "FP420SD: Instantiation completed");

        Self {
            name: name.to_string(),
            collection_names,
            logical_volumes,
            numbering,
            aggregator,
            slave,
            verbosity,
            event_no: 0,
            last_summary: EventSummary::default(),
        }
    }

    pub fn collection_names(&self) -> &[String] {
        &self.collection_names
    }

    pub fn logical_volumes(&self) -> &[String] {
        &self.logical_volumes
    }

    pub fn numbering_scheme(&self) -> &NumberingScheme {
        &self.numbering
    }

    pub fn aggregator(&self) -> &HitAggregator {
        &self.aggregator
    }

    pub fn hit_collection(&self) -> SharedHitCollection {
        self.aggregator.collection()
    }

    pub fn slave(&self) -> &S {
        &self.slave
    }

    pub fn event_number(&self) -> i32 {
        self.event_no
    }

    pub fn verbosity(&self) -> i32 {
        self.verbosity
    }

    pub fn last_summary(&self) -> EventSummary {
        self.last_summary
    }

    /// Unit id the active numbering scheme gives a step
    pub fn set_det_unit_id<T: TransportStep + ?Sized>(&self, step: &T) -> u32 {
        self.numbering.unit_id(step)
    }

    /// Same as `process_hits`, reporting what happened to the step
    pub fn process_step(&mut self, step: &dyn TransportStep) -> StepOutcome {
        let snapshot = StepSnapshot::capture(step, &self.numbering);
        if self.verbosity > 1 {
            debug!(
                target: "fp420_hits",
                unit_id = snapshot.unit_id,
                hits = self.aggregator.collection().read().entries(),
                "FP420SD : step ingested"
            );
        }
        self.aggregator.process_step(&snapshot)
    }

    /// Copy the slave's persistent hits into `target` when `name` is this slave's
    pub fn fill_hits(&self, target: &mut Vec<SimHit>, name: &str) {
        if self.slave.name() == name {
            target.clear();
            target.extend_from_slice(self.slave.hits());
        }
    }

    pub fn summarize(&self) {
        debug!(
            target: "fp420_hits",
            event = self.event_no,
            hits = self.last_summary.hits,
            persisted = self.last_summary.persisted,
            dropped = self.last_summary.dropped,
            "FP420SD: event summary"
        );
    }

    fn clear_hits(&mut self) {
        self.slave.initialize();
    }
}

impl<S: TrackingSlave> SensitiveDetector for Fp420SensitiveDetector<S> {
    fn name(&self) -> &str {
        &self.name
    }

    fn initialize(&mut self, registry: &mut dyn HitCollectionRegistry) {
        if self.verbosity > 0 {
            debug!(target: "fp420_hits", "FP420SD : Initialize called for {}", self.name);
        }
        self.aggregator.begin_event(registry);
    }

    fn process_hits(&mut self, step: Option<&dyn TransportStep>) -> bool {
        if let Some(step) = step {
            self.process_step(step);
        }
        true
    }

    fn end_of_event(&mut self) {
        self.last_summary = self.aggregator.end_event(&mut self.slave);
        self.summarize();
    }

    fn print_all(&self) {
        let collection = self.aggregator.collection();
        let collection = collection.read();
        info!(target: "fp420_hits", "FP420SD: Collection {}", collection.name());
        for hit in collection.iter() {
            info!(target: "fp420_hits", "{}", hit);
        }
    }
}

impl<S: TrackingSlave> Observer<BeginOfEvent> for Fp420SensitiveDetector<S> {
    fn update(&mut self, notification: &BeginOfEvent) {
        debug!(
            target: "fp420_hits",
            "Dispatched BeginOfEvent for {} !",
            self.name
        );
        self.clear_hits();
        self.event_no = notification.event_id;
    }
}

impl<S: TrackingSlave> Observer<EndOfEvent> for Fp420SensitiveDetector<S> {
    fn update(&mut self, _notification: &EndOfEvent) {}
}
