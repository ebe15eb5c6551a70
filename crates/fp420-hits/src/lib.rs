// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # fp420-hits
//!
//! Sensitive-detector hit aggregation for the FP420 forward silicon tracker.
//!
//! Transport steps arrive one at a time from the simulation engine. Each step
//! is reduced to a [`StepSnapshot`], numbered into a detector unit and folded
//! into the event's [`HitCollection`] by the [`HitAggregator`]:
//!
//! - consecutive steps in the same time slice and unit continue the current hit
//! - otherwise the first hit with the exact (track, slice, unit) key is reused
//! - otherwise a new hit is created, provided the step deposited energy
//!
//! At end of event the collection is sealed and at most
//! `max_hits_per_event` hits are handed to a [`TrackingSlave`].
//!
//! ## Usage
//!
//! ```rust
//! use fp420_config::SensitiveDetectorConfig;
//! use fp420_hits::{
//!     BeginOfEvent, Fp420SensitiveDetector, HitsCollectionsOfEvent, Observer,
//!     SensitiveDetector, SensitiveDetectorCatalog,
//! };
//!
//! let catalog = SensitiveDetectorCatalog::new().with_volumes("FP420SI", ["FP420SiPlane"]);
//! let mut sd = Fp420SensitiveDetector::new("FP420SI", &catalog, &SensitiveDetectorConfig::default());
//! let mut registry = HitsCollectionsOfEvent::new();
//!
//! sd.update(&BeginOfEvent { event_id: 1 });
//! sd.initialize(&mut registry);
//! assert!(sd.process_hits(None));
//! sd.end_of_event();
//! ```
//!
//! ## Units
//! Energies are GeV, times ns, lengths mm and angles degrees; see [`units`].

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod aggregator;
pub mod catalog;
pub mod collection;
pub mod detector;
pub mod error;
pub mod geometry;
pub mod hit;
pub mod numbering;
pub mod registry;
pub mod slave;
pub mod snapshot;
pub mod step;
pub mod units;

pub use aggregator::{AggregatorState, EventSummary, HitAggregator, PrimaryEntry, Resolution, StepOutcome};
pub use catalog::SensitiveDetectorCatalog;
pub use collection::{HitCollection, HitIndex, SharedHitCollection};
pub use detector::{BeginOfEvent, EndOfEvent, Fp420SensitiveDetector, Observer, SensitiveDetector};
pub use error::{HitError, Result};
pub use geometry::{AffineTransform, PolarAngles, ThreeVector};
pub use hit::{HitKey, HitRecord};
pub use numbering::{Fp420Index, Fp420NumberingScheme, NumberingScheme, FP420_SILICON};
pub use registry::{CollectionId, HitCollectionRegistry, HitsCollectionsOfEvent};
pub use slave::{SimHit, TrackingSlave, TrackingSlaveCollector};
pub use snapshot::{DepositKind, StepSnapshot};
pub use step::{ParticleDefinition, SimStep, StepPoint, Touchable, Track, TransportStep, VolumeLevel};
