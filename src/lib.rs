// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # FP420 - Forward Silicon Tracker Sensitive Detector
//!
//! Hit aggregation for the FP420 silicon planes, driven by a particle
//! transport engine one step at a time. This crate re-exports the workspace
//! members and hosts the event replay driver used by the `fp420_replay` tool.
//!
//! ## Crates
//! - **`hits`**: step ingestion, hit aggregation, event boundaries
//! - **`config`**: TOML configuration with environment and CLI overrides
//! - **`observability`**: logging initialization and per-crate debug flags
//!
//! ## Usage
//!
//! ```rust
//! use fp420::prelude::*;
//!
//! let catalog = SensitiveDetectorCatalog::new().with_volumes("FP420SI", ["FP420SiPlane"]);
//! let mut sd = Fp420SensitiveDetector::new("FP420SI", &catalog, &SensitiveDetectorConfig::default());
//! let mut registry = HitsCollectionsOfEvent::new();
//!
//! sd.update(&BeginOfEvent { event_id: 1 });
//! sd.initialize(&mut registry);
//! // sd.process_hits(Some(&step)) for every step of the event
//! sd.end_of_event();
//! ```

// Re-export foundation
pub use fp420_config as config;

// Re-export infrastructure
pub use fp420_observability as observability;

// Re-export detector
pub use fp420_hits as hits;

pub mod replay;

/// Prelude - commonly used types and traits
pub mod prelude {
    pub use crate::config::{Fp420Config, SensitiveDetectorConfig};
    pub use crate::hits::{
        BeginOfEvent, EndOfEvent, Fp420SensitiveDetector, HitCollectionRegistry,
        HitsCollectionsOfEvent, Observer, SensitiveDetector, SensitiveDetectorCatalog, SimHit,
        SimStep, TrackingSlave, TransportStep,
    };
    pub use crate::replay::{ReplayEvent, ReplayInput, ReplayRunner};
}
