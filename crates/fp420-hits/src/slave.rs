// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Downstream tracking slave
//!
//! Receives finalized hits at end of event and keeps them as persistent
//! [`SimHit`]s until the next event start.

use serde::Serialize;

use crate::geometry::ThreeVector;
use crate::hit::HitRecord;

/// Persistent form of a hit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimHit {
    pub entry_point: ThreeVector,
    pub exit_point: ThreeVector,
    pub pabs: f64,
    pub tof: f64,
    pub energy_loss: f64,
    pub particle_type: i32,
    pub unit_id: u32,
    pub track_id: i32,
    pub theta_at_entry: f64,
    pub phi_at_entry: f64,
}

impl From<&HitRecord> for SimHit {
    fn from(hit: &HitRecord) -> Self {
        Self {
            entry_point: hit.entry_local(),
            exit_point: hit.exit_local(),
            pabs: hit.pabs(),
            tof: hit.tof(),
            energy_loss: hit.energy_loss(),
            particle_type: hit.particle_type(),
            unit_id: hit.unit_id(),
            track_id: hit.track_id(),
            theta_at_entry: hit.theta_at_entry(),
            phi_at_entry: hit.phi_at_entry(),
        }
    }
}

/// Consumer of finalized hits
///
/// Must copy what it needs from each record: the collection is dropped at the
/// next event start.
pub trait TrackingSlave {
    fn name(&self) -> &str;

    /// Forget the previous event's output
    fn initialize(&mut self);

    fn process_hits(&mut self, hit: &HitRecord);

    fn hits(&self) -> &[SimHit];
}

#[derive(Debug, Clone, Default)]
pub struct TrackingSlaveCollector {
    name: String,
    hits: Vec<SimHit>,
}

impl TrackingSlaveCollector {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hits: Vec::new(),
        }
    }
}

impl TrackingSlave for TrackingSlaveCollector {
    fn name(&self) -> &str {
        &self.name
    }

    fn initialize(&mut self) {
        self.hits.clear();
    }

    fn process_hits(&mut self, hit: &HitRecord) {
        self.hits.push(SimHit::from(hit));
    }

    fn hits(&self) -> &[SimHit] {
        &self.hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::StepSnapshot;

    #[test]
    fn test_collector_converts_and_resets() {
        let snapshot = StepSnapshot {
            track_id: 3,
            unit_id: 9,
            energy_loss: 0.02,
            entry_local: ThreeVector::new(0.0, 0.0, -0.1),
            exit_local: ThreeVector::new(0.0, 0.0, 0.1),
            particle_type: 2212,
            ..Default::default()
        };
        let hit = HitRecord::from_snapshot(&snapshot, 0.0);

        let mut slave = TrackingSlaveCollector::new("FP420SI");
        slave.process_hits(&hit);
        assert_eq!(slave.name(), "FP420SI");
        assert_eq!(slave.hits().len(), 1);

        let sim_hit = &slave.hits()[0];
        assert_eq!(sim_hit.track_id, 3);
        assert_eq!(sim_hit.unit_id, 9);
        assert_eq!(sim_hit.energy_loss, 0.02);
        assert_eq!(sim_hit.entry_point, ThreeVector::new(0.0, 0.0, -0.1));
        assert_eq!(sim_hit.exit_point, ThreeVector::new(0.0, 0.0, 0.1));

        slave.initialize();
        assert!(slave.hits().is_empty());
    }
}
