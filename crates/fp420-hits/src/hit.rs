// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Accumulated hit record

use core::fmt;
use serde::Serialize;

use crate::geometry::ThreeVector;
use crate::snapshot::StepSnapshot;

/// Identity of a hit within one event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct HitKey {
    pub track_id: i32,
    pub time_slice_id: i32,
    pub unit_id: u32,
}

impl HitKey {
    pub fn of(snapshot: &StepSnapshot) -> Self {
        Self {
            track_id: snapshot.track_id,
            time_slice_id: snapshot.time_slice_id,
            unit_id: snapshot.unit_id,
        }
    }
}

impl fmt::Display for HitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "track={} slice={} unit={}",
            self.track_id, self.time_slice_id, self.unit_id
        )
    }
}

/// Energy deposits of one (track, time slice, unit) within an event
///
/// Kinematic fields are stamped at creation and never change. The EM and
/// hadronic accumulators only grow.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HitRecord {
    track_id: i32,
    time_slice: f64,
    unit_id: u32,

    em: f64,
    hadr: f64,
    energy_loss: f64,
    incident_energy: f64,

    pabs: f64,
    tof: f64,
    particle_type: i32,
    theta_at_entry: f64,
    phi_at_entry: f64,
    entry: ThreeVector,
    entry_local: ThreeVector,
    exit_local: ThreeVector,
    parent_id: i32,
    vertex: ThreeVector,
}

impl HitRecord {
    /// New record with empty accumulators
    pub fn from_snapshot(snapshot: &StepSnapshot, incident_energy: f64) -> Self {
        Self {
            track_id: snapshot.track_id,
            time_slice: snapshot.time_slice,
            unit_id: snapshot.unit_id,
            em: 0.0,
            hadr: 0.0,
            energy_loss: snapshot.energy_loss,
            incident_energy,
            pabs: snapshot.momentum,
            tof: snapshot.tof,
            particle_type: snapshot.particle_type,
            theta_at_entry: snapshot.theta_at_entry,
            phi_at_entry: snapshot.phi_at_entry,
            entry: snapshot.entry,
            entry_local: snapshot.entry_local,
            exit_local: snapshot.exit_local,
            parent_id: snapshot.parent_id,
            vertex: snapshot.vertex,
        }
    }

    pub fn key(&self) -> HitKey {
        HitKey {
            track_id: self.track_id,
            time_slice_id: self.time_slice_id(),
            unit_id: self.unit_id,
        }
    }

    pub(crate) fn add_energy_deposit(&mut self, em: f64, hadr: f64) {
        self.em += em.max(0.0);
        self.hadr += hadr.max(0.0);
    }

    pub(crate) fn set_energy_loss(&mut self, energy_loss: f64) {
        self.energy_loss = energy_loss;
    }

    pub fn track_id(&self) -> i32 {
        self.track_id
    }

    pub fn time_slice(&self) -> f64 {
        self.time_slice
    }

    pub fn time_slice_id(&self) -> i32 {
        self.time_slice as i32
    }

    pub fn unit_id(&self) -> u32 {
        self.unit_id
    }

    pub fn em(&self) -> f64 {
        self.em
    }

    pub fn hadr(&self) -> f64 {
        self.hadr
    }

    /// EM plus hadronic accumulated deposit
    pub fn energy_deposit(&self) -> f64 {
        self.em + self.hadr
    }

    pub fn energy_loss(&self) -> f64 {
        self.energy_loss
    }

    pub fn incident_energy(&self) -> f64 {
        self.incident_energy
    }

    pub fn pabs(&self) -> f64 {
        self.pabs
    }

    pub fn tof(&self) -> f64 {
        self.tof
    }

    pub fn particle_type(&self) -> i32 {
        self.particle_type
    }

    pub fn theta_at_entry(&self) -> f64 {
        self.theta_at_entry
    }

    pub fn phi_at_entry(&self) -> f64 {
        self.phi_at_entry
    }

    pub fn entry(&self) -> ThreeVector {
        self.entry
    }

    pub fn entry_local(&self) -> ThreeVector {
        self.entry_local
    }

    pub fn exit_local(&self) -> ThreeVector {
        self.exit_local
    }

    pub fn parent_id(&self) -> i32 {
        self.parent_id
    }

    pub fn vertex(&self) -> ThreeVector {
        self.vertex
    }
}

impl fmt::Display for HitRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FP420 hit [{}] EM={:.6} HAD={:.6} Eloss={:.6} Einc={:.4} p={:.4} tof={:.3} pdg={} entry={} parent={}",
            self.key(),
            self.em,
            self.hadr,
            self.energy_loss,
            self.incident_energy,
            self.pabs,
            self.tof,
            self.particle_type,
            self.entry,
            self.parent_id
        )
    }
}
