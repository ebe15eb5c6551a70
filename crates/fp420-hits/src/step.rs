// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Transport step model
//!
//! The transport engine owns steps and hands them to the detector one at a
//! time. [`TransportStep`] is the read-only view the detector needs; [`SimStep`]
//! is a plain-data implementation used by host adapters, the replay tool and
//! tests.

use serde::{Deserialize, Serialize};

use crate::geometry::{AffineTransform, ThreeVector};

/// One level of the volume hierarchy a point sits in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeLevel {
    pub name: String,
    #[serde(default)]
    pub copy_no: i32,
}

impl VolumeLevel {
    pub fn new(name: impl Into<String>, copy_no: i32) -> Self {
        Self {
            name: name.into(),
            copy_no,
        }
    }
}

/// Placement history of a step point
///
/// `history[0]` is the volume the point is in; the last entry is the world.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Touchable {
    #[serde(default)]
    pub history: Vec<VolumeLevel>,
    /// Global-to-local transform of `history[0]`
    #[serde(default)]
    pub top_transform: AffineTransform,
}

impl Touchable {
    pub fn new(history: Vec<VolumeLevel>, top_transform: AffineTransform) -> Self {
        Self {
            history,
            top_transform,
        }
    }

    pub fn to_local(&self, global: ThreeVector) -> ThreeVector {
        self.top_transform.transform_point3(global)
    }
}

/// Pre- or post-step point
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepPoint {
    pub position: ThreeVector,
    #[serde(default)]
    pub momentum: ThreeVector,
    #[serde(default)]
    pub kinetic_energy: f64,
    #[serde(default)]
    pub global_time: f64,
    #[serde(default)]
    pub touchable: Touchable,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParticleDefinition {
    /// Engine particle name, e.g. `e-`, `gamma`, `proton`
    pub name: String,
    pub pdg_encoding: i32,
}

impl ParticleDefinition {
    pub fn new(name: impl Into<String>, pdg_encoding: i32) -> Self {
        Self {
            name: name.into(),
            pdg_encoding,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub track_id: i32,
    /// 0 for primaries
    #[serde(default)]
    pub parent_id: i32,
    #[serde(default)]
    pub vertex_position: ThreeVector,
    pub definition: ParticleDefinition,
    #[serde(default)]
    pub creator_process: Option<String>,
    #[serde(default)]
    pub total_energy: f64,
}

/// Read-only view of one simulation step
pub trait TransportStep {
    fn pre_step_point(&self) -> &StepPoint;
    fn post_step_point(&self) -> &StepPoint;
    fn track(&self) -> &Track;
    /// Total energy deposited along the step, GeV
    fn total_energy_deposit(&self) -> f64;
}

/// Plain-data step
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimStep {
    pub pre_step: StepPoint,
    pub post_step: StepPoint,
    pub track: Track,
    pub total_energy_deposit: f64,
}

impl TransportStep for SimStep {
    fn pre_step_point(&self) -> &StepPoint {
        &self.pre_step
    }

    fn post_step_point(&self) -> &StepPoint {
        &self.post_step
    }

    fn track(&self) -> &Track {
        &self.track
    }

    fn total_energy_deposit(&self) -> f64 {
        self.total_energy_deposit
    }
}
