// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Step ingestion: the per-step snapshot the aggregator works from

use crate::geometry::{PolarAngles, ThreeVector};
use crate::numbering::NumberingScheme;
use crate::step::TransportStep;
use crate::units::{DEGREE, GEV, NANOSECOND};

/// Which accumulator a deposit feeds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DepositKind {
    Electromagnetic,
    #[default]
    Hadronic,
}

impl DepositKind {
    pub fn of_particle(particle_name: &str) -> Self {
        match particle_name {
            "e-" | "e+" | "gamma" => DepositKind::Electromagnetic,
            _ => DepositKind::Hadronic,
        }
    }
}

/// Physical quantities of one step, recomputed every step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepSnapshot {
    pub track_id: i32,
    pub parent_id: i32,
    /// Post-step global time, ns
    pub time_slice: f64,
    /// `time_slice` truncated toward zero
    pub time_slice_id: i32,
    /// 0 = unscored
    pub unit_id: u32,

    /// Accumulator chosen from the particle name, whatever the deposit
    pub deposit_kind: DepositKind,
    /// Raw total deposit, GeV
    pub energy_deposit: f64,
    pub deposit_em: f64,
    pub deposit_had: f64,
    /// Scalar energy loss written to hits, GeV
    pub energy_loss: f64,

    /// Pre-step momentum magnitude, GeV
    pub momentum: f64,
    /// Time of flight, ns
    pub tof: f64,
    /// PDG code
    pub particle_type: i32,
    /// Degrees
    pub theta_at_entry: f64,
    /// Degrees
    pub phi_at_entry: f64,

    pub entry: ThreeVector,
    pub exit: ThreeVector,
    /// Entry and exit in the pre-step volume frame
    pub entry_local: ThreeVector,
    pub exit_local: ThreeVector,
    /// Exit in the post-step volume frame
    pub exit_local_post: ThreeVector,
    /// Pre-step kinetic energy, GeV
    pub incident_energy: f64,
    pub vertex: ThreeVector,
}

impl StepSnapshot {
    /// Extract the snapshot and number the step's detector unit
    pub fn capture<S: TransportStep + ?Sized>(step: &S, numbering: &NumberingScheme) -> Self {
        let pre = step.pre_step_point();
        let post = step.post_step_point();
        let track = step.track();

        let energy_deposit = step.total_energy_deposit();
        let deposit_kind = DepositKind::of_particle(&track.definition.name);
        let (deposit_em, deposit_had) = match deposit_kind {
            DepositKind::Electromagnetic => (energy_deposit, 0.0),
            DepositKind::Hadronic => (0.0, energy_deposit),
        };

        let time_slice = post.global_time / NANOSECOND;
        let entry = pre.position;
        let exit = post.position;

        Self {
            track_id: track.track_id,
            parent_id: track.parent_id,
            time_slice,
            time_slice_id: time_slice as i32,
            unit_id: numbering.unit_id(step),
            deposit_kind,
            energy_deposit,
            deposit_em,
            deposit_had,
            energy_loss: energy_deposit / GEV,
            momentum: pre.momentum.length() / GEV,
            tof: post.global_time / NANOSECOND,
            particle_type: track.definition.pdg_encoding,
            theta_at_entry: entry.theta() / DEGREE,
            phi_at_entry: entry.phi() / DEGREE,
            entry,
            exit,
            entry_local: pre.touchable.to_local(entry),
            exit_local: pre.touchable.to_local(exit),
            exit_local_post: post.touchable.to_local(exit),
            incident_energy: pre.kinetic_energy,
            vertex: track.vertex_position,
        }
    }
}
