// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Detector-unit numbering
//!
//! The scheme is chosen once from the detector name. Unit id 0 always means
//! "unscored".

use core::fmt;
use tracing::warn;

use crate::step::{Touchable, TransportStep};

/// Detector name served by the FP420 silicon scheme
pub const FP420_SILICON: &str = "FP420SI";

const PLANE_BITS: u32 = 8;
const STATION_BITS: u32 = 4;
const ZSIDE_BITS: u32 = 2;
const DET_BITS: u32 = 4;

const STATION_SHIFT: u32 = PLANE_BITS;
const ZSIDE_SHIFT: u32 = STATION_SHIFT + STATION_BITS;
const DET_SHIFT: u32 = ZSIDE_SHIFT + ZSIDE_BITS;

const fn mask(bits: u32) -> u32 {
    (1 << bits) - 1
}

/// Decoded FP420 unit address
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Fp420Index {
    /// 1, 2 for the FP420 arms; 3, 4 for the HPS240 arms
    pub det: u32,
    /// 0 unknown, 1 left, 2 right
    pub zside: u32,
    pub station: u32,
    pub plane: u32,
}

impl Fp420Index {
    /// Pack into a unit id. Fields wider than their bit budget are masked.
    pub fn pack(&self) -> u32 {
        ((self.det & mask(DET_BITS)) << DET_SHIFT)
            | ((self.zside & mask(ZSIDE_BITS)) << ZSIDE_SHIFT)
            | ((self.station & mask(STATION_BITS)) << STATION_SHIFT)
            | (self.plane & mask(PLANE_BITS))
    }

    pub fn unpack(unit_id: u32) -> Self {
        Self {
            det: (unit_id >> DET_SHIFT) & mask(DET_BITS),
            zside: (unit_id >> ZSIDE_SHIFT) & mask(ZSIDE_BITS),
            station: (unit_id >> STATION_SHIFT) & mask(STATION_BITS),
            plane: unit_id & mask(PLANE_BITS),
        }
    }
}

impl fmt::Display for Fp420Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "det={} zside={} station={} plane={}",
            self.det, self.zside, self.station, self.plane
        )
    }
}

/// Default FP420 scheme: reads the placement history of the pre-step point
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Fp420NumberingScheme;

impl Fp420NumberingScheme {
    pub fn index(&self, touchable: &Touchable) -> Fp420Index {
        let mut index = Fp420Index::default();
        let mut station_generation = 0;

        // Outermost volume first so the station generation is known before SISTATION
        for level in touchable.history.iter().rev() {
            let copy_no = level.copy_no.max(0) as u32;
            match level.name.as_str() {
                "FP420E" => index.det = copy_no,
                "HPS240E" => index.det = copy_no + 2,
                "FP420Ex1" => station_generation = 1,
                "FP420Ex3" => station_generation = 2,
                "SISTATION" => index.station = station_generation,
                "SIPLANE" => index.plane = copy_no,
                "SIDETL" => index.zside = 1,
                "SIDETR" => index.zside = 2,
                _ => {}
            }
        }

        index
    }

    /// Unit id for a touchable; 0 when no detector arm is in the history
    pub fn unit_id_for(&self, touchable: &Touchable) -> u32 {
        let index = self.index(touchable);
        if index.det == 0 {
            return 0;
        }
        index.pack()
    }
}

/// Numbering behavior selected at construction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NumberingScheme {
    Fp420(Fp420NumberingScheme),
    /// No scheme for this detector name: every step is unscored
    #[default]
    Unscored,
}

impl NumberingScheme {
    /// Resolve the scheme by exact detector name
    pub fn for_detector(name: &str) -> Self {
        match name {
            FP420_SILICON => NumberingScheme::Fp420(Fp420NumberingScheme),
            _ => {
                warn!(
                    target: "fp420_hits",
                    detector = name,
                    "FP420SD: ReadoutName not supported, all unit ids will be 0"
                );
                NumberingScheme::Unscored
            }
        }
    }

    pub fn unit_id<S: TransportStep + ?Sized>(&self, step: &S) -> u32 {
        match self {
            NumberingScheme::Fp420(scheme) => scheme.unit_id_for(&step.pre_step_point().touchable),
            NumberingScheme::Unscored => 0,
        }
    }

    pub fn is_scored(&self) -> bool {
        !matches!(self, NumberingScheme::Unscored)
    }
}
