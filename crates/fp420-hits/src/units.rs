// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Unit constants
//!
//! Step quantities arrive in engine units: mm, ns, GeV and radians. Lengths
//! are used as given; dividing any other value by one of these constants
//! expresses it in that unit.

pub const NANOSECOND: f64 = 1.0;

pub const GEV: f64 = 1.0;

pub const RADIAN: f64 = 1.0;
pub const DEGREE: f64 = std::f64::consts::PI / 180.0 * RADIAN;
