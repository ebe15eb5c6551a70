// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Geometry primitives: three-vectors and the affine transform a touchable
//! uses to go from global to local coordinates.
//!
//! Both are `glam` double-precision types. Only the polar-angle conventions of
//! the transport engine live here.

use glam::{DAffine3, DVec3};

/// Cartesian three-vector (positions in mm, momenta in GeV)
pub type ThreeVector = DVec3;

/// Global-to-local transform: rotation followed by translation
pub type AffineTransform = DAffine3;

/// Polar coordinates with the engine's conventions for degenerate vectors
pub trait PolarAngles {
    /// Transverse component
    fn perp(&self) -> f64;

    /// Polar angle in radians, 0 for the null vector
    fn theta(&self) -> f64;

    /// Azimuthal angle in radians within (-pi, pi], 0 on the z axis
    fn phi(&self) -> f64;
}

impl PolarAngles for DVec3 {
    fn perp(&self) -> f64 {
        self.x.hypot(self.y)
    }

    fn theta(&self) -> f64 {
        if *self == DVec3::ZERO {
            0.0
        } else {
            self.perp().atan2(self.z)
        }
    }

    fn phi(&self) -> f64 {
        if self.x == 0.0 && self.y == 0.0 {
            0.0
        } else {
            self.y.atan2(self.x)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DQuat;
    use std::f64::consts::FRAC_PI_2;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_angles() {
        let v = ThreeVector::new(0.0, 1.0, 0.0);
        assert!((v.theta() - FRAC_PI_2).abs() < EPS);
        assert!((v.phi() - FRAC_PI_2).abs() < EPS);

        let along_z = ThreeVector::new(0.0, 0.0, 5.0);
        assert_eq!(along_z.theta(), 0.0);
        assert_eq!(along_z.phi(), 0.0);
        assert_eq!(ThreeVector::ZERO.theta(), 0.0);
    }

    #[test]
    fn test_perp() {
        let v = ThreeVector::new(3.0, 4.0, 12.0);
        assert!((v.perp() - 5.0).abs() < EPS);
        assert!((v.length() - 13.0).abs() < EPS);
    }

    #[test]
    fn test_rotation_then_translation() {
        let transform = AffineTransform::from_rotation_translation(
            DQuat::from_rotation_z(FRAC_PI_2),
            ThreeVector::new(0.0, 0.0, -100.0),
        );
        let local = transform.transform_point3(ThreeVector::new(1.0, 0.0, 100.0));
        assert!(local.abs_diff_eq(ThreeVector::new(0.0, 1.0, 0.0), EPS));

        let p = ThreeVector::new(1.5, -2.0, 7.0);
        assert_eq!(AffineTransform::IDENTITY.transform_point3(p), p);
    }
}
