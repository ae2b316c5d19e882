//! Polar-form helpers for `DVec2`.
//!
//! The duel aims everything with (length, angle) pairs: shot vectors are
//! built from an angle and a power, gravity contributions are rescaled
//! direction vectors. `DVec2` covers the cartesian side; this module adds
//! the polar operations on top as an extension trait so call sites read
//! naturally (`v.with_length(w / d)`).

use bevy::math::DVec2;

/// Polar-form construction and rescaling for 2D vectors.
pub trait Polar: Sized {
    /// Vector of the given length pointing along `angle` (radians).
    fn from_polar(length: f64, angle: f64) -> Self;

    /// Direction of this vector in radians (`atan2(y, x)`).
    fn angle(&self) -> f64;

    /// Same-direction vector rescaled to `length`.
    ///
    /// Returns the zero vector when either the requested length or the
    /// source vector is zero, so degenerate inputs never produce NaN.
    fn with_length(&self, length: f64) -> Self;

    /// This vector offset by a polar displacement.
    fn offset_polar(&self, length: f64, angle: f64) -> Self;
}

impl Polar for DVec2 {
    fn from_polar(length: f64, angle: f64) -> Self {
        DVec2::new(length * angle.cos(), length * angle.sin())
    }

    fn angle(&self) -> f64 {
        self.y.atan2(self.x)
    }

    fn with_length(&self, length: f64) -> Self {
        let current = self.length();
        if length == 0.0 || current == 0.0 {
            return DVec2::ZERO;
        }
        *self * (length / current)
    }

    fn offset_polar(&self, length: f64, angle: f64) -> Self {
        *self + DVec2::from_polar(length, angle)
    }
}

/// Absolute angular distance between two headings, folded into `[0, π]`.
pub fn angle_difference(a: f64, b: f64) -> f64 {
    use std::f64::consts::PI;

    let mut d = (a - b).abs();
    if d > 2.0 * PI {
        d -= 2.0 * PI;
    }
    if d > PI {
        d = 2.0 * PI - d;
    }
    d
}

/// Intersection point of two rays, or `None` when they are parallel.
pub fn ray_cross_point(p1: DVec2, angle1: f64, p2: DVec2, angle2: f64) -> Option<DVec2> {
    let r1 = DVec2::new(angle1.cos(), angle1.sin());
    let r2 = DVec2::new(angle2.cos(), angle2.sin());
    let det = r1.y * r2.x - r1.x * r2.y;

    if det.abs() < 1e-12 {
        return None;
    }

    let d = p2 - p1;
    let lambda = (d.y * r2.x - d.x * r2.y) / det;
    Some(p1 + r1 * lambda)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_from_polar_axes() {
        let v = DVec2::from_polar(10.0, 0.0);
        assert_relative_eq!(v.x, 10.0);
        assert_relative_eq!(v.y, 0.0, epsilon = 1e-12);

        let v = DVec2::from_polar(10.0, FRAC_PI_2);
        assert_relative_eq!(v.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(v.y, 10.0);
    }

    #[test]
    fn test_with_length_zero_is_safe() {
        assert_eq!(DVec2::new(3.0, 4.0).with_length(0.0), DVec2::ZERO);
        assert_eq!(DVec2::ZERO.with_length(5.0), DVec2::ZERO);
    }

    #[test]
    fn test_offset_polar_matches_manual_sum() {
        let v = DVec2::new(100.0, 50.0);
        let off = v.offset_polar(60.0, PI / 4.0);
        let expected = v + DVec2::from_polar(60.0, PI / 4.0);
        assert_relative_eq!(off.x, expected.x);
        assert_relative_eq!(off.y, expected.y);
    }

    #[test]
    fn test_angle_difference_wraps() {
        assert_relative_eq!(angle_difference(0.1, 2.0 * PI - 0.1), 0.2, epsilon = 1e-12);
        assert_relative_eq!(angle_difference(0.0, PI), PI);
        assert_relative_eq!(angle_difference(1.0, 1.0), 0.0);
    }

    #[test]
    fn test_ray_cross_point_perpendicular() {
        // Ray from origin along +x, ray from (5, -5) along +y: cross at (5, 0).
        let cross = ray_cross_point(DVec2::ZERO, 0.0, DVec2::new(5.0, -5.0), FRAC_PI_2)
            .expect("rays should cross");
        assert_relative_eq!(cross.x, 5.0, epsilon = 1e-9);
        assert_relative_eq!(cross.y, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_ray_cross_point_parallel_is_none() {
        assert!(ray_cross_point(DVec2::ZERO, 1.0, DVec2::new(10.0, 0.0), 1.0).is_none());
    }

    proptest! {
        #[test]
        fn prop_polar_roundtrip(len in 0.001f64..1e4, angle in -PI..PI) {
            let v = DVec2::from_polar(len, angle);
            prop_assert!((v.length() - len).abs() < 1e-6 * len.max(1.0));
            prop_assert!(angle_difference(v.angle(), angle) < 1e-9);
        }

        #[test]
        fn prop_with_length_rescales(x in -1e4f64..1e4, y in -1e4f64..1e4, len in 0.001f64..1e4) {
            prop_assume!(x.abs() > 1e-6 || y.abs() > 1e-6);
            let v = DVec2::new(x, y).with_length(len);
            prop_assert!((v.length() - len).abs() < 1e-6 * len.max(1.0));
        }

        #[test]
        fn prop_angle_difference_bounded(a in -10.0f64..10.0, b in -10.0f64..10.0) {
            prop_assume!((a - b).abs() <= 2.0 * PI);
            let d = angle_difference(a, b);
            prop_assert!((0.0..=PI + 1e-9).contains(&d));
        }
    }
}
