//! Collision predicates and the pairwise hit resolution table.
//!
//! Instead of bodies dispatching `hit` calls back and forth, every contact
//! is resolved through pure functions: the circle overlap test, the
//! reaction a body kind produces, and the damage a craft takes. The shot
//! advance loop applies the results; nothing here mutates game state.

use bevy::math::DVec2;

use crate::galaxy::body::{Attractor, BodyKind};
use crate::vector::Polar;

/// Circle overlap on collision *diameters*: two shapes touch when their
/// centers are within half the summed widths.
#[inline]
pub fn circles_overlap(a: DVec2, a_width: f64, b: DVec2, b_width: f64) -> bool {
    a.distance(b) <= (a_width + b_width) / 2.0
}

/// What striking a body does to the striking object.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Reaction {
    /// The shot detonates; the body takes a knockback.
    Detonate,
    /// The shot is displaced by the offset and keeps flying.
    Teleport(DVec2),
    /// The shot is gone without explosion or damage.
    Swallow,
}

/// Reaction produced by the struck body's kind.
pub fn body_reaction(body: &Attractor) -> Reaction {
    match &body.kind {
        BodyKind::Planet { .. } => Reaction::Detonate,
        BodyKind::Blackhole => Reaction::Swallow,
        BodyKind::Wormhole { exit } => Reaction::Teleport(*exit),
    }
}

/// Shield damage a craft takes from an impact.
///
/// Proportional to impact speed and shot weight, truncated to whole
/// shield points.
#[inline]
pub fn impact_damage(speed: f64, weight: f64) -> i32 {
    (speed / 10.0 * weight) as i32
}

/// Knockback impulse a planet picks up from a detonating shot: away from
/// the impact, carried along by the shot's momentum, and scaled down for
/// heavy planets.
pub fn knockback(body_pos: DVec2, body_weight: f64, shot_pos: DVec2, shot_vel: DVec2) -> DVec2 {
    let impulse = (body_pos - shot_pos) + shot_vel;
    impulse.with_length(10.0 / body_weight + 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_reactions_by_kind() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);

        assert_eq!(
            body_reaction(&Attractor::planet(&mut rng)),
            Reaction::Detonate
        );
        assert_eq!(body_reaction(&Attractor::blackhole()), Reaction::Swallow);

        let wormhole = Attractor::wormhole(&mut rng);
        let BodyKind::Wormhole { exit } = wormhole.kind else {
            unreachable!();
        };
        assert_eq!(body_reaction(&wormhole), Reaction::Teleport(exit));
    }

    #[test]
    fn test_damage_truncates_to_shield_points() {
        assert_eq!(impact_damage(250.0, 1.0), 25);
        assert_eq!(impact_damage(250.0, 2.0), 50);
        assert_eq!(impact_damage(99.9, 1.0), 9);
        assert_eq!(impact_damage(0.0, 2.0), 0);
    }

    #[test]
    fn test_knockback_weakens_with_planet_weight() {
        let shot_pos = DVec2::new(0.0, 0.0);
        let shot_vel = DVec2::new(120.0, 0.0);
        let body_pos = DVec2::new(40.0, 0.0);

        let light = knockback(body_pos, 100.0, shot_pos, shot_vel);
        let heavy = knockback(body_pos, 350.0, shot_pos, shot_vel);

        assert!(light.length() > heavy.length());
        // Both push roughly along the impact direction.
        assert!(light.x > 0.0 && heavy.x > 0.0);
    }

    proptest! {
        #[test]
        fn prop_overlap_is_symmetric(
            ax in -1000.0f64..1000.0, ay in -1000.0f64..1000.0,
            bx in -1000.0f64..1000.0, by in -1000.0f64..1000.0,
            aw in 0.0f64..200.0, bw in 0.0f64..200.0,
        ) {
            let a = DVec2::new(ax, ay);
            let b = DVec2::new(bx, by);
            prop_assert_eq!(
                circles_overlap(a, aw, b, bw),
                circles_overlap(b, bw, a, aw)
            );
        }

        #[test]
        fn prop_overlap_matches_distance(
            offset in 0.0f64..500.0,
            aw in 1.0f64..100.0, bw in 1.0f64..100.0,
        ) {
            let a = DVec2::ZERO;
            let b = DVec2::new(offset, 0.0);
            let expected = offset <= (aw + bw) / 2.0;
            prop_assert_eq!(circles_overlap(a, aw, b, bw), expected);
        }
    }
}
