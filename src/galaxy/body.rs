//! Attractor bodies: planets with satellites, black holes, wormholes.
//!
//! Every body exposes the same small surface to the rest of the game:
//! a position, a signed gravitational weight, a collision diameter and a
//! spacing margin honored only while the galaxy is being laid out.

use bevy::math::DVec2;
use rand::Rng;
use std::f64::consts::PI;

use crate::collision::circles_overlap;
use crate::types::{
    WEIGHT_BLACKHOLE, WEIGHT_EARTH, WEIGHT_JUPITER, WEIGHT_MARS, WEIGHT_SATURN, WEIGHT_VENUS,
    WEIGHT_WORMHOLE,
};
use crate::vector::Polar;

/// Degrees-to-radians step used by the satellite animation.
const DEG: f64 = PI / 180.0;

/// The planet flavors, with their gameplay parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlanetClass {
    Jupiter,
    Earth,
    Mars,
    Venus,
    Saturn,
}

impl PlanetClass {
    pub fn weight(self) -> f64 {
        match self {
            PlanetClass::Jupiter => WEIGHT_JUPITER,
            PlanetClass::Earth => WEIGHT_EARTH,
            PlanetClass::Mars => WEIGHT_MARS,
            PlanetClass::Venus => WEIGHT_VENUS,
            PlanetClass::Saturn => WEIGHT_SATURN,
        }
    }

    /// Collision diameter.
    pub fn diameter(self) -> f64 {
        match self {
            PlanetClass::Jupiter => 120.0,
            PlanetClass::Earth => 90.0,
            PlanetClass::Mars => 70.0,
            PlanetClass::Venus => 60.0,
            PlanetClass::Saturn => 100.0,
        }
    }

    /// Extra clearance demanded during galaxy layout.
    pub fn spacing(self) -> f64 {
        match self {
            PlanetClass::Jupiter => 100.0,
            PlanetClass::Earth => 80.0,
            PlanetClass::Mars => 60.0,
            PlanetClass::Venus => 30.0,
            PlanetClass::Saturn => 70.0,
        }
    }

    fn roll(rng: &mut impl Rng) -> Self {
        match rng.gen_range(0..5) {
            0 => PlanetClass::Jupiter,
            1 => PlanetClass::Earth,
            2 => PlanetClass::Mars,
            3 => PlanetClass::Venus,
            _ => PlanetClass::Saturn,
        }
    }
}

/// A moon or ring stone orbiting a planet. Independently collidable.
#[derive(Clone, Debug)]
pub struct Stone {
    /// Primary orbital phase.
    orbit: f64,
    /// Secondary phase (free axis for moons, ring precession otherwise).
    phase: f64,
    /// Phase advance per tick, in degrees.
    speed: f64,
    /// Orbital radius around the parent center.
    distance: f64,
    /// Collision diameter.
    width: f64,
    /// Ring stones share a flattened ellipse; moons roam both axes.
    ring: bool,
    /// Current offset from the parent center, updated every tick.
    offset: DVec2,
}

impl Stone {
    fn moon(rng: &mut impl Rng, distance: f64) -> Self {
        let mut stone = Self {
            orbit: rng.gen_range(0.0..2.0 * PI),
            phase: rng.gen_range(0.0..2.0 * PI),
            speed: rng.gen_range(1.0..3.0),
            distance,
            width: 16.0,
            ring: false,
            offset: DVec2::ZERO,
        };
        stone.reposition();
        stone
    }

    fn ring(rng: &mut impl Rng, ring_phase: f64, distance: f64) -> Self {
        let mut stone = Self {
            orbit: rng.gen_range(0.0..2.0 * PI),
            phase: ring_phase,
            speed: rng.gen_range(1.0..2.0),
            distance,
            width: 12.0,
            ring: true,
            offset: DVec2::ZERO,
        };
        stone.reposition();
        stone
    }

    /// Current offset from the parent planet center.
    pub fn offset(&self) -> DVec2 {
        self.offset
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    /// Advance the orbital phases by one tick.
    pub fn advance(&mut self) {
        self.orbit += DEG * self.speed;
        self.phase += DEG * if self.ring { 1.0 } else { self.speed };

        if self.orbit >= 2.0 * PI {
            self.orbit -= 2.0 * PI;
        }
        if self.phase >= 2.0 * PI {
            self.phase -= 2.0 * PI;
        }

        self.reposition();
    }

    fn reposition(&mut self) {
        self.offset = if self.ring {
            // Ring stones trace a tilted ellipse around the planet.
            DVec2::new(
                self.orbit.sin() * self.distance,
                (-45.0 * DEG).sin() * self.orbit.cos() / 2.0 * self.distance,
            )
        } else {
            DVec2::new(
                self.orbit.sin() * self.distance,
                self.phase.sin() * self.distance,
            )
        };
    }
}

/// What a body is, beyond its shared position/weight/width surface.
#[derive(Clone, Debug)]
pub enum BodyKind {
    Planet {
        class: PlanetClass,
        stones: Vec<Stone>,
        /// Knockback applied while a recent shot impact rings out.
        recoil: DVec2,
    },
    /// Attracts hard; anything reaching the core is gone without a trace.
    Blackhole,
    /// Teleports whatever touches it by `exit`, without harming it.
    Wormhole { exit: DVec2 },
}

/// A gravitating, collidable body of the galaxy.
#[derive(Clone, Debug)]
pub struct Attractor {
    pub pos: DVec2,
    /// Gravitational strength; force magnitude on a shot is `weight / distance`.
    pub weight: f64,
    /// Collision diameter.
    pub width: f64,
    /// Extra clearance enforced only at layout time.
    pub spacing: f64,
    pub kind: BodyKind,
}

impl Attractor {
    /// Roll a random planet with its satellites.
    pub fn planet(rng: &mut impl Rng) -> Self {
        let class = PlanetClass::roll(rng);
        let width = class.diameter();

        let stones = match class {
            PlanetClass::Saturn => {
                let ring_phase = rng.gen_range(0.0..2.0 * PI);
                let count = rng.gen_range(20..35);
                (0..count)
                    .map(|_| {
                        let distance = width / 2.0 + rng.gen_range(15.0..35.0);
                        Stone::ring(rng, ring_phase, distance)
                    })
                    .collect()
            }
            PlanetClass::Jupiter => {
                let count = rng.gen_range(1..4);
                Self::moons(rng, width, count)
            }
            PlanetClass::Earth | PlanetClass::Mars => {
                let count = rng.gen_range(0..2);
                Self::moons(rng, width, count)
            }
            PlanetClass::Venus => Vec::new(),
        };

        Self {
            pos: DVec2::ZERO,
            weight: class.weight(),
            width,
            spacing: class.spacing(),
            kind: BodyKind::Planet {
                class,
                stones,
                recoil: DVec2::ZERO,
            },
        }
    }

    fn moons(rng: &mut impl Rng, width: f64, count: usize) -> Vec<Stone> {
        (0..count)
            .map(|_| {
                let distance = width / 2.0 + rng.gen_range(10.0..12.0);
                Stone::moon(rng, distance)
            })
            .collect()
    }

    pub fn blackhole() -> Self {
        Self {
            pos: DVec2::ZERO,
            weight: WEIGHT_BLACKHOLE,
            // Only the innermost core swallows; the pull does the rest.
            width: 9.0,
            spacing: 150.0,
            kind: BodyKind::Blackhole,
        }
    }

    pub fn wormhole(rng: &mut impl Rng) -> Self {
        let mut exit = DVec2::new(rng.gen_range(150.0..350.0), rng.gen_range(150.0..350.0));
        if rng.gen_range(0..2) == 1 {
            exit.x = -exit.x;
        }
        if rng.gen_range(0..2) == 1 {
            exit.y = -exit.y;
        }

        Self {
            pos: DVec2::ZERO,
            weight: WEIGHT_WORMHOLE,
            width: 25.0,
            spacing: 60.0,
            kind: BodyKind::Wormhole { exit },
        }
    }

    /// Live collision test against the body and its satellites.
    pub fn collides(&self, point: DVec2, width: f64) -> bool {
        self.check_collision(point, width, false)
    }

    /// Layout-time collision test with the spacing margin included.
    pub fn collides_spaced(&self, point: DVec2, width: f64) -> bool {
        self.check_collision(point, width, true)
    }

    fn check_collision(&self, point: DVec2, width: f64, spacing: bool) -> bool {
        let my_width = if spacing {
            self.width + self.spacing
        } else {
            self.width
        };

        if circles_overlap(self.pos, my_width, point, width) {
            return true;
        }

        if let BodyKind::Planet { stones, .. } = &self.kind {
            return stones
                .iter()
                .any(|s| circles_overlap(self.pos + s.offset(), s.width(), point, width));
        }

        false
    }

    /// Animate satellites and let a knockback ring out.
    pub fn advance(&mut self) {
        if let BodyKind::Planet { stones, recoil, .. } = &mut self.kind {
            for stone in stones.iter_mut() {
                stone.advance();
            }

            if recoil.length() > 1.0 {
                self.pos += *recoil;
                *recoil = recoil.with_length(recoil.length() / 2.0);
            }
        }
    }

    /// Start a knockback; non-planets shrug hits off.
    pub fn nudge(&mut self, impulse: DVec2) {
        if let BodyKind::Planet { recoil, .. } = &mut self.kind {
            *recoil = impulse;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(7)
    }

    #[test]
    fn test_collision_uses_summed_diameters() {
        let mut body = Attractor::blackhole();
        body.pos = DVec2::new(100.0, 100.0);

        // width 9 + probe 11 => overlap inside distance 10
        assert!(body.collides(DVec2::new(109.0, 100.0), 11.0));
        assert!(!body.collides(DVec2::new(111.0, 100.0), 11.0));
    }

    #[test]
    fn test_spacing_only_applies_when_asked() {
        let mut body = Attractor::wormhole(&mut rng());
        body.pos = DVec2::ZERO;

        // Inside spacing (25 + 60 + 10)/2 = 47.5 but outside the live radius.
        let probe = DVec2::new(40.0, 0.0);
        assert!(!body.collides(probe, 10.0));
        assert!(body.collides_spaced(probe, 10.0));
    }

    #[test]
    fn test_stone_orbits_stay_bounded() {
        let mut rng = rng();
        let mut stone = Stone::moon(&mut rng, 50.0);

        for _ in 0..500 {
            stone.advance();
            assert!(stone.offset().length() <= 50.0 * 2.0_f64.sqrt() + 1e-9);
        }
    }

    #[test]
    fn test_saturn_carries_a_ring() {
        let mut rng = rng();
        loop {
            let body = Attractor::planet(&mut rng);
            if let BodyKind::Planet {
                class: PlanetClass::Saturn,
                stones,
                ..
            } = &body.kind
            {
                assert!(stones.len() >= 20);
                break;
            }
        }
    }

    #[test]
    fn test_satellites_extend_collision_shape() {
        let mut rng = rng();
        let mut body = loop {
            let body = Attractor::planet(&mut rng);
            if let BodyKind::Planet { stones, .. } = &body.kind {
                if !stones.is_empty() {
                    break body;
                }
            }
        };
        body.pos = DVec2::new(500.0, 400.0);

        let BodyKind::Planet { stones, .. } = &body.kind else {
            unreachable!();
        };
        let stone_pos = body.pos + stones[0].offset();

        // A probe on the satellite but outside the planet core still hits.
        assert!(body.collides(stone_pos, 1.0));
    }

    #[test]
    fn test_recoil_decays_to_rest() {
        let mut rng = rng();
        let mut body = Attractor::planet(&mut rng);
        body.pos = DVec2::new(300.0, 300.0);
        body.nudge(DVec2::new(8.0, 0.0));

        let start = body.pos;
        for _ in 0..32 {
            body.advance();
        }

        let BodyKind::Planet { recoil, .. } = &body.kind else {
            unreachable!();
        };
        assert!(recoil.length() <= 1.0);
        // The planet drifted by roughly the geometric series of the impulse.
        assert!(body.pos.x > start.x);
        assert!(body.pos.x - start.x < 17.0);
    }
}
