//! The galaxy: the attractor set shots fly through.
//!
//! A galaxy is generated from a `(body count, seed)` pair, so a seed shown
//! on screen can be typed back in to revisit a layout. Freshly generated
//! bodies implode into place from above the field; while that animation
//! runs, regeneration requests are rejected.

pub mod body;

use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use bevy::math::DVec2;

use self::body::Attractor;
use crate::types::{FIELD_HEIGHT, FIELD_WIDTH, MAX_PLANETS, SimSet};

/// Placement attempts per body before the layout gives up on it.
const PLACEMENT_ATTEMPTS: usize = 500;

/// Height above the field from which new bodies fall in.
const IMPLOSION_DROP: f64 = -600.0;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum GalaxyError {
    /// A new layout was requested while the previous one is still
    /// imploding into place. Callers treat this as a no-op.
    #[error("galaxy is still imploding")]
    Imploding,
}

/// The authoritative attractor list, plus the implosion animation state.
#[derive(Resource, Debug)]
pub struct Galaxy {
    bodies: Vec<Attractor>,
    /// Final y position per body while the implosion runs.
    target_y: Vec<f64>,
    imploding: bool,
    seed: u64,
}

impl Galaxy {
    /// An empty galaxy; useful as a neutral field.
    pub fn new() -> Self {
        Self {
            bodies: Vec::new(),
            target_y: Vec::new(),
            imploding: false,
            seed: 0,
        }
    }

    /// Generate a fresh galaxy from scratch.
    pub fn generate(count: usize, seed: u64) -> Self {
        let mut galaxy = Self::new();
        galaxy.rebuild(count, seed);
        galaxy
    }

    /// Build a galaxy from explicit bodies, already in place.
    pub fn from_bodies(bodies: Vec<Attractor>) -> Self {
        let target_y = bodies.iter().map(|b| b.pos.y).collect();
        Self {
            bodies,
            target_y,
            imploding: false,
            seed: 0,
        }
    }

    /// Replace the layout with a newly generated one.
    ///
    /// Rejected while the current layout is still imploding.
    pub fn create(&mut self, count: usize, seed: u64) -> Result<(), GalaxyError> {
        if self.imploding {
            return Err(GalaxyError::Imploding);
        }

        self.rebuild(count, seed);
        Ok(())
    }

    fn rebuild(&mut self, count: usize, seed: u64) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let count = count.min(MAX_PLANETS);

        self.bodies.clear();
        self.target_y.clear();
        self.seed = seed;

        for _ in 0..count {
            let mut body = match rng.gen_range(0..8) {
                5 => Attractor::blackhole(),
                6 => Attractor::wormhole(&mut rng),
                _ => Attractor::planet(&mut rng),
            };

            let probe_width = body.width + body.spacing;
            let mut placed = false;

            for _ in 0..PLACEMENT_ATTEMPTS {
                let candidate = DVec2::new(
                    rng.gen_range(220.0..FIELD_WIDTH - 220.0),
                    rng.gen_range(0.0..FIELD_HEIGHT),
                );
                if !self.check_collision_spaced(candidate, probe_width) {
                    body.pos = candidate;
                    placed = true;
                    break;
                }
            }

            if !placed {
                warn!(
                    "no room left for body {} of {count}, keeping {}",
                    self.bodies.len() + 1,
                    self.bodies.len()
                );
                break;
            }

            self.target_y.push(body.pos.y);
            self.bodies.push(body);
        }

        // With the layout settled, drop everything above the field for
        // the fall-in animation.
        for body in &mut self.bodies {
            body.pos.y = IMPLOSION_DROP;
        }

        self.imploding = true;

        info!(
            "galaxy created: {} bodies, seed {seed}",
            self.bodies.len()
        );
    }

    pub fn bodies(&self) -> &[Attractor] {
        &self.bodies
    }

    pub(crate) fn bodies_mut(&mut self) -> &mut [Attractor] {
        &mut self.bodies
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_imploding(&self) -> bool {
        self.imploding
    }

    /// Does a circle at `point` overlap any body?
    pub fn check_collision(&self, point: DVec2, width: f64) -> bool {
        self.bodies.iter().any(|b| b.collides(point, width))
    }

    /// Layout probe: overlap including each body's spacing margin.
    pub fn check_collision_spaced(&self, point: DVec2, width: f64) -> bool {
        self.bodies.iter().any(|b| b.collides_spaced(point, width))
    }

    /// Index of the first body a circle at `point` overlaps.
    pub fn scan(&self, point: DVec2, width: f64) -> Option<usize> {
        self.bodies.iter().position(|b| b.collides(point, width))
    }

    /// One animation tick: implosion fall-in, satellite orbits, recoil.
    pub fn advance(&mut self) {
        if self.imploding {
            let mut still_moving = false;

            for (body, &target) in self.bodies.iter_mut().zip(&self.target_y) {
                if body.pos.y < target {
                    still_moving = true;
                    body.pos.y += (target - body.pos.y) / 10.0 + 1.0;
                    if body.pos.y > target {
                        body.pos.y = target;
                    }
                }
            }

            self.imploding = still_moving;
        }

        for body in &mut self.bodies {
            body.advance();
        }
    }
}

impl Default for Galaxy {
    fn default() -> Self {
        Self::new()
    }
}

/// Plugin ticking the galaxy animation at the fixed simulation rate.
pub struct GalaxyPlugin;

impl Plugin for GalaxyPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(FixedUpdate, galaxy_tick.in_set(SimSet::Field));
    }
}

fn galaxy_tick(mut galaxy: ResMut<Galaxy>) {
    galaxy.advance();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_is_deterministic() {
        let a = Galaxy::generate(7, 42);
        let b = Galaxy::generate(7, 42);

        assert_eq!(a.body_count(), b.body_count());
        for (x, y) in a.bodies().iter().zip(b.bodies()) {
            assert_eq!(x.pos, y.pos);
            assert_eq!(x.weight, y.weight);
        }
    }

    #[test]
    fn test_bodies_respect_spacing_at_layout() {
        let mut galaxy = Galaxy::generate(9, 1);
        // Settle the implosion so positions are final.
        while galaxy.is_imploding() {
            galaxy.advance();
        }

        let bodies = galaxy.bodies();
        for i in 0..bodies.len() {
            for j in (i + 1)..bodies.len() {
                let dist = bodies[i].pos.distance(bodies[j].pos);
                let min = (bodies[i].width + bodies[j].width) / 2.0;
                assert!(
                    dist > min,
                    "bodies {i} and {j} overlap: {dist:.1} <= {min:.1}"
                );
            }
        }
    }

    #[test]
    fn test_regeneration_rejected_while_imploding() {
        let mut galaxy = Galaxy::generate(5, 3);
        assert!(galaxy.is_imploding());
        assert_eq!(galaxy.create(5, 4), Err(GalaxyError::Imploding));
        // The old seed survives the rejected request.
        assert_eq!(galaxy.seed(), 3);

        while galaxy.is_imploding() {
            galaxy.advance();
        }
        assert!(galaxy.create(5, 4).is_ok());
        assert_eq!(galaxy.seed(), 4);
    }

    #[test]
    fn test_implosion_terminates() {
        let mut galaxy = Galaxy::generate(9, 99);
        let mut ticks = 0;
        while galaxy.is_imploding() {
            galaxy.advance();
            ticks += 1;
            assert!(ticks < 10_000, "implosion never settled");
        }

        for (body, &target) in galaxy.bodies.iter().zip(&galaxy.target_y) {
            assert_eq!(body.pos.y, target);
        }
    }

    #[test]
    fn test_scan_finds_the_overlapping_body() {
        let mut galaxy = Galaxy::generate(9, 123);
        while galaxy.is_imploding() {
            galaxy.advance();
        }

        let target = galaxy.bodies()[0].pos;
        let hit = galaxy.scan(target, 1.0);
        assert_eq!(hit, Some(0));

        assert_eq!(galaxy.scan(DVec2::new(-5000.0, -5000.0), 1.0), None);
    }
}
