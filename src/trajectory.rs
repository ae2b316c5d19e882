//! Forward trajectory precomputation with a single-entry cache.
//!
//! Three consumers need a whole flight path without running live physics:
//! the computer's targeting search, the aim-assist overlay, and tests.
//! Each owns its own `PathCache`; there is no shared cache state. A cache
//! holds exactly one `(start, direction)` key and replays the stored path
//! for as long as the key does not change.

use bevy::math::DVec2;

use crate::collision::{Reaction, body_reaction};
use crate::galaxy::Galaxy;
use crate::physics::field_step;
use crate::types::Tunables;

/// A precomputed flight path.
#[derive(Clone, Debug, Default)]
pub struct FlightPath {
    /// Simulated positions, one per integrator step. The first colliding
    /// point is not included.
    pub points: Vec<DVec2>,
    /// Whether the path ended on a body rather than by step exhaustion.
    pub ends_in_impact: bool,
}

/// Single-entry memo of a full forward simulation, keyed by the exact
/// `(start, direction)` pair.
///
/// Key comparison is bit-exact on the vector components: the callers
/// rebuild their vectors from unchanged inputs between frames, so a
/// repeated aim reuses the stored path and any change recomputes it.
#[derive(Clone, Debug, Default)]
pub struct PathCache {
    key: Option<(DVec2, DVec2)>,
    path: FlightPath,
    computations: usize,
}

impl PathCache {
    /// How many times a path was actually simulated. Diagnostic, used to
    /// verify cache coherence.
    pub fn computations(&self) -> usize {
        self.computations
    }

    /// Drop the stored key so the next call recomputes.
    pub fn invalidate(&mut self) {
        self.key = None;
    }

    /// The path a shot launched at `start` with velocity `direction`
    /// would fly through the current galaxy.
    ///
    /// `probe_width` is the collision diameter flown against the bodies.
    /// Wormholes do not terminate the path: the simulated point emerges at
    /// the exit and the path keeps accumulating, so hit tests and the aim
    /// overlay see through them.
    pub fn precompute(
        &mut self,
        start: DVec2,
        direction: DVec2,
        galaxy: &Galaxy,
        probe_width: f64,
        tun: &Tunables,
    ) -> &FlightPath {
        if self.key == Some((start, direction)) {
            return &self.path;
        }

        self.key = Some((start, direction));
        self.computations += 1;

        let mut pos = start;
        let mut vel = direction;
        let mut path = FlightPath {
            points: Vec::with_capacity(tun.max_precalc),
            ends_in_impact: false,
        };

        for _ in 0..tun.max_precalc {
            field_step(&mut pos, &mut vel, galaxy.bodies(), tun.tick_ms);

            match galaxy.scan(pos, probe_width) {
                None => path.points.push(pos),
                Some(idx) => {
                    let body = &galaxy.bodies()[idx];
                    match body_reaction(body) {
                        Reaction::Teleport(exit) => {
                            pos = body.pos + exit;
                            path.points.push(pos);
                        }
                        _ => {
                            path.ends_in_impact = true;
                            break;
                        }
                    }
                }
            }
        }

        self.path = path;
        &self.path
    }
}
