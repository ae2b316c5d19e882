//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use bevy::math::DVec2;

use starduel::galaxy::Galaxy;
use starduel::galaxy::body::{Attractor, BodyKind, PlanetClass};
use starduel::types::{Tunables, WEIGHT_WORMHOLE};

/// A bare attracting planet with no satellites.
pub fn bare_planet(pos: DVec2, weight: f64, width: f64) -> Attractor {
    Attractor {
        pos,
        weight,
        width,
        spacing: 0.0,
        kind: BodyKind::Planet {
            class: PlanetClass::Venus,
            stones: Vec::new(),
            recoil: DVec2::ZERO,
        },
    }
}

/// A black hole at a fixed position.
pub fn blackhole_at(pos: DVec2) -> Attractor {
    let mut body = Attractor::blackhole();
    body.pos = pos;
    body
}

/// A wormhole with an explicit exit offset.
pub fn wormhole_at(pos: DVec2, exit: DVec2) -> Attractor {
    Attractor {
        pos,
        weight: WEIGHT_WORMHOLE,
        width: 25.0,
        spacing: 60.0,
        kind: BodyKind::Wormhole { exit },
    }
}

/// A settled galaxy made of exactly these bodies.
pub fn galaxy_of(bodies: Vec<Attractor>) -> Galaxy {
    Galaxy::from_bodies(bodies)
}

pub fn tunables() -> Tunables {
    Tunables::default()
}
