//! Core constants and shared types for the gravity duel.

use bevy::prelude::*;

/// System sets ordering one fixed simulation tick.
///
/// Galaxy animation must run before the AI and the shot so that both see
/// the attractor positions for the current tick.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimSet {
    /// Galaxy animation (implosion, satellite orbits, recoil decay)
    Field,
    /// Computer players plan and adjust their controls
    Ai,
    /// The live shot advances and collides
    Flight,
    /// Turn switching, bonus pickup, winner detection
    Outcome,
}

// FIELD

/// Playfield width in pixels
pub const FIELD_WIDTH: f64 = 1024.0;

/// Playfield height in pixels
pub const FIELD_HEIGHT: f64 = 768.0;

/// Clearance kept between the saucers and the top/bottom field edge
pub const BORDER_WIDTH: f64 = 70.0;

/// Fixed simulation tick in milliseconds. Physics is stepped at this
/// constant interval regardless of render frame rate, so trajectories are
/// reproducible.
pub const TICK_INTERVAL_MS: f64 = 30.0;

// GAME

/// Number of players. The duel logic assumes exactly two.
pub const MAX_PLAYER: usize = 2;

/// Full shield strength of a saucer
pub const MAX_ENERGY: i32 = 100;

/// Ticks to linger on the winner celebration before the next round
pub const WINNING_WAIT: u32 = 400;

// WEAPONS

/// Shot power accumulator cap
pub const MAX_SHOOT_POWER: f64 = 100.0;

/// Converts shot power into launch speed
pub const SHOOT_POWER_FACTOR: f64 = 3.0;

/// Maximum ticks a shot stays in flight before it fades out
pub const MAX_SHOOT_RUN: u32 = 700;

/// Distance from the saucer center at which shots are released
pub const MUZZLE_OFFSET: f64 = 60.0;

/// Child shots released by a cluster detonation
pub const MAX_CLUSTER_LASER: usize = 5;

/// Angular spacing between cluster children (radians)
pub const CLUSTER_LASER_ANGLE: f64 = 30.0 * std::f64::consts::PI / 180.0;

// GALAXY

/// Most bodies a galaxy can hold
pub const MAX_PLANETS: usize = 9;

/// Fewest bodies a galaxy is generated with
pub const MIN_PLANETS: usize = 5;

pub const WEIGHT_JUPITER: f64 = 350.0;
pub const WEIGHT_EARTH: f64 = 300.0;
pub const WEIGHT_MARS: f64 = 200.0;
pub const WEIGHT_VENUS: f64 = 180.0;
pub const WEIGHT_SATURN: f64 = 250.0;
pub const WEIGHT_BLACKHOLE: f64 = 350.0;
pub const WEIGHT_WORMHOLE: f64 = 50.0;

// COMPUTER

/// Search budget: candidate firing solutions the computer explores per
/// turn before it accepts whatever it has
pub const MAX_COMPUTER_SEARCH: u32 = 150;

/// Steps of a trajectory precomputation. Matches the flight timer so the
/// computer "thinks" exactly as far as a shot can fly.
pub const MAX_PRECALC: usize = MAX_SHOOT_RUN as usize;

/// One of the two duelling sides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlayerId {
    One,
    Two,
}

impl PlayerId {
    /// Index into per-player arrays.
    pub fn index(self) -> usize {
        match self {
            PlayerId::One => 0,
            PlayerId::Two => 1,
        }
    }

    /// The other side of the duel.
    pub fn opponent(self) -> PlayerId {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }

    pub fn all() -> [PlayerId; MAX_PLAYER] {
        [PlayerId::One, PlayerId::Two]
    }
}

/// Runtime-read simulation knobs, gathered in one place instead of
/// scattered literals. Defaults come from the constants above.
#[derive(Resource, Clone, Debug)]
pub struct Tunables {
    /// Fixed physics tick (milliseconds).
    pub tick_ms: f64,
    /// Flight timer granted to a freshly fired shot (ticks).
    pub max_flight_ticks: u32,
    /// Step cap for trajectory precomputation.
    pub max_precalc: usize,
    /// Candidate budget for the computer's targeting search.
    pub search_budget: u32,
    /// Base probe diameter the computer accepts as "close enough" to the
    /// opponent, before the difficulty factor scales it.
    pub ai_probe_width: f64,
    /// Shot power to launch speed conversion.
    pub power_factor: f64,
    /// Release distance of shots from the saucer center.
    pub muzzle_offset: f64,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            tick_ms: TICK_INTERVAL_MS,
            max_flight_ticks: MAX_SHOOT_RUN,
            max_precalc: MAX_PRECALC,
            search_budget: MAX_COMPUTER_SEARCH,
            ai_probe_width: 8.0,
            power_factor: SHOOT_POWER_FACTOR,
            muzzle_offset: MUZZLE_OFFSET,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opponent_is_involutive() {
        for player in PlayerId::all() {
            assert_eq!(player.opponent().opponent(), player);
            assert_ne!(player.opponent(), player);
        }
    }

    #[test]
    fn test_indices_are_distinct() {
        assert_eq!(PlayerId::One.index(), 0);
        assert_eq!(PlayerId::Two.index(), 1);
    }

    #[test]
    fn test_tunables_default_matches_constants() {
        let tun = Tunables::default();
        assert_eq!(tun.tick_ms, TICK_INTERVAL_MS);
        assert_eq!(tun.max_precalc, MAX_SHOOT_RUN as usize);
        assert_eq!(tun.search_budget, MAX_COMPUTER_SEARCH);
    }
}
