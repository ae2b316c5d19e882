//! The computer player: a bounded random search for a firing solution.
//!
//! There is no inverse model of the gravity field. The computer samples a
//! random vertical position, power and angle, precomputes the path the
//! shot would fly and accepts the candidate when any point passes close
//! enough to the opponent. The acceptance window scales with the
//! difficulty factor, and the search budget guarantees the computer
//! eventually fires something even when no intercept was found — a
//! deliberate miss, not an error.

use bevy::math::DVec2;
use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::collision::circles_overlap;
use crate::craft::Ufo;
use crate::galaxy::Galaxy;
use crate::trajectory::PathCache;
use crate::types::{FIELD_HEIGHT, MAX_SHOOT_POWER, Tunables};
use crate::vector::Polar;

use std::f64::consts::PI;

/// Difficulty levels, from most forgiving to most precise aim.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AiDifficulty {
    Novice,
    Cadet,
    Veteran,
    Elite,
    General,
}

impl AiDifficulty {
    /// Multiplier on the acceptance window. Larger factor, sloppier AI.
    pub fn factor(self) -> f64 {
        match self {
            AiDifficulty::Novice => 10.0,
            AiDifficulty::Cadet => 8.0,
            AiDifficulty::Veteran => 6.0,
            AiDifficulty::Elite => 3.0,
            AiDifficulty::General => 1.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AiDifficulty::Novice => "Novice",
            AiDifficulty::Cadet => "Cadet",
            AiDifficulty::Veteran => "Veteran",
            AiDifficulty::Elite => "Elite",
            AiDifficulty::General => "General",
        }
    }

    pub fn next(self) -> Self {
        match self {
            AiDifficulty::Novice => AiDifficulty::Cadet,
            AiDifficulty::Cadet => AiDifficulty::Veteran,
            AiDifficulty::Veteran => AiDifficulty::Elite,
            AiDifficulty::Elite => AiDifficulty::General,
            AiDifficulty::General => AiDifficulty::Novice,
        }
    }
}

/// A sampled firing configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FiringSolution {
    pub y: f64,
    pub power: f64,
    pub angle: f64,
}

/// Search progress of one computer turn.
#[derive(Clone, Debug, PartialEq)]
pub enum AiState {
    /// Sampling candidates, one per tick, until one intercepts or the
    /// budget runs out.
    Searching { budget: u32 },
    /// Walking the live controls toward the accepted solution.
    Confirming(FiringSolution),
    /// Fired; waiting for the shot to resolve.
    Locked,
}

/// What the gunner did this tick, for the caller and the HUD.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AiAction {
    Thinking,
    Adjusting,
    Fire,
    Idle,
}

/// Targeting state of one computer-controlled craft. Owns its random
/// source (seedable, for reproducible games) and its own path cache.
#[derive(Component, Debug)]
pub struct AiGunner {
    state: AiState,
    rng: ChaCha8Rng,
    cache: PathCache,
    last_candidate: Option<FiringSolution>,
}

impl AiGunner {
    pub fn new(seed: u64) -> Self {
        Self {
            state: AiState::Searching {
                budget: Tunables::default().search_budget,
            },
            rng: ChaCha8Rng::seed_from_u64(seed),
            cache: PathCache::default(),
            last_candidate: None,
        }
    }

    pub fn state(&self) -> &AiState {
        &self.state
    }

    /// Fresh search for a new turn.
    pub fn reset(&mut self, tun: &Tunables) {
        self.state = AiState::Searching {
            budget: tun.search_budget,
        };
        self.last_candidate = None;
        self.cache.invalidate();
    }

    /// One tick of computer play for `ufo` against the opponent at
    /// `opponent_pos`. Returns `Fire` exactly once per turn; the caller
    /// launches the shot via `ufo.fire`.
    pub fn think(
        &mut self,
        ufo: &mut Ufo,
        opponent_pos: DVec2,
        opponent_width: f64,
        galaxy: &Galaxy,
        difficulty: AiDifficulty,
        tun: &Tunables,
    ) -> AiAction {
        match self.state.clone() {
            AiState::Searching { budget } => {
                self.spend_bonus(ufo);

                if budget == 0 {
                    // Out of budget: fire the last sampled candidate
                    // anyway. A deliberate miss beats stalling forever.
                    let stored = self.last_candidate;
                    let candidate = stored.unwrap_or_else(|| self.sample());
                    debug!("computer search exhausted, accepting a blind shot");
                    self.state = AiState::Confirming(candidate);
                    return AiAction::Thinking;
                }

                let candidate = self.sample();
                self.last_candidate = Some(candidate);

                let start = DVec2::new(ufo.pos.x, candidate.y)
                    .offset_polar(tun.muzzle_offset, candidate.angle);
                let direction = DVec2::from_polar(candidate.power * tun.power_factor, candidate.angle);

                let window = tun.ai_probe_width * difficulty.factor();
                let probe = crate::projectile::ShotKind::Laser.width();
                let path = self.cache.precompute(start, direction, galaxy, probe, tun);
                let intercepts = path
                    .points
                    .iter()
                    .any(|&p| circles_overlap(p, window, opponent_pos, opponent_width));

                if intercepts {
                    debug!(
                        "computer found an intercept after {} candidates",
                        tun.search_budget - budget + 1
                    );
                    self.state = AiState::Confirming(candidate);
                } else {
                    self.state = AiState::Searching { budget: budget - 1 };
                }

                AiAction::Thinking
            }

            AiState::Confirming(solution) => {
                if self.adjust_towards(ufo, &solution) {
                    ufo.shoot_power = solution.power;
                    self.state = AiState::Locked;
                    AiAction::Fire
                } else {
                    AiAction::Adjusting
                }
            }

            AiState::Locked => AiAction::Idle,
        }
    }

    /// Roll a uniformly random firing configuration.
    fn sample(&mut self) -> FiringSolution {
        FiringSolution {
            y: self.rng.gen_range(100.0..FIELD_HEIGHT - 200.0).floor(),
            power: self.rng.gen_range(10.0..MAX_SHOOT_POWER).floor(),
            angle: self.rng.gen_range(0.0..2.0 * PI),
        }
    }

    /// Step the live controls one notch toward the solution, the way a
    /// human would hold the keys. Returns true once everything matches.
    fn adjust_towards(&mut self, ufo: &mut Ufo, solution: &FiringSolution) -> bool {
        let mut ready = true;

        if ufo.pos.y < solution.y {
            ready = false;
            ufo.move_down();
            if ufo.pos.y > solution.y {
                ufo.pos.y = solution.y;
            }
        } else if ufo.pos.y > solution.y {
            ready = false;
            ufo.move_up();
            if ufo.pos.y < solution.y {
                ufo.pos.y = solution.y;
            }
        }

        if ufo.shoot_angle < solution.angle {
            ready = false;
            ufo.inc_shoot_angle();
            if ufo.shoot_angle > solution.angle {
                ufo.shoot_angle = solution.angle;
            }
        } else if ufo.shoot_angle > solution.angle {
            ready = false;
            ufo.dec_shoot_angle();
            if ufo.shoot_angle < solution.angle {
                ufo.shoot_angle = solution.angle;
            }
        }

        if ready && ufo.shoot_power < solution.power {
            ready = false;
            ufo.inc_shoot_power();
        }

        ready
    }

    /// Occasionally trade collected bonuses, leaning toward the shield
    /// when hurt and toward the cluster when one is on offer.
    fn spend_bonus(&mut self, ufo: &mut Ufo) {
        let redeem = match ufo.bonus {
            1 => ufo.shield < 40,
            2 => self.rng.gen_range(0..10) < 2,
            3 => self.rng.gen_range(0..10) < 8,
            _ => false,
        };

        if redeem && ufo.redeem_bonus() {
            debug!("computer redeemed a bonus");
        }
    }
}
