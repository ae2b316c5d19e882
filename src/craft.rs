//! The flying saucers and their controls.

use bevy::math::DVec2;
use bevy::prelude::*;

use crate::projectile::{Projectile, ShotKind};
use crate::types::{
    BORDER_WIDTH, FIELD_HEIGHT, FIELD_WIDTH, MAX_ENERGY, MAX_SHOOT_POWER, PlayerId, Tunables,
};
use crate::vector::Polar;

/// Collision diameter of a saucer.
pub const UFO_WIDTH: f64 = 48.0;

/// Vertical movement per tick while a movement key is held.
const MOVE_STEP: f64 = 2.0;

/// Aim adjustment per tick, one degree.
const ANGLE_STEP: f64 = std::f64::consts::PI / 180.0;

/// A player- or computer-controlled saucer.
///
/// The craft owns its position and aim directly; rendering derives from
/// these fields, never the other way around. `active` marks whose turn it
/// is, `locked` that the turn's shot has been fired and controls are
/// frozen until the shot resolves.
#[derive(Component, Clone, Debug)]
pub struct Ufo {
    pub player: PlayerId,
    pub pos: DVec2,
    pub shoot_angle: f64,
    pub shoot_power: f64,
    pub shield: i32,
    /// Collected bonus stars, redeemable for shield or weapons. Caps at 4.
    pub bonus: u8,
    pub weapon: ShotKind,
    pub human: bool,
    pub active: bool,
    pub locked: bool,
}

impl Ufo {
    pub fn new(player: PlayerId) -> Self {
        let (x, angle) = match player {
            PlayerId::One => (BORDER_WIDTH, 0.0),
            PlayerId::Two => (FIELD_WIDTH - BORDER_WIDTH, std::f64::consts::PI),
        };

        Self {
            player,
            pos: DVec2::new(x, FIELD_HEIGHT / 2.0),
            shoot_angle: angle,
            shoot_power: 0.0,
            shield: MAX_ENERGY,
            bonus: 0,
            weapon: ShotKind::Laser,
            human: false,
            active: false,
            locked: false,
        }
    }

    /// Fresh shield and flags for a new round; position and aim carry over.
    pub fn reset(&mut self) {
        self.shield = MAX_ENERGY;
        self.bonus = 0;
        self.weapon = ShotKind::Laser;
        self.active = false;
        self.locked = false;
    }

    pub fn is_dead(&self) -> bool {
        self.shield <= 0
    }

    pub fn is_computer(&self) -> bool {
        !self.human
    }

    /// Begin this craft's turn.
    pub fn activate(&mut self) {
        self.active = true;
        self.locked = false;
        self.shoot_power = 0.0;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn move_up(&mut self) {
        if self.pos.y > BORDER_WIDTH {
            self.pos.y -= MOVE_STEP;
        }
    }

    pub fn move_down(&mut self) {
        if self.pos.y < FIELD_HEIGHT - BORDER_WIDTH {
            self.pos.y += MOVE_STEP;
        }
    }

    pub fn inc_shoot_angle(&mut self) {
        self.shoot_angle += ANGLE_STEP;
    }

    pub fn dec_shoot_angle(&mut self) {
        self.shoot_angle -= ANGLE_STEP;
    }

    pub fn inc_shoot_power(&mut self) {
        self.shoot_power = (self.shoot_power + 1.0).min(MAX_SHOOT_POWER);
    }

    /// Launch start point and velocity for the current aim.
    pub fn aim_vectors(&self, tun: &Tunables) -> (DVec2, DVec2) {
        let start = self.pos.offset_polar(tun.muzzle_offset, self.shoot_angle);
        let velocity = DVec2::from_polar(self.shoot_power * tun.power_factor, self.shoot_angle);
        (start, velocity)
    }

    /// Fire the selected weapon, if this craft may shoot right now.
    ///
    /// Bought weapons are spent by firing; the craft falls back to the
    /// basic laser afterwards.
    pub fn fire(&mut self, tun: &Tunables) -> Option<Projectile> {
        if !self.active || self.locked {
            return None;
        }

        let (start, velocity) = self.aim_vectors(tun);
        let kind = self.weapon;
        if kind != ShotKind::Laser {
            self.weapon = ShotKind::Laser;
        }

        let mut shot = Projectile::new(kind);
        shot.activate(start, velocity, tun);
        self.locked = true;

        debug!("player {:?} fires {kind:?}", self.player);
        Some(shot)
    }

    pub fn add_bonus(&mut self) {
        if self.bonus < 4 {
            self.bonus += 1;
        }
    }

    /// Trade the collected bonus for its reward. Returns whether anything
    /// was redeemed (weapon upgrades need the basic laser equipped).
    pub fn redeem_bonus(&mut self) -> bool {
        let redeemed = match self.bonus {
            1 => {
                self.shield += 10;
                true
            }
            2 if self.weapon == ShotKind::Laser => {
                self.weapon = ShotKind::Heavy;
                true
            }
            3 if self.weapon == ShotKind::Laser => {
                self.weapon = ShotKind::Cluster;
                true
            }
            4 => {
                self.shield += 50;
                true
            }
            _ => false,
        };

        if redeemed {
            self.bonus = 0;
        }
        redeemed
    }

    pub fn next_weapon(&mut self) {
        self.weapon = self.weapon.next();
    }

    /// Shield loss from an impact, clamped at zero.
    pub fn apply_damage(&mut self, damage: i32) {
        self.shield = (self.shield - damage).max(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_caps() {
        let mut ufo = Ufo::new(PlayerId::One);
        ufo.activate();
        for _ in 0..300 {
            ufo.inc_shoot_power();
        }
        assert_eq!(ufo.shoot_power, MAX_SHOOT_POWER);
    }

    #[test]
    fn test_movement_respects_borders() {
        let mut ufo = Ufo::new(PlayerId::One);
        for _ in 0..2000 {
            ufo.move_up();
        }
        assert!(ufo.pos.y >= BORDER_WIDTH - MOVE_STEP);

        for _ in 0..2000 {
            ufo.move_down();
        }
        assert!(ufo.pos.y <= FIELD_HEIGHT - BORDER_WIDTH + MOVE_STEP);
    }

    #[test]
    fn test_bonus_redemption_table() {
        let mut ufo = Ufo::new(PlayerId::One);

        ufo.add_bonus();
        assert!(ufo.redeem_bonus());
        assert_eq!(ufo.shield, MAX_ENERGY + 10);
        assert_eq!(ufo.bonus, 0);

        ufo.add_bonus();
        ufo.add_bonus();
        assert!(ufo.redeem_bonus());
        assert_eq!(ufo.weapon, ShotKind::Heavy);

        // Upgrades need the basic laser equipped.
        ufo.add_bonus();
        ufo.add_bonus();
        assert!(!ufo.redeem_bonus());
        assert_eq!(ufo.bonus, 2);
    }

    #[test]
    fn test_bonus_caps_at_four() {
        let mut ufo = Ufo::new(PlayerId::One);
        for _ in 0..10 {
            ufo.add_bonus();
        }
        assert_eq!(ufo.bonus, 4);

        assert!(ufo.redeem_bonus());
        assert_eq!(ufo.shield, MAX_ENERGY + 50);
    }

    #[test]
    fn test_fire_locks_and_spends_weapon() {
        let tun = Tunables::default();
        let mut ufo = Ufo::new(PlayerId::One);
        ufo.activate();
        ufo.weapon = ShotKind::Heavy;
        ufo.shoot_power = 50.0;

        let shot = ufo.fire(&tun).expect("active craft should fire");
        assert!(shot.in_flight());
        assert!(ufo.locked);
        assert_eq!(ufo.weapon, ShotKind::Laser);

        // Locked: no second shot this turn.
        assert!(ufo.fire(&tun).is_none());
    }

    #[test]
    fn test_damage_clamps_at_zero() {
        let mut ufo = Ufo::new(PlayerId::Two);
        ufo.apply_damage(250);
        assert_eq!(ufo.shield, 0);
        assert!(ufo.is_dead());
    }
}
