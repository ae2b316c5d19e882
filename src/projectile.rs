//! Shot variants and their flight logic.
//!
//! All weapons share the same contract: activate with a start point and a
//! velocity, advance once per tick under the gravity field, react to
//! whatever the collision scan turns up. The variants differ in weight
//! (impact damage) and in what happens on detonation; the cluster carries
//! child lasers that fan out when the parent goes off.

use bevy::math::DVec2;
use bevy::prelude::*;

use crate::collision::{Reaction, body_reaction, circles_overlap, impact_damage, knockback};
use crate::galaxy::Galaxy;
use crate::physics::field_step;
use crate::types::{CLUSTER_LASER_ANGLE, MAX_CLUSTER_LASER, PlayerId, Tunables};
use crate::vector::Polar;

/// Ticks an explosion animation plays for.
const EXPLOSION_TICKS: u32 = 18;

/// Release distance of cluster children from the detonation point.
const CLUSTER_CHILD_OFFSET: f64 = 10.0;

/// The selectable weapon types.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShotKind {
    /// The basic shot.
    Laser,
    /// Twice the impact weight; flies exactly like a laser.
    Heavy,
    /// Releases child lasers when it goes off.
    Cluster,
    /// Placeholder weapon, currently wired to cluster behavior.
    Funghi,
}

impl ShotKind {
    /// Impact weight; damage scales with it, the trajectory does not.
    pub fn weight(self) -> f64 {
        match self {
            ShotKind::Heavy => 2.0,
            _ => 1.0,
        }
    }

    /// Collision diameter.
    pub fn width(self) -> f64 {
        match self {
            ShotKind::Heavy => 12.0,
            _ => 10.0,
        }
    }

    /// Weapon selection cycle.
    pub fn next(self) -> ShotKind {
        match self {
            ShotKind::Laser => ShotKind::Heavy,
            ShotKind::Heavy => ShotKind::Cluster,
            ShotKind::Cluster => ShotKind::Laser,
            ShotKind::Funghi => ShotKind::Laser,
        }
    }

    fn carries_children(self) -> bool {
        matches!(self, ShotKind::Cluster | ShotKind::Funghi)
    }
}

/// Post-impact flash owned by each shot.
#[derive(Clone, Debug, Default)]
pub struct Explosion {
    pub pos: DVec2,
    ticks_left: u32,
}

impl Explosion {
    pub fn is_active(&self) -> bool {
        self.ticks_left > 0
    }

    pub fn activate(&mut self, pos: DVec2) {
        self.pos = pos;
        self.ticks_left = EXPLOSION_TICKS;
    }

    pub fn advance(&mut self) {
        self.ticks_left = self.ticks_left.saturating_sub(1);
    }

    /// Animation progress in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        1.0 - f64::from(self.ticks_left) / f64::from(EXPLOSION_TICKS)
    }
}

/// Side effects of one flight tick, for the audio/game layers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ShotEvent {
    Exploded(DVec2),
    /// A wormhole moved the shot; it keeps flying.
    Warped { from: DVec2, to: DVec2 },
    /// A black hole took the shot without a trace.
    Swallowed(DVec2),
    CraftHit { player: PlayerId, damage: i32 },
    ClusterBurst(DVec2),
}

/// Result of advancing a shot by one tick.
#[derive(Debug, Default)]
pub struct ShotTick {
    /// The shot (including all children) has fully resolved.
    pub finished: bool,
    pub events: Vec<ShotEvent>,
}

#[derive(Clone, Debug)]
struct ClusterState {
    children: Vec<Projectile>,
    /// Hits and expiries recorded so far, the parent included.
    resolved: u32,
    /// Whether the children have been released.
    released: bool,
}

/// A shot in flight, or the idle shell of one.
///
/// `moving_time > 0` means the shot is physically flying. With
/// `moving_time == 0` and an active explosion it is in its post-impact
/// animation; with both idle it can be reused.
#[derive(Clone, Debug)]
pub struct Projectile {
    pub kind: ShotKind,
    pub pos: DVec2,
    pub vel: DVec2,
    /// Position one tick ago, for the trail.
    pub last_pos: DVec2,
    pub moving_time: u32,
    pub explosion: Explosion,
    cluster: Option<ClusterState>,
}

impl Projectile {
    pub fn new(kind: ShotKind) -> Self {
        let cluster = kind.carries_children().then(|| ClusterState {
            children: vec![Projectile::new(ShotKind::Laser); MAX_CLUSTER_LASER],
            resolved: 0,
            released: false,
        });

        Self {
            kind,
            pos: DVec2::ZERO,
            vel: DVec2::ZERO,
            last_pos: DVec2::ZERO,
            moving_time: 0,
            explosion: Explosion::default(),
            cluster,
        }
    }

    /// Put the shot in flight from `start` with the given velocity.
    pub fn activate(&mut self, start: DVec2, velocity: DVec2, tun: &Tunables) {
        self.pos = start;
        self.last_pos = start;
        self.vel = velocity;
        self.moving_time = tun.max_flight_ticks;

        if let Some(cluster) = &mut self.cluster {
            cluster.resolved = 0;
            cluster.released = false;
        }
    }

    pub fn in_flight(&self) -> bool {
        self.moving_time > 0
    }

    /// Is any part of the shot still flying?
    pub fn is_active(&self) -> bool {
        if self.in_flight() {
            return true;
        }
        self.cluster
            .as_ref()
            .is_some_and(|c| c.children.iter().any(|l| l.in_flight()))
    }

    pub fn weight(&self) -> f64 {
        self.kind.weight()
    }

    pub fn width(&self) -> f64 {
        self.kind.width()
    }

    /// Every part currently in flight (the shot itself and any children).
    pub fn flight_parts(&self) -> Vec<&Projectile> {
        let mut parts = Vec::new();
        if self.in_flight() {
            parts.push(self);
        }
        if let Some(cluster) = &self.cluster {
            parts.extend(cluster.children.iter().filter(|c| c.in_flight()));
        }
        parts
    }

    /// Advance the shot by one fixed tick: move it through the field,
    /// resolve contacts, tick children and explosions.
    pub fn advance(
        &mut self,
        galaxy: &mut Galaxy,
        crafts: &[(PlayerId, DVec2, f64)],
        tun: &Tunables,
    ) -> ShotTick {
        let mut events = Vec::new();
        let was_flying = self.in_flight();

        self.explosion.advance();

        if self.in_flight() {
            self.moving_time -= 1;

            if self.moving_time == 0 {
                if self.kind.carries_children() {
                    // The timer doubles as the cluster fuse.
                    let heading = self.vel.angle();
                    self.detonate(heading, tun, &mut events);
                }
                // Plain shots just fade out when the timer runs down.
            } else {
                self.fly(galaxy, crafts, tun, &mut events);
            }
        }

        // Children animate regardless; only flight transitions count.
        if let Some(mut cluster) = self.cluster.take() {
            if was_flying && !self.in_flight() {
                cluster.resolved += 1;
            }

            for child in cluster.children.iter_mut() {
                let child_was_flying = child.in_flight();
                let tick = child.advance(galaxy, crafts, tun);
                events.extend(tick.events);
                if child_was_flying && tick.finished {
                    cluster.resolved += 1;
                }
            }

            let finished = if cluster.released {
                cluster.resolved >= MAX_CLUSTER_LASER as u32 + 1
            } else {
                !self.in_flight()
            };

            self.cluster = Some(cluster);
            return ShotTick { finished, events };
        }

        ShotTick {
            finished: !self.in_flight(),
            events,
        }
    }

    fn fly(
        &mut self,
        galaxy: &mut Galaxy,
        crafts: &[(PlayerId, DVec2, f64)],
        tun: &Tunables,
        events: &mut Vec<ShotEvent>,
    ) {
        self.last_pos = self.pos;
        field_step(&mut self.pos, &mut self.vel, galaxy.bodies(), tun.tick_ms);

        let contact = galaxy.scan(self.pos, self.width()).map(|idx| {
            let body = &galaxy.bodies()[idx];
            (idx, body_reaction(body), body.pos, body.weight)
        });

        if let Some((idx, reaction, body_pos, body_weight)) = contact {
            match reaction {
                Reaction::Detonate => {
                    let impulse = knockback(body_pos, body_weight, self.pos, self.vel);
                    galaxy.bodies_mut()[idx].nudge(impulse);
                    let heading = (self.pos - body_pos).angle();
                    self.detonate(heading, tun, events);
                }
                Reaction::Teleport(exit) => {
                    let from = self.pos;
                    self.pos = body_pos + exit;
                    self.last_pos = self.pos;
                    events.push(ShotEvent::Warped { from, to: self.pos });
                }
                Reaction::Swallow => {
                    self.moving_time = 0;
                    events.push(ShotEvent::Swallowed(self.pos));
                }
            }
            return;
        }

        for &(player, craft_pos, craft_width) in crafts {
            if circles_overlap(craft_pos, craft_width, self.pos, self.width()) {
                let damage = impact_damage(self.vel.length(), self.weight());
                events.push(ShotEvent::CraftHit { player, damage });
                let heading = (self.pos - craft_pos).angle();
                self.detonate(heading, tun, events);
                break;
            }
        }
    }

    /// Blow up at the current position. Cluster shots release their
    /// children fanned around the impact heading.
    fn detonate(&mut self, impact_heading: f64, tun: &Tunables, events: &mut Vec<ShotEvent>) {
        self.moving_time = 0;
        self.explosion.activate(self.pos);
        events.push(ShotEvent::Exploded(self.pos));

        if let Some(cluster) = &mut self.cluster {
            let speed = self.vel.length() / 5.0 * 3.0;
            let half_fan = CLUSTER_LASER_ANGLE * MAX_CLUSTER_LASER as f64 / 2.0;
            let mut heading = impact_heading - half_fan;

            for child in cluster.children.iter_mut() {
                let start = self.pos.offset_polar(CLUSTER_CHILD_OFFSET, heading);
                child.activate(start, DVec2::from_polar(speed, heading), tun);
                heading += CLUSTER_LASER_ANGLE;
            }

            cluster.released = true;
            events.push(ShotEvent::ClusterBurst(self.pos));
        }
    }

    /// Force-destroy the shot, e.g. when the galaxy is regenerated.
    /// Everything in flight explodes in place; children are not released.
    pub fn destroy(&mut self) -> Vec<ShotEvent> {
        let mut events = Vec::new();

        if let Some(cluster) = &mut self.cluster {
            for child in cluster.children.iter_mut() {
                if child.in_flight() {
                    child.moving_time = 0;
                    child.explosion.activate(child.pos);
                    events.push(ShotEvent::Exploded(child.pos));
                }
            }
        }

        if self.in_flight() {
            self.moving_time = 0;
            self.explosion.activate(self.pos);
            events.push(ShotEvent::Exploded(self.pos));
        }

        events
    }
}

/// The single live top-level shot. One shot is in flight at a time,
/// regardless of whose turn it is; that is a game rule, not a limit.
#[derive(Resource, Default)]
pub struct ActiveShot(pub Option<Projectile>);

/// Explosion flashes still animating, including those of shots that have
/// already resolved.
#[derive(Resource, Default)]
pub struct Explosions(pub Vec<Explosion>);
