//! Physics integration for the live shot.
//!
//! The pure field math lives in [`field`]; this module wires it into the
//! fixed-timestep schedule: one system advances the active shot each tick
//! and translates its side effects into damage, sound cues and the
//! turn-over event, another fades finished explosions out.

mod field;

pub use field::{combined_pull, field_step};

use bevy::math::DVec2;
use bevy::prelude::*;

use crate::audio::SoundCue;
use crate::craft::{UFO_WIDTH, Ufo};
use crate::galaxy::Galaxy;
use crate::game::ShotResolved;
use crate::projectile::{ActiveShot, Explosion, Explosions, ShotEvent};
use crate::types::{PlayerId, SimSet, Tunables};

/// Plugin advancing the live shot at the fixed simulation rate.
pub struct PhysicsPlugin;

impl Plugin for PhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ActiveShot>()
            .init_resource::<Explosions>()
            .add_systems(
                FixedUpdate,
                (flight_step, fade_explosions).in_set(SimSet::Flight),
            );
    }
}

/// Advance the active shot by one tick and apply what happened.
fn flight_step(
    mut shot: ResMut<ActiveShot>,
    mut galaxy: ResMut<Galaxy>,
    mut ufos: Query<&mut Ufo>,
    tun: Res<Tunables>,
    mut explosions: ResMut<Explosions>,
    mut cues: EventWriter<SoundCue>,
    mut resolved: EventWriter<ShotResolved>,
) {
    let Some(projectile) = shot.0.as_mut() else {
        return;
    };

    let crafts: Vec<(PlayerId, DVec2, f64)> = ufos
        .iter()
        .map(|u| (u.player, u.pos, UFO_WIDTH))
        .collect();

    let tick = projectile.advance(&mut galaxy, &crafts, &tun);

    for event in &tick.events {
        match *event {
            ShotEvent::Exploded(pos) => {
                cues.send(SoundCue::Explosion);
                let mut flash = Explosion::default();
                flash.activate(pos);
                explosions.0.push(flash);
            }
            ShotEvent::Warped { from, to } => {
                debug!("shot warped from {from:?} to {to:?}");
            }
            ShotEvent::Swallowed(pos) => {
                debug!("shot swallowed by a black hole at {pos:?}");
            }
            ShotEvent::CraftHit { player, damage } => {
                cues.send(SoundCue::HitUfo);
                if let Some(mut ufo) = ufos.iter_mut().find(|u| u.player == player) {
                    ufo.apply_damage(damage);
                    info!("player {player:?} takes {damage}, shield {}", ufo.shield);
                }
            }
            ShotEvent::ClusterBurst(_) => {}
        }
    }

    if tick.finished {
        shot.0 = None;
        resolved.send(ShotResolved);
    }
}

/// Tick the detached explosion flashes and drop the finished ones.
fn fade_explosions(mut explosions: ResMut<Explosions>) {
    for flash in explosions.0.iter_mut() {
        flash.advance();
    }
    explosions.0.retain(|flash| flash.is_active());
}
