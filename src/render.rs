//! Gizmo rendering of the field, the craft and the shots.
//!
//! Everything is drawn from simulation state with plain shapes; there is
//! no sprite pipeline. Physics coordinates have y growing downward, so
//! positions are flipped into world space before drawing.

use bevy::math::DVec2;
use bevy::prelude::*;

use crate::craft::{UFO_WIDTH, Ufo};
use crate::galaxy::Galaxy;
use crate::galaxy::body::{BodyKind, PlanetClass};
use crate::game::{BonusStar, Match};
use crate::projectile::{ActiveShot, Explosions};
use crate::trajectory::PathCache;
use crate::types::{FIELD_HEIGHT, FIELD_WIDTH, MAX_SHOOT_POWER, PlayerId, Tunables};
use crate::vector::Polar;

/// Drawing colors.
mod colors {
    use bevy::prelude::Color;

    pub const JUPITER: Color = Color::srgb(0.82, 0.65, 0.42);
    pub const EARTH: Color = Color::srgb(0.35, 0.55, 0.90);
    pub const MARS: Color = Color::srgb(0.85, 0.40, 0.25);
    pub const VENUS: Color = Color::srgb(0.90, 0.80, 0.55);
    pub const SATURN: Color = Color::srgb(0.80, 0.72, 0.50);
    pub const STONE: Color = Color::srgb(0.55, 0.55, 0.55);
    pub const HOLE: Color = Color::srgb(0.45, 0.35, 0.75);
    pub const WORMHOLE: Color = Color::srgb(0.30, 0.85, 0.85);
    pub const PLAYER_ONE: Color = Color::srgb(0.95, 0.30, 0.30);
    pub const PLAYER_TWO: Color = Color::srgb(0.35, 0.45, 0.95);
    pub const SHOT: Color = Color::srgb(1.0, 0.95, 0.70);
    pub const EXPLOSION: Color = Color::srgb(1.0, 0.60, 0.20);
    pub const HINT: Color = Color::srgb(0.75, 0.75, 0.75);
    pub const STAR: Color = Color::srgb(1.0, 0.85, 0.25);
}

/// Path cache backing the aim-assist overlay; its own consumer of the
/// trajectory precomputation, independent from the AI's caches.
#[derive(Resource, Default)]
pub struct HintCache(PathCache);

pub struct RenderPlugin;

impl Plugin for RenderPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<HintCache>()
            .add_systems(Startup, spawn_camera)
            .add_systems(
                Update,
                (
                    draw_galaxy,
                    draw_bonus_star,
                    draw_crafts,
                    draw_shot,
                    draw_explosions,
                    draw_hint,
                ),
            );
    }
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        Transform::from_xyz(
            (FIELD_WIDTH / 2.0) as f32,
            (FIELD_HEIGHT / 2.0) as f32,
            0.0,
        ),
    ));
}

/// Physics coordinates (y down) to world coordinates (y up).
fn to_screen(pos: DVec2) -> Vec2 {
    Vec2::new(pos.x as f32, (FIELD_HEIGHT - pos.y) as f32)
}

fn planet_color(class: PlanetClass) -> Color {
    match class {
        PlanetClass::Jupiter => colors::JUPITER,
        PlanetClass::Earth => colors::EARTH,
        PlanetClass::Mars => colors::MARS,
        PlanetClass::Venus => colors::VENUS,
        PlanetClass::Saturn => colors::SATURN,
    }
}

fn draw_galaxy(galaxy: Res<Galaxy>, mut gizmos: Gizmos) {
    for body in galaxy.bodies() {
        let center = to_screen(body.pos);

        match &body.kind {
            BodyKind::Planet { class, stones, .. } => {
                gizmos.circle_2d(center, (body.width / 2.0) as f32, planet_color(*class));

                for stone in stones {
                    gizmos.circle_2d(
                        to_screen(body.pos + stone.offset()),
                        (stone.width() / 2.0) as f32,
                        colors::STONE,
                    );
                }
            }
            BodyKind::Blackhole => {
                gizmos.circle_2d(center, (body.width / 2.0) as f32, colors::HOLE);
                // Accretion halo hinting at the pull radius.
                gizmos.circle_2d(center, 32.0, colors::HOLE.with_alpha(0.25));
                gizmos.circle_2d(center, 60.0, colors::HOLE.with_alpha(0.1));
            }
            BodyKind::Wormhole { exit } => {
                gizmos.circle_2d(center, (body.width / 2.0) as f32, colors::WORMHOLE);

                let exit_center = to_screen(body.pos + *exit);
                gizmos.circle_2d(exit_center, 6.0, colors::WORMHOLE.with_alpha(0.6));
                gizmos.line_2d(center, exit_center, colors::WORMHOLE.with_alpha(0.15));
            }
        }
    }
}

fn draw_crafts(ufos: Query<&Ufo>, mut gizmos: Gizmos) {
    for ufo in ufos.iter() {
        let color = match ufo.player {
            PlayerId::One => colors::PLAYER_ONE,
            PlayerId::Two => colors::PLAYER_TWO,
        };

        let center = to_screen(ufo.pos);
        gizmos.circle_2d(center, (UFO_WIDTH / 2.0) as f32, color);
        gizmos.circle_2d(center, (UFO_WIDTH / 4.0) as f32, color.with_alpha(0.4));

        // Aim pips march out along the barrel; filled ones show power.
        if ufo.active {
            let lit = (ufo.shoot_power / (MAX_SHOOT_POWER / 5.0)) as usize;
            for pip in 0..5 {
                let distance = 30.0 + 10.0 * pip as f64;
                let pos = ufo.pos.offset_polar(distance, ufo.shoot_angle);
                let alpha = if pip < lit { 0.9 } else { 0.35 };
                gizmos.circle_2d(to_screen(pos), 3.0, color.with_alpha(alpha));
            }
        }
    }
}

fn draw_shot(shot: Res<ActiveShot>, mut gizmos: Gizmos) {
    let Some(projectile) = shot.0.as_ref() else {
        return;
    };

    for part in projectile.flight_parts() {
        let head = to_screen(part.pos);
        gizmos.circle_2d(head, (part.width() / 2.0) as f32, colors::SHOT);
        gizmos.line_2d(to_screen(part.last_pos), head, colors::SHOT.with_alpha(0.5));
    }
}

fn draw_explosions(explosions: Res<Explosions>, mut gizmos: Gizmos) {
    for flash in &explosions.0 {
        let progress = flash.progress() as f32;
        let radius = 6.0 + 26.0 * progress;
        let color = colors::EXPLOSION.with_alpha(1.0 - progress);
        gizmos.circle_2d(to_screen(flash.pos), radius, color);
    }
}

/// Dotted full-power trajectory preview for the active craft.
fn draw_hint(
    match_: Res<Match>,
    ufos: Query<&Ufo>,
    galaxy: Res<Galaxy>,
    tun: Res<Tunables>,
    mut cache: ResMut<HintCache>,
    mut gizmos: Gizmos,
) {
    if !match_.hint || match_.winner.is_some() {
        return;
    }

    let Some(ufo) = ufos.iter().find(|u| u.active) else {
        return;
    };

    // The overlay always previews a full-power shot along the current aim.
    let start = ufo.pos.offset_polar(tun.muzzle_offset, ufo.shoot_angle);
    let direction = DVec2::from_polar(MAX_SHOOT_POWER * tun.power_factor, ufo.shoot_angle);
    let probe = crate::projectile::ShotKind::Laser.width();

    let path = cache.0.precompute(start, direction, &galaxy, probe, &tun);

    for (i, point) in path.points.iter().enumerate() {
        if i % 3 == 0 {
            let fade = 1.0 - i as f32 / path.points.len().max(1) as f32;
            gizmos.circle_2d(to_screen(*point), 1.0, colors::HINT.with_alpha(0.2 + 0.6 * fade));
        }
    }
}

fn draw_bonus_star(star: Res<BonusStar>, mut gizmos: Gizmos) {
    if !star.visible() {
        return;
    }

    let center = to_screen(star.pos);
    gizmos.circle_2d(center, (star.width / 2.0) as f32, colors::STAR.with_alpha(0.3));
    gizmos.circle_2d(center, 5.0, colors::STAR);
}
