//! Keyboard input, translated into control intents.
//!
//! Keys:
//! - `1`/`2`/`3` — player vs computer, player vs player, demo
//! - arrows — aim and move the active saucer
//! - `Space` — hold to charge, release to fire
//! - `Return` — redeem the collected bonus
//! - `Tab` — warp to a new galaxy
//! - `C` — cycle computer strength, `H` — aim-assist overlay,
//!   `N` — cycle the equipped weapon

use bevy::prelude::*;

use crate::audio::SoundCue;
use crate::craft::Ufo;
use crate::game::{Match, NewGameEvent, WarpRequest};
use crate::projectile::ActiveShot;
use crate::types::Tunables;

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, (mode_keys, session_keys, control_keys));
    }
}

/// Game mode selection.
fn mode_keys(
    keys: Res<ButtonInput<KeyCode>>,
    mut new_game: EventWriter<NewGameEvent>,
    mut cues: EventWriter<SoundCue>,
) {
    if keys.just_pressed(KeyCode::Digit1) {
        new_game.send(NewGameEvent {
            humans: [true, false],
        });
        cues.send(SoundCue::NewGame);
    }

    if keys.just_pressed(KeyCode::Digit2) {
        new_game.send(NewGameEvent {
            humans: [true, true],
        });
        cues.send(SoundCue::NewGame);
    }

    if keys.just_pressed(KeyCode::Digit3) {
        new_game.send(NewGameEvent {
            humans: [false, false],
        });
    }
}

/// Session toggles that work regardless of whose turn it is.
fn session_keys(
    keys: Res<ButtonInput<KeyCode>>,
    mut match_: ResMut<Match>,
    shot: Res<ActiveShot>,
    mut warp: EventWriter<WarpRequest>,
) {
    if keys.just_pressed(KeyCode::Tab) && shot.0.is_none() {
        warp.send(WarpRequest);
    }

    if keys.just_pressed(KeyCode::KeyC) {
        match_.difficulty = match_.difficulty.next();
        info!("computer strength: {}", match_.difficulty.name());
    }

    if keys.just_pressed(KeyCode::KeyH) {
        match_.hint = !match_.hint;
        info!("aim assist {}", if match_.hint { "on" } else { "off" });
    }
}

/// Aim, move, charge and fire for the active human craft.
fn control_keys(
    keys: Res<ButtonInput<KeyCode>>,
    match_: Res<Match>,
    mut ufos: Query<&mut Ufo>,
    mut shot: ResMut<ActiveShot>,
    tun: Res<Tunables>,
    mut cues: EventWriter<SoundCue>,
) {
    if match_.winner.is_some() {
        return;
    }

    let Some(mut ufo) = ufos
        .iter_mut()
        .find(|u| u.active && u.human && !u.locked)
    else {
        return;
    };

    if keys.just_pressed(KeyCode::Enter) && ufo.redeem_bonus() {
        cues.send(SoundCue::BuyWeapon);
    }

    if keys.just_pressed(KeyCode::KeyN) {
        ufo.next_weapon();
        debug!("weapon: {:?}", ufo.weapon);
    }

    if keys.pressed(KeyCode::ArrowLeft) {
        ufo.dec_shoot_angle();
    }
    if keys.pressed(KeyCode::ArrowRight) {
        ufo.inc_shoot_angle();
    }
    if keys.pressed(KeyCode::ArrowUp) {
        ufo.move_up();
    }
    if keys.pressed(KeyCode::ArrowDown) {
        ufo.move_down();
    }

    // Hold space to charge, release to fire.
    if keys.pressed(KeyCode::Space) {
        ufo.inc_shoot_power();
    }

    if keys.just_released(KeyCode::Space) && ufo.shoot_power > 0.0 && shot.0.is_none() {
        if let Some(projectile) = ufo.fire(&tun) {
            shot.0 = Some(projectile);
            cues.send(SoundCue::Shoot);
        }
    }
}
