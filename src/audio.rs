//! Fire-and-forget sound notifications.
//!
//! The simulation announces its audible moments as events; whatever audio
//! backend is wired up may consume them. Nothing here waits for playback
//! or expects an acknowledgement — without a backend the cues simply land
//! in the debug log.

use bevy::prelude::*;

/// One audible moment of the game.
#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SoundCue {
    Explosion,
    Shoot,
    WinningGame,
    WarpGalaxy,
    HitUfo,
    NewGame,
    NewBonus,
    BuyWeapon,
}

pub struct AudioPlugin;

impl Plugin for AudioPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<SoundCue>()
            .add_systems(Update, log_cues);
    }
}

fn log_cues(mut cues: EventReader<SoundCue>) {
    for cue in cues.read() {
        debug!("sound cue: {cue:?}");
    }
}
