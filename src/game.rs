//! Match flow: turns, rounds, winner detection, galaxy warps and the
//! collectible bonus star.

use bevy::math::DVec2;
use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::ai::{AiAction, AiDifficulty, AiGunner};
use crate::audio::SoundCue;
use crate::collision::circles_overlap;
use crate::craft::{UFO_WIDTH, Ufo};
use crate::galaxy::Galaxy;
use crate::projectile::{ActiveShot, Explosion, Explosions, ShotEvent};
use crate::types::{
    FIELD_HEIGHT, FIELD_WIDTH, MAX_PLANETS, MAX_PLAYER, MIN_PLANETS, PlayerId, SimSet, Tunables,
    WINNING_WAIT,
};

/// Start a fresh match with the given human/computer seats.
#[derive(Event, Clone, Copy, Debug)]
pub struct NewGameEvent {
    pub humans: [bool; MAX_PLAYER],
}

/// The live shot (and all its children) has fully resolved.
#[derive(Event, Clone, Copy, Debug)]
pub struct ShotResolved;

/// Request a new galaxy layout.
#[derive(Event, Clone, Copy, Debug)]
pub struct WarpRequest;

/// Whose turn it is, who won, and the session toggles.
#[derive(Resource, Debug)]
pub struct Match {
    pub active: PlayerId,
    pub winner: Option<PlayerId>,
    winner_wait: u32,
    pub difficulty: AiDifficulty,
    /// Show the aim-assist path for the active craft.
    pub hint: bool,
    pub humans: [bool; MAX_PLAYER],
}

impl Default for Match {
    fn default() -> Self {
        Self {
            active: PlayerId::One,
            winner: None,
            winner_wait: WINNING_WAIT,
            difficulty: AiDifficulty::Veteran,
            hint: false,
            // Until someone picks a mode the match runs computer vs
            // computer, as the attract screen.
            humans: [false; MAX_PLAYER],
        }
    }
}

impl Match {
    /// Is this a computer-vs-computer attract game?
    pub fn is_demo(&self) -> bool {
        self.humans.iter().all(|h| !h)
    }
}

/// Shared random source for galaxy warps and the bonus star.
#[derive(Resource)]
pub struct GameRng(pub ChaCha8Rng);

/// The collectible star. Most of its life is spent waiting; once placed
/// it can be picked up by flying a shot through it.
#[derive(Resource, Debug)]
pub struct BonusStar {
    pub pos: DVec2,
    pub width: f64,
    spacing: f64,
    /// Countdown to the next placement.
    wait: u32,
    /// Countdown while placed, until the star fades again.
    waiting: u32,
}

impl Default for BonusStar {
    fn default() -> Self {
        Self {
            pos: DVec2::ZERO,
            width: 36.0,
            spacing: 20.0,
            wait: 250,
            waiting: 9999,
        }
    }
}

impl BonusStar {
    pub fn visible(&self) -> bool {
        self.wait < 30
    }

    pub fn collectable(&self) -> bool {
        self.wait <= 50
    }

    /// Picked up: disappear and stay away for a while.
    pub fn collected(&mut self) {
        self.wait = 200;
        self.waiting = 200;
    }

    /// Benched after a galaxy warp so it cannot sit inside a new body.
    pub fn bench(&mut self) {
        self.wait = 250;
    }
}

pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_secs();

        app.init_resource::<Match>()
            .init_resource::<BonusStar>()
            .insert_resource(GameRng(ChaCha8Rng::seed_from_u64(seed)))
            .add_event::<NewGameEvent>()
            .add_event::<ShotResolved>()
            .add_event::<WarpRequest>()
            .configure_sets(
                FixedUpdate,
                (SimSet::Field, SimSet::Ai, SimSet::Flight, SimSet::Outcome).chain(),
            )
            .add_systems(Startup, spawn_crafts)
            .add_systems(FixedUpdate, bonus_star_tick.in_set(SimSet::Field))
            .add_systems(FixedUpdate, computer_turns.in_set(SimSet::Ai))
            .add_systems(
                FixedUpdate,
                (bonus_pickup, turn_over, check_winner).in_set(SimSet::Outcome),
            )
            .add_systems(Update, (handle_new_game, handle_warp));
    }
}

/// Spawn the two saucers and their gunners. Every craft carries a gunner;
/// it only thinks while the craft is computer-controlled.
fn spawn_crafts(mut commands: Commands, galaxy: Res<Galaxy>, mut match_: ResMut<Match>) {
    for player in PlayerId::all() {
        let mut ufo = Ufo::new(player);
        if player == match_.active {
            ufo.activate();
        }
        let gunner = AiGunner::new(galaxy.seed() ^ player.index() as u64);
        commands.spawn((ufo, gunner));
    }

    match_.winner = None;
    info!("match ready: demo mode until a player joins");
}

/// Start a fresh round: shields, flags, and player one to move.
fn start_round(
    match_: &mut Match,
    ufos: &mut Query<(&mut Ufo, &mut AiGunner)>,
    shot: &mut ActiveShot,
    explosions: &mut Explosions,
    tun: &Tunables,
) {
    if let Some(projectile) = shot.0.as_mut() {
        for event in projectile.destroy() {
            if let ShotEvent::Exploded(pos) = event {
                let mut flash = Explosion::default();
                flash.activate(pos);
                explosions.0.push(flash);
            }
        }
    }
    shot.0 = None;

    for (mut ufo, mut gunner) in ufos.iter_mut() {
        ufo.human = match_.humans[ufo.player.index()];
        ufo.reset();
        if ufo.player == PlayerId::One {
            ufo.activate();
        }
        gunner.reset(tun);
    }

    match_.active = PlayerId::One;
    match_.winner = None;
    match_.winner_wait = WINNING_WAIT;
}

fn handle_new_game(
    mut events: EventReader<NewGameEvent>,
    mut match_: ResMut<Match>,
    mut ufos: Query<(&mut Ufo, &mut AiGunner)>,
    mut shot: ResMut<ActiveShot>,
    mut explosions: ResMut<Explosions>,
    tun: Res<Tunables>,
) {
    for event in events.read() {
        match_.humans = event.humans;
        start_round(&mut match_, &mut ufos, &mut shot, &mut explosions, &tun);
        info!(
            "new game: {}",
            match match_.humans {
                [true, true] => "player vs player",
                [true, false] => "player vs computer",
                _ => "demo",
            }
        );
    }
}

/// Let the active computer craft search, adjust and fire.
fn computer_turns(
    mut ufos: Query<(&mut Ufo, &mut AiGunner)>,
    mut shot: ResMut<ActiveShot>,
    galaxy: Res<Galaxy>,
    match_: Res<Match>,
    tun: Res<Tunables>,
    mut cues: EventWriter<SoundCue>,
) {
    if match_.winner.is_some() || shot.0.is_some() {
        return;
    }

    let positions: Vec<(PlayerId, DVec2)> =
        ufos.iter().map(|(u, _)| (u.player, u.pos)).collect();

    for (mut ufo, mut gunner) in ufos.iter_mut() {
        if !ufo.active || !ufo.is_computer() || ufo.locked {
            continue;
        }

        let Some(&(_, opponent_pos)) = positions
            .iter()
            .find(|(player, _)| *player == ufo.player.opponent())
        else {
            continue;
        };

        let action = gunner.think(
            &mut ufo,
            opponent_pos,
            UFO_WIDTH,
            &galaxy,
            match_.difficulty,
            &tun,
        );

        if action == AiAction::Fire {
            if let Some(projectile) = ufo.fire(&tun) {
                shot.0 = Some(projectile);
                cues.send(SoundCue::Shoot);
            }
        }
    }
}

/// Hand the turn to the other player once the shot has resolved.
fn turn_over(
    mut events: EventReader<ShotResolved>,
    mut match_: ResMut<Match>,
    mut ufos: Query<(&mut Ufo, &mut AiGunner)>,
    tun: Res<Tunables>,
) {
    if events.read().next().is_none() {
        return;
    }
    events.clear();

    if match_.winner.is_some() {
        return;
    }

    match_.active = match_.active.opponent();

    for (mut ufo, mut gunner) in ufos.iter_mut() {
        if ufo.player == match_.active {
            ufo.activate();
            gunner.reset(&tun);
        } else {
            ufo.deactivate();
        }
    }

    debug!("turn: {:?}", match_.active);
}

/// Count down the bonus star's timers and place it at a clear spot.
fn bonus_star_tick(
    mut star: ResMut<BonusStar>,
    galaxy: Res<Galaxy>,
    mut rng: ResMut<GameRng>,
    mut cues: EventWriter<SoundCue>,
) {
    if star.wait > 0 {
        star.wait -= 1;
    }

    if star.waiting > 0 {
        star.waiting -= 1;
        if star.waiting == 0 {
            star.wait = 100;
        }
    }

    if star.wait == 35 {
        let probe = star.width + star.spacing;
        for _ in 0..200 {
            let candidate = DVec2::new(
                rng.0.gen_range(150.0..FIELD_WIDTH - 150.0),
                rng.0.gen_range(50.0..FIELD_HEIGHT - 50.0),
            );
            if !galaxy.check_collision_spaced(candidate, probe) {
                star.pos = candidate;
                break;
            }
        }

        star.waiting = rng.0.gen_range(3000..4000);
        cues.send(SoundCue::NewBonus);
    }
}

/// Award the shooter when any part of the live shot sweeps the star.
fn bonus_pickup(
    mut star: ResMut<BonusStar>,
    shot: Res<ActiveShot>,
    match_: Res<Match>,
    mut ufos: Query<&mut Ufo>,
) {
    if !star.collectable() {
        return;
    }
    let Some(projectile) = shot.0.as_ref() else {
        return;
    };

    let swept = projectile
        .flight_parts()
        .iter()
        .any(|part| circles_overlap(part.pos, part.width(), star.pos, star.width));

    if swept {
        star.collected();
        if let Some(mut ufo) = ufos.iter_mut().find(|u| u.player == match_.active) {
            ufo.add_bonus();
            info!("player {:?} collected a bonus ({})", ufo.player, ufo.bonus);
        }
    }
}

/// Declare the last craft standing, linger, then start the next round.
fn check_winner(
    mut match_: ResMut<Match>,
    mut ufos: Query<(&mut Ufo, &mut AiGunner)>,
    mut shot: ResMut<ActiveShot>,
    mut explosions: ResMut<Explosions>,
    tun: Res<Tunables>,
    mut cues: EventWriter<SoundCue>,
) {
    match match_.winner {
        None => {
            let alive: Vec<PlayerId> = ufos
                .iter()
                .filter(|(u, _)| !u.is_dead())
                .map(|(u, _)| u.player)
                .collect();

            if alive.len() == 1 {
                match_.winner = Some(alive[0]);
                cues.send(SoundCue::WinningGame);
                info!("player {:?} wins the round", alive[0]);
            }
        }
        Some(_) => {
            match_.winner_wait -= 1;
            if match_.winner_wait == 0 {
                start_round(&mut match_, &mut ufos, &mut shot, &mut explosions, &tun);
            }
        }
    }
}

/// Regenerate the galaxy on request. Ignored while a shot flies or the
/// current layout is still imploding.
fn handle_warp(
    mut events: EventReader<WarpRequest>,
    mut galaxy: ResMut<Galaxy>,
    mut star: ResMut<BonusStar>,
    mut rng: ResMut<GameRng>,
    shot: Res<ActiveShot>,
    mut cues: EventWriter<SoundCue>,
) {
    for _ in events.read() {
        if shot.0.is_some() {
            continue;
        }

        let bodies = rng.0.gen_range(MIN_PLANETS..=MAX_PLANETS);
        let seed = u64::from(rng.0.gen_range(0u32..100_000));

        match galaxy.create(bodies, seed) {
            Ok(()) => {
                star.bench();
                cues.send(SoundCue::WarpGalaxy);
            }
            Err(err) => debug!("warp ignored: {err}"),
        }
    }
}
