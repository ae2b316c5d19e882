//! HUD overlay: player captions, shields, bonuses and banners.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, EguiPlugin, EguiPrimaryContextPass, egui};

use crate::craft::Ufo;
use crate::galaxy::Galaxy;
use crate::game::Match;
use crate::types::{FIELD_WIDTH, MAX_ENERGY, MAX_PLAYER, PlayerId};

/// Ticks of one caption blink cycle.
const BLINK_TIME: u32 = 45;

mod colors {
    use bevy_egui::egui::Color32;

    pub const PLAYER_ONE: Color32 = Color32::from_rgb(235, 90, 90);
    pub const PLAYER_TWO: Color32 = Color32::from_rgb(100, 120, 235);
    pub const TEXT: Color32 = Color32::from_rgb(220, 220, 230);
    pub const BONUS_LIT: Color32 = Color32::from_rgb(255, 215, 80);
    pub const BONUS_DIM: Color32 = Color32::from_gray(90);
}

/// Resource to track if fonts have been initialized.
#[derive(Resource, Default)]
pub struct FontsInitialized(pub bool);

/// Display state: shields crawl toward their real value, captions blink.
#[derive(Resource)]
pub struct HudState {
    shown_shield: [i32; MAX_PLAYER],
    blink: u32,
}

impl Default for HudState {
    fn default() -> Self {
        Self {
            shown_shield: [MAX_ENERGY; MAX_PLAYER],
            blink: BLINK_TIME,
        }
    }
}

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EguiPlugin::default())
            .init_resource::<FontsInitialized>()
            .init_resource::<HudState>()
            .add_systems(EguiPrimaryContextPass, setup_fonts)
            .add_systems(EguiPrimaryContextPass, hud.after(setup_fonts));
    }
}

/// Install the Phosphor icon font into the egui context once.
fn setup_fonts(mut contexts: EguiContexts, mut initialized: ResMut<FontsInitialized>) {
    if initialized.0 {
        return;
    }

    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    let mut fonts = egui::FontDefinitions::default();
    egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
    ctx.set_fonts(fonts);
    initialized.0 = true;
}

fn player_color(player: PlayerId) -> egui::Color32 {
    match player {
        PlayerId::One => colors::PLAYER_ONE,
        PlayerId::Two => colors::PLAYER_TWO,
    }
}

fn hud(
    mut contexts: EguiContexts,
    mut state: ResMut<HudState>,
    match_: Res<Match>,
    galaxy: Res<Galaxy>,
    ufos: Query<&Ufo>,
) {
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    state.blink = state.blink.checked_sub(1).unwrap_or(BLINK_TIME);
    let blink_on = state.blink < BLINK_TIME * 2 / 3;

    for ufo in ufos.iter() {
        let index = ufo.player.index();

        // Shield readout crawls toward the real value.
        let shown = &mut state.shown_shield[index];
        *shown += (ufo.shield - *shown).signum();
        let shown = *shown;

        let x = match ufo.player {
            PlayerId::One => 35.0,
            PlayerId::Two => FIELD_WIDTH as f32 - 280.0,
        };

        egui::Area::new(egui::Id::new(("player_panel", index)))
            .fixed_pos(egui::pos2(x, 16.0))
            .show(ctx, |ui| {
                let caption = if ufo.is_computer() {
                    format!("Computer ({})", match_.difficulty.name())
                } else {
                    format!("Player {}", index + 1)
                };

                // The active player's caption blinks while the duel runs.
                if blink_on || !ufo.active || match_.winner.is_some() {
                    ui.label(
                        egui::RichText::new(caption)
                            .color(player_color(ufo.player))
                            .size(18.0)
                            .strong(),
                    );
                } else {
                    ui.label(egui::RichText::new(" ").size(18.0));
                }

                ui.add(
                    egui::ProgressBar::new(shown as f32 / MAX_ENERGY as f32)
                        .desired_width(180.0)
                        .text(format!("shield {shown}")),
                );

                ui.horizontal(|ui| {
                    for pip in 0..4u8 {
                        let lit = pip < ufo.bonus;
                        let color = if lit { colors::BONUS_LIT } else { colors::BONUS_DIM };
                        ui.label(
                            egui::RichText::new(egui_phosphor::regular::STAR)
                                .color(color)
                                .size(16.0),
                        );
                    }
                    if ufo.weapon != crate::projectile::ShotKind::Laser {
                        ui.label(
                            egui::RichText::new(format!("{:?}", ufo.weapon))
                                .color(colors::BONUS_LIT)
                                .size(12.0),
                        );
                    }
                });
            });
    }

    // Center banners: winner, galaxy warp, or the attract title.
    if let Some(winner) = match_.winner {
        if blink_on {
            let is_computer = ufos
                .iter()
                .find(|u| u.player == winner)
                .is_some_and(|u| u.is_computer());
            let text = if is_computer {
                "THE COMPUTER WINS".to_string()
            } else {
                format!("PLAYER {} WINS", winner.index() + 1)
            };

            center_banner(ctx, "winner", 0.0, &text, 28.0);
        }
    } else if match_.is_demo() {
        center_banner(ctx, "title", -60.0, "S T A R D U E L", 34.0);
        center_banner(
            ctx,
            "title_hint",
            -10.0,
            "[1] player vs computer   [2] player vs player",
            16.0,
        );
        if blink_on {
            center_banner(ctx, "title_blink", 20.0, "press a key to start", 16.0);
        }
    }

    if galaxy.is_imploding() {
        let text = format!(
            "warping to galaxy {} with {} planets",
            galaxy.seed(),
            galaxy.body_count()
        );
        center_banner(ctx, "warp", -300.0, &text, 16.0);
    }
}

fn center_banner(ctx: &egui::Context, id: &str, y_offset: f32, text: &str, size: f32) {
    egui::Area::new(egui::Id::new(id))
        .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, y_offset))
        .show(ctx, |ui| {
            ui.label(
                egui::RichText::new(text)
                    .color(colors::TEXT)
                    .size(size)
                    .strong(),
            );
        });
}
