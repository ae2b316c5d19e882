//! Starduel - a gravity artillery duel.
//!
//! Two flying saucers trade shots across a procedurally generated galaxy.
//! Shots fall freely through an n-body gravity field of planets, black
//! holes and wormholes; the computer opponent aims by randomized forward
//! simulation. The simulation core is plain headless Rust; Bevy supplies
//! the fixed-timestep loop, input, drawing and the HUD.

pub mod ai;
pub mod audio;
pub mod collision;
pub mod craft;
pub mod galaxy;
pub mod game;
pub mod input;
pub mod physics;
pub mod projectile;
pub mod render;
pub mod trajectory;
pub mod types;
pub mod ui;
pub mod vector;

#[cfg(test)]
pub mod test_utils;
