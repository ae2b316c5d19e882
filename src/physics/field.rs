//! The gravity field and the fixed-step integrator.
//!
//! The force law is tuned for gameplay, not realism: each attractor pulls
//! with magnitude `weight / distance` (linear in weight, inverse-linear in
//! distance), and the summed pull is added to the shot velocity as an
//! impulse once per tick. Displacement then follows the updated velocity,
//! scaled by the tick interval.

use bevy::math::DVec2;
use wide::f64x4;

use crate::galaxy::body::Attractor;
use crate::vector::Polar;

/// Below this squared distance an attractor contributes nothing, so a shot
/// sitting exactly on a body center never yields NaN or infinite pull.
const SINGULARITY_EPSILON: f64 = 1e-9;

/// Summed gravitational pull of all attractors at `pos`.
///
/// Contributions are accumulated four attractors at a time; a lane's
/// contribution is `delta * weight / |delta|²`, which equals the unit
/// direction times `weight / |delta|`.
#[inline]
pub fn combined_pull(pos: DVec2, bodies: &[Attractor]) -> DVec2 {
    let mut pull = DVec2::ZERO;

    for chunk in bodies.chunks(4) {
        // Pad idle lanes with dx=1, w=0: zero contribution, no 0/0.
        let mut dx = [1.0f64; 4];
        let mut dy = [0.0f64; 4];
        let mut w = [0.0f64; 4];

        for (i, body) in chunk.iter().enumerate() {
            dx[i] = body.pos.x - pos.x;
            dy[i] = body.pos.y - pos.y;
            w[i] = body.weight;
        }

        let dx = f64x4::new(dx);
        let dy = f64x4::new(dy);
        let w = f64x4::new(w);

        let d2 = dx * dx + dy * dy;
        let scale = d2
            .cmp_gt(f64x4::splat(SINGULARITY_EPSILON))
            .blend(w / d2, f64x4::splat(0.0));

        pull.x += (dx * scale).reduce_add();
        pull.y += (dy * scale).reduce_add();
    }

    pull
}

/// Advance a shot by one fixed tick of `dt_ms` milliseconds.
///
/// The pull is applied to the velocity first; the position then moves
/// along the updated velocity with a displacement proportional to speed
/// and the tick interval.
#[inline]
pub fn field_step(pos: &mut DVec2, vel: &mut DVec2, bodies: &[Attractor], dt_ms: f64) {
    *vel += combined_pull(*pos, bodies);
    *pos += vel.with_length(vel.length() * dt_ms / 1000.0);
}
