//! Double helix sampling

use std::f32::consts::PI;

use glam::Vec3;

pub const HELIX_RADIUS: f32 = 0.3;
pub const HELIX_HEIGHT: f32 = 2.0;
pub const HELIX_SEGMENTS: u32 = 50;
/// Rung positions are `i / RUNG_STEPS` for `i` in `0..=RUNG_STEPS`
pub const RUNG_STEPS: u32 = 10;

/// Full turns of each strand over the helix height
const TURNS: f32 = 2.0;

/// Angle of a strand at normalized height `t`. Side 1 trails side 0 by π.
pub fn strand_angle(t: f32, side: u32) -> f32 {
    t * PI * 2.0 * TURNS + side as f32 * PI
}

/// `HELIX_SEGMENTS + 1` points along one strand
pub fn strand_points(side: u32) -> Vec<Vec3> {
    (0..=HELIX_SEGMENTS)
        .map(|i| {
            let t = i as f32 / HELIX_SEGMENTS as f32;
            let angle = strand_angle(t, side);
            Vec3::new(
                angle.cos() * HELIX_RADIUS,
                (t - 0.5) * HELIX_HEIGHT,
                angle.sin() * HELIX_RADIUS,
            )
        })
        .collect()
}

/// Heights of the connecting rungs, bottom to top
pub fn rung_heights() -> Vec<f32> {
    (0..=RUNG_STEPS)
        .map(|i| (i as f32 / RUNG_STEPS as f32 - 0.5) * HELIX_HEIGHT)
        .collect()
}
