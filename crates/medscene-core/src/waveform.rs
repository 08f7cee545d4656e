//! ECG trace sampling
//!
//! One heartbeat is laid out over the normalized domain [0, 1]: a P wave, the
//! QRS complex, a T wave, then a flat baseline. Phases are selected with
//! strict less-than on `t`, so a boundary value belongs to the later phase.

use std::f32::consts::PI;

use glam::Vec3;

/// Samples per trace, minus one
pub const ECG_SEGMENTS: u32 = 200;

/// Horizontal extent of the trace on the monitor screen
pub const ECG_WIDTH: f32 = 2.3;

/// Depth that places the trace just in front of the screen face
pub const ECG_DEPTH: f32 = 1.01;

const PERIOD: f32 = PI * 4.0;

const P_WAVE_END: f32 = 0.1;
const QRS_END: f32 = 0.25;
const T_WAVE_END: f32 = 0.35;

/// Section of the heartbeat a sample falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EcgPhase {
    PWave,
    Qrs,
    TWave,
    Baseline,
}

impl EcgPhase {
    pub fn at(t: f32) -> Self {
        if t < P_WAVE_END {
            Self::PWave
        } else if t < QRS_END {
            Self::Qrs
        } else if t < T_WAVE_END {
            Self::TWave
        } else {
            Self::Baseline
        }
    }
}

/// Trace height at normalized position `t`
pub fn ecg_height(t: f32) -> f32 {
    match EcgPhase::at(t) {
        EcgPhase::PWave => (t * PERIOD).sin() * 0.1,
        EcgPhase::Qrs => (t * PERIOD * 2.0).sin() * 0.4,
        EcgPhase::TWave => (t * PERIOD * 0.5).sin() * 0.2,
        EcgPhase::Baseline => 0.0,
    }
}

/// `segments + 1` trace points across the monitor face
pub fn ecg_points(segments: u32) -> Vec<Vec3> {
    (0..=segments)
        .map(|i| {
            let t = i as f32 / segments as f32;
            Vec3::new((t - 0.5) * ECG_WIDTH, ecg_height(t), ECG_DEPTH)
        })
        .collect()
}
