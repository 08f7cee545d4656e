//! Per-frame animation of tagged scene nodes

use std::f32::consts::TAU;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::graph::{SceneGraph, Transform};

/// Pulse amplitude around unit scale
pub const PULSE_AMPLITUDE: f32 = 0.1;

/// Animation attached to a scene node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum AnimationTag {
    /// Add `rate` (radians per frame) to the Euler rotation every frame,
    /// keeping each angle in [0, 2π)
    ContinuousRotation { rate: Vec3 },
    /// Uniform scale `1 + 0.1 * sin(elapsed)`
    Pulse,
}

impl AnimationTag {
    pub fn spin_y(rate: f32) -> Self {
        Self::ContinuousRotation {
            rate: Vec3::new(0.0, rate, 0.0),
        }
    }

    /// Update `transform` for one frame at `elapsed` seconds
    pub fn apply(&self, transform: &mut Transform, elapsed: f32) {
        match *self {
            AnimationTag::ContinuousRotation { rate } => {
                transform.rotation = (transform.rotation + rate).map(wrap_angle);
            }
            AnimationTag::Pulse => {
                transform.scale = Vec3::splat(pulse_scale(elapsed));
            }
        }
    }
}

fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Uniform pulse scale at `elapsed` seconds, always in [0.9, 1.1]
pub fn pulse_scale(elapsed: f32) -> f32 {
    1.0 + PULSE_AMPLITUDE * elapsed.sin()
}

/// Walks the graph once per frame applying every node's tag
pub struct AnimationDriver;

impl AnimationDriver {
    pub fn tick(graph: &mut SceneGraph, elapsed: f32) {
        for (_, node) in graph.iter_mut() {
            if let Some(tag) = node.animation {
                tag.apply(&mut node.transform, elapsed);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::SceneNode;

    #[test]
    fn test_pulse_scale_range() {
        assert_eq!(pulse_scale(0.0), 1.0);
        assert!((pulse_scale(std::f32::consts::FRAC_PI_2) - 1.1).abs() < 1e-6);

        let mut t = 0.0;
        while t < 50.0 {
            let s = pulse_scale(t);
            assert!((0.9..=1.1).contains(&s), "scale {s} at {t}");
            assert!((s - (1.0 + 0.1 * t.sin())).abs() < 1e-6);
            t += 0.173;
        }
    }

    #[test]
    fn test_rotation_accumulates() {
        let mut graph = SceneGraph::new();
        let id = graph.add_child(
            SceneGraph::ROOT,
            SceneNode::group("spinner", Transform::default()).with_animation(
                AnimationTag::ContinuousRotation {
                    rate: Vec3::new(0.01, 0.02, 0.0),
                },
            ),
        );

        for _ in 0..3 {
            AnimationDriver::tick(&mut graph, 0.0);
        }

        let rotation = graph.node(id).unwrap().transform.rotation;
        assert!((rotation.x - 0.03).abs() < 1e-6);
        assert!((rotation.y - 0.06).abs() < 1e-6);
        assert_eq!(rotation.z, 0.0);
    }

    #[test]
    fn test_rotation_step_holds_after_long_run() {
        let rate = 0.005;
        let mut graph = SceneGraph::new();
        // A day of frames at 60 fps without wrapping would sit near this angle
        let start = Transform::default().with_rotation(0.0, 25_920.0, 0.0);
        let id = graph.add_child(
            SceneGraph::ROOT,
            SceneNode::group("helix", start).with_animation(AnimationTag::spin_y(rate)),
        );

        AnimationDriver::tick(&mut graph, 0.0);
        let first = graph.node(id).unwrap().transform.rotation.y;
        assert!((0.0..TAU).contains(&first));

        for _ in 0..1000 {
            let before = graph.node(id).unwrap().transform.rotation.y;
            AnimationDriver::tick(&mut graph, 0.0);
            let after = graph.node(id).unwrap().transform.rotation.y;
            let step = (after - before).rem_euclid(TAU);
            assert!((step - rate).abs() < 1e-5, "step {step}");
        }
    }

    #[test]
    fn test_negative_rate_stays_wrapped() {
        let mut graph = SceneGraph::new();
        let id = graph.add_child(
            SceneGraph::ROOT,
            SceneNode::group("reverse", Transform::default())
                .with_animation(AnimationTag::spin_y(-0.01)),
        );

        AnimationDriver::tick(&mut graph, 0.0);

        let y = graph.node(id).unwrap().transform.rotation.y;
        assert!((y - (TAU - 0.01)).abs() < 1e-5);
    }

    #[test]
    fn test_pulse_replaces_scale() {
        let mut graph = SceneGraph::new();
        let id = graph.add_child(
            SceneGraph::ROOT,
            SceneNode::group(
                "heart",
                Transform::default().with_scale(Vec3::new(1.0, 1.2, 0.8)),
            )
            .with_animation(AnimationTag::Pulse),
        );
        let untagged = graph.add_child(SceneGraph::ROOT, SceneNode::group("still", Transform::default()));

        AnimationDriver::tick(&mut graph, 0.0);

        assert_eq!(graph.node(id).unwrap().transform.scale, Vec3::ONE);
        assert_eq!(graph.node(untagged).unwrap().transform, Transform::default());
    }

    #[test]
    fn test_tag_serialization() {
        let json = serde_json::to_string(&AnimationTag::Pulse).unwrap();
        assert_eq!(json, r#"{"kind":"pulse"}"#);

        let tag: AnimationTag =
            serde_json::from_str(r#"{"kind":"continuous-rotation","rate":[0.0,0.005,0.0]}"#).unwrap();
        assert_eq!(tag, AnimationTag::spin_y(0.005));
    }
}
