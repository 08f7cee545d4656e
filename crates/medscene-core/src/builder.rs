//! Procedural construction of the medical equipment scene
//!
//! Everything here is driven by constants. The builders add one group per
//! object under a shared `medical_equipment` group:
//! - `ecg_monitor`: base, screen and a swept ECG trace
//! - `heart`: pulsing ellipsoidal body with aorta and pulmonary artery
//! - `dna_helix`: two phase-shifted strands joined by rungs, slowly spinning

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, FRAC_PI_6};

use glam::Vec3;
use tracing::debug;

use crate::animation::AnimationTag;
use crate::curve::Curve;
use crate::error::SceneError;
use crate::graph::{Geometry, Material, NodeId, SceneGraph, SceneNode, Transform};
use crate::helix::{self, HELIX_RADIUS, HELIX_SEGMENTS};
use crate::tube::{self, TubeParams};
use crate::waveform::{self, ECG_SEGMENTS};

pub const EQUIPMENT_GROUP: &str = "medical_equipment";
pub const ECG_MONITOR: &str = "ecg_monitor";
pub const HEART: &str = "heart";
pub const HEART_BODY: &str = "heart_body";
pub const DNA_HELIX: &str = "dna_helix";

const NAVY: u32 = 0x2A377D;
const CARDIAC_RED: u32 = 0xC22028;
const SIGNAL_BLUE: u32 = 0x1E68A4;

/// Build all three objects under one group attached to the scene root
pub fn build_medical_equipment(graph: &mut SceneGraph) -> Result<NodeId, SceneError> {
    let group = graph.add_child(
        SceneGraph::ROOT,
        SceneNode::group(EQUIPMENT_GROUP, Transform::default()),
    );

    build_ecg_monitor(graph, group)?;
    build_anatomical_heart(graph, group);
    build_dna_helix(graph, group)?;

    debug!(nodes = graph.len(), "Built medical equipment scene");
    Ok(group)
}

/// Monitor base, dark screen and the ECG trace swept into a thin tube
pub fn build_ecg_monitor(graph: &mut SceneGraph, parent: NodeId) -> Result<NodeId, SceneError> {
    let monitor = graph.add_child(parent, SceneNode::group(ECG_MONITOR, Transform::default()));

    graph.add_child(
        monitor,
        SceneNode::mesh(
            "monitor_base",
            Geometry::Box { width: 3.0, height: 0.2, depth: 2.0 },
            Material::color(NAVY).with_specular(0x333333, 100.0),
            Transform::from_xyz(0.0, -1.0, 0.0),
        ),
    );

    graph.add_child(
        monitor,
        SceneNode::mesh(
            "monitor_screen",
            Geometry::Box { width: 2.5, height: 1.5, depth: 0.1 },
            Material::color(0x0F172A)
                .with_specular(0x111111, 150.0)
                .with_emissive(0x1E293B, 0.1),
            Transform::from_xyz(0.0, 0.1, 1.0),
        ),
    );

    let curve = Curve::new(waveform::ecg_points(ECG_SEGMENTS))?;
    let trace = tube::sweep(
        &curve,
        TubeParams {
            tubular_segments: ECG_SEGMENTS,
            radius: 0.01,
            radial_segments: 8,
            closed: false,
        },
    );
    debug!(vertices = trace.vertex_count(), "Swept ECG trace");

    graph.add_child(
        monitor,
        SceneNode::mesh(
            "ecg_trace",
            Geometry::Tube(trace),
            Material::color(SIGNAL_BLUE)
                .with_emissive(SIGNAL_BLUE, 0.5)
                .with_opacity(0.9),
            Transform::from_xyz(0.0, 0.1, 0.0),
        )
        .with_animation(AnimationTag::spin_y(0.01)),
    );

    Ok(monitor)
}

/// Ellipsoidal heart body (tagged to pulse) with two vessels
pub fn build_anatomical_heart(graph: &mut SceneGraph, parent: NodeId) -> NodeId {
    let heart = graph.add_child(parent, SceneNode::group(HEART, Transform::from_xyz(2.0, 1.0, 0.0)));
    let tissue = Material::color(CARDIAC_RED).with_specular(0x444444, 80.0);

    graph.add_child(
        heart,
        SceneNode::mesh(
            HEART_BODY,
            Geometry::Sphere { radius: 0.6, width_segments: 32, height_segments: 32 },
            tissue.clone(),
            Transform::default().with_scale(Vec3::new(1.0, 1.2, 0.8)),
        )
        .with_animation(AnimationTag::Pulse),
    );

    graph.add_child(
        heart,
        SceneNode::mesh(
            "aorta",
            Geometry::Cylinder {
                radius_top: 0.15,
                radius_bottom: 0.2,
                height: 1.0,
                radial_segments: 8,
            },
            tissue.clone(),
            Transform::from_xyz(0.0, 0.8, 0.0).with_rotation(FRAC_PI_6, 0.0, 0.0),
        ),
    );

    graph.add_child(
        heart,
        SceneNode::mesh(
            "pulmonary_artery",
            Geometry::Cylinder {
                radius_top: 0.1,
                radius_bottom: 0.15,
                height: 0.8,
                radial_segments: 8,
            },
            tissue,
            Transform::from_xyz(0.3, 0.7, 0.2).with_rotation(FRAC_PI_4, FRAC_PI_6, 0.0),
        ),
    );

    heart
}

/// Two strands half a turn apart, joined by horizontal rungs
pub fn build_dna_helix(graph: &mut SceneGraph, parent: NodeId) -> Result<NodeId, SceneError> {
    let dna = graph.add_child(
        parent,
        SceneNode::group(DNA_HELIX, Transform::from_xyz(-2.0, 0.5, 0.0))
            .with_animation(AnimationTag::spin_y(0.005)),
    );

    for side in 0..2 {
        let curve = Curve::new(helix::strand_points(side))?;
        let strand = tube::sweep(
            &curve,
            TubeParams {
                tubular_segments: HELIX_SEGMENTS * 2,
                radius: 0.03,
                radial_segments: 8,
                closed: false,
            },
        );
        let color = if side == 0 { CARDIAC_RED } else { NAVY };

        graph.add_child(
            dna,
            SceneNode::mesh(
                format!("strand_{side}"),
                Geometry::Tube(strand),
                Material::color(color).with_specular(0x333333, 90.0),
                Transform::default(),
            ),
        );
    }

    let rung_material = Material::color(SIGNAL_BLUE).with_emissive(SIGNAL_BLUE, 0.3);
    for (i, y) in helix::rung_heights().into_iter().enumerate() {
        graph.add_child(
            dna,
            SceneNode::mesh(
                format!("rung_{i}"),
                Geometry::Cylinder {
                    radius_top: 0.01,
                    radius_bottom: 0.01,
                    height: HELIX_RADIUS * 2.0,
                    radial_segments: 8,
                },
                rung_material.clone(),
                Transform::from_xyz(0.0, y, 0.0).with_rotation(0.0, 0.0, FRAC_PI_2),
            ),
        );
    }

    Ok(dna)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeKind;

    fn built() -> (SceneGraph, NodeId) {
        let mut graph = SceneGraph::new();
        let group = build_medical_equipment(&mut graph).unwrap();
        (graph, group)
    }

    #[test]
    fn test_three_object_groups() {
        let (graph, group) = built();

        assert_eq!(graph.children(SceneGraph::ROOT), &[group]);
        let names: Vec<_> = graph
            .children(group)
            .iter()
            .map(|id| graph.node(*id).unwrap().name.as_str())
            .collect();
        assert_eq!(names, vec![ECG_MONITOR, HEART, DNA_HELIX]);
    }

    #[test]
    fn test_heart_body() {
        let (graph, _) = built();
        let body = graph.node(graph.find(HEART_BODY).unwrap()).unwrap();

        assert_eq!(body.animation, Some(AnimationTag::Pulse));
        assert_eq!(body.transform.scale, Vec3::new(1.0, 1.2, 0.8));

        // Vessels share the body's material
        let heart = graph.find(HEART).unwrap();
        let materials: Vec<_> = graph
            .children(heart)
            .iter()
            .filter_map(|id| match &graph.node(*id).unwrap().kind {
                NodeKind::Mesh { material, .. } => Some(material.clone()),
                NodeKind::Group => None,
            })
            .collect();
        assert_eq!(materials.len(), 3);
        assert!(materials.iter().all(|m| *m == materials[0]));
    }

    #[test]
    fn test_helix_rungs() {
        let (graph, _) = built();
        let dna = graph.find(DNA_HELIX).unwrap();
        let node = graph.node(dna).unwrap();
        assert_eq!(node.animation, Some(AnimationTag::spin_y(0.005)));

        let rungs: Vec<_> = graph
            .children(dna)
            .iter()
            .map(|id| graph.node(*id).unwrap())
            .filter(|n| n.name.starts_with("rung_"))
            .collect();
        assert_eq!(rungs.len(), 11);

        for rung in &rungs {
            assert!((rung.transform.rotation.z - FRAC_PI_2).abs() < 1e-6);
            // Cylinder axis (local Y) ends up horizontal
            let axis = rung.transform.quat() * Vec3::Y;
            assert!(axis.y.abs() < 1e-6);
        }
        assert!((rungs[0].transform.position.y + 1.0).abs() < 1e-6);
        assert!((rungs[10].transform.position.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_tube_meshes() {
        let (graph, _) = built();

        let trace = graph.node(graph.find("ecg_trace").unwrap()).unwrap();
        match &trace.kind {
            NodeKind::Mesh { geometry: Geometry::Tube(mesh), material } => {
                assert_eq!(mesh.vertex_count(), 201 * 9);
                assert!(material.transparent);
                assert_eq!(material.opacity, 0.9);
            }
            other => panic!("unexpected trace kind: {other:?}"),
        }

        let strand = graph.node(graph.find("strand_1").unwrap()).unwrap();
        match &strand.kind {
            NodeKind::Mesh { geometry: Geometry::Tube(mesh), .. } => {
                assert_eq!(mesh.vertex_count(), 101 * 9);
                assert_eq!(mesh.triangle_count(), 100 * 8 * 2);
            }
            other => panic!("unexpected strand kind: {other:?}"),
        }
    }
}
