//! Scene setup and per-frame mirroring of the scene graph

use std::collections::HashMap;

use bevy::prelude::*;
use bevy::time::Real;
use medscene_core::graph::{Material, NodeKind};
use medscene_core::{NodeId, ViewportState};

use crate::geometry::{geometry_mesh, standard_material};
use crate::ActiveScene;

/// Three.js-style light intensities are scaled by these to Bevy units
const AMBIENT_BRIGHTNESS_SCALE: f32 = 500.0;
const DIRECTIONAL_ILLUMINANCE_SCALE: f32 = 10_000.0;

/// Link from a Bevy entity back to its scene graph node
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneNodeRef(pub NodeId);

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;

/// Marker component for the key light
#[derive(Component)]
pub struct MainDirectionalLight;

/// System set for work that must see this frame's input and resize signals
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct AdvanceScene;

/// Plugin for scene setup
pub struct SceneSpawnPlugin;

impl Plugin for SceneSpawnPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (spawn_camera_and_lights, spawn_scene_graph))
            .add_systems(Update, advance_scene.in_set(AdvanceScene));
    }
}

fn spawn_camera_and_lights(mut commands: Commands, scene: Res<ActiveScene>) {
    let viewport = scene.0.viewport();
    let renderer = &scene.0.config().renderer;

    commands.spawn((
        Camera3d::default(),
        Camera {
            clear_color: if renderer.transparent {
                ClearColorConfig::Custom(Color::NONE)
            } else {
                ClearColorConfig::Default
            },
            ..default()
        },
        Projection::Perspective(perspective(viewport)),
        camera_transform(viewport),
        if renderer.antialias {
            Msaa::Sample4
        } else {
            Msaa::Off
        },
        AmbientLight {
            color: Color::WHITE,
            brightness: 0.6 * AMBIENT_BRIGHTNESS_SCALE,
            ..default()
        },
        MainCamera,
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 0.8 * DIRECTIONAL_ILLUMINANCE_SCALE,
            shadows_enabled: renderer.shadows,
            ..default()
        },
        Transform::from_xyz(5.0, 10.0, 7.0).looking_at(Vec3::ZERO, Vec3::Y),
        MainDirectionalLight,
    ));
}

/// Spawn one entity per graph node, parents before children
fn spawn_scene_graph(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    scene: Res<ActiveScene>,
) {
    let graph = scene.0.graph();
    let mut entities: HashMap<NodeId, Entity> = HashMap::new();
    // Nodes with equal materials share one handle
    let mut material_cache: Vec<(Material, Handle<StandardMaterial>)> = Vec::new();

    for id in graph.descendants(graph.root()) {
        let Some(node) = graph.node(id) else {
            continue;
        };

        let mut entity = commands.spawn((
            Name::new(node.name.clone()),
            SceneNodeRef(id),
            bevy_transform(&node.transform),
            Visibility::default(),
        ));

        if let NodeKind::Mesh { geometry, material } = &node.kind {
            let handle = match material_cache.iter().find(|(m, _)| m == material) {
                Some((_, handle)) => handle.clone(),
                None => {
                    let handle = materials.add(standard_material(material));
                    material_cache.push((material.clone(), handle.clone()));
                    handle
                }
            };
            let mut mesh = geometry_mesh(geometry);
            if material.flat_shading {
                mesh.duplicate_vertices();
                mesh.compute_flat_normals();
            }
            entity.insert((
                Mesh3d(meshes.add(mesh)),
                MeshMaterial3d(handle),
            ));
        }

        if let Some(parent) = node.parent.and_then(|p| entities.get(&p)) {
            entity.insert(ChildOf(*parent));
        }

        entities.insert(id, entity.id());
    }

    tracing::debug!(
        entities = entities.len(),
        materials = material_cache.len(),
        "Spawned scene graph"
    );
}

/// Tick the runtime and copy node transforms and the camera pose into Bevy
pub fn advance_scene(
    time: Res<Time<Real>>,
    mut scene: ResMut<ActiveScene>,
    mut nodes: Query<(&SceneNodeRef, &mut Transform), Without<MainCamera>>,
    mut camera: Query<(&mut Transform, &mut Projection), With<MainCamera>>,
) {
    let Some(view) = scene.0.frame(time.elapsed_secs(), time.delta_secs()) else {
        return;
    };

    for (node_ref, mut transform) in &mut nodes {
        if let Some(node) = view.graph.node(node_ref.0) {
            let next = bevy_transform(&node.transform);
            if *transform != next {
                *transform = next;
            }
        }
    }

    if let Ok((mut transform, mut projection)) = camera.single_mut() {
        *transform = camera_transform(view.viewport);
        *projection = Projection::Perspective(perspective(view.viewport));
    }
}

pub fn bevy_transform(transform: &medscene_core::Transform) -> Transform {
    Transform {
        translation: transform.position,
        rotation: transform.quat(),
        scale: transform.scale,
    }
}

fn camera_transform(viewport: &ViewportState) -> Transform {
    Transform::from_translation(viewport.camera_position).looking_at(viewport.camera_target, Vec3::Y)
}

fn perspective(viewport: &ViewportState) -> PerspectiveProjection {
    PerspectiveProjection {
        fov: viewport.projection.fov_y,
        aspect_ratio: viewport.projection.aspect,
        near: viewport.projection.near,
        far: viewport.projection.far,
        ..default()
    }
}
