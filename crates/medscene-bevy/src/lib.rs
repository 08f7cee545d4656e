//! Medscene Bevy - Presentation layer for the medical 3D scene
//!
//! The scene itself lives in `medscene-core`. This crate mirrors it into Bevy
//! entities, forwards pointer and resize input to the runtime, and draws it.
//! Both the browser entry (`medscene-web`) and the native CLI run it.

pub mod camera;
pub mod geometry;
pub mod host;
pub mod lifecycle;
pub mod scene;

use bevy::prelude::*;
use bevy::window::WindowResolution;
use bevy::winit::WinitSettings;
use medscene_core::graph::hex_to_rgb;
use medscene_core::SceneRuntime;

pub use host::NativeHost;
pub use lifecycle::{ShutdownHandle, ShutdownScene};

/// The running scene, shared by every system in this crate
#[derive(Resource, Debug)]
pub struct ActiveScene(pub SceneRuntime);

/// Plugin that wires the runtime into the Bevy schedule
pub struct MedScenePlugin;

impl Plugin for MedScenePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(scene::SceneSpawnPlugin)
            .add_plugins(camera::OrbitCameraPlugin)
            .add_plugins(lifecycle::LifecyclePlugin);
    }
}

/// Where the primary window renders
#[derive(Debug, Clone)]
pub struct WindowTarget {
    pub title: String,
    /// CSS selector of an existing canvas (web only)
    pub canvas: Option<String>,
}

/// Primary window rendering at the runtime's capped pixel ratio
pub fn primary_window(runtime: &SceneRuntime, target: WindowTarget) -> Window {
    let pixel_ratio = runtime.viewport().surface.pixel_ratio;
    Window {
        title: target.title,
        canvas: target.canvas,
        fit_canvas_to_parent: true,
        prevent_default_event_handling: false,
        transparent: runtime.config().renderer.transparent,
        resolution: WindowResolution::default().with_scale_factor_override(pixel_ratio),
        ..default()
    }
}

/// Run the Bevy application until the window closes or the scene shuts down
pub fn run_app(runtime: SceneRuntime, target: WindowTarget, shutdown: ShutdownHandle) -> AppExit {
    let renderer = runtime.config().renderer.clone();
    let [r, g, b] = hex_to_rgb(renderer.clear_color);
    let clear_color = if renderer.transparent {
        Color::NONE
    } else {
        Color::srgb(r, g, b)
    };

    let window = primary_window(&runtime, target);

    App::new()
        .insert_resource(ClearColor(clear_color))
        .insert_resource(WinitSettings::default())
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(window),
            ..default()
        }))
        .insert_resource(ActiveScene(runtime))
        .insert_resource(shutdown)
        .add_plugins(MedScenePlugin)
        .run()
}
