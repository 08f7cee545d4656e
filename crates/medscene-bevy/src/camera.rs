//! Orbit camera input
//!
//! Mouse, wheel and touch input is forwarded to [`OrbitControls`]; the camera
//! pose itself is written by the scene when the runtime advances.

use bevy::input::mouse::{MouseMotion, MouseWheel};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use medscene_core::OrbitControls;

use crate::lifecycle::handle_resize;
use crate::scene::AdvanceScene;
use crate::ActiveScene;

/// Plugin for orbit camera controls
pub struct OrbitCameraPlugin;

impl Plugin for OrbitCameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            orbit_input.after(handle_resize).before(AdvanceScene),
        );
    }
}

fn orbit_input(
    mut scene: ResMut<ActiveScene>,
    mut mouse_motion: MessageReader<MouseMotion>,
    mut mouse_wheel: MessageReader<MouseWheel>,
    mouse_button: Option<Res<ButtonInput<MouseButton>>>,
    touch_input: Option<Res<Touches>>,
    window: Query<&Window, With<PrimaryWindow>>,
) {
    let height = window
        .single()
        .map(|w| w.height())
        .unwrap_or_else(|_| scene.0.viewport().surface.height as f32);
    let controls = scene.0.controls_mut();

    let mut total_motion = Vec2::ZERO;
    for motion in mouse_motion.read() {
        total_motion += motion.delta;
    }

    let dragging = mouse_button
        .as_ref()
        .is_some_and(|buttons| buttons.pressed(MouseButton::Left));
    if dragging {
        controls.drag(total_motion.x, total_motion.y, height);
    }

    // Bevy reports scrolling up as positive; the controls expect DOM sign
    for scroll in mouse_wheel.read() {
        controls.wheel(-scroll.y);
    }

    let touching = match touch_input.as_deref() {
        Some(touches) => apply_touches(controls, touches, height),
        None => false,
    };

    controls.set_interacting(dragging || touching);
}

/// One finger orbits, two fingers pinch. Returns whether any finger is down.
fn apply_touches(controls: &mut OrbitControls, touches: &Touches, height: f32) -> bool {
    let active: Vec<_> = touches.iter().collect();
    match active.as_slice() {
        [] => false,
        [touch] => {
            let delta = touch.delta();
            if delta != Vec2::ZERO {
                controls.drag(delta.x, delta.y, height);
            }
            true
        }
        [t1, t2, ..] => {
            let curr_dist = t1.position().distance(t2.position());
            let prev_dist = (t1.position() - t1.delta()).distance(t2.position() - t2.delta());
            if curr_dist > 0.0 && prev_dist > 0.0 {
                controls.pinch(prev_dist / curr_dist.max(1.0));
            }
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NativeHost;
    use medscene_core::{SceneConfig, SceneRuntime};

    fn test_app(config: SceneConfig) -> App {
        let runtime = SceneRuntime::initialize(&NativeHost::default(), config)
            .expect("native host always initializes");
        let mut app = App::new();
        app.add_message::<MouseMotion>()
            .add_message::<MouseWheel>()
            .insert_resource(ActiveScene(runtime))
            .add_systems(Update, orbit_input);
        app
    }

    fn wheel(y: f32) -> MouseWheel {
        MouseWheel {
            unit: bevy::input::mouse::MouseScrollUnit::Line,
            x: 0.0,
            y,
            window: Entity::PLACEHOLDER,
        }
    }

    #[test]
    fn test_wheel_up_zooms_in() {
        let mut config = SceneConfig::default();
        config.controls.enable_damping = false;
        config.controls.auto_rotate = false;
        let mut app = test_app(config);
        let before = app.world().resource::<ActiveScene>().0.viewport().camera_position;

        app.world_mut().write_message(wheel(1.0));
        app.update();

        let scene = &mut app.world_mut().resource_mut::<ActiveScene>().0;
        let after = scene.controls_mut().update(0.0);
        assert!(after.length() < before.length());
    }

    #[test]
    fn test_motion_without_button_is_ignored() {
        let mut config = SceneConfig::default();
        config.controls.enable_damping = false;
        config.controls.auto_rotate = false;
        let mut app = test_app(config);
        app.insert_resource(ButtonInput::<MouseButton>::default());
        let before = app.world().resource::<ActiveScene>().0.viewport().camera_position;

        app.world_mut().write_message(MouseMotion {
            delta: Vec2::new(120.0, 0.0),
        });
        app.update();

        let scene = &mut app.world_mut().resource_mut::<ActiveScene>().0;
        let after = scene.controls_mut().update(0.0);
        assert!(after.distance(before) < 1e-4);
    }
}
