//! Resize and shutdown handling

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bevy::prelude::*;
use bevy::window::WindowResized;

use crate::scene::AdvanceScene;
use crate::ActiveScene;

/// Request to stop the scene from inside the app
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct ShutdownScene;

/// Stop flag that can be raised from outside the Bevy app
///
/// The browser entry keeps a clone so page code can end the render loop.
#[derive(Resource, Debug, Clone, Default)]
pub struct ShutdownHandle(Arc<AtomicBool>);

impl ShutdownHandle {
    pub fn request(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

pub struct LifecyclePlugin;

impl Plugin for LifecyclePlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<ShutdownScene>()
            .init_resource::<ShutdownHandle>()
            .add_systems(
                Update,
                (handle_resize.before(AdvanceScene), handle_shutdown.after(AdvanceScene)),
            );
    }
}

/// Forward window size changes to the viewport and hold the window at the
/// capped pixel ratio
pub fn handle_resize(
    mut resized: MessageReader<WindowResized>,
    mut windows: Query<&mut Window>,
    mut scene: ResMut<ActiveScene>,
) {
    // Only the latest size matters
    let Some(event) = resized.read().last() else {
        return;
    };
    let mut window = windows.get_mut(event.window).ok();

    // Event sizes are in logical pixels at the overridden scale factor
    let (device_pixel_ratio, to_css) = match window.as_deref() {
        Some(w) => {
            let base = w.resolution.base_scale_factor();
            (base, w.scale_factor() / base)
        }
        None => (1.0, 1.0),
    };

    let width = (event.width * to_css).max(0.0).round() as u32;
    let height = (event.height * to_css).max(0.0).round() as u32;
    scene.0.resize(width, height, device_pixel_ratio);

    let pixel_ratio = scene.0.viewport().surface.pixel_ratio;
    if let Some(w) = window.as_mut() {
        if w.resolution.scale_factor_override() != Some(pixel_ratio) {
            w.resolution.set_scale_factor_override(Some(pixel_ratio));
        }
    }
    tracing::debug!(width, height, device_pixel_ratio, pixel_ratio, "Viewport resized");
}

fn handle_shutdown(
    mut requests: MessageReader<ShutdownScene>,
    handle: Res<ShutdownHandle>,
    mut scene: ResMut<ActiveScene>,
    mut exit: MessageWriter<AppExit>,
) {
    let requested = requests.read().count() > 0 || handle.is_requested();
    if !requested || !scene.0.is_running() {
        return;
    }

    scene.0.shutdown();
    exit.write(AppExit::Success);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::advance_scene;
    use crate::NativeHost;
    use bevy::time::Real;
    use medscene_core::{SceneConfig, SceneRuntime};

    fn test_app() -> App {
        let runtime = SceneRuntime::initialize(&NativeHost::default(), SceneConfig::default())
            .expect("native host always initializes");
        let mut app = App::new();
        app.add_message::<WindowResized>()
            .add_message::<AppExit>()
            .init_resource::<Time<Real>>()
            .insert_resource(ActiveScene(runtime))
            .add_systems(Update, advance_scene.in_set(AdvanceScene))
            .add_plugins(LifecyclePlugin);
        app
    }

    #[test]
    fn test_resize_updates_aspect() {
        let mut app = test_app();
        app.world_mut().write_message(WindowResized {
            window: Entity::PLACEHOLDER,
            width: 800.0,
            height: 400.0,
        });
        app.update();

        let viewport = app.world().resource::<ActiveScene>().0.viewport();
        assert_eq!(viewport.projection.aspect, 2.0);
        assert_eq!(viewport.surface.width, 800);
    }

    #[test]
    fn test_resize_caps_window_scale_factor() {
        let mut app = test_app();
        let mut window = Window::default();
        window.resolution.set_scale_factor(3.0);
        let entity = app.world_mut().spawn(window).id();

        app.world_mut().write_message(WindowResized {
            window: entity,
            width: 800.0,
            height: 400.0,
        });
        app.update();

        let surface = app.world().resource::<ActiveScene>().0.viewport().surface;
        assert_eq!(surface.pixel_ratio, 2.0);
        assert_eq!(surface.width, 800);
        assert_eq!(surface.physical_width(), 1600);

        let window = app.world().get::<Window>(entity).unwrap();
        assert_eq!(window.resolution.scale_factor_override(), Some(2.0));
        assert_eq!(window.scale_factor(), 2.0);
    }

    #[test]
    fn test_resize_below_cap_keeps_device_ratio() {
        let mut app = test_app();
        let mut window = Window::default();
        window.resolution.set_scale_factor(1.5);
        let entity = app.world_mut().spawn(window).id();

        app.world_mut().write_message(WindowResized {
            window: entity,
            width: 640.0,
            height: 480.0,
        });
        app.update();

        let window = app.world().get::<Window>(entity).unwrap();
        assert_eq!(window.scale_factor(), 1.5);
        let surface = app.world().resource::<ActiveScene>().0.viewport().surface;
        assert_eq!(surface.pixel_ratio, 1.5);
        assert_eq!(surface.height, 480);
    }

    #[test]
    fn test_handle_stops_runtime() {
        let mut app = test_app();
        let handle = app.world().resource::<ShutdownHandle>().clone();

        app.update();
        handle.request();
        app.update();
        app.update();

        let scene = &app.world().resource::<ActiveScene>().0;
        assert!(!scene.is_running());
        // The frame in which shutdown landed still rendered
        assert_eq!(scene.frames_rendered(), 2);
    }

    #[test]
    fn test_message_stops_runtime() {
        let mut app = test_app();
        app.world_mut().write_message(ShutdownScene);
        app.update();

        assert!(!app.world().resource::<ActiveScene>().0.is_running());
        assert!(!app.world().resource::<ShutdownHandle>().is_requested());
    }
}
