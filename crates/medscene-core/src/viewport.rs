//! Camera projection, render surface sizing and orbit controls

use std::f32::consts::{PI, TAU};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::config::{CameraConfig, ControlsConfig, SceneConfig};

/// Keeps the orbit polar angle off the poles
const POLAR_EPSILON: f32 = 1e-6;

/// Zoom step per wheel notch at `zoom_speed` 1.0
const ZOOM_STEP: f32 = 0.95;

/// Container size in CSS pixels plus the pixel ratio applied to the surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
    pub pixel_ratio: f32,
}

impl SurfaceSize {
    pub fn physical_width(&self) -> u32 {
        (self.width as f32 * self.pixel_ratio).round() as u32
    }

    pub fn physical_height(&self) -> u32 {
        (self.height as f32 * self.pixel_ratio).round() as u32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    /// Vertical field of view in radians
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

/// Camera pose, projection and surface size for one container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    pub projection: Projection,
    pub surface: SurfaceSize,
    pub max_pixel_ratio: f32,
    pub camera_position: Vec3,
    pub camera_target: Vec3,
}

impl ViewportState {
    pub fn new(config: &SceneConfig, width: u32, height: u32, device_pixel_ratio: f32) -> Self {
        let camera: &CameraConfig = &config.camera;
        let max_pixel_ratio = config.renderer.max_pixel_ratio;

        Self {
            projection: Projection {
                fov_y: camera.fov_degrees.to_radians(),
                aspect: aspect_ratio(width, height),
                near: camera.near,
                far: camera.far,
            },
            surface: SurfaceSize {
                width,
                height,
                pixel_ratio: device_pixel_ratio.min(max_pixel_ratio),
            },
            max_pixel_ratio,
            camera_position: Vec3::from_array(camera.position),
            camera_target: Vec3::ZERO,
        }
    }

    /// Match a new container size; takes effect immediately
    pub fn resize(&mut self, width: u32, height: u32, device_pixel_ratio: f32) {
        self.projection.aspect = aspect_ratio(width, height);
        self.surface = SurfaceSize {
            width,
            height,
            pixel_ratio: device_pixel_ratio.min(self.max_pixel_ratio),
        };
    }
}

/// Width over height, with a zero height treated as one pixel
fn aspect_ratio(width: u32, height: u32) -> f32 {
    width as f32 / height.max(1) as f32
}

/// Orbit radius and angles; `theta` around +Y from +Z, `phi` down from +Y
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Spherical {
    pub radius: f32,
    pub theta: f32,
    pub phi: f32,
}

impl Spherical {
    pub fn from_offset(offset: Vec3) -> Self {
        let radius = offset.length();
        if radius == 0.0 {
            return Self::default();
        }
        Self {
            radius,
            theta: offset.x.atan2(offset.z),
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    pub fn to_offset(&self) -> Vec3 {
        let sin_phi = self.phi.sin();
        Vec3::new(
            self.radius * sin_phi * self.theta.sin(),
            self.radius * self.phi.cos(),
            self.radius * sin_phi * self.theta.cos(),
        )
    }
}

/// Damped orbit camera around a fixed target
///
/// Drag and wheel input accumulate into pending deltas; each [`update`]
/// applies a `damping_factor` share of them and decays the rest, which
/// gives the camera its glide after the pointer is released.
///
/// [`update`]: OrbitControls::update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrbitControls {
    pub target: Vec3,
    spherical: Spherical,
    pending: Spherical,
    dolly_scale: f32,
    interacting: bool,
    pub settings: ControlsConfig,
}

impl OrbitControls {
    pub fn new(camera_position: Vec3, target: Vec3, settings: ControlsConfig) -> Self {
        let mut spherical = Spherical::from_offset(camera_position - target);
        spherical.radius = spherical
            .radius
            .clamp(settings.min_distance, settings.max_distance);

        Self {
            target,
            spherical,
            pending: Spherical::default(),
            dolly_scale: 1.0,
            interacting: false,
            settings,
        }
    }

    pub fn spherical(&self) -> Spherical {
        self.spherical
    }

    pub fn distance(&self) -> f32 {
        self.spherical.radius
    }

    pub fn camera_position(&self) -> Vec3 {
        self.target + self.spherical.to_offset()
    }

    /// Pause auto-rotation while the user holds the pointer down
    pub fn set_interacting(&mut self, interacting: bool) {
        self.interacting = interacting;
    }

    pub fn rotate_left(&mut self, angle: f32) {
        self.pending.theta -= angle;
    }

    pub fn rotate_up(&mut self, angle: f32) {
        self.pending.phi -= angle;
    }

    /// Pointer drag of `(dx, dy)` pixels on a surface `height` pixels tall
    pub fn drag(&mut self, dx: f32, dy: f32, height: f32) {
        let height = height.max(1.0);
        let speed = self.settings.rotate_speed;
        self.rotate_left(TAU * dx / height * speed);
        self.rotate_up(TAU * dy / height * speed);
    }

    /// Wheel input; negative `delta_y` (scrolling up) zooms in
    pub fn wheel(&mut self, delta_y: f32) {
        if !self.settings.enable_zoom || delta_y == 0.0 {
            return;
        }
        let step = ZOOM_STEP.powf(self.settings.zoom_speed);
        if delta_y < 0.0 {
            self.dolly_scale *= step;
        } else {
            self.dolly_scale /= step;
        }
    }

    /// Pinch zoom; `ratio` is previous finger distance over current
    pub fn pinch(&mut self, ratio: f32) {
        if self.settings.enable_zoom && ratio.is_finite() && ratio > 0.0 {
            self.dolly_scale *= ratio;
        }
    }

    /// Idle rotation for a frame lasting `dt` seconds
    pub fn auto_rotation_angle(&self, dt: f32) -> f32 {
        TAU / 60.0 * self.settings.auto_rotate_speed * dt
    }

    /// Advance one frame and return the new camera position
    pub fn update(&mut self, dt: f32) -> Vec3 {
        if self.settings.auto_rotate && !self.interacting {
            self.rotate_left(self.auto_rotation_angle(dt));
        }

        let applied = if self.settings.enable_damping {
            self.settings.damping_factor
        } else {
            1.0
        };

        self.spherical.theta += self.pending.theta * applied;
        self.spherical.phi += self.pending.phi * applied;
        self.spherical.phi = self.spherical.phi.clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
        self.spherical.radius = (self.spherical.radius * self.dolly_scale)
            .clamp(self.settings.min_distance, self.settings.max_distance);

        if self.settings.enable_damping {
            self.pending.theta *= 1.0 - applied;
            self.pending.phi *= 1.0 - applied;
        } else {
            self.pending = Spherical::default();
        }
        self.dolly_scale = 1.0;

        self.camera_position()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn still_controls() -> OrbitControls {
        let settings = ControlsConfig {
            auto_rotate: false,
            ..Default::default()
        };
        OrbitControls::new(Vec3::new(0.0, 2.0, 8.0), Vec3::ZERO, settings)
    }

    #[test]
    fn test_initial_viewport() {
        let viewport = ViewportState::new(&SceneConfig::default(), 800, 600, 3.0);

        assert!((viewport.projection.fov_y - 45f32.to_radians()).abs() < 1e-6);
        assert!((viewport.projection.aspect - 800.0 / 600.0).abs() < 1e-6);
        assert_eq!(viewport.projection.near, 0.1);
        assert_eq!(viewport.projection.far, 1000.0);
        assert_eq!(viewport.surface.pixel_ratio, 2.0);
        assert_eq!(viewport.surface.physical_width(), 1600);
        assert_eq!(viewport.camera_position, Vec3::new(0.0, 2.0, 8.0));
    }

    #[test]
    fn test_resize_updates_aspect_and_surface() {
        let mut viewport = ViewportState::new(&SceneConfig::default(), 800, 600, 1.0);
        viewport.resize(1024, 256, 1.5);

        assert!((viewport.projection.aspect - 4.0).abs() < 1e-6);
        assert_eq!(viewport.surface.width, 1024);
        assert_eq!(viewport.surface.height, 256);
        assert_eq!(viewport.surface.physical_width(), 1536);
        assert_eq!(viewport.surface.physical_height(), 384);
    }

    #[test]
    fn test_zero_height_stays_finite() {
        let viewport = ViewportState::new(&SceneConfig::default(), 640, 0, 1.0);
        assert!(viewport.projection.aspect.is_finite());
    }

    #[test]
    fn test_spherical_round_trip() {
        let offset = Vec3::new(0.0, 2.0, 8.0);
        let back = Spherical::from_offset(offset).to_offset();
        assert!(back.distance(offset) < 1e-5);
    }

    #[test]
    fn test_zoom_clamped_to_range() {
        let mut controls = still_controls();
        assert!((controls.distance() - 68f32.sqrt()).abs() < 1e-5);

        for _ in 0..200 {
            controls.wheel(-1.0);
            controls.update(1.0 / 60.0);
        }
        assert_eq!(controls.distance(), 5.0);

        for _ in 0..200 {
            controls.wheel(1.0);
            controls.update(1.0 / 60.0);
        }
        assert_eq!(controls.distance(), 20.0);
    }

    #[test]
    fn test_damping_glides_toward_target() {
        let mut controls = still_controls();
        let start = controls.spherical().theta;

        controls.rotate_left(1.0);
        controls.update(1.0 / 60.0);
        let after_one = controls.spherical().theta;
        assert!((after_one - (start - 0.05)).abs() < 1e-5);

        for _ in 0..500 {
            controls.update(1.0 / 60.0);
        }
        assert!((controls.spherical().theta - (start - 1.0)).abs() < 1e-3);
    }

    #[test]
    fn test_auto_rotate_without_damping() {
        let settings = ControlsConfig {
            enable_damping: false,
            ..Default::default()
        };
        let mut controls = OrbitControls::new(Vec3::new(0.0, 2.0, 8.0), Vec3::ZERO, settings);
        let start = controls.spherical().theta;

        controls.update(1.0);
        let expected = start - TAU / 60.0 * 0.5;
        assert!((controls.spherical().theta - expected).abs() < 1e-5);

        // Held pointer pauses idle rotation
        controls.set_interacting(true);
        let held = controls.spherical().theta;
        controls.update(1.0);
        assert_eq!(controls.spherical().theta, held);
    }

    #[test]
    fn test_polar_angle_clamped() {
        let mut controls = still_controls();
        controls.settings.enable_damping = false;
        controls.rotate_up(10.0);
        controls.update(0.0);

        let phi = controls.spherical().phi;
        assert!(phi > 0.0 && phi < PI);
    }
}
