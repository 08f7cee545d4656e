//! Scene configuration loading and validation

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::error::SceneError;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    #[serde(default)]
    pub container: ContainerConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub controls: ControlsConfig,
    #[serde(default)]
    pub renderer: RendererConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerConfig {
    /// Element id of the host container (without `#`)
    #[serde(default = "default_container_id")]
    pub id: String,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            id: default_container_id(),
        }
    }
}

fn default_container_id() -> String {
    "medicalCanvas".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    #[serde(default = "default_fov")]
    pub fov_degrees: f32,
    #[serde(default = "default_near")]
    pub near: f32,
    #[serde(default = "default_far")]
    pub far: f32,
    /// Initial camera position; the camera looks at the orbit target
    #[serde(default = "default_camera_position")]
    pub position: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: default_fov(),
            near: default_near(),
            far: default_far(),
            position: default_camera_position(),
        }
    }
}

fn default_fov() -> f32 {
    45.0
}

fn default_near() -> f32 {
    0.1
}

fn default_far() -> f32 {
    1000.0
}

fn default_camera_position() -> [f32; 3] {
    [0.0, 2.0, 8.0]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlsConfig {
    #[serde(default = "default_true")]
    pub enable_damping: bool,
    /// Fraction of pending rotation applied per update
    #[serde(default = "default_damping")]
    pub damping_factor: f32,
    #[serde(default = "default_true")]
    pub auto_rotate: bool,
    /// 1.0 is one revolution per minute
    #[serde(default = "default_auto_rotate_speed")]
    pub auto_rotate_speed: f32,
    #[serde(default = "default_true")]
    pub enable_zoom: bool,
    #[serde(default = "default_min_distance")]
    pub min_distance: f32,
    #[serde(default = "default_max_distance")]
    pub max_distance: f32,
    #[serde(default = "default_one")]
    pub rotate_speed: f32,
    #[serde(default = "default_one")]
    pub zoom_speed: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            enable_damping: true,
            damping_factor: default_damping(),
            auto_rotate: true,
            auto_rotate_speed: default_auto_rotate_speed(),
            enable_zoom: true,
            min_distance: default_min_distance(),
            max_distance: default_max_distance(),
            rotate_speed: 1.0,
            zoom_speed: 1.0,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_one() -> f32 {
    1.0
}

fn default_damping() -> f32 {
    0.05
}

fn default_auto_rotate_speed() -> f32 {
    0.5
}

fn default_min_distance() -> f32 {
    5.0
}

fn default_max_distance() -> f32 {
    20.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RendererConfig {
    /// Upper bound on the device pixel ratio used for the surface
    #[serde(default = "default_max_pixel_ratio")]
    pub max_pixel_ratio: f32,
    #[serde(default = "default_true")]
    pub antialias: bool,
    #[serde(default = "default_true")]
    pub shadows: bool,
    /// Let the page show through behind the scene
    #[serde(default = "default_true")]
    pub transparent: bool,
    /// Background color used when `transparent` is false
    #[serde(default = "default_clear_color")]
    pub clear_color: u32,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            max_pixel_ratio: default_max_pixel_ratio(),
            antialias: true,
            shadows: true,
            transparent: true,
            clear_color: default_clear_color(),
        }
    }
}

fn default_max_pixel_ratio() -> f32 {
    2.0
}

fn default_clear_color() -> u32 {
    0xF8FAFC
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log at INFO instead of WARN in the browser console
    #[serde(default)]
    pub verbose: bool,
}

impl SceneConfig {
    /// Parse and validate a TOML document
    pub fn from_toml(content: &str) -> Result<Self, SceneError> {
        let config: SceneConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, SceneError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), SceneError> {
        let camera = &self.camera;
        if !(camera.fov_degrees > 0.0 && camera.fov_degrees < 180.0) {
            return Err(SceneError::InvalidConfig(format!(
                "camera.fov_degrees must be in (0, 180), got {}",
                camera.fov_degrees
            )));
        }
        if camera.near <= 0.0 || camera.far <= camera.near {
            return Err(SceneError::InvalidConfig(format!(
                "camera clip planes must satisfy 0 < near < far, got near={} far={}",
                camera.near, camera.far
            )));
        }

        let controls = &self.controls;
        if controls.min_distance > controls.max_distance {
            return Err(SceneError::InvalidConfig(format!(
                "controls.min_distance ({}) exceeds max_distance ({})",
                controls.min_distance, controls.max_distance
            )));
        }
        if !(controls.damping_factor > 0.0 && controls.damping_factor <= 1.0) {
            return Err(SceneError::InvalidConfig(format!(
                "controls.damping_factor must be in (0, 1], got {}",
                controls.damping_factor
            )));
        }

        if self.renderer.max_pixel_ratio < 1.0 {
            return Err(SceneError::InvalidConfig(format!(
                "renderer.max_pixel_ratio must be at least 1, got {}",
                self.renderer.max_pixel_ratio
            )));
        }

        if self.container.id.is_empty() {
            return Err(SceneError::InvalidConfig("container.id is empty".to_string()));
        }

        Ok(())
    }
}

/// Load configuration from file, falling back to defaults when absent
pub fn load_config(path: &Path) -> Result<SceneConfig, SceneError> {
    if path.exists() {
        let content = std::fs::read_to_string(path)?;
        let config = SceneConfig::from_toml(&content)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    } else {
        info!(
            path = %path.display(),
            "Configuration file not found, using defaults"
        );
        Ok(SceneConfig::default())
    }
}

/// Save default configuration to file
pub fn save_default_config(path: &Path) -> Result<(), SceneError> {
    let content = SceneConfig::default().to_toml()?;
    std::fs::write(path, content)?;
    Ok(())
}
