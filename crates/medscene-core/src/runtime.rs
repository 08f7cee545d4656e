//! Scene lifecycle: initialization, per-frame ticks, resize and shutdown
//!
//! The runtime owns the scene graph, the viewport and the orbit controls.
//! Hosts (the Bevy layer, the CLI simulator, tests) call [`SceneRuntime::frame`]
//! once per display refresh and draw the returned [`FrameView`].

use tracing::{error, info, warn};

use crate::animation::AnimationDriver;
use crate::builder::build_medical_equipment;
use crate::config::SceneConfig;
use crate::error::SceneError;
use crate::graph::{NodeId, SceneGraph};
use crate::viewport::{OrbitControls, ViewportState};

/// Environment the scene is mounted into
pub trait RenderHost {
    /// Size in CSS pixels of the container with element id `id`
    fn container_size(&self, id: &str) -> Option<(u32, u32)>;

    /// Whether a 3D rendering backend can be created
    fn supports_rendering(&self) -> bool;

    fn device_pixel_ratio(&self) -> f32 {
        1.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeState {
    Running,
    Stopped,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub graph: &'a SceneGraph,
    pub viewport: &'a ViewportState,
    pub frame: u64,
}

#[derive(Debug)]
pub struct SceneRuntime {
    config: SceneConfig,
    graph: SceneGraph,
    equipment: NodeId,
    viewport: ViewportState,
    controls: OrbitControls,
    state: RuntimeState,
    frames: u64,
}

impl SceneRuntime {
    /// Mount the scene, or log why not and return `None`
    ///
    /// A missing container or backend is reported as a warning; any other
    /// setup failure as an error. Neither reaches the caller.
    pub fn initialize(host: &dyn RenderHost, config: SceneConfig) -> Option<Self> {
        match Self::try_initialize(host, config) {
            Ok(runtime) => Some(runtime),
            Err(e @ (SceneError::MissingContainer(_) | SceneError::RenderingUnavailable)) => {
                warn!(error = %e, "3D scene disabled");
                None
            }
            Err(e) => {
                error!(error = %e, "Error initializing 3D scene");
                None
            }
        }
    }

    /// Fallible form of [`initialize`](Self::initialize)
    ///
    /// Host checks run before anything is built, so a failure leaves no
    /// partial scene behind.
    pub fn try_initialize(host: &dyn RenderHost, config: SceneConfig) -> Result<Self, SceneError> {
        config.validate()?;

        let (width, height) = host
            .container_size(&config.container.id)
            .ok_or_else(|| SceneError::MissingContainer(config.container.id.clone()))?;
        if !host.supports_rendering() {
            return Err(SceneError::RenderingUnavailable);
        }

        let viewport = ViewportState::new(&config, width, height, host.device_pixel_ratio());
        let controls = OrbitControls::new(
            viewport.camera_position,
            viewport.camera_target,
            config.controls.clone(),
        );

        let mut graph = SceneGraph::new();
        let equipment = build_medical_equipment(&mut graph)?;

        info!(
            container = %config.container.id,
            width,
            height,
            nodes = graph.len(),
            "3D scene initialized"
        );

        Ok(Self {
            config,
            graph,
            equipment,
            viewport,
            controls,
            state: RuntimeState::Running,
            frames: 0,
        })
    }

    /// Run one tick: animate, step the camera, hand back the frame
    ///
    /// `elapsed` is seconds since the runtime started and `dt` the duration
    /// of the previous frame. Returns `None` once shut down.
    pub fn frame(&mut self, elapsed: f32, dt: f32) -> Option<FrameView<'_>> {
        if self.state == RuntimeState::Stopped {
            return None;
        }

        AnimationDriver::tick(&mut self.graph, elapsed);
        self.viewport.camera_position = self.controls.update(dt);
        self.viewport.camera_target = self.controls.target;
        self.frames += 1;

        Some(FrameView {
            graph: &self.graph,
            viewport: &self.viewport,
            frame: self.frames,
        })
    }

    /// Apply a container resize right away; the loop keeps running
    pub fn resize(&mut self, width: u32, height: u32, device_pixel_ratio: f32) {
        self.viewport.resize(width, height, device_pixel_ratio);
    }

    /// Stop rendering. Later frames are no-ops.
    pub fn shutdown(&mut self) {
        if self.state == RuntimeState::Running {
            self.state = RuntimeState::Stopped;
            info!(frames = self.frames, "3D scene shut down");
        }
    }

    pub fn state(&self) -> RuntimeState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RuntimeState::Running
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    /// The group holding the monitor, heart and helix
    pub fn equipment(&self) -> NodeId {
        self.equipment
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    pub fn controls_mut(&mut self) -> &mut OrbitControls {
        &mut self.controls
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{DNA_HELIX, ECG_MONITOR, HEART, HEART_BODY};
    use glam::Vec3;

    struct FakeHost {
        container: Option<(u32, u32)>,
        rendering: bool,
        pixel_ratio: f32,
    }

    impl RenderHost for FakeHost {
        fn container_size(&self, id: &str) -> Option<(u32, u32)> {
            assert_eq!(id, "medicalCanvas");
            self.container
        }

        fn supports_rendering(&self) -> bool {
            self.rendering
        }

        fn device_pixel_ratio(&self) -> f32 {
            self.pixel_ratio
        }
    }

    fn host() -> FakeHost {
        FakeHost {
            container: Some((800, 600)),
            rendering: true,
            pixel_ratio: 1.0,
        }
    }

    #[test]
    fn test_missing_container_disables_scene() {
        let host = FakeHost {
            container: None,
            ..host()
        };

        assert!(SceneRuntime::initialize(&host, SceneConfig::default()).is_none());
        let err = SceneRuntime::try_initialize(&host, SceneConfig::default()).unwrap_err();
        assert!(matches!(err, SceneError::MissingContainer(id) if id == "medicalCanvas"));
    }

    #[test]
    fn test_missing_backend_disables_scene() {
        let host = FakeHost {
            rendering: false,
            ..host()
        };

        assert!(SceneRuntime::initialize(&host, SceneConfig::default()).is_none());
        let err = SceneRuntime::try_initialize(&host, SceneConfig::default()).unwrap_err();
        assert!(matches!(err, SceneError::RenderingUnavailable));
    }

    #[test]
    fn test_invalid_config_is_suppressed() {
        let mut config = SceneConfig::default();
        config.controls.damping_factor = 0.0;
        assert!(SceneRuntime::initialize(&host(), config).is_none());
    }

    #[test]
    fn test_end_to_end_first_frame() {
        let mut runtime = SceneRuntime::initialize(&host(), SceneConfig::default()).unwrap();

        let graph = runtime.graph();
        assert_eq!(graph.children(SceneGraph::ROOT), &[runtime.equipment()]);
        let groups: Vec<_> = graph
            .children(runtime.equipment())
            .iter()
            .map(|id| graph.node(*id).unwrap().name.clone())
            .collect();
        assert_eq!(groups, vec![ECG_MONITOR, HEART, DNA_HELIX]);

        let view = runtime.frame(0.0, 1.0 / 60.0).unwrap();
        assert_eq!(view.frame, 1);
        let body = view.graph.node(view.graph.find(HEART_BODY).unwrap()).unwrap();
        assert_eq!(body.transform.scale, Vec3::ONE);
    }

    #[test]
    fn test_resize_keeps_running() {
        let mut runtime = SceneRuntime::initialize(&host(), SceneConfig::default()).unwrap();
        runtime.frame(0.0, 0.016);

        runtime.resize(1280, 320, 3.0);
        let viewport = runtime.viewport();
        assert!((viewport.projection.aspect - 4.0).abs() < 1e-6);
        assert_eq!(viewport.surface.width, 1280);
        assert_eq!(viewport.surface.height, 320);
        assert_eq!(viewport.surface.pixel_ratio, 2.0);

        assert!(runtime.is_running());
        let view = runtime.frame(0.016, 0.016).unwrap();
        assert_eq!(view.frame, 2);
    }

    #[test]
    fn test_shutdown_stops_frames() {
        let mut runtime = SceneRuntime::initialize(&host(), SceneConfig::default()).unwrap();
        runtime.frame(0.0, 0.016);
        runtime.shutdown();

        assert_eq!(runtime.state(), RuntimeState::Stopped);
        assert!(runtime.frame(1.0, 0.016).is_none());
        assert_eq!(runtime.frames_rendered(), 1);

        // Idempotent
        runtime.shutdown();
        assert!(!runtime.is_running());
    }

    #[test]
    fn test_camera_orbits_while_running() {
        let mut runtime = SceneRuntime::initialize(&host(), SceneConfig::default()).unwrap();
        let start = runtime.viewport().camera_position;

        for i in 0..120 {
            runtime.frame(i as f32 / 60.0, 1.0 / 60.0);
        }

        let moved = runtime.viewport().camera_position;
        assert!(moved.distance(start) > 1e-3);
        let distance = moved.length();
        assert!((5.0..=20.0).contains(&distance));
    }
}
