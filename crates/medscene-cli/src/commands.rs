//! Subcommand implementations

use std::path::Path;

use anyhow::{bail, Context, Result};
use medscene_bevy::NativeHost;
use medscene_core::builder::{DNA_HELIX, HEART_BODY};
use medscene_core::{save_default_config, SceneConfig, SceneRuntime};
use serde::Serialize;
use tracing::{debug, info};

/// Build a runtime against a virtual window of the given size
pub fn build_runtime(config: SceneConfig, host: &NativeHost) -> Result<SceneRuntime> {
    SceneRuntime::try_initialize(host, config).context("Failed to initialize scene")
}

/// Scene graph as pretty JSON
pub fn dump(runtime: &SceneRuntime) -> Result<String> {
    runtime
        .graph()
        .to_json()
        .context("Failed to serialize scene graph")
}

/// State of the animated objects after one simulated frame
#[derive(Debug, Clone, Serialize)]
pub struct FrameSample {
    pub frame: u64,
    pub elapsed: f32,
    pub heart_scale: f32,
    pub helix_rotation_y: f32,
    pub camera_position: [f32; 3],
    pub camera_distance: f32,
}

/// Run `frames` ticks at a fixed rate without a window, handing each sample
/// to `emit` as it is taken. Returns the number of frames rendered.
pub fn simulate(
    runtime: &mut SceneRuntime,
    frames: u64,
    fps: f32,
    mut emit: impl FnMut(FrameSample) -> Result<()>,
) -> Result<u64> {
    if !(fps.is_finite() && fps > 0.0) {
        bail!("fps must be positive, got {fps}");
    }
    let graph = runtime.graph();
    let heart = graph.find(HEART_BODY).context("Scene has no heart")?;
    let helix = graph.find(DNA_HELIX).context("Scene has no DNA helix")?;

    let dt = 1.0 / fps;
    let mut rendered = 0u64;

    for i in 0..frames {
        let elapsed = i as f32 * dt;
        let Some(view) = runtime.frame(elapsed, dt) else {
            break;
        };

        let heart_scale = view.graph.node(heart).map(|n| n.transform.scale.x);
        let helix_rotation = view.graph.node(helix).map(|n| n.transform.rotation.y);
        let camera = view.viewport.camera_position;

        let sample = FrameSample {
            frame: view.frame,
            elapsed,
            heart_scale: heart_scale.unwrap_or(1.0),
            helix_rotation_y: helix_rotation.unwrap_or_default(),
            camera_position: camera.to_array(),
            camera_distance: camera.distance(view.viewport.camera_target),
        };
        debug!(
            frame = sample.frame,
            heart_scale = sample.heart_scale,
            distance = sample.camera_distance,
            "Simulated frame"
        );
        emit(sample)?;
        rendered += 1;
    }

    info!(frames = rendered, fps, "Simulation finished");
    Ok(rendered)
}

/// Write the default configuration, refusing to overwrite unless forced
pub fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    save_default_config(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), "Wrote default configuration");
    Ok(())
}
