//! Medscene Core - Scene graph, procedural geometry and frame logic
//!
//! This crate holds everything about the decorative medical scene that does
//! not depend on a renderer:
//! - Scene graph arena with geometry and material descriptors
//! - Curve interpolation and tube sweeping
//! - Procedural builders for the ECG monitor, heart and DNA helix
//! - Per-frame animation driver and orbit camera controls
//! - Runtime lifecycle (initialize, frame, resize, shutdown)
//! - Pure state for the page components around the scene

pub mod animation;
pub mod builder;
pub mod config;
pub mod curve;
pub mod error;
pub mod graph;
pub mod helix;
pub mod mesh;
pub mod page;
pub mod runtime;
pub mod tube;
pub mod viewport;
pub mod waveform;

pub use animation::{AnimationDriver, AnimationTag};
pub use config::{load_config, save_default_config, SceneConfig};
pub use curve::Curve;
pub use error::SceneError;
pub use graph::{Geometry, Material, NodeId, NodeKind, SceneGraph, SceneNode, Transform};
pub use mesh::MeshData;
pub use runtime::{FrameView, RenderHost, RuntimeState, SceneRuntime};
pub use viewport::{OrbitControls, SurfaceSize, ViewportState};
