//! Error types shared across the scene core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SceneError {
    #[error("container element not found: #{0}")]
    MissingContainer(String),
    #[error("3D rendering is not available in this environment")]
    RenderingUnavailable,
    #[error("curve needs at least 2 points, got {0}")]
    InvalidCurve(usize),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("config parse error: {0}")]
    Config(#[from] toml::de::Error),
    #[error("config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
