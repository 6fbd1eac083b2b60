//! Error types for scene assembly and rendering.

use thiserror::Error;

/// Errors raised while assembling a scene.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("acceleration structure already built")]
    AlreadyBuilt,
}

/// Errors that abort a render.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("scene has no acceleration structure; call build_acceleration_structure first")]
    SceneNotBuilt,

    #[error("invalid camera: {0}")]
    InvalidCamera(String),

    #[error("failed to spawn render thread: {0}")]
    ThreadSpawn(#[from] std::io::Error),

    #[error("a render task was lost before returning its tile")]
    WorkerLost,
}

pub type RenderResult<T> = Result<T, RenderError>;
