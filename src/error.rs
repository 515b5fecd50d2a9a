use thiserror::Error;

use crate::scene_graph::node::NodeId;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Invalid geometry parameters: {0}")]
    InvalidGeometryParameters(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("Attaching {child:?} under {parent:?} would create a cycle")]
    CycleDetected { parent: NodeId, child: NodeId },

    #[error("Node {0:?} already has a parent")]
    AlreadyAttached(NodeId),

    #[error("Node {0:?} does not exist")]
    NodeNotFound(NodeId),

    #[error("The root node cannot be detached")]
    DetachRoot,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MotionError {
    #[error("Invalid motion rule: {0}")]
    InvalidMotionRule(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("Render surface is not initialized")]
    RenderSurfaceUnavailable,

    #[error("Cannot render to a {width}x{height} surface")]
    InvalidSurfaceSize { width: u32, height: u32 },

    #[error("Render surface failed: {0}")]
    PresentFailed(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AssetError {
    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    #[error("Failed to parse asset {path}: {reason}")]
    AssetParseError { path: String, reason: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldError {
    #[error("Invalid field parameters: {0}")]
    InvalidFieldParameters(String),
}

/// Any error the engine can surface to its caller.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error(transparent)]
    Motion(#[from] MotionError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error(transparent)]
    Field(#[from] FieldError),
}

pub type Result<T> = std::result::Result<T, EngineError>;
