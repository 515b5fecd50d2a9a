//! A hierarchical scene-graph animation engine.
//!
//! Scenes are trees of [`Node`](scene_graph::node::Node)s holding shared
//! [`Geometry`](geometry::Geometry). Every frame the
//! [`FrameScheduler`](scheduler::FrameScheduler) advances each node's
//! [`MotionRule`](motion::MotionRule)s, resolves world transforms and hands a
//! [`SceneSnapshot`](rendering::SceneSnapshot) to a
//! [`RenderSurface`](rendering::RenderSurface).

pub mod assets;
pub mod camera;
pub mod config;
pub mod demo;
pub mod error;
pub mod field;
pub mod geometry;
pub mod math;
pub mod motion;
pub mod rendering;
pub mod scene_graph;
pub mod scheduler;

pub use error::{EngineError, Result};
