//! The boundary between the engine and whatever draws its output.
//!
//! Each tick the scheduler captures a [`SceneSnapshot`] and hands it to a
//! [`RenderSurface`]. The engine never talks to a graphics API itself.

pub mod config;
pub mod context;
pub mod headless;
pub mod recording;
pub mod snapshot;

use crate::error::RenderError;

pub use context::RenderContext;
pub use snapshot::{DrawItem, SceneSnapshot};

pub trait RenderSurface {
    /// Prepares the surface for frames of `width` x `height`. Called again
    /// whenever the scheduler (re)starts.
    fn initialize(&mut self, width: u32, height: u32) -> Result<(), RenderError>;

    fn present(&mut self, snapshot: &SceneSnapshot<'_>) -> Result<(), RenderError>;
}
