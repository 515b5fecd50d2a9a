use glam::Mat4;

use crate::error::RenderError;
use crate::geometry::GeometryId;
use crate::rendering::snapshot::SceneSnapshot;
use crate::rendering::RenderSurface;
use crate::scene_graph::node::NodeId;

/// Owned copy of one presented frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedFrame {
    pub tick: u64,
    pub elapsed_ms: f64,
    pub items: Vec<(NodeId, GeometryId, Mat4)>,
    pub view: Mat4,
    pub projection: Mat4,
}

impl RecordedFrame {
    pub fn world_of(&self, node: NodeId) -> Option<Mat4> {
        self.items
            .iter()
            .find(|(id, _, _)| *id == node)
            .map(|(_, _, world)| *world)
    }
}

/// Keeps every frame it is given. Can be told to start failing, which is how
/// the scheduler's failure path is exercised.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    initialized: Option<(u32, u32)>,
    initialize_calls: usize,
    fail_after: Option<usize>,
    frames: Vec<RecordedFrame>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Presents succeed `frames` times, then fail.
    pub fn failing_after(frames: usize) -> Self {
        Self {
            fail_after: Some(frames),
            ..Default::default()
        }
    }

    pub fn frames(&self) -> &[RecordedFrame] {
        &self.frames
    }

    pub fn initialize_calls(&self) -> usize {
        self.initialize_calls
    }

    pub fn size(&self) -> Option<(u32, u32)> {
        self.initialized
    }
}

impl RenderSurface for RecordingSurface {
    fn initialize(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        self.initialize_calls += 1;
        self.initialized = Some((width, height));
        Ok(())
    }

    fn present(&mut self, snapshot: &SceneSnapshot<'_>) -> Result<(), RenderError> {
        if self.initialized.is_none() {
            return Err(RenderError::RenderSurfaceUnavailable);
        }

        if self.fail_after.is_some_and(|limit| self.frames.len() >= limit) {
            return Err(RenderError::PresentFailed(format!(
                "surface lost after {} frames",
                self.frames.len()
            )));
        }

        self.frames.push(RecordedFrame {
            tick: snapshot.tick,
            elapsed_ms: snapshot.elapsed_ms,
            items: snapshot
                .items
                .iter()
                .map(|item| (item.node, item.geometry_id, item.world))
                .collect(),
            view: snapshot.view,
            projection: snapshot.projection,
        });

        Ok(())
    }
}
