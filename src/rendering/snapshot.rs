use glam::Mat4;

use crate::geometry::{Geometry, GeometryId};
use crate::rendering::context::RenderContext;
use crate::scene_graph::node::NodeId;
use crate::scene_graph::scene::Scene;

#[derive(Debug, Clone, Copy)]
pub struct DrawItem<'a> {
    pub node: NodeId,
    pub geometry_id: GeometryId,
    pub geometry: &'a Geometry,
    pub world: Mat4,
}

/// Everything a surface needs to draw one frame, borrowed from the scene.
#[derive(Debug, Clone)]
pub struct SceneSnapshot<'a> {
    /// Draw items in traversal order.
    pub items: Vec<DrawItem<'a>>,
    pub view: Mat4,
    pub projection: Mat4,
    pub tick: u64,
    pub elapsed_ms: f64,
}

impl<'a> SceneSnapshot<'a> {
    /// Captures the drawables of `scene`. World transforms must already be
    /// resolved for this tick.
    pub fn capture(scene: &'a Scene, context: &RenderContext) -> Self {
        let items = scene
            .drawables()
            .into_iter()
            .filter_map(|drawable| {
                let geometry = scene.geometry(drawable.geometry)?;
                Some(DrawItem {
                    node: drawable.node,
                    geometry_id: drawable.geometry,
                    geometry,
                    world: drawable.world_matrix,
                })
            })
            .collect();

        Self {
            items,
            view: context.view(),
            projection: context.projection(),
            tick: scene.tick(),
            elapsed_ms: scene.elapsed_ms(),
        }
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }
}
