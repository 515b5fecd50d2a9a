use glam::{Mat4, Vec3};
use slotmap::new_key_type;

use crate::geometry::GeometryId;
use crate::motion::BoundRule;
use crate::scene_graph::transform::Transform;

new_key_type! {
    pub struct NodeId;
}

/// A transform node. Children are kept in insertion order, which is also the
/// order they are updated and drawn in.
#[derive(Debug)]
pub struct Node {
    pub name: String,
    pub transform: Transform,
    pub geometry: Option<GeometryId>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) rules: Vec<BoundRule>,
    pub(crate) world_matrix: Mat4,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn at(mut self, translation: Vec3) -> Self {
        self.transform.set_translation(translation);
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_geometry(mut self, geometry: GeometryId) -> Self {
        self.geometry = Some(geometry);
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn rules(&self) -> &[BoundRule] {
        &self.rules
    }

    /// World matrix as of the last `resolve_world_transforms`.
    pub fn world_matrix(&self) -> Mat4 {
        self.world_matrix
    }

    pub fn world_position(&self) -> Vec3 {
        self.world_matrix.w_axis.truncate()
    }
}

impl Default for Node {
    fn default() -> Self {
        Self {
            name: String::new(),
            transform: Transform::default(),
            geometry: None,
            parent: None,
            children: Vec::new(),
            rules: Vec::new(),
            world_matrix: Mat4::IDENTITY,
        }
    }
}
