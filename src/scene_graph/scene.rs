use glam::Mat4;
use id_arena::Arena;
use slotmap::SlotMap;

use crate::error::SceneError;
use crate::geometry::{Geometry, GeometryId};
use crate::motion::channels::ChannelSource;
use crate::motion::engine::{self, FrameTime};
use crate::motion::MotionRule;
use crate::scene_graph::node::{Node, NodeId};

/// Animation duration the demos were tuned against.
pub const DEFAULT_ANIMATION_DURATION_MS: f64 = 10_000.0;

/// Owns the node tree and the geometry it references.
///
/// Nodes live in a slot map so detaching a subtree frees it for good; stale
/// ids simply stop resolving. Geometry is append-only and shared.
pub struct Scene {
    nodes: SlotMap<NodeId, Node>,
    geometries: Arena<Geometry>,
    root: NodeId,
    tick: u64,
    elapsed_ms: f64,
    animation_duration_ms: f64,
}

/// One drawable node in traversal order.
#[derive(Debug, Clone, Copy)]
pub struct Drawable {
    pub node: NodeId,
    pub geometry: GeometryId,
    pub world_matrix: Mat4,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(DEFAULT_ANIMATION_DURATION_MS)
    }
}

impl Scene {
    pub fn new(animation_duration_ms: f64) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::new("root"));

        Self {
            nodes,
            geometries: Arena::new(),
            root,
            tick: 0,
            elapsed_ms: 0.0,
            animation_duration_ms,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn animation_duration_ms(&self) -> f64 {
        self.animation_duration_ms
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn add_geometry(&mut self, geometry: Geometry) -> GeometryId {
        self.geometries.alloc(geometry)
    }

    pub fn geometry(&self, id: GeometryId) -> Option<&Geometry> {
        self.geometries.get(id)
    }

    pub fn geometry_count(&self) -> usize {
        self.geometries.len()
    }

    /// Adds a node that is not yet part of the tree. It is neither animated
    /// nor drawn until attached.
    pub fn create_node(&mut self, node: Node) -> NodeId {
        let mut node = node;
        node.parent = None;
        node.children.clear();
        self.nodes.insert(node)
    }

    /// Creates a node and attaches it under `parent` in one step.
    pub fn spawn(&mut self, parent: NodeId, node: Node) -> Result<NodeId, SceneError> {
        if !self.nodes.contains_key(parent) {
            return Err(SceneError::NodeNotFound(parent));
        }

        let id = self.create_node(node);
        self.attach(parent, id)?;
        Ok(id)
    }

    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn get_node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn node_by_name(&self, name: &str) -> Option<NodeId> {
        self.traverse()
            .into_iter()
            .find(|id| self.nodes[*id].name == name)
    }

    /// True when `ancestor` is on the parent chain of `node`.
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.nodes.get(node).and_then(|node| node.parent);

        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes.get(id).and_then(|node| node.parent);
        }

        false
    }

    /// Appends `child` to `parent`'s children. Nothing changes on failure.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        for id in [parent, child] {
            if !self.nodes.contains_key(id) {
                return Err(SceneError::NodeNotFound(id));
            }
        }

        if parent == child || self.is_ancestor(child, parent) {
            return Err(SceneError::CycleDetected { parent, child });
        }

        // The root belongs to the scene itself.
        if child == self.root || self.nodes[child].parent.is_some() {
            return Err(SceneError::AlreadyAttached(child));
        }

        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);

        Ok(())
    }

    /// Removes `node` from its parent and destroys it together with its
    /// subtree. Returns how many nodes were destroyed.
    pub fn detach(&mut self, node: NodeId) -> Result<usize, SceneError> {
        if node == self.root {
            return Err(SceneError::DetachRoot);
        }

        let parent = self
            .nodes
            .get(node)
            .ok_or(SceneError::NodeNotFound(node))?
            .parent;

        if let Some(parent) = parent.and_then(|parent| self.nodes.get_mut(parent)) {
            parent.children.retain(|&id| id != node);
        }

        let mut removed = 0;
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.nodes.remove(id) {
                stack.extend(node.children);
                removed += 1;
            }
        }

        log::debug!("Detached {:?}, destroyed {} nodes", node, removed);

        Ok(removed)
    }

    /// Validates `rule` and binds it to `node`. Rules run in the order they
    /// were bound.
    pub fn bind_rule(
        &mut self,
        node: NodeId,
        rule: MotionRule,
        channels: &impl ChannelSource,
    ) -> crate::error::Result<()> {
        if !self.nodes.contains_key(node) {
            return Err(SceneError::NodeNotFound(node).into());
        }

        let bound = rule.bind(channels)?;
        self.nodes[node].rules.push(bound);

        Ok(())
    }

    /// Depth-first pre-order walk of the attached tree, children in
    /// insertion order.
    pub fn traverse(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];

        while let Some(id) = stack.pop() {
            if let Some(node) = self.nodes.get(id) {
                order.push(id);
                stack.extend(node.children.iter().rev().copied());
            }
        }

        order
    }

    /// Runs every bound rule of the attached tree for one tick.
    pub fn advance(&mut self, delta_ms: f64, channels: &impl ChannelSource) {
        self.tick += 1;
        self.elapsed_ms += delta_ms;

        let frame = FrameTime {
            delta_ms,
            elapsed_ms: self.elapsed_ms,
            duration_ms: self.animation_duration_ms,
        };

        for id in self.traverse() {
            let node = &mut self.nodes[id];
            if !node.rules.is_empty() {
                engine::apply_rules(&mut node.rules, &mut node.transform, &frame, channels);
            }
        }
    }

    /// Recomputes `world = parent_world * local` for every attached node.
    pub fn resolve_world_transforms(&mut self) {
        let mut stack = vec![(self.root, Mat4::IDENTITY)];

        while let Some((id, parent_world)) = stack.pop() {
            let Some(node) = self.nodes.get_mut(id) else {
                continue;
            };

            let world = parent_world * node.transform.local_matrix();
            node.world_matrix = world;
            stack.extend(node.children.iter().rev().map(|&child| (child, world)));
        }
    }

    /// Nodes carrying geometry, in traversal order, with their last resolved
    /// world matrix.
    pub fn drawables(&self) -> Vec<Drawable> {
        self.traverse()
            .into_iter()
            .filter_map(|id| {
                let node = &self.nodes[id];
                node.geometry.map(|geometry| Drawable {
                    node: id,
                    geometry,
                    world_matrix: node.world_matrix,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::geometry::{build, GeometryKind, GeometryParams};
    use crate::motion::channels::InputChannels;
    use glam::{Quat, Vec3};

    #[test]
    fn test_attach_then_detach_restores_children() {
        let mut scene = Scene::default();
        let root = scene.root();
        let first = scene.spawn(root, Node::new("first")).unwrap();
        let second = scene.spawn(root, Node::new("second")).unwrap();
        let before = scene.get_node(root).unwrap().children().to_vec();

        let extra = scene.create_node(Node::new("extra"));
        scene.attach(root, extra).unwrap();
        assert_eq!(scene.get_node(root).unwrap().children().len(), 3);

        scene.detach(extra).unwrap();
        assert_eq!(scene.get_node(root).unwrap().children(), &before[..]);
        assert_eq!(before, vec![first, second]);
        assert!(scene.get_node(extra).is_none());
    }

    #[test]
    fn test_reverse_attach_is_a_cycle() {
        let mut scene = Scene::default();
        let a = scene.spawn(scene.root(), Node::new("a")).unwrap();
        let b = scene.create_node(Node::new("b"));
        scene.attach(a, b).unwrap();

        let err = scene.attach(b, a).unwrap_err();
        assert_eq!(err, SceneError::CycleDetected { parent: b, child: a });

        assert_eq!(scene.get_node(a).unwrap().children(), &[b]);
        assert_eq!(scene.get_node(b).unwrap().children(), &[] as &[NodeId]);
        assert_eq!(scene.get_node(b).unwrap().parent(), Some(a));
        assert_eq!(scene.get_node(a).unwrap().parent(), Some(scene.root()));
    }

    #[test]
    fn test_self_attach_is_a_cycle() {
        let mut scene = Scene::default();
        let a = scene.create_node(Node::new("a"));
        assert!(matches!(
            scene.attach(a, a),
            Err(SceneError::CycleDetected { .. })
        ));
    }

    #[test]
    fn test_second_parent_is_rejected() {
        let mut scene = Scene::default();
        let root = scene.root();
        let a = scene.spawn(root, Node::new("a")).unwrap();
        let b = scene.spawn(root, Node::new("b")).unwrap();

        assert_eq!(scene.attach(b, a), Err(SceneError::AlreadyAttached(a)));
        assert_eq!(scene.attach(a, root), Err(SceneError::CycleDetected { parent: a, child: root }));

        let orphan = scene.create_node(Node::new("orphan"));
        assert_eq!(scene.attach(orphan, root), Err(SceneError::AlreadyAttached(root)));
        assert_eq!(scene.get_node(b).unwrap().children().len(), 0);
    }

    #[test]
    fn test_detach_destroys_subtree() {
        let mut scene = Scene::default();
        let arm = scene.spawn(scene.root(), Node::new("arm")).unwrap();
        let elbow = scene.spawn(arm, Node::new("elbow")).unwrap();
        let hand = scene.spawn(elbow, Node::new("hand")).unwrap();
        assert_eq!(scene.node_count(), 4);

        assert_eq!(scene.detach(elbow).unwrap(), 2);
        assert!(scene.get_node(hand).is_none());
        assert!(scene.get_node(arm).unwrap().children().is_empty());
        assert_eq!(scene.node_count(), 2);

        assert_eq!(scene.detach(elbow), Err(SceneError::NodeNotFound(elbow)));
        assert_eq!(scene.detach(scene.root()), Err(SceneError::DetachRoot));
    }

    #[test]
    fn test_traversal_is_depth_first_in_insertion_order() {
        let mut scene = Scene::default();
        let root = scene.root();
        let a = scene.spawn(root, Node::new("a")).unwrap();
        let a1 = scene.spawn(a, Node::new("a1")).unwrap();
        let b = scene.spawn(root, Node::new("b")).unwrap();
        let a2 = scene.spawn(a, Node::new("a2")).unwrap();
        let orphan = scene.create_node(Node::new("orphan"));

        assert_eq!(scene.traverse(), vec![root, a, a1, a2, b]);
        assert!(!scene.traverse().contains(&orphan));
        assert_eq!(scene.node_by_name("a2"), Some(a2));
        assert_eq!(scene.node_by_name("orphan"), None);
    }

    #[test]
    fn test_world_transforms_compose_with_parents() {
        let mut scene = Scene::default();
        let shoulder = scene
            .spawn(scene.root(), Node::new("shoulder").at(Vec3::new(0.0, 0.0, -8.0)))
            .unwrap();
        let elbow = scene
            .spawn(shoulder, Node::new("elbow").at(Vec3::new(0.0, -2.5, 0.0)))
            .unwrap();

        scene
            .get_node_mut(shoulder)
            .unwrap()
            .transform
            .set_rotation(Quat::from_rotation_z(std::f32::consts::FRAC_PI_2));
        scene.resolve_world_transforms();

        let position = scene.get_node(elbow).unwrap().world_position();
        assert!(position.abs_diff_eq(Vec3::new(2.5, 0.0, -8.0), 1e-5));
    }

    #[test]
    fn test_drawables_follow_traversal() {
        let mut scene = Scene::default();
        let geometry = scene.add_geometry(
            build(GeometryKind::Octahedron, &GeometryParams::default()).unwrap(),
        );
        let group = scene.spawn(scene.root(), Node::new("group")).unwrap();
        let first = scene
            .spawn(group, Node::new("first").with_geometry(geometry))
            .unwrap();
        let second = scene
            .spawn(scene.root(), Node::new("second").with_geometry(geometry))
            .unwrap();
        scene.resolve_world_transforms();

        let drawables = scene.drawables();
        let nodes: Vec<NodeId> = drawables.iter().map(|drawable| drawable.node).collect();
        assert_eq!(nodes, vec![first, second]);
        assert!(drawables.iter().all(|drawable| drawable.geometry == geometry));
    }

    #[test]
    fn test_advance_accumulates_time_and_skips_orphans() {
        let channels = InputChannels::new();
        let mut scene = Scene::default();
        let planet = scene.spawn(scene.root(), Node::new("planet")).unwrap();
        let orphan = scene.create_node(Node::new("orphan"));
        scene
            .bind_rule(planet, MotionRule::orbit(40.0, 1.0), &channels)
            .unwrap();
        scene
            .bind_rule(orphan, MotionRule::orbit(40.0, 1.0), &channels)
            .unwrap();

        scene.advance(0.0, &channels);
        scene.advance(2500.0, &channels);
        assert_eq!(scene.tick(), 2);
        assert_eq!(scene.elapsed_ms(), 2500.0);

        let planet = scene.get_node(planet).unwrap().transform.translation();
        assert!(planet.abs_diff_eq(Vec3::new(0.0, 0.0, 40.0), 1e-3));
        assert_eq!(
            scene.get_node(orphan).unwrap().transform.translation(),
            Vec3::ZERO
        );
    }

    #[test]
    fn test_bind_failure_leaves_node_untouched() {
        let channels = InputChannels::new();
        let mut scene = Scene::default();
        let node = scene.spawn(scene.root(), Node::new("node")).unwrap();

        let err = scene
            .bind_rule(node, MotionRule::spin(1.0, Vec3::ZERO), &channels)
            .unwrap_err();
        assert!(matches!(err, EngineError::Motion(_)));
        assert!(scene.get_node(node).unwrap().rules().is_empty());
    }
}
