use glam::Vec3;

use crate::camera::Camera;
use crate::demo::Demo;
use crate::geometry::{build as build_geometry, GeometryKind, GeometryParams};
use crate::scene_graph::node::Node;
use crate::scene_graph::scene::Scene;

const SIERPINSKI_SUBDIVISIONS: u32 = 6;

/// Static flat shapes laid out in a grid in front of the camera.
pub fn build(animation_duration_ms: f64) -> crate::error::Result<Demo> {
    let mut scene = Scene::new(animation_duration_ms);
    let root = scene.root();

    let shapes = [
        (
            GeometryKind::Square,
            GeometryParams::default(),
            Vec3::new(-1.0, 0.7, -3.333),
        ),
        (
            GeometryKind::Triangle,
            GeometryParams::default(),
            Vec3::new(1.0, 0.7, -3.333),
        ),
        (
            GeometryKind::Diamond,
            GeometryParams::default(),
            Vec3::new(-1.0, -0.7, -3.333),
        ),
        (
            GeometryKind::PacMan,
            GeometryParams::pacman(50.0, 0.01),
            Vec3::new(1.0, -0.7, -3.333),
        ),
        (
            GeometryKind::Sierpinski,
            GeometryParams::sierpinski(2.0, SIERPINSKI_SUBDIVISIONS),
            Vec3::new(0.0, 0.0, -6.0),
        ),
    ];

    for (kind, params, position) in shapes {
        let geometry = build_geometry(kind, &params)?;
        let name = geometry.name().to_string();
        let geometry = scene.add_geometry(geometry);
        scene.spawn(root, Node::new(name).at(position).with_geometry(geometry))?;
    }

    let camera = Camera::looking_at(Vec3::ZERO, Vec3::NEG_Z).with_lens(45.0, 1.0, 10_000.0);

    Ok(Demo::new(scene, camera))
}
