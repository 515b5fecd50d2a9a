use glam::Vec3;

use crate::camera::Camera;
use crate::demo::Demo;
use crate::geometry::{build as build_geometry, GeometryKind, GeometryParams};
use crate::motion::MotionRule;
use crate::scene_graph::node::Node;
use crate::scene_graph::scene::Scene;

/// Vertical travel of the octahedron per frame, at 60 frames per second.
const BOB_PER_FRAME: f32 = 0.01;
const BOB_AMPLITUDE: f32 = 2.0;

pub fn build(animation_duration_ms: f64) -> crate::error::Result<Demo> {
    let mut scene = Scene::new(animation_duration_ms);
    let channels = crate::motion::channels::InputChannels::new();
    let root = scene.root();

    let figures = [
        (
            "scutoid",
            GeometryKind::Scutoid,
            Vec3::new(-4.0, 0.0, -2.0),
            Vec3::new(1.0, 1.0, 0.2),
        ),
        (
            "dodecahedron",
            GeometryKind::Dodecahedron,
            Vec3::new(0.0, 0.0, -2.0),
            Vec3::new(-0.4, 1.0, 0.1),
        ),
        (
            "octahedron",
            GeometryKind::Octahedron,
            Vec3::new(4.0, 0.0, -2.0),
            Vec3::Y,
        ),
    ];

    for (name, kind, position, axis) in figures {
        let geometry = scene.add_geometry(build_geometry(kind, &GeometryParams::default())?);
        let node = scene.spawn(root, Node::new(name).at(position).with_geometry(geometry))?;
        scene.bind_rule(node, MotionRule::spin(1.0, axis), &channels)?;

        if kind == GeometryKind::Octahedron {
            let units_per_ms = BOB_PER_FRAME * 60.0 / 1000.0;
            let period_ms = 4.0 * BOB_AMPLITUDE / units_per_ms;
            scene.bind_rule(
                node,
                MotionRule::oscillate(Vec3::Y, BOB_AMPLITUDE, period_ms, 1.0),
                &channels,
            )?;
        }
    }

    Ok(Demo {
        channels,
        ..Demo::new(scene, Camera::default())
    })
}
