use std::f32::consts::TAU;

use glam::{Quat, Vec3};
use rand::Rng;

use crate::assets::AssetProvider;
use crate::camera::Camera;
use crate::demo::Demo;
use crate::field::{populate, scatter_annulus, FieldParams};
use crate::geometry::{build as build_geometry, GeometryKind, GeometryParams};
use crate::motion::channels::InputChannels;
use crate::motion::MotionRule;
use crate::scene_graph::node::{Node, NodeId};
use crate::scene_graph::scene::Scene;
use crate::scene_graph::transform::Transform;

pub const ASTEROID_MESH: &str = "models/asteroid/asteroid.obj";

const SUN_RADIUS: f32 = 25.0;
const MOON_RADIUS: f32 = 0.2;
const ORBIT_LINE_POINTS: u32 = 128;
const BELT_INNER: f32 = 85.0;
const BELT_OUTER: f32 = 100.0;

pub struct PlanetSpec {
    pub name: &'static str,
    pub radius: f32,
    pub orbit: f32,
    /// Radians per animation duration.
    pub speed: f32,
    pub moons: u32,
    pub ring: bool,
}

const fn planet(
    name: &'static str,
    radius: f32,
    orbit: f32,
    speed: f32,
    moons: u32,
    ring: bool,
) -> PlanetSpec {
    PlanetSpec {
        name,
        radius,
        orbit,
        speed,
        moons,
        ring,
    }
}

pub static PLANETS: [PlanetSpec; 9] = [
    planet("mercury", 1.0, 40.0, 5.0, 0, false),
    planet("venus", 1.5, 50.0, 3.0, 0, false),
    planet("earth", 2.0, 60.0, 4.0, 1, false),
    planet("mars", 1.8, 70.0, 2.0, 2, false),
    planet("jupiter", 3.0, 115.0, 0.8, 8, false),
    planet("saturn", 2.5, 125.0, 0.5, 6, true),
    planet("uranus", 1.75, 135.0, 0.4, 5, false),
    planet("neptune", 0.8, 145.0, 0.2, 3, false),
    planet("pluto", 0.6, 155.0, 0.1, 0, false),
];

/// Radians per duration to revolutions per duration.
fn revolutions(radians: f32) -> f32 {
    radians / TAU
}

/// A point at `radius + 0.1 ..radius + 0.3` from the center along each axis,
/// each axis on a random side.
fn moon_position(radius: f32, rng: &mut impl Rng) -> Vec3 {
    let mut axis = || {
        let side = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        rng.gen_range(radius + 0.1..radius + 0.3) * side
    };

    Vec3::new(axis(), axis(), axis())
}

fn spawn_planet(
    scene: &mut Scene,
    spec: &PlanetSpec,
    moon_geometry: crate::geometry::GeometryId,
    channels: &InputChannels,
    rng: &mut impl Rng,
) -> crate::error::Result<NodeId> {
    let root = scene.root();

    let group = scene.spawn(root, Node::new(format!("{} system", spec.name)))?;
    scene.bind_rule(
        group,
        MotionRule::orbit(spec.orbit, revolutions(spec.speed)),
        channels,
    )?;

    let sphere = scene.add_geometry(build_geometry(
        GeometryKind::Sphere,
        &GeometryParams::sphere(spec.radius, 32, 16),
    )?);
    let body = scene.spawn(group, Node::new(spec.name).with_geometry(sphere))?;
    scene.bind_rule(
        body,
        MotionRule::spin(revolutions(spec.speed / 2.0), Vec3::Y),
        channels,
    )?;

    if spec.ring {
        let ring = scene.add_geometry(build_geometry(
            GeometryKind::Ring,
            &GeometryParams::ring(3.0, 5.0, 64),
        )?);
        let tilt = Transform::default().with_rotation(Quat::from_rotation_x(20.0));
        scene.spawn(
            body,
            Node::new(format!("{} ring", spec.name))
                .with_transform(tilt)
                .with_geometry(ring),
        )?;
    }

    let moons = scene.spawn(group, Node::new(format!("{} moons", spec.name)))?;
    scene.bind_rule(
        moons,
        MotionRule::spin(revolutions(spec.speed * 2.0), Vec3::Z),
        channels,
    )?;
    scene.bind_rule(
        moons,
        MotionRule::spin(revolutions(spec.speed * 3.0), Vec3::Y),
        channels,
    )?;

    for index in 0..spec.moons {
        let node = Node::new(format!("{} moon {}", spec.name, index + 1))
            .at(moon_position(spec.radius, rng))
            .with_geometry(moon_geometry);
        let moon = scene.spawn(moons, node)?;
        scene.bind_rule(
            moon,
            MotionRule::spin(revolutions(spec.speed * 2.0), Vec3::Y),
            channels,
        )?;
    }

    let line = scene.add_geometry(build_geometry(
        GeometryKind::OrbitLine,
        &GeometryParams::orbit(spec.orbit, ORBIT_LINE_POINTS),
    )?);
    scene.spawn(
        root,
        Node::new(format!("{} orbit", spec.name)).with_geometry(line),
    )?;

    Ok(group)
}

/// Builds the belt under its own slowly turning group. A mesh that fails to
/// load leaves the group empty and the rest of the system intact.
async fn spawn_asteroid_belt(
    scene: &mut Scene,
    assets: &impl AssetProvider,
    channels: &InputChannels,
    rng: &mut impl Rng,
) -> crate::error::Result<NodeId> {
    let belt = scene.spawn(scene.root(), Node::new("asteroid belt"))?;
    scene.bind_rule(belt, MotionRule::spin(revolutions(1.0 / 3.0), Vec3::Y), channels)?;

    let mesh = match assets.load_mesh(ASTEROID_MESH).await {
        Ok(mesh) => mesh,
        Err(err) => {
            log::error!("Asteroid belt left empty: {}", err);
            return Ok(belt);
        }
    };

    let geometry = scene.add_geometry(mesh);
    let instances = scatter_annulus(&FieldParams::annulus(BELT_INNER, BELT_OUTER, 5.0), rng)?;
    let asteroids = populate(scene, belt, geometry, 1.0, &instances, channels)?;

    log::info!("Asteroid belt has {} asteroids", asteroids.len());

    Ok(belt)
}

pub async fn build(
    animation_duration_ms: f64,
    assets: &impl AssetProvider,
    rng: &mut impl Rng,
) -> crate::error::Result<Demo> {
    let mut scene = Scene::new(animation_duration_ms);
    let channels = InputChannels::new();

    let sun_geometry = scene.add_geometry(build_geometry(
        GeometryKind::Sphere,
        &GeometryParams::sphere(SUN_RADIUS, 32, 16),
    )?);
    let sun = scene.spawn(scene.root(), Node::new("sun").with_geometry(sun_geometry))?;
    scene.bind_rule(sun, MotionRule::spin(revolutions(-1.0), Vec3::Y), &channels)?;

    let moon_geometry = scene.add_geometry(build_geometry(
        GeometryKind::Sphere,
        &GeometryParams::sphere(MOON_RADIUS, 32, 16),
    )?);

    let (inner, outer) = PLANETS.split_at(4);
    for spec in inner {
        spawn_planet(&mut scene, spec, moon_geometry, &channels, rng)?;
    }

    spawn_asteroid_belt(&mut scene, assets, &channels, rng).await?;

    for spec in outer {
        spawn_planet(&mut scene, spec, moon_geometry, &channels, rng)?;
    }

    let camera = Camera::looking_at(Vec3::new(110.0, 30.0, 150.0), Vec3::ZERO).with_lens(
        75.0,
        1.0,
        10_000.0,
    );

    Ok(Demo {
        channels,
        ..Demo::new(scene, camera)
    })
}
