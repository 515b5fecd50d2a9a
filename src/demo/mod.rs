//! Ready-made scenes built on the engine.

pub mod figures;
pub mod robot_arm;
pub mod shapes;
pub mod solar_system;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::assets::AssetProvider;
use crate::camera::Camera;
use crate::config::EngineConfig;
use crate::motion::channels::InputChannels;
use crate::scene_graph::scene::Scene;

pub use robot_arm::RobotArmRig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SceneKind {
    /// Spinning scutoid, dodecahedron and bobbing octahedron.
    Figures,
    /// Jointed arm posed through input channels.
    RobotArm,
    /// Sun, planets, moons and an asteroid belt.
    SolarSystem,
    /// Flat square, triangle, diamond, Pac-Man and Sierpinski triangle.
    Shapes,
}

/// A built scene with everything needed to run it.
pub struct Demo {
    pub scene: Scene,
    pub channels: InputChannels,
    pub camera: Camera,
    /// Set for scenes posed through channels.
    pub rig: Option<RobotArmRig>,
}

impl Demo {
    fn new(scene: Scene, camera: Camera) -> Self {
        Self {
            scene,
            channels: InputChannels::new(),
            camera,
            rig: None,
        }
    }
}

pub async fn build_demo(
    config: &EngineConfig,
    assets: &impl AssetProvider,
) -> crate::error::Result<Demo> {
    let duration = config.animation_duration_ms;

    let demo = match config.scene {
        SceneKind::Figures => figures::build(duration)?,
        SceneKind::RobotArm => robot_arm::build(duration)?,
        SceneKind::Shapes => shapes::build(duration)?,
        SceneKind::SolarSystem => {
            let mut rng = StdRng::seed_from_u64(config.seed);
            solar_system::build(duration, assets, &mut rng).await?
        }
    };

    log::info!(
        "Built {:?} scene: {} nodes, {} geometries, {} drawables",
        config.scene,
        demo.scene.node_count(),
        demo.scene.geometry_count(),
        demo.scene.drawables().len()
    );

    Ok(demo)
}
