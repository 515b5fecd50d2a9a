use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use orrery::assets::{BuiltinAssetProvider, LayeredAssetProvider, MemoryAssetProvider};
use orrery::config::EngineConfig;
use orrery::demo::solar_system::ASTEROID_MESH;
use orrery::demo::{build_demo, robot_arm, Demo, SceneKind};
use orrery::geometry::{build, GeometryKind, GeometryParams};
use orrery::rendering::config::RenderConfig;
use orrery::rendering::headless::HeadlessSurface;
use orrery::rendering::RenderContext;
use orrery::scheduler::{FixedStepPacer, FrameScheduler, IntervalPacer, StopHandle};

#[derive(Parser)]
#[command(name = "orrery")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Run an animated scene against a headless surface", long_about = None)]
struct Cli {
    /// Scene to build
    #[arg(short, long, value_enum, default_value_t = SceneKind::SolarSystem)]
    scene: SceneKind,

    /// Frames to run, 0 for no limit
    #[arg(short, long, default_value_t = 600)]
    frames: u64,

    /// Target frame rate
    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// Surface width
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// Surface height
    #[arg(long, default_value_t = 600)]
    height: u32,

    /// Milliseconds for one revolution at speed 1
    #[arg(long, default_value_t = 10_000.0)]
    duration_ms: f64,

    /// Seed for procedural placement
    #[arg(long, default_value_t = 0x5eed)]
    seed: u64,

    /// Step a simulated clock instead of running in real time
    #[arg(long)]
    fixed_step: bool,

    /// Count every draw item as visible
    #[arg(long)]
    no_culling: bool,
}

impl Cli {
    fn into_config(self) -> EngineConfig {
        EngineConfig {
            scene: self.scene,
            animation_duration_ms: self.duration_ms,
            width: self.width,
            height: self.height,
            frames_per_second: self.fps,
            frame_limit: (self.frames > 0).then_some(self.frames),
            fixed_step: self.fixed_step,
            seed: self.seed,
            render: RenderConfig {
                frustum_culling: !self.no_culling,
                ..Default::default()
            },
        }
    }
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    let config = Cli::parse().into_config();
    if !(config.frames_per_second > 0.0 && config.animation_duration_ms > 0.0) {
        anyhow::bail!("--fps and --duration-ms must be positive");
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("Failed to start async runtime")?;

    runtime.block_on(run(config))
}

async fn run(config: EngineConfig) -> Result<()> {
    let asteroid = build(
        GeometryKind::Dodecahedron,
        &GeometryParams {
            radius: 0.5,
            ..Default::default()
        },
    )
    .context("Failed to build asteroid mesh")?;
    let assets = LayeredAssetProvider {
        primary: MemoryAssetProvider::new().with_mesh(ASTEROID_MESH, asteroid),
        secondary: BuiltinAssetProvider::default(),
    };

    let Demo {
        mut scene,
        channels,
        camera,
        rig,
    } = build_demo(&config, &assets)
        .await
        .with_context(|| format!("Failed to build {:?} scene", config.scene))?;

    let stop = StopHandle::new();
    let driver = rig.map(|rig| {
        let writers = rig.writers(&channels);
        let period = Duration::from_secs_f64(config.frame_interval_ms() / 1000.0);
        tokio::spawn(robot_arm::drive(rig, writers, stop.clone(), period))
    });

    let mut surface = HeadlessSurface::new(config.render.clone());
    let mut scheduler =
        FrameScheduler::new(RenderContext::new(camera, config.width, config.height));

    let result = if config.fixed_step {
        let frames = config.frame_limit.unwrap_or(u64::MAX);
        let mut pacer = FixedStepPacer::new(config.frame_interval_ms(), frames);
        scheduler
            .run(&mut pacer, &mut scene, &channels, &mut surface, &stop)
            .await
    } else {
        let mut pacer = IntervalPacer::new(config.frames_per_second, config.frame_limit);
        scheduler
            .run(&mut pacer, &mut scene, &channels, &mut surface, &stop)
            .await
    };

    stop.request_stop();
    if let Some(driver) = driver {
        driver.await.context("Arm driver task failed")?;
    }

    let frames = result.context("Rendering stopped")?;
    let totals = surface.totals();
    log::info!(
        "Ran {} frames over {:.0} ms of animation: {} items drawn, {} culled",
        frames,
        scene.elapsed_ms(),
        totals.visible,
        totals.culled
    );

    Ok(())
}
