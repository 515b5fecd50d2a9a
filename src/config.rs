use crate::demo::SceneKind;
use crate::rendering::config::RenderConfig;
use crate::scene_graph::scene::DEFAULT_ANIMATION_DURATION_MS;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub scene: SceneKind,
    /// Time for one revolution at speed 1.
    pub animation_duration_ms: f64,
    pub width: u32,
    pub height: u32,
    pub frames_per_second: f64,
    /// Stop after this many frames. `None` runs until interrupted.
    pub frame_limit: Option<u64>,
    /// Step a simulated clock instead of waiting on real time.
    pub fixed_step: bool,
    pub seed: u64,
    pub render: RenderConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scene: SceneKind::SolarSystem,
            animation_duration_ms: DEFAULT_ANIMATION_DURATION_MS,
            width: 800,
            height: 600,
            frames_per_second: 60.0,
            frame_limit: Some(600),
            fixed_step: false,
            seed: 0x5eed,
            render: RenderConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn frame_interval_ms(&self) -> f64 {
        1000.0 / self.frames_per_second
    }
}
