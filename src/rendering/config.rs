#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Test draw items against the camera frustum before counting them as
    /// visible.
    pub frustum_culling: bool,
    /// Log a summary every this many frames. 0 disables it.
    pub stats_interval: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            frustum_culling: true,
            stats_interval: 60,
        }
    }
}
