//! Drives the tick → update → render cycle.
//!
//! ```text
//! Idle --start--> Running --stop / render error / pacer exhausted--> Stopped
//!                    ^                                                 |
//!                    +---------------------start-----------------------+
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::{Instant, Interval, MissedTickBehavior};

use crate::error::RenderError;
use crate::motion::channels::ChannelSource;
use crate::rendering::{RenderContext, RenderSurface, SceneSnapshot};
use crate::scene_graph::scene::Scene;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
    Stopped,
}

/// Source of frame timestamps. Awaiting it is where the loop yields.
#[allow(async_fn_in_trait)]
pub trait FramePacer {
    /// Timestamp of the next frame in milliseconds, or `None` when no more
    /// frames should run.
    async fn next_frame(&mut self) -> Option<f64>;
}

/// Real-time pacing on a tokio interval. Late frames are skipped rather than
/// bunched up. Must be polled inside a tokio runtime.
pub struct IntervalPacer {
    period: Duration,
    frame_limit: Option<u64>,
    frames: u64,
    started: Option<(Instant, Interval)>,
}

impl IntervalPacer {
    pub fn new(frames_per_second: f64, frame_limit: Option<u64>) -> Self {
        let frames_per_second = if frames_per_second > 0.0 {
            frames_per_second
        } else {
            60.0
        };

        Self {
            period: Duration::from_secs_f64(1.0 / frames_per_second),
            frame_limit,
            frames: 0,
            started: None,
        }
    }
}

impl FramePacer for IntervalPacer {
    async fn next_frame(&mut self) -> Option<f64> {
        if self.frame_limit.is_some_and(|limit| self.frames >= limit) {
            return None;
        }

        let (start, interval) = self.started.get_or_insert_with(|| {
            let mut interval = tokio::time::interval(self.period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            (Instant::now(), interval)
        });

        let now = interval.tick().await;
        self.frames += 1;

        Some(now.duration_since(*start).as_secs_f64() * 1000.0)
    }
}

/// Simulated clock advancing a fixed step per frame. It never sleeps, but
/// each frame still yields once so other tasks on the runtime get to run.
#[derive(Debug, Clone)]
pub struct FixedStepPacer {
    step_ms: f64,
    now_ms: f64,
    remaining: u64,
}

impl FixedStepPacer {
    pub fn new(step_ms: f64, frames: u64) -> Self {
        Self {
            step_ms,
            now_ms: 0.0,
            remaining: frames,
        }
    }
}

impl FramePacer for FixedStepPacer {
    async fn next_frame(&mut self) -> Option<f64> {
        if self.remaining == 0 {
            return None;
        }

        tokio::task::yield_now().await;

        self.remaining -= 1;
        let now = self.now_ms;
        self.now_ms += self.step_ms;
        Some(now)
    }
}

/// Asks a running loop to stop at the next tick boundary.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

pub struct FrameScheduler {
    state: SchedulerState,
    context: RenderContext,
    last_tick_ms: Option<f64>,
    frames: u64,
}

impl FrameScheduler {
    pub fn new(context: RenderContext) -> Self {
        Self {
            state: SchedulerState::Idle,
            context,
            last_tick_ms: None,
            frames: 0,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    /// Frames presented since the scheduler was created.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Initializes `surface` and enters `Running`. Does nothing while already
    /// running. The first tick after a (re)start has a zero delta.
    pub fn start(&mut self, surface: &mut impl RenderSurface) -> Result<(), RenderError> {
        if self.state == SchedulerState::Running {
            log::debug!("Scheduler already running");
            return Ok(());
        }

        surface.initialize(self.context.width, self.context.height)?;

        log::info!("Scheduler {:?} -> Running", self.state);
        self.state = SchedulerState::Running;
        self.last_tick_ms = None;

        Ok(())
    }

    pub fn stop(&mut self) {
        if self.state == SchedulerState::Running {
            log::info!("Scheduler stopped after {} frames", self.frames);
            self.state = SchedulerState::Stopped;
        }
    }

    /// Runs one tick at `now_ms`: rules, world transforms, one present.
    /// Returns `Ok(false)` without touching the scene unless running. A
    /// present failure stops the scheduler and is handed back.
    pub fn tick(
        &mut self,
        now_ms: f64,
        scene: &mut Scene,
        channels: &impl ChannelSource,
        surface: &mut impl RenderSurface,
    ) -> Result<bool, RenderError> {
        if self.state != SchedulerState::Running {
            return Ok(false);
        }

        let delta_ms = self
            .last_tick_ms
            .map_or(0.0, |last| (now_ms - last).max(0.0));
        self.last_tick_ms = Some(now_ms);

        scene.advance(delta_ms, channels);
        scene.resolve_world_transforms();

        let snapshot = SceneSnapshot::capture(scene, &self.context);
        if let Err(err) = surface.present(&snapshot) {
            log::error!("Present failed on tick {}: {}", scene.tick(), err);
            self.state = SchedulerState::Stopped;
            return Err(err);
        }

        self.frames += 1;
        Ok(true)
    }

    /// Starts the scheduler and ticks once per pacer frame until the pacer
    /// runs out, `stop` is requested, or presenting fails. Returns the number
    /// of frames presented by this call.
    pub async fn run(
        &mut self,
        pacer: &mut impl FramePacer,
        scene: &mut Scene,
        channels: &impl ChannelSource,
        surface: &mut impl RenderSurface,
        stop: &StopHandle,
    ) -> Result<u64, RenderError> {
        self.start(surface)?;
        let first_frame = self.frames;

        while self.state == SchedulerState::Running {
            if stop.is_stop_requested() {
                self.stop();
                break;
            }

            let Some(now_ms) = pacer.next_frame().await else {
                self.stop();
                break;
            };

            self.tick(now_ms, scene, channels, surface)?;
        }

        Ok(self.frames - first_frame)
    }
}
