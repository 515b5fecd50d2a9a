//! Scalar input channels written by external controls (joint sliders and the
//! like) and read by `ExternalAngle` rules.
//!
//! Every channel has a single writer. Values are stored as the bit pattern of
//! an `f32` in an atomic, so a reader always sees a complete value without
//! taking a lock.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelId(u32);

pub trait ChannelSource {
    fn is_defined(&self, id: ChannelId) -> bool;

    /// Current value of the channel, 0 when nothing has been written.
    fn read_channel(&self, id: ChannelId) -> f32;
}

#[derive(Debug)]
struct Channel {
    name: String,
    min: f32,
    max: f32,
    value: Arc<AtomicU32>,
}

#[derive(Debug, Default)]
pub struct InputChannels {
    channels: Vec<Channel>,
}

impl InputChannels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a channel whose writes are clamped to `[min, max]`.
    pub fn register(&mut self, name: impl Into<String>, min: f32, max: f32) -> ChannelId {
        let id = ChannelId(self.channels.len() as u32);
        let (min, max) = if min <= max { (min, max) } else { (max, min) };

        self.channels.push(Channel {
            name: name.into(),
            min,
            max,
            value: Arc::new(AtomicU32::new(0.0_f32.to_bits())),
        });

        id
    }

    /// Registers a channel that accepts any value.
    pub fn register_unbounded(&mut self, name: impl Into<String>) -> ChannelId {
        self.register(name, f32::NEG_INFINITY, f32::INFINITY)
    }

    pub fn channel_by_name(&self, name: &str) -> Option<ChannelId> {
        self.channels
            .iter()
            .position(|channel| channel.name == name)
            .map(|index| ChannelId(index as u32))
    }

    pub fn name(&self, id: ChannelId) -> Option<&str> {
        self.channels
            .get(id.0 as usize)
            .map(|channel| channel.name.as_str())
    }

    pub fn range(&self, id: ChannelId) -> Option<(f32, f32)> {
        self.channels
            .get(id.0 as usize)
            .map(|channel| (channel.min, channel.max))
    }

    /// Hands out the writing end of a channel. The writer can move to another
    /// task or thread; the engine only ever reads.
    pub fn writer(&self, id: ChannelId) -> Option<ChannelWriter> {
        self.channels.get(id.0 as usize).map(|channel| ChannelWriter {
            min: channel.min,
            max: channel.max,
            value: channel.value.clone(),
        })
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

impl ChannelSource for InputChannels {
    fn is_defined(&self, id: ChannelId) -> bool {
        (id.0 as usize) < self.channels.len()
    }

    fn read_channel(&self, id: ChannelId) -> f32 {
        self.channels
            .get(id.0 as usize)
            .map_or(0.0, |channel| {
                f32::from_bits(channel.value.load(Ordering::Relaxed))
            })
    }
}

#[derive(Debug, Clone)]
pub struct ChannelWriter {
    min: f32,
    max: f32,
    value: Arc<AtomicU32>,
}

impl ChannelWriter {
    /// Stores `value` clamped to the channel range. NaN is ignored.
    pub fn write(&self, value: f32) {
        if value.is_nan() {
            return;
        }

        let value = value.clamp(self.min, self.max);
        self.value.store(value.to_bits(), Ordering::Relaxed);
    }
}
