//! Declarative per-frame motion.
//!
//! A [`MotionRule`] describes how a node moves; binding it validates the
//! parameters once and yields a [`BoundRule`] carrying whatever state the rule
//! needs between ticks. Speeds are measured in revolutions per animation
//! duration and periods in milliseconds, so every rule in a scene follows the
//! same clock.

pub mod channels;
pub mod engine;

use glam::Vec3;

use crate::error::MotionError;
use crate::motion::channels::{ChannelId, ChannelSource};

#[derive(Debug, Clone, PartialEq)]
pub enum MotionRule {
    /// Places the node on a circle around its parent's origin, in the plane
    /// perpendicular to `axis`. Absolute: the translation is overwritten.
    Orbit {
        radius: f32,
        angular_speed: f32,
        axis: Vec3,
    },
    /// Keeps turning the node about `axis` in its own frame.
    Spin { angular_speed: f32, axis: Vec3 },
    /// Moves the node back and forth along `axis` within `±amplitude` of where
    /// it started; one full back-and-forth takes `period_ms`.
    Oscillate {
        axis: Vec3,
        amplitude: f32,
        period_ms: f32,
        initial_sign: f32,
    },
    /// Sets the node's rotation about `axis` to the channel's value in
    /// radians. Absolute: the rotation is overwritten each tick.
    ExternalAngle { channel: ChannelId, axis: Vec3 },
}

impl MotionRule {
    pub fn orbit(radius: f32, angular_speed: f32) -> Self {
        MotionRule::Orbit {
            radius,
            angular_speed,
            axis: Vec3::Y,
        }
    }

    pub fn spin(angular_speed: f32, axis: Vec3) -> Self {
        MotionRule::Spin {
            angular_speed,
            axis,
        }
    }

    pub fn oscillate(axis: Vec3, amplitude: f32, period_ms: f32, initial_sign: f32) -> Self {
        MotionRule::Oscillate {
            axis,
            amplitude,
            period_ms,
            initial_sign,
        }
    }

    pub fn external_angle(channel: ChannelId, axis: Vec3) -> Self {
        MotionRule::ExternalAngle { channel, axis }
    }

    /// Validates the rule and normalizes its axis. Every problem is reported
    /// here so a bound rule can never fail during a tick.
    pub fn bind(self, channels: &impl ChannelSource) -> Result<BoundRule, MotionError> {
        let (rule, state) = match self {
            MotionRule::Orbit {
                radius,
                angular_speed,
                axis,
            } => {
                if !(radius.is_finite() && radius >= 0.0) {
                    return Err(invalid(format!(
                        "orbit radius must be non-negative, got {radius}"
                    )));
                }
                require_finite("orbit angular speed", angular_speed)?;

                let rule = MotionRule::Orbit {
                    radius,
                    angular_speed,
                    axis: unit_axis(axis)?,
                };
                (rule, RuleState::Stateless)
            }
            MotionRule::Spin {
                angular_speed,
                axis,
            } => {
                require_finite("spin angular speed", angular_speed)?;

                let rule = MotionRule::Spin {
                    angular_speed,
                    axis: unit_axis(axis)?,
                };
                (rule, RuleState::Stateless)
            }
            MotionRule::Oscillate {
                axis,
                amplitude,
                period_ms,
                initial_sign,
            } => {
                require_positive("oscillation amplitude", amplitude)?;
                require_positive("oscillation period", period_ms)?;
                if !(initial_sign.is_finite() && initial_sign != 0.0) {
                    return Err(invalid(format!(
                        "oscillation sign must be non-zero, got {initial_sign}"
                    )));
                }

                let sign = initial_sign.signum();
                let rule = MotionRule::Oscillate {
                    axis: unit_axis(axis)?,
                    amplitude,
                    period_ms,
                    initial_sign: sign,
                };
                let state = RuleState::Oscillation {
                    displacement: 0.0,
                    sign,
                };
                (rule, state)
            }
            MotionRule::ExternalAngle { channel, axis } => {
                if !channels.is_defined(channel) {
                    return Err(invalid(format!("channel {channel:?} is not defined")));
                }

                let rule = MotionRule::ExternalAngle {
                    channel,
                    axis: unit_axis(axis)?,
                };
                (rule, RuleState::Stateless)
            }
        };

        Ok(BoundRule { rule, state })
    }
}

/// Mutable per-rule state kept on the node between ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RuleState {
    Stateless,
    Oscillation { displacement: f32, sign: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundRule {
    rule: MotionRule,
    state: RuleState,
}

impl BoundRule {
    pub fn rule(&self) -> &MotionRule {
        &self.rule
    }

    pub fn state(&self) -> RuleState {
        self.state
    }
}

fn invalid(message: String) -> MotionError {
    MotionError::InvalidMotionRule(message)
}

fn require_finite(name: &str, value: f32) -> Result<(), MotionError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(format!("{name} must be finite, got {value}")))
    }
}

fn require_positive(name: &str, value: f32) -> Result<(), MotionError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{name} must be positive, got {value}")))
    }
}

fn unit_axis(axis: Vec3) -> Result<Vec3, MotionError> {
    axis.try_normalize()
        .ok_or_else(|| invalid(format!("axis {axis} has no direction")))
}
