//! Applies bound rules to node transforms, one tick at a time.

use std::f64::consts::TAU;

use glam::{Quat, Vec3};

use crate::motion::channels::ChannelSource;
use crate::motion::{BoundRule, MotionRule, RuleState};
use crate::scene_graph::transform::Transform;

/// Timing of the tick being applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    pub delta_ms: f64,
    pub elapsed_ms: f64,
    pub duration_ms: f64,
}

/// Position on an orbit after `elapsed_ms`. The orbit lies in the plane
/// through the origin perpendicular to `axis`; for `axis = +Y` this is
/// `(r cos φ, 0, r sin φ)`.
pub fn orbit_position(
    radius: f32,
    angular_speed: f32,
    axis: Vec3,
    elapsed_ms: f64,
    duration_ms: f64,
) -> Vec3 {
    let phase = TAU * (elapsed_ms / duration_ms) * angular_speed as f64;
    let flat = Vec3::new(
        radius * phase.cos() as f32,
        0.0,
        radius * phase.sin() as f32,
    );

    Quat::from_rotation_arc(Vec3::Y, axis) * flat
}

/// Angle a spin covers during one tick.
pub fn spin_angle(angular_speed: f32, delta_ms: f64, duration_ms: f64) -> f32 {
    (TAU * (delta_ms / duration_ms) * angular_speed as f64) as f32
}

/// Advances a triangle-wave oscillation by `step` and returns the new
/// `(displacement, sign)`.
///
/// The displacement reflects off `±amplitude` and the sign flips only when
/// the boundary is strictly crossed; landing exactly on it keeps the sign.
pub fn oscillate(displacement: f32, sign: f32, step: f32, amplitude: f32) -> (f32, f32) {
    // A whole back-and-forth ends where it began.
    let step = step % (4.0 * amplitude);
    let mut position = displacement + sign * step;
    let mut sign = sign;

    loop {
        if position > amplitude {
            position = 2.0 * amplitude - position;
            sign = -sign;
        } else if position < -amplitude {
            position = -2.0 * amplitude - position;
            sign = -sign;
        } else {
            break;
        }
    }

    (position, sign)
}

/// Applies every rule of one node in bind order.
///
/// The first `ExternalAngle` of the pass replaces the rotation and later ones
/// compose onto it, so several channels can pose one joint.
pub fn apply_rules(
    rules: &mut [BoundRule],
    transform: &mut Transform,
    frame: &FrameTime,
    channels: &impl ChannelSource,
) {
    let mut posed = false;

    for bound in rules.iter_mut() {
        match (&bound.rule, &mut bound.state) {
            (
                MotionRule::Orbit {
                    radius,
                    angular_speed,
                    axis,
                },
                _,
            ) => {
                transform.set_translation(orbit_position(
                    *radius,
                    *angular_speed,
                    *axis,
                    frame.elapsed_ms,
                    frame.duration_ms,
                ));
            }
            (
                MotionRule::Spin {
                    angular_speed,
                    axis,
                },
                _,
            ) => {
                let angle = spin_angle(*angular_speed, frame.delta_ms, frame.duration_ms);
                if angle != 0.0 {
                    transform.rotate(Quat::from_axis_angle(*axis, angle));
                }
            }
            (
                MotionRule::Oscillate {
                    axis,
                    amplitude,
                    period_ms,
                    ..
                },
                RuleState::Oscillation { displacement, sign },
            ) => {
                let step = (4.0 * *amplitude as f64 * frame.delta_ms / *period_ms as f64) as f32;
                let (next, next_sign) = oscillate(*displacement, *sign, step, *amplitude);

                transform.translate(*axis * (next - *displacement));
                *displacement = next;
                *sign = next_sign;
            }
            (MotionRule::Oscillate { .. }, RuleState::Stateless) => {
                log::warn!("Oscillation rule without state, skipping");
            }
            (MotionRule::ExternalAngle { channel, axis }, _) => {
                let angle = channels.read_channel(*channel);
                let rotation = Quat::from_axis_angle(*axis, angle);

                if posed {
                    transform.rotate(rotation);
                } else {
                    transform.set_rotation(rotation);
                    posed = true;
                }
            }
        }
    }
}
