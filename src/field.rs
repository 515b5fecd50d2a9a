//! Scatters instances of one shared geometry over an annulus, the way the
//! asteroid belt is laid out: a regular grid with rejection, then random
//! jitter and motion per accepted point.

use std::f32::consts::TAU;
use std::ops::Range;

use glam::Vec3;
use rand::Rng;

use crate::error::FieldError;
use crate::geometry::GeometryId;
use crate::motion::channels::ChannelSource;
use crate::motion::MotionRule;
use crate::scene_graph::node::{Node, NodeId};
use crate::scene_graph::scene::Scene;

#[derive(Debug, Clone, PartialEq)]
pub struct FieldParams {
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub step: f32,
    /// Each accepted point moves by up to `jitter.x` / `jitter.z` outward
    /// along the grid and by `±jitter.y` vertically.
    pub jitter: Vec3,
    pub angular_speed: Range<f32>,
    pub vertical_speed: Range<f32>,
}

impl FieldParams {
    pub fn annulus(inner_radius: f32, outer_radius: f32, step: f32) -> Self {
        Self {
            inner_radius,
            outer_radius,
            step,
            ..Default::default()
        }
    }
}

impl Default for FieldParams {
    fn default() -> Self {
        Self {
            inner_radius: 85.0,
            outer_radius: 100.0,
            step: 5.0,
            jitter: Vec3::new(3.0, 1.0, 3.0),
            angular_speed: -10.0..10.0,
            vertical_speed: -0.01..0.01,
        }
    }
}

/// One accepted grid point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldInstance {
    /// The grid point before jitter, in the XZ plane.
    pub cell: (f32, f32),
    pub position: Vec3,
    /// Radians per animation duration.
    pub angular_speed: f32,
    /// Units per frame at 60 frames per second.
    pub vertical_speed: f32,
}

impl FieldInstance {
    /// Tumble as equal turns about Z then Y.
    pub fn spin_rules(&self) -> [MotionRule; 2] {
        let revolutions = self.angular_speed / TAU;
        [
            MotionRule::spin(revolutions, Vec3::Z),
            MotionRule::spin(revolutions, Vec3::Y),
        ]
    }

    /// Vertical bob of one unit each way, or `None` when the instance does
    /// not move vertically.
    pub fn bob_rule(&self) -> Option<MotionRule> {
        let units_per_ms = self.vertical_speed.abs() * 60.0 / 1000.0;
        if !(units_per_ms > f32::EPSILON) {
            return None;
        }

        let period_ms = 4.0 / units_per_ms;
        Some(MotionRule::oscillate(
            Vec3::Y,
            1.0,
            period_ms,
            self.vertical_speed.signum(),
        ))
    }
}

fn validate(params: &FieldParams) -> Result<(), FieldError> {
    let invalid = |message: String| Err(FieldError::InvalidFieldParameters(message));

    if !(params.step.is_finite() && params.step > 0.0) {
        return invalid(format!("step must be positive, got {}", params.step));
    }
    if !(params.inner_radius >= 0.0 && params.inner_radius < params.outer_radius) {
        return invalid(format!(
            "expected 0 <= inner < outer, got {}..{}",
            params.inner_radius, params.outer_radius
        ));
    }
    if !params.outer_radius.is_finite() {
        return invalid("outer radius must be finite".to_string());
    }
    for (label, range) in [
        ("angular", &params.angular_speed),
        ("vertical", &params.vertical_speed),
    ] {
        if !(range.start.is_finite() && range.end.is_finite()) {
            return invalid(format!("{label} speed range must be finite, got {range:?}"));
        }
        if range.is_empty() {
            return invalid(format!("{label} speed range must not be empty"));
        }
    }
    if params.jitter.min_element() < 0.0 {
        return invalid(format!("jitter must be non-negative, got {}", params.jitter));
    }

    Ok(())
}

/// Walks the grid `[-outer, outer)²` in `step` increments and keeps the
/// points strictly between the two radii. Points are produced row by row, so
/// the same rng seed always yields the same field.
pub fn scatter_annulus(
    params: &FieldParams,
    rng: &mut impl Rng,
) -> Result<Vec<FieldInstance>, FieldError> {
    validate(params)?;

    let outer = params.outer_radius;
    let cells = (2.0 * outer / params.step).ceil() as usize;
    let coordinate = |index: usize| -outer + index as f32 * params.step;

    let mut instances = Vec::new();

    for i in 0..cells {
        let x = coordinate(i);
        if x >= outer {
            break;
        }

        for j in 0..cells {
            let y = coordinate(j);
            if y >= outer {
                break;
            }

            let radius = x.hypot(y);
            if !(radius > params.inner_radius && radius < outer) {
                continue;
            }

            let position = Vec3::new(
                x + rng.gen::<f32>() * params.jitter.x,
                (rng.gen::<f32>() * 2.0 - 1.0) * params.jitter.y,
                y + rng.gen::<f32>() * params.jitter.z,
            );

            instances.push(FieldInstance {
                cell: (x, y),
                position,
                angular_speed: rng.gen_range(params.angular_speed.clone()),
                vertical_speed: rng.gen_range(params.vertical_speed.clone()),
            });
        }
    }

    log::debug!(
        "Scattered {} instances over {}..{} (step {})",
        instances.len(),
        params.inner_radius,
        outer,
        params.step
    );

    Ok(instances)
}

/// Adds one node per instance under `parent`, all sharing `geometry`, each
/// tumbling and bobbing on its own.
pub fn populate(
    scene: &mut Scene,
    parent: NodeId,
    geometry: GeometryId,
    scale: f32,
    instances: &[FieldInstance],
    channels: &impl ChannelSource,
) -> crate::error::Result<Vec<NodeId>> {
    let mut nodes = Vec::with_capacity(instances.len());

    for (index, instance) in instances.iter().enumerate() {
        let mut node = Node::new(format!("asteroid {index}"))
            .at(instance.position)
            .with_geometry(geometry);
        node.transform.set_scale(scale);

        let id = scene.spawn(parent, node)?;
        for spin in instance.spin_rules() {
            scene.bind_rule(id, spin, channels)?;
        }
        if let Some(bob) = instance.bob_rule() {
            scene.bind_rule(id, bob, channels)?;
        }

        nodes.push(id);
    }

    Ok(nodes)
}
