use std::f32::consts::{PI, TAU};
use std::time::Duration;

use glam::Vec3;
use tokio::time::{Instant, MissedTickBehavior};

use crate::camera::Camera;
use crate::demo::Demo;
use crate::geometry::{build as build_geometry, GeometryKind, GeometryParams};
use crate::motion::channels::{ChannelId, ChannelWriter, InputChannels};
use crate::motion::MotionRule;
use crate::scene_graph::node::Node;
use crate::scene_graph::scene::Scene;
use crate::scheduler::StopHandle;

#[derive(Clone, Copy)]
enum Group {
    Shoulder,
    Elbow,
    Forearm,
    Wrist,
    Hand,
}

/// One posable degree of freedom: the group it turns, about which axis, and
/// the range its channel accepts.
struct JointSpec {
    channel: &'static str,
    group: Group,
    axis: Vec3,
    min: f32,
    max: f32,
}

// Within a group, X is bound before Z so the angles compose as XYZ Euler.
const JOINTS: [JointSpec; 7] = [
    JointSpec {
        channel: "shoulder x",
        group: Group::Shoulder,
        axis: Vec3::X,
        min: 0.0,
        max: TAU,
    },
    JointSpec {
        channel: "shoulder z",
        group: Group::Shoulder,
        axis: Vec3::Z,
        min: 0.0,
        max: TAU,
    },
    JointSpec {
        channel: "elbow x",
        group: Group::Elbow,
        axis: Vec3::X,
        min: 0.0,
        max: 2.0,
    },
    JointSpec {
        channel: "forearm y",
        group: Group::Forearm,
        axis: Vec3::Y,
        min: -1.0,
        max: PI,
    },
    JointSpec {
        channel: "wrist x",
        group: Group::Wrist,
        axis: Vec3::X,
        min: 0.0,
        max: 1.0,
    },
    JointSpec {
        channel: "hand x",
        group: Group::Hand,
        axis: Vec3::X,
        min: 0.0,
        max: 1.0,
    },
    JointSpec {
        channel: "hand z",
        group: Group::Hand,
        axis: Vec3::Z,
        min: -0.5,
        max: 0.5,
    },
];

#[derive(Debug, Clone, PartialEq)]
pub struct Joint {
    pub name: String,
    pub channel: ChannelId,
    pub min: f32,
    pub max: f32,
}

/// Channels of the arm, in joint order from the shoulder out.
#[derive(Debug, Clone)]
pub struct RobotArmRig {
    pub joints: Vec<Joint>,
}

impl RobotArmRig {
    pub fn writers(&self, channels: &InputChannels) -> Vec<ChannelWriter> {
        self.joints
            .iter()
            .filter_map(|joint| channels.writer(joint.channel))
            .collect()
    }

    /// A slow sweep through every joint's range, each joint on its own period
    /// so the pose never repeats quickly.
    pub fn sweep_pose(&self, time_ms: f64) -> Vec<f32> {
        self.joints
            .iter()
            .enumerate()
            .map(|(index, joint)| {
                let period_ms = 4_000.0 + 1_500.0 * index as f64;
                let phase = (std::f64::consts::TAU * time_ms / period_ms).cos();
                let t = (0.5 - 0.5 * phase) as f32;
                joint.min + (joint.max - joint.min) * t
            })
            .collect()
    }
}

/// Feeds the sweep pose into `writers` every `period` until `stop` is
/// requested. Returns how many poses were written.
pub async fn drive(
    rig: RobotArmRig,
    writers: Vec<ChannelWriter>,
    stop: StopHandle,
    period: Duration,
) -> u64 {
    let start = Instant::now();
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut poses = 0;

    loop {
        interval.tick().await;
        if stop.is_stop_requested() {
            break;
        }

        let time_ms = start.elapsed().as_secs_f64() * 1000.0;
        for (writer, value) in writers.iter().zip(rig.sweep_pose(time_ms)) {
            writer.write(value);
        }
        poses += 1;
    }

    log::debug!("Arm driver wrote {} poses", poses);
    poses
}

pub fn build(animation_duration_ms: f64) -> crate::error::Result<Demo> {
    let mut scene = Scene::new(animation_duration_ms);
    let mut channels = InputChannels::new();

    let limb = scene.add_geometry(build_geometry(
        GeometryKind::Box,
        &GeometryParams::cuboid(0.75, 2.0, 0.75),
    )?);
    let joint = scene.add_geometry(build_geometry(
        GeometryKind::Box,
        &GeometryParams::cuboid(0.5, 0.5, 0.5),
    )?);
    let hand = scene.add_geometry(build_geometry(
        GeometryKind::Box,
        &GeometryParams::cuboid(0.75, 1.0, 0.5),
    )?);

    let shoulder_group = scene.spawn(
        scene.root(),
        Node::new("shoulder group").at(Vec3::new(0.0, 0.0, -8.0)),
    )?;
    scene.spawn(shoulder_group, Node::new("shoulder").with_geometry(joint))?;
    scene.spawn(
        shoulder_group,
        Node::new("arm")
            .at(Vec3::new(0.0, -1.25, 0.0))
            .with_geometry(limb),
    )?;

    let elbow_group = scene.spawn(
        shoulder_group,
        Node::new("elbow group").at(Vec3::new(0.0, -2.5, 0.0)),
    )?;
    scene.spawn(elbow_group, Node::new("elbow").with_geometry(joint))?;

    let forearm_group = scene.spawn(
        elbow_group,
        Node::new("forearm group").at(Vec3::new(0.0, -1.25, 0.0)),
    )?;
    scene.spawn(forearm_group, Node::new("forearm").with_geometry(limb))?;

    let wrist_group = scene.spawn(
        forearm_group,
        Node::new("wrist group").at(Vec3::new(0.0, -1.25, 0.0)),
    )?;
    scene.spawn(wrist_group, Node::new("wrist").with_geometry(joint))?;

    let hand_group = scene.spawn(wrist_group, Node::new("hand group"))?;
    scene.spawn(
        hand_group,
        Node::new("hand")
            .at(Vec3::new(0.0, -0.75, 0.0))
            .with_geometry(hand),
    )?;

    let mut joints = Vec::with_capacity(JOINTS.len());
    for spec in &JOINTS {
        let id = channels.register(spec.channel, spec.min, spec.max);
        let group = match spec.group {
            Group::Shoulder => shoulder_group,
            Group::Elbow => elbow_group,
            Group::Forearm => forearm_group,
            Group::Wrist => wrist_group,
            Group::Hand => hand_group,
        };

        scene.bind_rule(group, MotionRule::external_angle(id, spec.axis), &channels)?;
        joints.push(Joint {
            name: spec.channel.to_string(),
            channel: id,
            min: spec.min,
            max: spec.max,
        });
    }

    let camera = Camera::looking_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO).with_lens(
        45.0,
        1.0,
        4_000.0,
    );

    Ok(Demo {
        scene,
        channels,
        camera,
        rig: Some(RobotArmRig { joints }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::channels::ChannelSource;
    use crate::scene_graph::scene::DEFAULT_ANIMATION_DURATION_MS;
    use glam::Quat;

    fn hand_position(demo: &mut Demo) -> Vec3 {
        demo.scene.advance(16.0, &demo.channels);
        demo.scene.resolve_world_transforms();
        let hand = demo.scene.node_by_name("hand").unwrap();
        demo.scene.get_node(hand).unwrap().world_position()
    }

    #[test]
    fn test_rest_pose_hangs_straight_down() {
        let mut demo = build(DEFAULT_ANIMATION_DURATION_MS).unwrap();
        assert_eq!(demo.scene.drawables().len(), 6);

        // -2.5 elbow, -1.25 forearm, -1.25 wrist, -0.75 hand.
        let position = hand_position(&mut demo);
        assert!(position.abs_diff_eq(Vec3::new(0.0, -5.75, -8.0), 1e-5));
    }

    #[test]
    fn test_shoulder_channel_swings_whole_arm() {
        let mut demo = build(DEFAULT_ANIMATION_DURATION_MS).unwrap();
        let rig = demo.rig.clone().unwrap();
        let writers = rig.writers(&demo.channels);
        assert_eq!(writers.len(), 7);

        // Quarter turn about Z swings the arm from -Y to +X.
        writers[1].write(std::f32::consts::FRAC_PI_2);
        let position = hand_position(&mut demo);
        assert!(position.abs_diff_eq(Vec3::new(5.75, 0.0, -8.0), 1e-4));

        let shoulder = demo.scene.node_by_name("shoulder group").unwrap();
        let rotation = demo.scene.get_node(shoulder).unwrap().transform.rotation();
        assert!(rotation.abs_diff_eq(Quat::from_rotation_z(std::f32::consts::FRAC_PI_2), 1e-6));
    }

    #[test]
    fn test_joint_ranges_are_enforced() {
        let demo = build(DEFAULT_ANIMATION_DURATION_MS).unwrap();
        let rig = demo.rig.as_ref().unwrap();
        let writers = rig.writers(&demo.channels);

        // elbow x accepts 0..2
        writers[2].write(3.0);
        assert_eq!(demo.channels.read_channel(rig.joints[2].channel), 2.0);

        // hand z accepts -0.5..0.5
        writers[6].write(-1.0);
        assert_eq!(demo.channels.read_channel(rig.joints[6].channel), -0.5);
    }

    #[test]
    fn test_sweep_pose_stays_in_range() {
        let demo = build(DEFAULT_ANIMATION_DURATION_MS).unwrap();
        let rig = demo.rig.as_ref().unwrap();

        for step in 0..200 {
            let pose = rig.sweep_pose(step as f64 * 97.0);
            for (joint, value) in rig.joints.iter().zip(pose) {
                assert!(value >= joint.min - 1e-5 && value <= joint.max + 1e-5);
            }
        }
    }

    #[test]
    fn test_driver_writes_until_stopped() {
        let demo = build(DEFAULT_ANIMATION_DURATION_MS).unwrap();
        let rig = demo.rig.clone().unwrap();
        let writers = rig.writers(&demo.channels);
        let stop = StopHandle::new();

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        let poses = runtime.block_on(async {
            let task = tokio::spawn(drive(
                rig.clone(),
                writers,
                stop.clone(),
                Duration::from_millis(1),
            ));
            tokio::time::sleep(Duration::from_millis(20)).await;
            stop.request_stop();
            task.await.unwrap()
        });

        assert!(poses > 0);
        for joint in &rig.joints {
            let value = demo.channels.read_channel(joint.channel);
            assert!(value >= joint.min && value <= joint.max);
        }
    }
}
