// joint_desc: what a physics backend needs to build a cuff link

use crate::V3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Motion {
	Locked,
	Limited,
	Free,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JointDrive {
	pub spring: f32,
	pub damper: f32,
	pub max_force: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SoftLimit {
	pub limit: f32,
	pub bounciness: f32,
	pub contact_distance: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProjectionMode {
	None,
	PositionAndRotation,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
	pub mode: ProjectionMode,
	pub distance: f32,
	// degrees
	pub angle: f32,
}

/// Six degree of freedom link between an owning body and a connected body.
///
/// Axis order in `linear_motion` and `angular_motion` is x, y, z of the
/// owning body's local frame. Angular limits are in degrees.
#[derive(Clone, Debug, PartialEq)]
pub struct SixDofJointDesc {
	pub anchor: V3,
	pub connected_anchor: V3,
	pub auto_connected_anchor: bool,
	pub axis: V3,
	pub secondary_axis: V3,
	pub world_space: bool,
	pub linear_motion: [Motion; 3],
	pub angular_motion: [Motion; 3],
	pub linear_drive: JointDrive,
	pub angular_drive: JointDrive,
	pub linear_limit: SoftLimit,
	pub angular_limit: SoftLimit,
	pub projection: Projection,
	pub mass_scale: f32,
	pub connected_mass_scale: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interpolation {
	None,
	Interpolate,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollisionDetection {
	Discrete,
	Continuous,
}

/// Dynamic body parameters used when a limb lacks a simulated body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyDesc {
	pub mass: f32,
	pub drag: f32,
	pub angular_drag: f32,
	pub use_gravity: bool,
	pub kinematic: bool,
	pub interpolation: Interpolation,
	pub collision_detection: CollisionDetection,
}

impl Default for BodyDesc {
	fn default() -> Self {
		Self {
			mass: 1.0,
			drag: 0.0,
			angular_drag: 0.05,
			use_gravity: true,
			kinematic: false,
			interpolation: Interpolation::None,
			collision_detection: CollisionDetection::Discrete,
		}
	}
}
