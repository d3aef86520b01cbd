//! Builds the link between a cuff anchor and a limb.
//!
//! Every axis is `Limited`: never locked, so the cuff gives a little under
//! load, and never free. Angular values are half the linear ones. Getting
//! these numbers wrong shows up immediately as jittering or stretchable
//! ragdolls.

use protocol::joint_desc::{
	BodyDesc, JointDrive, Motion, Projection, ProjectionMode, SixDofJointDesc,
	SoftLimit,
};
use protocol::{BodyId, JointId, V3};

use crate::config::CuffConfig;
use crate::error::{CuffError, Result};
use crate::host::Physics;

pub const LINEAR_MAX_FORCE: f32 = 1000.0;
pub const ANGULAR_MAX_FORCE: f32 = 500.0;
/// Degrees, applied to every rotational axis.
pub const ANGULAR_LIMIT: f32 = 5.0;
pub const CONTACT_DISTANCE: f32 = 0.001;
pub const PROJECTION_DISTANCE: f32 = 0.001;
/// Degrees.
pub const PROJECTION_ANGLE: f32 = 1.0;

#[derive(Clone, Debug, PartialEq)]
pub struct JointFactory {
	spring: f32,
	damper: f32,
	travel: f32,
	connected_mass: f32,
}

impl JointFactory {
	pub fn new(config: &CuffConfig) -> Self {
		Self {
			spring: config.spring,
			damper: config.damper,
			travel: config.joint_travel,
			connected_mass: config.connected_mass,
		}
	}

	/// Dynamics given to a limb that has none.
	pub fn body_desc(&self) -> BodyDesc {
		BodyDesc::default()
	}

	pub fn describe(&self, offset: V3) -> SixDofJointDesc {
		SixDofJointDesc {
			anchor: offset,
			connected_anchor: V3::zeros(),
			auto_connected_anchor: false,
			axis: V3::x(),
			secondary_axis: V3::y(),
			world_space: false,
			linear_motion: [Motion::Limited; 3],
			angular_motion: [Motion::Limited; 3],
			linear_drive: JointDrive {
				spring: self.spring,
				damper: self.damper,
				max_force: LINEAR_MAX_FORCE,
			},
			angular_drive: JointDrive {
				spring: self.spring / 2.0,
				damper: self.damper / 2.0,
				max_force: ANGULAR_MAX_FORCE,
			},
			linear_limit: SoftLimit {
				limit: self.travel,
				bounciness: 0.0,
				contact_distance: CONTACT_DISTANCE,
			},
			angular_limit: SoftLimit {
				limit: ANGULAR_LIMIT,
				bounciness: 0.0,
				contact_distance: CONTACT_DISTANCE,
			},
			projection: Projection {
				mode: ProjectionMode::PositionAndRotation,
				distance: PROJECTION_DISTANCE,
				angle: PROJECTION_ANGLE,
			},
			mass_scale: 1.0,
			connected_mass_scale: self.connected_mass,
		}
	}

	pub fn configure<P: Physics + ?Sized>(
		&self,
		physics: &mut P,
		anchor_body: BodyId,
		target: BodyId,
		offset: V3,
	) -> Result<JointId> {
		physics
			.ensure_body(target, &self.body_desc())
			.map_err(|e| CuffError::BodyCreation(e.to_string()))?;
		physics
			.create_joint(anchor_body, target, self.describe(offset))
			.map_err(|e| CuffError::JointCreation(e.to_string()))
	}
}
