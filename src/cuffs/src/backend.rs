//! The xpbd world as a restraint physics backend.

use protocol::joint_desc::{BodyDesc, SixDofJointDesc};
use protocol::{BodyId, ColliderId, JointId};
use tracing::trace;
use xpbd::pworld::PWorld;

use crate::error::Result;
use crate::host::Physics;

impl Physics for PWorld {
	fn body_name(&self, body: BodyId) -> Result<String> {
		Ok(PWorld::body_name(self, body)?)
	}

	fn collider_body(&self, collider: ColliderId) -> Result<BodyId> {
		Ok(self.collider(collider)?.body)
	}

	fn ensure_body(&mut self, body: BodyId, desc: &BodyDesc) -> Result<()> {
		if self.ensure_dynamic(body, desc)? {
			trace!(%body, "limb made dynamic");
		}
		Ok(())
	}

	fn align(&mut self, body: BodyId, target: BodyId) -> Result<()> {
		let (pos, rot) = self.pose(target)?;
		self.set_pose(body, pos, rot)?;
		Ok(())
	}

	fn create_joint(
		&mut self,
		owner: BodyId,
		connected: BodyId,
		desc: SixDofJointDesc,
	) -> Result<JointId> {
		Ok(self.add_joint(owner, connected, desc)?)
	}

	fn destroy_joint(&mut self, joint: JointId) -> Result<()> {
		Ok(self.remove_joint(joint)?)
	}

	fn set_collider_enabled(&mut self, collider: ColliderId, enabled: bool) -> Result<()> {
		Ok(PWorld::set_collider_enabled(self, collider, enabled)?)
	}
}
