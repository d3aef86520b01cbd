use protocol::{BodyId, ColliderId, JointId, Side, V3};
use tracing::{debug, warn};

use crate::error::Result;
use crate::host::Physics;
use crate::joint_factory::JointFactory;

/// One cuff of the pair. Owns every joint it has made; a joint lives until
/// it is released, the anchor is detached, or the restraint is reset.
#[derive(Clone, Debug)]
pub struct RestraintAnchor {
	side: Side,
	collider: ColliderId,
	body: BodyId,
	enabled: bool,
	joints: Vec<JointId>,
}

impl RestraintAnchor {
	pub fn new(side: Side, collider: ColliderId, body: BodyId) -> Self {
		Self {
			side,
			collider,
			body,
			enabled: true,
			joints: Vec::new(),
		}
	}

	pub fn side(&self) -> Side {
		self.side
	}

	pub fn collider(&self) -> ColliderId {
		self.collider
	}

	pub fn body(&self) -> BodyId {
		self.body
	}

	pub fn is_enabled(&self) -> bool {
		self.enabled
	}

	/// Most recent joint, if any.
	pub fn joint(&self) -> Option<JointId> {
		self.joints.last().copied()
	}

	pub fn joints(&self) -> &[JointId] {
		&self.joints
	}

	/// Snaps the cuff onto `target`, links them and disables the cuff's
	/// collider so it stops reporting contacts. On failure the collider is
	/// enabled again, even if earlier joints are still held.
	pub fn attach<P: Physics + ?Sized>(
		&mut self,
		physics: &mut P,
		factory: &JointFactory,
		target: BodyId,
		offset: V3,
	) -> Result<JointId> {
		match self.try_attach(physics, factory, target, offset) {
			Ok(joint) => Ok(joint),
			Err(e) => {
				self.rollback(physics);
				Err(e)
			}
		}
	}

	fn try_attach<P: Physics + ?Sized>(
		&mut self,
		physics: &mut P,
		factory: &JointFactory,
		target: BodyId,
		offset: V3,
	) -> Result<JointId> {
		physics.align(self.body, target)?;
		let joint = factory.configure(physics, self.body, target, offset)?;
		self.joints.push(joint);
		if let Err(e) = physics.set_collider_enabled(self.collider, false) {
			// keep the joint, a live collider only means extra contacts
			warn!(side = %self.side, error = %e, "could not disable cuff collider");
			return Ok(joint);
		}
		self.enabled = false;
		Ok(joint)
	}

	fn rollback<P: Physics + ?Sized>(&mut self, physics: &mut P) {
		if let Err(e) = physics.set_collider_enabled(self.collider, true) {
			warn!(side = %self.side, error = %e, "could not restore cuff collider");
		}
		self.enabled = true;
	}

	/// Destroys one joint made by this anchor. The collider comes back once
	/// the anchor holds nothing.
	pub fn release<P: Physics + ?Sized>(
		&mut self,
		physics: &mut P,
		joint: JointId,
	) -> Result<()> {
		let Some(idx) = self.joints.iter().position(|j| *j == joint) else {
			debug!(side = %self.side, %joint, "joint not held by this anchor");
			return Ok(());
		};
		self.joints.remove(idx);
		let destroyed = physics.destroy_joint(joint);
		if self.joints.is_empty() {
			self.enable(physics)?;
		}
		destroyed
	}

	/// Destroys every held joint and re-enables the collider. Keeps going
	/// past failures and reports the first one.
	pub fn detach<P: Physics + ?Sized>(&mut self, physics: &mut P) -> Result<()> {
		let mut first_err = None;
		for joint in self.joints.drain(..) {
			if let Err(e) = physics.destroy_joint(joint) {
				warn!(side = %self.side, %joint, error = %e, "could not destroy joint");
				first_err.get_or_insert(e);
			}
		}
		if let Err(e) = self.enable(physics) {
			first_err.get_or_insert(e);
		}
		match first_err {
			Some(e) => Err(e),
			None => Ok(()),
		}
	}

	fn enable<P: Physics + ?Sized>(&mut self, physics: &mut P) -> Result<()> {
		physics.set_collider_enabled(self.collider, true)?;
		self.enabled = true;
		Ok(())
	}
}
