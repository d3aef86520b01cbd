use std::sync::Arc;

use parking_lot::RwLock;
use protocol::joint_desc::BodyDesc;
use protocol::BodyId;

use crate::{Q, V3};

pub type BRef = Arc<RwLock<Body>>;

#[derive(Clone, Debug)]
pub struct BodyTemplate {
	pub name: String,
	pub imass: f32,
	pub pos: V3,
	// false: pinned in place until something gives it dynamics
	pub dynamic: bool,
}

impl BodyTemplate {
	pub fn new(name: impl Into<String>, imass: f32, pos: V3) -> Self {
		Self {
			name: name.into(),
			imass,
			pos,
			dynamic: true,
		}
	}

	pub fn pinned(mut self) -> Self {
		self.dynamic = false;
		self
	}
}

#[derive(Clone, Debug)]
pub struct Body {
	pub id: BodyId, // lock ordering
	pub name: String,
	pub imass: f32,
	pub pos: V3,
	pub ppos: V3,
	pub rot: Q,
	pub prot: Q,
	pub drag: f32,
	pub angular_drag: f32,
	pub use_gravity: bool,
	pub dynamic: bool,
}

impl Body {
	pub fn new_ref(id: BodyId, template: BodyTemplate) -> BRef {
		let result = Self {
			id,
			name: template.name,
			imass: template.imass, // inf is handled
			pos: template.pos,
			ppos: template.pos,
			rot: Q::identity(),
			prot: Q::identity(),
			drag: 0.0,
			angular_drag: 0.05,
			use_gravity: true,
			dynamic: template.dynamic,
		};
		Arc::new(RwLock::new(result))
	}

	pub fn get_id(&self) -> BodyId {
		self.id
	}

	pub fn get_pos(&self) -> V3 {
		self.pos
	}

	pub fn add_pos(&mut self, dp: V3) {
		self.pos += dp
	}

	pub fn offset_pos(&mut self, dp: V3) {
		self.pos += dp;
		self.ppos += dp;
	}

	pub fn reset_pos(&mut self, p: V3) {
		self.pos = p;
		self.ppos = p;
	}

	pub fn set_pose(&mut self, p: V3, r: Q) {
		self.reset_pos(p);
		self.rot = r;
		self.prot = r;
	}

	/// Inverse mass as seen by the solver; bodies without dynamics are
	/// immovable.
	pub fn get_imass(&self) -> f32 {
		if self.dynamic {
			self.imass
		} else {
			0.0
		}
	}

	pub fn apply_desc(&mut self, desc: &BodyDesc) {
		self.imass = if desc.kinematic || desc.mass <= 0.0 {
			0.0
		} else {
			1.0 / desc.mass
		};
		self.drag = desc.drag;
		self.angular_drag = desc.angular_drag;
		self.use_gravity = desc.use_gravity;
		self.dynamic = true;
		self.ppos = self.pos;
		self.prot = self.rot;
	}

	pub fn update(&mut self, t: f32, gravity: V3, max_dp: f32) {
		if self.get_imass() == 0f32 {
			return;
		}
		let ppos = self.pos;
		let accel = if self.use_gravity { gravity } else { V3::zeros() };
		let keep = (1.0 - self.drag * t).max(0.0);
		let mut dp = (self.pos - self.ppos) * keep + accel * t * t;
		if dp.magnitude() > max_dp {
			dp = dp.normalize() * max_dp;
		}
		self.pos += dp;
		self.ppos = ppos;

		let prot = self.rot;
		let spin = self.rot * self.prot.inverse();
		let keep = (1.0 - self.angular_drag * t).max(0.0);
		let spin = Q::identity().try_slerp(&spin, keep, 1e-6).unwrap_or(spin);
		self.rot = spin * self.rot;
		self.prot = prot;
	}
}
