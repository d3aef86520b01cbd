pub mod event;
pub mod ids;
pub mod joint_desc;
pub mod pr_model;

pub use ids::{BodyId, ColliderId, CreatureId, HolderId, ItemId, JointId};

pub type V3 = nalgebra::Vector3<f32>;
pub type Q = nalgebra::UnitQuaternion<f32>;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
	Left,
	Right,
}

impl Side {
	pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

	pub fn index(self) -> usize {
		match self {
			Side::Left => 0,
			Side::Right => 1,
		}
	}

	pub fn name(self) -> &'static str {
		match self {
			Side::Left => "Left",
			Side::Right => "Right",
		}
	}
}

impl std::fmt::Display for Side {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.name())
	}
}
