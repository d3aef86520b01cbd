use protocol::{JointId, Side};

/// Result of attaching one side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
	/// The side was already attached; nothing changed.
	Unchanged,
	Attached,
	/// This attach completed the pair. Reported once per pair.
	FullyRestrained,
}

/// Per creature cuff progress. A side is attached exactly when it holds a
/// joint handle.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RestraintState {
	joints: [Option<JointId>; 2],
}

impl RestraintState {
	pub fn is_attached(&self, side: Side) -> bool {
		self.joints[side.index()].is_some()
	}

	pub fn joint(&self, side: Side) -> Option<JointId> {
		self.joints[side.index()]
	}

	pub fn fully_restrained(&self) -> bool {
		self.joints.iter().all(Option::is_some)
	}

	pub fn attach(&mut self, side: Side, joint: JointId) -> Transition {
		let slot = &mut self.joints[side.index()];
		if slot.is_some() {
			return Transition::Unchanged;
		}
		*slot = Some(joint);
		if self.fully_restrained() {
			Transition::FullyRestrained
		} else {
			Transition::Attached
		}
	}

	pub fn detach(&mut self, side: Side) -> Option<JointId> {
		self.joints[side.index()].take()
	}

	/// Clears both sides and hands back their joints, left first.
	pub fn take_joints(&mut self) -> Vec<(Side, JointId)> {
		Side::BOTH
			.into_iter()
			.filter_map(|side| self.detach(side).map(|j| (side, j)))
			.collect()
	}
}
