// pr_model: restraint chain snapshot for diagnostics

use serde::{Deserialize, Serialize};

use crate::CreatureId;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrMember {
	pub creature: CreatureId,
	pub left: bool,
	pub right: bool,
}

impl PrMember {
	pub fn fully_restrained(&self) -> bool {
		self.left && self.right
	}
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrChain {
	pub members: Vec<PrMember>,
	pub active: Option<CreatureId>,
	pub complete: bool,
	pub anchors_enabled: [bool; 2],
}

impl PrChain {
	pub fn len(&self) -> usize {
		self.members.len()
	}

	pub fn is_empty(&self) -> bool {
		self.members.is_empty()
	}

	pub fn member(&self, creature: CreatureId) -> Option<&PrMember> {
		self.members.iter().find(|m| m.creature == creature)
	}
}
