//! Which creatures one restraint holds, in the order they were added.
//!
//! Members live in a slot map; the creature id only indexes into it. A
//! creature destroyed by the host therefore leaves at worst a stale key that
//! resolves to nothing, never a dangling reference.

use fnv::FnvHashMap;
use protocol::pr_model::{PrChain, PrMember};
use protocol::{CreatureId, Side};
use slotmap::{new_key_type, SlotMap};

use crate::state::RestraintState;

new_key_type! {
	pub struct MemberKey;
}

#[derive(Clone, Debug)]
struct Member {
	creature: CreatureId,
	state: RestraintState,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
	ChainComplete,
	FullyRestrained,
	AtCapacity,
	Occupied,
}

#[derive(Debug)]
pub struct ChainManager {
	members: SlotMap<MemberKey, Member>,
	slots: FnvHashMap<CreatureId, MemberKey>,
	order: Vec<MemberKey>,
	active: Option<MemberKey>,
	complete: bool,
	max_chain: usize,
	multi_chain: bool,
}

impl ChainManager {
	pub fn new(max_chain: usize, multi_chain: bool) -> Self {
		Self {
			members: SlotMap::with_key(),
			slots: FnvHashMap::default(),
			order: Vec::new(),
			active: None,
			complete: false,
			max_chain,
			multi_chain,
		}
	}

	pub fn len(&self) -> usize {
		self.order.len()
	}

	pub fn is_empty(&self) -> bool {
		self.order.is_empty()
	}

	pub fn is_complete(&self) -> bool {
		self.complete
	}

	pub fn contains(&self, creature: CreatureId) -> bool {
		self.slots.contains_key(&creature)
	}

	pub fn active(&self) -> Option<CreatureId> {
		self.active
			.and_then(|k| self.members.get(k))
			.map(|m| m.creature)
	}

	/// Members in chain order.
	pub fn members(&self) -> impl Iterator<Item = CreatureId> + '_ {
		self.order.iter().map(move |k| self.members[*k].creature)
	}

	pub fn state(&self, creature: CreatureId) -> Option<&RestraintState> {
		let key = self.slots.get(&creature)?;
		self.members.get(*key).map(|m| &m.state)
	}

	pub fn state_mut(&mut self, creature: CreatureId) -> Option<&mut RestraintState> {
		let key = self.slots.get(&creature)?;
		self.members.get_mut(*key).map(|m| &mut m.state)
	}

	pub fn fully_restrained(&self, creature: CreatureId) -> bool {
		self.state(creature)
			.map_or(false, RestraintState::fully_restrained)
	}

	/// Admission policy, first match wins:
	/// 1. a complete chain takes no new members;
	/// 2. a fully restrained creature is never taken again;
	/// 3. with multi-chaining, a full chain takes no new members;
	/// 4. without it, only the sole existing member is taken.
	pub fn check_admission(&self, creature: CreatureId) -> Result<(), Rejection> {
		let member = self.contains(creature);
		if self.complete && !member {
			return Err(Rejection::ChainComplete);
		}
		if self.fully_restrained(creature) {
			return Err(Rejection::FullyRestrained);
		}
		if self.multi_chain {
			if self.len() >= self.max_chain && !member {
				return Err(Rejection::AtCapacity);
			}
		} else if !self.is_empty() && !member {
			return Err(Rejection::Occupied);
		}
		Ok(())
	}

	/// Admits `creature` and makes it the active member.
	pub fn try_admit(&mut self, creature: CreatureId) -> Result<(), Rejection> {
		self.check_admission(creature)?;
		let key = match self.slots.get(&creature) {
			Some(key) => *key,
			None => {
				let key = self.members.insert(Member {
					creature,
					state: RestraintState::default(),
				});
				self.slots.insert(creature, key);
				self.order.push(key);
				key
			}
		};
		self.active = Some(key);
		Ok(())
	}

	/// Marks the chain complete once it holds `max_chain` members and its
	/// active member is fully restrained. Returns true only on the call that
	/// completes it. A single-creature chain never fills up, so it never
	/// completes.
	pub fn check_completion(&mut self) -> bool {
		if self.complete {
			return false;
		}
		let active_done = self.active().map_or(false, |c| self.fully_restrained(c));
		if self.len() >= self.max_chain && active_done {
			self.complete = true;
			return true;
		}
		false
	}

	/// Drops one member. The last remaining member becomes active if the
	/// removed one was.
	pub fn remove(&mut self, creature: CreatureId) -> Option<RestraintState> {
		let key = self.slots.remove(&creature)?;
		self.order.retain(|k| *k != key);
		let member = self.members.remove(key)?;
		if self.active == Some(key) {
			self.active = self.order.last().copied();
		}
		Some(member.state)
	}

	/// Empties the chain, handing every member's state to `teardown` in
	/// chain order. Safe to call on an empty chain.
	pub fn reset(&mut self, mut teardown: impl FnMut(CreatureId, RestraintState)) {
		for key in self.order.drain(..) {
			if let Some(member) = self.members.remove(key) {
				teardown(member.creature, member.state);
			}
		}
		self.members.clear();
		self.slots.clear();
		self.active = None;
		self.complete = false;
	}

	pub fn snapshot(&self) -> PrChain {
		PrChain {
			members: self
				.order
				.iter()
				.map(|k| {
					let m = &self.members[*k];
					PrMember {
						creature: m.creature,
						left: m.state.is_attached(Side::Left),
						right: m.state.is_attached(Side::Right),
					}
				})
				.collect(),
			active: self.active(),
			complete: self.complete,
			anchors_enabled: [true; 2],
		}
	}
}
