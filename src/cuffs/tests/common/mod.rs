#![allow(dead_code)]

use cuffs::config::{CuffConfig, CuffModule};
use cuffs::controller::{Components, RestraintController};
use cuffs::error::{CuffError, Result};
use cuffs::host::{Clock, Creatures, Cue, Feedback, ItemRefs, Physics, Posture, Tag};
use fnv::{FnvHashMap, FnvHashSet};
use protocol::event::HostEvent;
use protocol::joint_desc::{BodyDesc, SixDofJointDesc};
use protocol::{BodyId, ColliderId, CreatureId, JointId, Side, V3};

pub const LIMBS: [&str; 5] = ["Head", "LeftWrist", "RightWrist", "LeftHand", "RightHand"];

#[derive(Clone, Debug)]
pub struct MockCreature {
	pub pos: V3,
	pub killed: bool,
	pub tags: FnvHashSet<Tag>,
	pub posture: Posture,
	pub stops: usize,
	pub gripping: [bool; 2],
	pub limbs: FnvHashMap<String, BodyId>,
}

#[derive(Clone, Debug)]
pub struct MockJoint {
	pub owner: BodyId,
	pub connected: BodyId,
	pub desc: SixDofJointDesc,
}

/// Records everything the restraint asks of its host.
#[derive(Default)]
pub struct MockHost {
	pub time: f32,
	pub player: Option<CreatureId>,
	next_id: u64,
	pub names: FnvHashMap<BodyId, String>,
	pub dynamic: FnvHashSet<BodyId>,
	pub colliders: FnvHashMap<ColliderId, (BodyId, bool)>,
	pub joints: FnvHashMap<JointId, MockJoint>,
	pub destroyed: usize,
	pub creatures: FnvHashMap<CreatureId, MockCreature>,
	pub refs: FnvHashMap<String, Vec<ColliderId>>,
	pub sounds: FnvHashSet<String>,
	pub cues: Vec<Cue>,
	pub visible: Option<bool>,
	pub fail_joints: bool,
	pub fail_effects: bool,
}

impl MockHost {
	fn alloc(&mut self) -> u64 {
		self.next_id += 1;
		self.next_id
	}

	fn add_body(&mut self, name: &str) -> BodyId {
		let id = BodyId(self.alloc());
		self.names.insert(id, name.to_string());
		id
	}

	fn add_collider(&mut self, body: BodyId) -> ColliderId {
		let id = ColliderId(self.alloc());
		self.colliders.insert(id, (body, true));
		id
	}

	/// A host carrying the default restraint item.
	pub fn with_item(module: &CuffModule) -> Self {
		let mut host = Self::default();
		for name in [&module.unity_body_left_ref, &module.unity_body_right_ref] {
			let body = host.add_body(name);
			let collider = host.add_collider(body);
			host.refs.insert(name.clone(), vec![collider]);
		}
		let middle = host.add_body(&module.unity_body_middle_ref);
		let pieces = vec![host.add_collider(middle), host.add_collider(middle)];
		host.refs.insert(module.unity_body_middle_ref.clone(), pieces);
		host.sounds.insert(module.unity_sound_ref.clone());
		host
	}

	pub fn add_creature(&mut self, pos: V3) -> CreatureId {
		let id = CreatureId(self.alloc());
		let limbs = LIMBS
			.iter()
			.map(|name| (name.to_string(), self.add_body(name)))
			.collect();
		self.creatures.insert(
			id,
			MockCreature {
				pos,
				killed: false,
				tags: FnvHashSet::default(),
				posture: Posture::Standing,
				stops: 0,
				gripping: [true; 2],
				limbs,
			},
		);
		id
	}

	pub fn creature(&self, id: CreatureId) -> &MockCreature {
		&self.creatures[&id]
	}

	pub fn contact(&self, creature: CreatureId, limb: &str) -> HostEvent {
		HostEvent::Contact {
			body: self.creatures[&creature].limbs[limb],
			creature: Some(creature),
		}
	}

	pub fn item_colliders(&self) -> Vec<ColliderId> {
		self.refs.values().flatten().copied().collect()
	}

	pub fn all_enabled(&self) -> bool {
		self.item_colliders().iter().all(|c| self.colliders[c].1)
	}

	pub fn anchor_enabled(&self, module: &CuffModule, side: Side) -> bool {
		let collider = self.refs[module.cuff_ref(side)][0];
		self.colliders[&collider].1
	}

	/// Joints linking to a limb of `creature`.
	pub fn joints_on(&self, creature: CreatureId) -> usize {
		let limbs: FnvHashSet<BodyId> = self.creatures[&creature].limbs.values().copied().collect();
		self.joints
			.values()
			.filter(|j| limbs.contains(&j.connected))
			.count()
	}

	pub fn count(&self, cue: Cue) -> usize {
		self.cues.iter().filter(|c| **c == cue).count()
	}

	fn creature_mut(&mut self, id: CreatureId) -> Result<&mut MockCreature> {
		if self.fail_effects {
			return Err(CuffError::effect(id, "brain unavailable"));
		}
		self.creatures
			.get_mut(&id)
			.ok_or(CuffError::CreatureNotFound(id))
	}
}

impl Physics for MockHost {
	fn body_name(&self, body: BodyId) -> Result<String> {
		self.names
			.get(&body)
			.cloned()
			.ok_or_else(|| CuffError::missing(body.to_string()))
	}

	fn collider_body(&self, collider: ColliderId) -> Result<BodyId> {
		self.colliders
			.get(&collider)
			.map(|c| c.0)
			.ok_or_else(|| CuffError::missing(collider.to_string()))
	}

	fn ensure_body(&mut self, body: BodyId, _desc: &BodyDesc) -> Result<()> {
		self.dynamic.insert(body);
		Ok(())
	}

	fn align(&mut self, _body: BodyId, _target: BodyId) -> Result<()> {
		Ok(())
	}

	fn create_joint(
		&mut self,
		owner: BodyId,
		connected: BodyId,
		desc: SixDofJointDesc,
	) -> Result<JointId> {
		if self.fail_joints {
			return Err(CuffError::JointCreation("solver rejected joint".into()));
		}
		let id = JointId(self.alloc());
		self.joints.insert(
			id,
			MockJoint {
				owner,
				connected,
				desc,
			},
		);
		Ok(id)
	}

	fn destroy_joint(&mut self, joint: JointId) -> Result<()> {
		self.joints
			.remove(&joint)
			.map(|_| self.destroyed += 1)
			.ok_or_else(|| CuffError::missing(joint.to_string()))
	}

	fn set_collider_enabled(&mut self, collider: ColliderId, enabled: bool) -> Result<()> {
		let c = self
			.colliders
			.get_mut(&collider)
			.ok_or_else(|| CuffError::missing(collider.to_string()))?;
		c.1 = enabled;
		Ok(())
	}
}

impl Creatures for MockHost {
	fn player(&self) -> Option<CreatureId> {
		self.player
	}

	fn is_valid(&self, creature: CreatureId) -> bool {
		self.creatures.get(&creature).map_or(false, |c| !c.killed)
	}

	fn is_killed(&self, creature: CreatureId) -> bool {
		self.creatures.get(&creature).map_or(false, |c| c.killed)
	}

	fn position(&self, creature: CreatureId) -> Option<V3> {
		self.creatures.get(&creature).map(|c| c.pos)
	}

	fn release_grip(&mut self, creature: CreatureId, side: Side) -> bool {
		match self.creatures.get_mut(&creature) {
			Some(c) => std::mem::replace(&mut c.gripping[side.index()], false),
			None => false,
		}
	}

	fn add_no_standup(&mut self, creature: CreatureId, tag: Tag) -> Result<()> {
		self.creature_mut(creature)?.tags.insert(tag);
		Ok(())
	}

	fn remove_no_standup(&mut self, creature: CreatureId, tag: Tag) -> Result<()> {
		self.creature_mut(creature)?.tags.remove(&tag);
		Ok(())
	}

	fn stop_actions(&mut self, creature: CreatureId) -> Result<()> {
		self.creature_mut(creature)?.stops += 1;
		Ok(())
	}

	fn set_posture(&mut self, creature: CreatureId, posture: Posture) -> Result<()> {
		self.creature_mut(creature)?.posture = posture;
		Ok(())
	}
}

impl Feedback for MockHost {
	fn play(&mut self, cue: Cue) {
		self.cues.push(cue);
	}

	fn set_visible(&mut self, visible: bool) {
		self.visible = Some(visible);
	}
}

impl Clock for MockHost {
	fn now(&self) -> f32 {
		self.time
	}
}

impl ItemRefs for MockHost {
	fn collider(&self, reference: &str) -> Option<ColliderId> {
		self.refs.get(reference).and_then(|c| c.first().copied())
	}

	fn colliders(&self, reference: &str) -> Vec<ColliderId> {
		self.refs.get(reference).cloned().unwrap_or_default()
	}

	fn has_sound(&self, reference: &str) -> bool {
		self.sounds.contains(reference)
	}
}

/// Default item and config targeting wrists, registered and held.
pub fn setup(config: CuffConfig) -> (MockHost, RestraintController, CuffModule) {
	let module = CuffModule::default();
	let mut host = MockHost::with_item(&module);
	let components = Components::resolve(&host, &host, &module).unwrap();
	let config = config.with_targets("LeftWrist", "RightWrist");
	let controller = RestraintController::new(config, components).unwrap();
	controller.register(&mut host);
	controller.handle(&mut host, &HostEvent::Grab);
	(host, controller, module)
}

pub fn cuff(host: &mut MockHost, controller: &RestraintController, creature: CreatureId) {
	for limb in ["LeftWrist", "RightWrist"] {
		let event = host.contact(creature, limb);
		controller.handle(host, &event);
	}
}
