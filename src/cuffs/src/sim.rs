//! A self-contained host: the xpbd world, a roster of stick-figure
//! creatures and one restraint item. Drives the sandbox binary and the
//! end-to-end tests.

use fnv::{FnvHashMap, FnvHashSet};
use protocol::event::HostEvent;
use protocol::joint_desc::{BodyDesc, SixDofJointDesc};
use protocol::{BodyId, ColliderId, CreatureId, JointId, Side, V3};
use xpbd::body::BodyTemplate;
use xpbd::physical_model::PhysicalModel;
use xpbd::pworld::PWorld;

use crate::config::CuffModule;
use crate::error::{CuffError, Result};
use crate::host::{Clock, Creatures, Cue, Feedback, ItemRefs, Physics, Posture, Tag};

#[derive(Clone, Debug)]
pub struct SimCreature {
	pub id: CreatureId,
	pub limbs: FnvHashMap<String, BodyId>,
	pub root: BodyId,
	pub killed: bool,
	pub posture: Posture,
	pub no_standup: FnvHashSet<Tag>,
	pub gripping: [bool; 2],
	pub actions_stopped: usize,
}

impl SimCreature {
	pub fn limb(&self, name: &str) -> Option<BodyId> {
		self.limbs.get(name).copied()
	}
}

pub struct SimHost {
	pub world: PWorld,
	creatures: FnvHashMap<CreatureId, SimCreature>,
	owners: FnvHashMap<BodyId, CreatureId>,
	player: Option<CreatureId>,
	next_creature: u64,
	time: f32,
	refs: FnvHashMap<String, Vec<ColliderId>>,
	sounds: FnvHashSet<String>,
	pub cues: Vec<Cue>,
	pub visible: bool,
}

impl SimHost {
	pub fn new(world: PWorld) -> Self {
		Self {
			world,
			creatures: FnvHashMap::default(),
			owners: FnvHashMap::default(),
			player: None,
			next_creature: 0,
			time: 0.0,
			refs: FnvHashMap::default(),
			sounds: FnvHashSet::default(),
			cues: Vec::new(),
			visible: true,
		}
	}

	pub fn spawn_creature(&mut self, offset: V3) -> CreatureId {
		self.next_creature += 1;
		let id = CreatureId(self.next_creature);
		let model = PhysicalModel::new_humanoid(60.0, 1e-6);
		let names: Vec<String> = model.bodies.iter().map(|b| b.name.clone()).collect();
		let ids = self.world.add_model(model, offset);
		let limbs: FnvHashMap<String, BodyId> = names.into_iter().zip(ids.iter().copied()).collect();
		for body in ids.iter() {
			self.owners.insert(*body, id);
		}
		let root = limbs.get("Pelvis").copied().unwrap_or(ids[0]);
		self.creatures.insert(
			id,
			SimCreature {
				id,
				limbs,
				root,
				killed: false,
				posture: Posture::Standing,
				no_standup: FnvHashSet::default(),
				gripping: [false; 2],
				actions_stopped: 0,
			},
		);
		id
	}

	/// Spawns a creature that only operates the item.
	pub fn spawn_player(&mut self, offset: V3) -> CreatureId {
		let id = self.spawn_creature(offset);
		self.player = Some(id);
		id
	}

	/// Builds the restraint item: one pinned body per cuff and a chain body
	/// between them, each carrying a collider named after `module`'s refs.
	pub fn spawn_restraint(&mut self, module: &CuffModule, pos: V3) -> Result<()> {
		let parts = [
			(module.unity_body_left_ref.as_str(), V3::new(-0.15, 0.0, 0.0)),
			(module.unity_body_middle_ref.as_str(), V3::zeros()),
			(module.unity_body_right_ref.as_str(), V3::new(0.15, 0.0, 0.0)),
		];
		for (name, dp) in parts {
			let body = self
				.world
				.add_body(BodyTemplate::new(name, 1.0, pos + dp).pinned());
			let collider = self.world.add_collider(body)?;
			self.refs.entry(name.to_string()).or_default().push(collider);
		}
		self.sounds.insert(module.unity_sound_ref.clone());
		Ok(())
	}

	pub fn creature(&self, id: CreatureId) -> Option<&SimCreature> {
		self.creatures.get(&id)
	}

	pub fn owner(&self, body: BodyId) -> Option<CreatureId> {
		self.owners.get(&body).copied()
	}

	pub fn kill(&mut self, id: CreatureId) {
		if let Some(c) = self.creatures.get_mut(&id) {
			c.killed = true;
		}
	}

	pub fn despawn(&mut self, id: CreatureId) {
		self.creatures.remove(&id);
		self.owners.retain(|_, owner| *owner != id);
	}

	pub fn set_grip(&mut self, id: CreatureId, side: Side, gripping: bool) {
		if let Some(c) = self.creatures.get_mut(&id) {
			c.gripping[side.index()] = gripping;
		}
	}

	/// Moves a creature as a whole, e.g. to drag it around.
	pub fn shift_creature(&mut self, id: CreatureId, dp: V3) -> Result<()> {
		let c = self.creatures.get(&id).ok_or(CuffError::CreatureNotFound(id))?;
		for body in c.limbs.values() {
			self.world.body(*body)?.write().offset_pos(dp);
		}
		Ok(())
	}

	/// The event a restraint receives when it touches `limb` of `creature`.
	pub fn contact_with(&self, creature: CreatureId, limb: &str) -> Option<HostEvent> {
		let body = self.creatures.get(&creature)?.limb(limb)?;
		Some(HostEvent::Contact {
			body,
			creature: Some(creature),
		})
	}

	/// Contacts of every enabled item collider with bodies within `radius`.
	pub fn contacts(&self, radius: f32) -> Result<Vec<HostEvent>> {
		let item_bodies: FnvHashSet<BodyId> = self
			.refs
			.values()
			.flatten()
			.filter_map(|c| self.world.collider(*c).ok().map(|c| c.body))
			.collect();
		let mut events = vec![];
		for collider in self.refs.values().flatten() {
			for body in self.world.overlaps(*collider, radius)? {
				if item_bodies.contains(&body) {
					continue;
				}
				events.push(HostEvent::Contact {
					body,
					creature: self.owner(body),
				});
			}
		}
		Ok(events)
	}

	pub fn step(&mut self) {
		self.world.run();
		self.time += self.world.dt * self.world.ppr as f32;
	}

	pub fn advance(&mut self, seconds: f32) {
		self.time += seconds;
	}

	fn creature_mut(&mut self, id: CreatureId) -> Result<&mut SimCreature> {
		self.creatures
			.get_mut(&id)
			.ok_or(CuffError::CreatureNotFound(id))
	}
}

impl Physics for SimHost {
	fn body_name(&self, body: BodyId) -> Result<String> {
		Physics::body_name(&self.world, body)
	}

	fn collider_body(&self, collider: ColliderId) -> Result<BodyId> {
		self.world.collider_body(collider)
	}

	fn ensure_body(&mut self, body: BodyId, desc: &BodyDesc) -> Result<()> {
		self.world.ensure_body(body, desc)
	}

	fn align(&mut self, body: BodyId, target: BodyId) -> Result<()> {
		self.world.align(body, target)
	}

	fn create_joint(
		&mut self,
		owner: BodyId,
		connected: BodyId,
		desc: SixDofJointDesc,
	) -> Result<JointId> {
		self.world.create_joint(owner, connected, desc)
	}

	fn destroy_joint(&mut self, joint: JointId) -> Result<()> {
		self.world.destroy_joint(joint)
	}

	fn set_collider_enabled(&mut self, collider: ColliderId, enabled: bool) -> Result<()> {
		Physics::set_collider_enabled(&mut self.world, collider, enabled)
	}
}

impl Creatures for SimHost {
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
		let c = self.creatures.get(&creature)?;
		self.world.pose(c.root).ok().map(|(pos, _)| pos)
	}

	fn release_grip(&mut self, creature: CreatureId, side: Side) -> bool {
		match self.creatures.get_mut(&creature) {
			Some(c) => std::mem::replace(&mut c.gripping[side.index()], false),
			None => false,
		}
	}

	fn add_no_standup(&mut self, creature: CreatureId, tag: Tag) -> Result<()> {
		self.creature_mut(creature)?.no_standup.insert(tag);
		Ok(())
	}

	fn remove_no_standup(&mut self, creature: CreatureId, tag: Tag) -> Result<()> {
		self.creature_mut(creature)?.no_standup.remove(&tag);
		Ok(())
	}

	fn stop_actions(&mut self, creature: CreatureId) -> Result<()> {
		self.creature_mut(creature)?.actions_stopped += 1;
		Ok(())
	}

	fn set_posture(&mut self, creature: CreatureId, posture: Posture) -> Result<()> {
		self.creature_mut(creature)?.posture = posture;
		Ok(())
	}
}

impl Feedback for SimHost {
	fn play(&mut self, cue: Cue) {
		self.cues.push(cue);
	}

	fn set_visible(&mut self, visible: bool) {
		self.visible = visible;
	}
}

impl Clock for SimHost {
	fn now(&self) -> f32 {
		self.time
	}
}

impl ItemRefs for SimHost {
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
