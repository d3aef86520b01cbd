//! Event-driven orchestration of one restraint item.
//!
//! Every handler takes the chain lock for its whole run, so a contact is
//! resolved end to end before another contact, a tick or a reset can observe
//! the chain.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use protocol::event::{HeldAction, HostEvent};
use protocol::pr_model::PrChain;
use protocol::{BodyId, ColliderId, CreatureId, Side, V3};
use tracing::{debug, error, info, warn};

use crate::anchor::RestraintAnchor;
use crate::chain::ChainManager;
use crate::config::{CuffConfig, CuffModule};
use crate::effects::{self, Reason};
use crate::error::{CuffError, Result};
use crate::host::{Cue, Host, ItemRefs, Physics, Tag};
use crate::joint_factory::JointFactory;
use crate::state::Transition;

static NEXT_TAG: AtomicU64 = AtomicU64::new(1);

/// Parts of the restraint item the controller works with.
#[derive(Clone, Debug)]
pub struct Components {
	pub anchors: [RestraintAnchor; 2],
	/// Colliders of the chain body between the cuffs.
	pub body_colliders: Vec<ColliderId>,
}

impl Components {
	/// Looks every part up by the names the item data gives. Any missing
	/// part fails the whole lookup.
	pub fn resolve<I, P>(item: &I, physics: &P, module: &CuffModule) -> Result<Self>
	where
		I: ItemRefs + ?Sized,
		P: Physics + ?Sized,
	{
		if !item.has_sound(&module.unity_sound_ref) {
			return Err(CuffError::missing(&module.unity_sound_ref));
		}
		let anchor = |side: Side| -> Result<RestraintAnchor> {
			let name = module.cuff_ref(side);
			let collider = item.collider(name).ok_or_else(|| CuffError::missing(name))?;
			let body = physics.collider_body(collider)?;
			Ok(RestraintAnchor::new(side, collider, body))
		};
		let anchors = [anchor(Side::Left)?, anchor(Side::Right)?];
		let body_colliders = item.colliders(&module.unity_body_middle_ref);
		if body_colliders.is_empty() {
			return Err(CuffError::missing(&module.unity_body_middle_ref));
		}
		Ok(Self {
			anchors,
			body_colliders,
		})
	}
}

#[derive(Debug)]
struct Inner {
	registered: bool,
	chain: ChainManager,
	anchors: [RestraintAnchor; 2],
	body_colliders: Vec<ColliderId>,
	last_reset: Option<f32>,
	gripped: bool,
	visible: bool,
}

impl Inner {
	fn in_cooldown(&self, now: f32, cooldown: f32) -> bool {
		self.last_reset.map_or(false, |t| now - t <= cooldown)
	}
}

pub struct RestraintController {
	tag: Tag,
	config: CuffConfig,
	factory: JointFactory,
	inner: Mutex<Inner>,
}

impl RestraintController {
	pub fn new(config: CuffConfig, components: Components) -> Result<Self> {
		config.validate()?;
		let tag = Tag(NEXT_TAG.fetch_add(1, Ordering::Relaxed));
		let factory = JointFactory::new(&config);
		let chain = ChainManager::new(config.max_chain, config.multi_chain);
		Ok(Self {
			tag,
			config,
			factory,
			inner: Mutex::new(Inner {
				registered: false,
				chain,
				anchors: components.anchors,
				body_colliders: components.body_colliders,
				last_reset: None,
				gripped: false,
				visible: false,
			}),
		})
	}

	/// Resolves the item's parts and builds a controller. A failure disables
	/// the feature for this item: it is logged and `None` comes back.
	pub fn try_init<I, P>(
		config: CuffConfig,
		module: &CuffModule,
		item: &I,
		physics: &P,
	) -> Option<Self>
	where
		I: ItemRefs + ?Sized,
		P: Physics + ?Sized,
	{
		let built = Components::resolve(item, physics, module)
			.and_then(|components| Self::new(config, components));
		match built {
			Ok(controller) => {
				info!(
					tag = %controller.tag,
					item = %module.handcuff_id,
					"restraint initialized"
				);
				Some(controller)
			}
			Err(e) => {
				error!(item = %module.handcuff_id, error = %e, "restraint disabled");
				None
			}
		}
	}

	pub fn tag(&self) -> Tag {
		self.tag
	}

	pub fn config(&self) -> &CuffConfig {
		&self.config
	}

	/// Starts taking events. The item starts out hidden.
	pub fn register<H: Host + ?Sized>(&self, host: &mut H) {
		let mut inner = self.inner.lock();
		inner.registered = true;
		inner.visible = false;
		host.set_visible(false);
		debug!(tag = %self.tag, "registered");
	}

	pub fn unregister(&self) {
		let mut inner = self.inner.lock();
		inner.registered = false;
		inner.gripped = false;
		debug!(tag = %self.tag, "unregistered");
	}

	pub fn is_registered(&self) -> bool {
		self.inner.lock().registered
	}

	pub fn is_gripped(&self) -> bool {
		self.inner.lock().gripped
	}

	pub fn is_visible(&self) -> bool {
		self.inner.lock().visible
	}

	pub fn handle<H: Host + ?Sized>(&self, host: &mut H, event: &HostEvent) {
		let mut guard = self.inner.lock();
		let inner = &mut *guard;
		if !inner.registered {
			return;
		}
		match event {
			HostEvent::Contact { body, creature } => {
				self.on_contact(inner, host, *body, *creature)
			}
			HostEvent::Grab => inner.gripped = true,
			HostEvent::Ungrab { .. } => inner.gripped = false,
			HostEvent::Snap => {
				inner.visible = false;
				host.set_visible(false);
			}
			HostEvent::Unsnap => {
				inner.visible = true;
				host.set_visible(true);
			}
			HostEvent::HeldAction(HeldAction::AlternateUseStart) => {
				self.reset(inner, host)
			}
			HostEvent::HeldAction(_) => {}
			HostEvent::Tick { holder } => self.periodic_check(inner, host, *holder),
		}
	}

	/// Tears down every joint and forgets the chain, as the alternate use
	/// action does. Works whether or not the controller is registered.
	pub fn manual_reset<H: Host + ?Sized>(&self, host: &mut H) {
		let mut guard = self.inner.lock();
		self.reset(&mut guard, host);
	}

	pub fn snapshot(&self) -> PrChain {
		let inner = self.inner.lock();
		let mut pr = inner.chain.snapshot();
		pr.anchors_enabled = [inner.anchors[0].is_enabled(), inner.anchors[1].is_enabled()];
		pr
	}

	fn on_contact<H: Host + ?Sized>(
		&self,
		inner: &mut Inner,
		host: &mut H,
		body: BodyId,
		creature: Option<CreatureId>,
	) {
		let Some(creature) = creature else {
			return;
		};
		if host.player() == Some(creature) {
			return;
		}
		let now = host.now();
		if inner.in_cooldown(now, self.config.cooldown) {
			debug!(tag = %self.tag, %creature, "contact during cooldown");
			return;
		}

		let was_member = inner.chain.contains(creature);
		if let Err(reason) = inner.chain.try_admit(creature) {
			debug!(
				tag = %self.tag,
				%creature,
				?reason,
				len = inner.chain.len(),
				"admission rejected"
			);
			return;
		}
		if !was_member {
			if inner.chain.len() == 1 {
				info!(tag = %self.tag, %creature, "chain started");
			} else {
				info!(
					tag = %self.tag,
					%creature,
					len = inner.chain.len(),
					max = self.config.capacity(),
					"creature added to chain"
				);
			}
		}

		let limb = match host.body_name(body) {
			Ok(limb) => limb,
			Err(e) => {
				warn!(tag = %self.tag, %body, error = %e, "contact on unknown body");
				return;
			}
		};
		let Some(side) = self.config.side_for(&limb) else {
			debug!(tag = %self.tag, %creature, limb = %limb, "contact on untracked limb");
			return;
		};
		let attached = inner
			.chain
			.state(creature)
			.map_or(false, |s| s.is_attached(side));
		if attached {
			return;
		}
		self.apply_cuff(inner, host, creature, side, body);
	}

	fn apply_cuff<H: Host + ?Sized>(
		&self,
		inner: &mut Inner,
		host: &mut H,
		creature: CreatureId,
		side: Side,
		limb: BodyId,
	) {
		let anchor = &mut inner.anchors[side.index()];
		let joint = match anchor.attach(host, &self.factory, limb, self.config.offset(side)) {
			Ok(joint) => joint,
			Err(e) => {
				error!(tag = %self.tag, %creature, %side, error = %e, "cuff failed");
				return;
			}
		};
		let transition = match inner.chain.state_mut(creature) {
			Some(state) => state.attach(side, joint),
			None => {
				if let Err(e) = anchor.release(host, joint) {
					warn!(tag = %self.tag, %joint, error = %e, "could not drop orphan joint");
				}
				return;
			}
		};
		if host.release_grip(creature, side) {
			debug!(tag = %self.tag, %creature, %side, "grip released");
		}
		host.play(Cue::Attach);
		info!(tag = %self.tag, %creature, %side, %joint, "cuff applied");

		if transition == Transition::FullyRestrained {
			info!(tag = %self.tag, %creature, "fully restrained");
			effects::apply(host, creature, self.tag, &self.config, Reason::FullyRestrained);
			if inner.chain.check_completion() {
				info!(tag = %self.tag, len = inner.chain.len(), "chain complete");
			}
		}
	}

	fn periodic_check<H: Host + ?Sized>(&self, inner: &mut Inner, host: &mut H, holder: V3) {
		if !inner.gripped {
			return;
		}
		let members: Vec<CreatureId> = inner.chain.members().collect();
		for creature in members {
			if !host.is_valid(creature) {
				self.remove_member(inner, host, creature);
				continue;
			}
			if !inner.chain.fully_restrained(creature) {
				continue;
			}
			let Some(pos) = host.position(creature) else {
				continue;
			};
			let distance = (pos - holder).magnitude();
			if distance >= self.config.drag_distance {
				debug!(tag = %self.tag, %creature, distance, "dragged past threshold");
				effects::apply(host, creature, self.tag, &self.config, Reason::Dragged);
			}
		}
	}

	fn remove_member<H: Host + ?Sized>(&self, inner: &mut Inner, host: &mut H, creature: CreatureId) {
		let Some(mut state) = inner.chain.remove(creature) else {
			return;
		};
		let mut released = 0;
		for (side, joint) in state.take_joints() {
			match inner.anchors[side.index()].release(host, joint) {
				Ok(()) => released += 1,
				Err(e) => warn!(tag = %self.tag, %creature, %joint, error = %e, "could not release joint"),
			}
		}
		if released > 0 {
			host.play(Cue::Detach);
		}
		info!(
			tag = %self.tag,
			%creature,
			len = inner.chain.len(),
			"creature dropped from chain"
		);
	}

	fn reset<H: Host + ?Sized>(&self, inner: &mut Inner, host: &mut H) {
		let Inner {
			chain,
			anchors,
			body_colliders,
			last_reset,
			..
		} = inner;
		let tag = self.tag;
		let remove_tag = self.config.reset_removes_no_standup;
		let mut released = 0;
		chain.reset(|creature, mut state| {
			for (side, joint) in state.take_joints() {
				match anchors[side.index()].release(&mut *host, joint) {
					Ok(()) => released += 1,
					Err(e) => warn!(%tag, %creature, %joint, error = %e, "could not release joint"),
				}
			}
			if remove_tag {
				effects::clear(&mut *host, creature, tag);
			}
		});
		for anchor in anchors.iter_mut() {
			if let Err(e) = anchor.detach(&mut *host) {
				warn!(%tag, side = %anchor.side(), error = %e, "could not restore anchor");
			}
		}
		for collider in body_colliders.iter() {
			if let Err(e) = host.set_collider_enabled(*collider, true) {
				warn!(%tag, %collider, error = %e, "could not restore body collider");
			}
		}
		*last_reset = Some(host.now());
		host.play(Cue::Reset);
		info!(%tag, released, "restraint reset");
	}
}
