//! Capabilities the restraint core needs from the host simulation.
//!
//! The core never owns bodies, joints or creatures. It asks for them through
//! these traits so the same logic runs against the game, the xpbd sandbox or
//! a recording test double.

use protocol::joint_desc::{BodyDesc, SixDofJointDesc};
use protocol::{BodyId, ColliderId, CreatureId, JointId, Side, V3};

use crate::error::Result;

/// Identifies which controller owns a no-standup suppression, so two
/// controllers acting on one creature never lift each other's tags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(pub u64);

impl std::fmt::Display for Tag {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "cuffs#{}", self.0)
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Posture {
	Standing,
	Destabilized,
	Inert,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
	Attach,
	Detach,
	Reset,
}

pub trait Physics {
	fn body_name(&self, body: BodyId) -> Result<String>;

	fn collider_body(&self, collider: ColliderId) -> Result<BodyId>;

	/// Gives `body` dynamics described by `desc` if it has none yet.
	fn ensure_body(&mut self, body: BodyId, desc: &BodyDesc) -> Result<()>;

	/// Moves `body` onto the position and rotation of `target`.
	fn align(&mut self, body: BodyId, target: BodyId) -> Result<()>;

	fn create_joint(
		&mut self,
		owner: BodyId,
		connected: BodyId,
		desc: SixDofJointDesc,
	) -> Result<JointId>;

	fn destroy_joint(&mut self, joint: JointId) -> Result<()>;

	fn set_collider_enabled(&mut self, collider: ColliderId, enabled: bool) -> Result<()>;
}

pub trait Creatures {
	/// The creature operating the restraint; it can never cuff itself.
	fn player(&self) -> Option<CreatureId>;

	/// Present in the world and not killed.
	fn is_valid(&self, creature: CreatureId) -> bool;

	fn is_killed(&self, creature: CreatureId) -> bool;

	fn position(&self, creature: CreatureId) -> Option<V3>;

	/// Forces any grip involving the creature's hand on `side` to let go.
	/// Returns whether something was released.
	fn release_grip(&mut self, creature: CreatureId, side: Side) -> bool;

	fn add_no_standup(&mut self, creature: CreatureId, tag: Tag) -> Result<()>;

	fn remove_no_standup(&mut self, creature: CreatureId, tag: Tag) -> Result<()>;

	/// Cancels whatever the creature is doing with its body parts and
	/// restarts its behaviour tree.
	fn stop_actions(&mut self, creature: CreatureId) -> Result<()>;

	fn set_posture(&mut self, creature: CreatureId, posture: Posture) -> Result<()>;
}

pub trait Feedback {
	fn play(&mut self, cue: Cue);

	fn set_visible(&mut self, visible: bool);
}

pub trait Clock {
	/// Simulation time in seconds.
	fn now(&self) -> f32;
}

pub trait Host: Physics + Creatures + Feedback + Clock {}

impl<T: Physics + Creatures + Feedback + Clock> Host for T {}

/// Named parts of the restraint item, looked up once at setup.
pub trait ItemRefs {
	fn collider(&self, reference: &str) -> Option<ColliderId>;

	/// All colliders under `reference`, e.g. every piece of the chain body.
	fn colliders(&self, reference: &str) -> Vec<ColliderId>;

	fn has_sound(&self, reference: &str) -> bool;
}
