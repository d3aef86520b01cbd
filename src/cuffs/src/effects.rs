//! Behaviour suppression on restrained creatures.
//!
//! Both effects are idempotent and best-effort: a failure is logged and the
//! caller carries on.

use protocol::CreatureId;
use tracing::{debug, warn};

use crate::config::CuffConfig;
use crate::error::{CuffError, Result};
use crate::host::{Creatures, Posture, Tag};

/// Why effects are being applied, for the logs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reason {
	FullyRestrained,
	Dragged,
}

/// Applies every enabled effect to `creature`. Returns how many failed.
pub fn apply<C: Creatures + ?Sized>(
	creatures: &mut C,
	creature: CreatureId,
	tag: Tag,
	config: &CuffConfig,
	reason: Reason,
) -> usize {
	let mut failed = 0;
	if config.no_standup {
		match creatures.add_no_standup(creature, tag) {
			Ok(()) => debug!(%tag, %creature, ?reason, "no-standup added"),
			Err(e) => {
				warn!(%tag, %creature, ?reason, error = %e, "could not add no-standup");
				failed += 1;
			}
		}
	}
	if config.pacify {
		match pacify(creatures, creature) {
			Ok(posture) => debug!(%tag, %creature, ?reason, ?posture, "pacified"),
			Err(e) => {
				warn!(%tag, %creature, ?reason, error = %e, "could not pacify");
				failed += 1;
			}
		}
	}
	failed
}

/// Cancels the creature's actions and drops it into a ragdoll posture:
/// inert when killed, destabilized otherwise.
pub fn pacify<C: Creatures + ?Sized>(
	creatures: &mut C,
	creature: CreatureId,
) -> Result<Posture> {
	if !creatures.is_valid(creature) && !creatures.is_killed(creature) {
		return Err(CuffError::CreatureNotFound(creature));
	}
	creatures.stop_actions(creature)?;
	let posture = if creatures.is_killed(creature) {
		Posture::Inert
	} else {
		Posture::Destabilized
	};
	creatures.set_posture(creature, posture)?;
	Ok(posture)
}

/// Lifts this controller's no-standup tag. Returns false on failure.
pub fn clear<C: Creatures + ?Sized>(
	creatures: &mut C,
	creature: CreatureId,
	tag: Tag,
) -> bool {
	match creatures.remove_no_standup(creature, tag) {
		Ok(()) => true,
		Err(e) => {
			warn!(%tag, %creature, error = %e, "could not remove no-standup");
			false
		}
	}
}
