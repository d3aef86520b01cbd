// event: notifications delivered by the host simulation

use crate::{BodyId, CreatureId, V3};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeldAction {
	UseStart,
	UseStop,
	AlternateUseStart,
	AlternateUseStop,
}

#[derive(Clone, Debug)]
pub enum HostEvent {
	// a restraint body touched `body`, which belongs to `creature` if any
	Contact {
		body: BodyId,
		creature: Option<CreatureId>,
	},
	Grab,
	Ungrab {
		throwing: bool,
	},
	Snap,
	Unsnap,
	HeldAction(HeldAction),
	// once per simulation tick, `holder` is where the holding creature stands
	Tick {
		holder: V3,
	},
}
