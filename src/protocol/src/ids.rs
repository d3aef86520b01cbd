use serde::{Deserialize, Serialize};

macro_rules! id_type {
	($name:ident, $prefix:literal) => {
		#[derive(
			Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord,
			Serialize, Deserialize,
		)]
		pub struct $name(pub u64);

		impl std::fmt::Display for $name {
			fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
				write!(f, concat!($prefix, "#{}"), self.0)
			}
		}
	};
}

id_type!(CreatureId, "creature");
id_type!(BodyId, "body");
id_type!(ColliderId, "collider");
id_type!(JointId, "joint");
id_type!(HolderId, "holder");
id_type!(ItemId, "item");
