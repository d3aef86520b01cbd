use parking_lot::RwLockWriteGuard;
use protocol::BodyId;

use crate::body::{BRef, Body};

/// Bodies touched by one constraint. Write locks are always taken in id
/// order so parallel solving cannot deadlock.
#[derive(Clone)]
pub struct BodyList {
	bodies: Vec<BRef>,
	ids: Vec<BodyId>,
}

impl BodyList {
	pub fn new(bodies: Vec<BRef>) -> Self {
		let ids = bodies.iter().map(|x| x.read().get_id()).collect();
		Self { bodies, ids }
	}

	pub fn ids(&self) -> Vec<BodyId> {
		self.ids.clone()
	}

	pub fn len(&self) -> usize {
		self.bodies.len()
	}

	pub fn is_empty(&self) -> bool {
		self.bodies.is_empty()
	}

	// guards come back in construction order
	pub fn write_pair(
		&self,
	) -> (RwLockWriteGuard<'_, Body>, RwLockWriteGuard<'_, Body>) {
		if self.ids[0] <= self.ids[1] {
			let g0 = self.bodies[0].write();
			let g1 = self.bodies[1].write();
			(g0, g1)
		} else {
			let g1 = self.bodies[1].write();
			let g0 = self.bodies[0].write();
			(g0, g1)
		}
	}
}

impl std::ops::Index<usize> for BodyList {
	type Output = BRef;
	fn index(&self, idx: usize) -> &Self::Output {
		&self.bodies[idx]
	}
}
