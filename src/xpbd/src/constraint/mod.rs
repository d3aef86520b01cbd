pub mod body_list;
pub mod distance;
pub mod six_dof;

use dyn_clone::DynClone;
use protocol::BodyId;
use rand::Rng;

use crate::V3;

pub trait Constraint: DynClone + Send + Sync {
	fn pre_iteration(&mut self) {}

	fn step(&mut self, dt: f32);

	// once per frame, after all solver iterations
	fn post_iteration(&mut self, _dt: f32) {}

	fn bodies(&self) -> Vec<BodyId>;
}

dyn_clone::clone_trait_object!(Constraint);

pub type CRef = Box<dyn Constraint>;

// random perturbation to escape coincident points
pub(crate) fn rp() -> V3 {
	let mut rng = rand::thread_rng();
	V3::new(
		rng.gen_range(-1e-4..1e-4),
		rng.gen_range(-1e-4..1e-4),
		rng.gen_range(-1e-4..1e-4),
	)
}
