use fnv::FnvHashMap;
use protocol::joint_desc::{BodyDesc, SixDofJointDesc};
use protocol::{BodyId, ColliderId, JointId};

use crate::body::{BRef, Body, BodyTemplate};
use crate::constraint::distance::DistanceConstraint;
use crate::constraint::six_dof::SixDofConstraint;
use crate::constraint::CRef;
use crate::error::{PhysicsError, Result};
use crate::physical_model::PhysicalModel;
use crate::posbox::Posbox;
use crate::{Q, V3};

#[derive(Clone, Copy, Debug)]
pub struct Collider {
	pub body: BodyId,
	pub enabled: bool,
}

pub struct PWorld {
	pub dt: f32,
	pub ppr: usize,
	pub iteration: usize,
	pub max_dp: f32,
	pub gravity: V3,

	id_alloc: u64,
	bodies: FnvHashMap<BodyId, BRef>,
	colliders: FnvHashMap<ColliderId, Collider>,
	constraints: Vec<CRef>,
	joints: FnvHashMap<JointId, CRef>,
	posbox: Option<Posbox>,
}

impl Default for PWorld {
	fn default() -> Self {
		Self {
			dt: 0.002,
			ppr: 10,
			iteration: 10,
			max_dp: 0.1,
			gravity: V3::new(0., -9.8, 0.),

			id_alloc: 0,
			bodies: FnvHashMap::default(),
			colliders: FnvHashMap::default(),
			constraints: Vec::new(),
			joints: FnvHashMap::default(),
			posbox: None,
		}
	}
}

impl PWorld {
	pub fn with_dt(mut self, dt: f32) -> Self {
		self.dt = dt;
		self
	}

	pub fn with_ppr(mut self, ppr: usize) -> Self {
		self.ppr = ppr;
		self
	}

	pub fn with_gravity(mut self, gravity: V3) -> Self {
		self.gravity = gravity;
		self
	}

	pub fn with_posbox(mut self, posbox: Posbox) -> Self {
		self.posbox = Some(posbox);
		self
	}

	fn alloc_id(&mut self) -> u64 {
		self.id_alloc += 1;
		self.id_alloc
	}

	pub fn add_body(&mut self, template: BodyTemplate) -> BodyId {
		let id = BodyId(self.alloc_id());
		self.bodies.insert(id, Body::new_ref(id, template));
		id
	}

	/// Adds every body and link of `model`, shifted by `offset`. Returned
	/// ids follow the model's body order.
	pub fn add_model(
		&mut self,
		physical_model: PhysicalModel,
		offset: V3,
	) -> Vec<BodyId> {
		let mut id_map = vec![];
		for mut template in physical_model.bodies.into_iter() {
			template.pos += offset;
			id_map.push(self.add_body(template));
		}
		for link in physical_model.links.iter() {
			let p1 = self.bodies[&id_map[link.bodies[0]]].clone();
			let p2 = self.bodies[&id_map[link.bodies[1]]].clone();
			let con = DistanceConstraint::new(p1, p2)
				.with_compliance(link.compliance)
				.build();
			self.constraints.push(con);
		}
		id_map
	}

	pub fn body(&self, id: BodyId) -> Result<&BRef> {
		self.bodies.get(&id).ok_or(PhysicsError::BodyNotFound(id))
	}

	pub fn body_name(&self, id: BodyId) -> Result<String> {
		Ok(self.body(id)?.read().name.clone())
	}

	pub fn find_body(&self, name: &str) -> Option<BodyId> {
		self.bodies
			.iter()
			.filter(|(_, b)| b.read().name == name)
			.map(|(id, _)| *id)
			.min()
	}

	pub fn pose(&self, id: BodyId) -> Result<(V3, Q)> {
		let b = self.body(id)?.read();
		Ok((b.pos, b.rot))
	}

	pub fn set_pose(&mut self, id: BodyId, pos: V3, rot: Q) -> Result<()> {
		self.body(id)?.write().set_pose(pos, rot);
		Ok(())
	}

	pub fn is_dynamic(&self, id: BodyId) -> Result<bool> {
		Ok(self.body(id)?.read().dynamic)
	}

	/// Gives `id` dynamics from `desc` unless it already has them. Returns
	/// whether the body was changed.
	pub fn ensure_dynamic(&mut self, id: BodyId, desc: &BodyDesc) -> Result<bool> {
		let mut b = self.body(id)?.write();
		if b.dynamic {
			return Ok(false);
		}
		b.apply_desc(desc);
		Ok(true)
	}

	pub fn add_collider(&mut self, body: BodyId) -> Result<ColliderId> {
		self.body(body)?;
		let id = ColliderId(self.alloc_id());
		self.colliders.insert(
			id,
			Collider {
				body,
				enabled: true,
			},
		);
		Ok(id)
	}

	pub fn collider(&self, id: ColliderId) -> Result<Collider> {
		self.colliders
			.get(&id)
			.copied()
			.ok_or(PhysicsError::ColliderNotFound(id))
	}

	pub fn set_collider_enabled(
		&mut self,
		id: ColliderId,
		enabled: bool,
	) -> Result<()> {
		let c = self
			.colliders
			.get_mut(&id)
			.ok_or(PhysicsError::ColliderNotFound(id))?;
		c.enabled = enabled;
		Ok(())
	}

	/// Bodies within `radius` of an enabled collider, nearest first. A
	/// disabled collider touches nothing.
	pub fn overlaps(&self, id: ColliderId, radius: f32) -> Result<Vec<BodyId>> {
		let c = self.collider(id)?;
		if !c.enabled {
			return Ok(vec![]);
		}
		let center = self.body(c.body)?.read().get_pos();
		let mut result: Vec<(f32, BodyId)> = self
			.bodies
			.iter()
			.filter(|(bid, _)| **bid != c.body)
			.map(|(bid, b)| ((b.read().get_pos() - center).magnitude(), *bid))
			.filter(|(d, _)| *d <= radius)
			.collect();
		result.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
		Ok(result.into_iter().map(|(_, bid)| bid).collect())
	}

	pub fn add_joint(
		&mut self,
		owner: BodyId,
		connected: BodyId,
		desc: SixDofJointDesc,
	) -> Result<JointId> {
		if owner == connected {
			return Err(PhysicsError::DegenerateJoint(format!(
				"{} joined to itself",
				owner
			)));
		}
		let a = self.body(owner)?.clone();
		let b = self.body(connected)?.clone();
		let id = JointId(self.alloc_id());
		self.joints
			.insert(id, SixDofConstraint::new(a, b, desc).build());
		Ok(id)
	}

	pub fn remove_joint(&mut self, id: JointId) -> Result<()> {
		self.joints
			.remove(&id)
			.map(|_| ())
			.ok_or(PhysicsError::JointNotFound(id))
	}

	/// Owner and connected body of a joint.
	pub fn joint_bodies(&self, id: JointId) -> Result<Vec<BodyId>> {
		self.joints
			.get(&id)
			.map(|j| j.bodies())
			.ok_or(PhysicsError::JointNotFound(id))
	}

	pub fn has_joint(&self, id: JointId) -> bool {
		self.joints.contains_key(&id)
	}

	pub fn joint_count(&self) -> usize {
		self.joints.len()
	}

	pub fn len(&self) -> Vec<usize> {
		vec![
			self.bodies.len(),
			self.constraints.len(),
			self.joints.len(),
		]
	}

	#[cfg(not(debug_assertions))]
	fn solve_constraints(&mut self, dt: f32) {
		use rayon::prelude::*;
		self.constraints
			.par_iter_mut()
			.chain(self.joints.par_iter_mut().map(|(_k, v)| v))
			.for_each(|constraint| constraint.step(dt));
	}

	#[cfg(debug_assertions)]
	fn solve_constraints(&mut self, dt: f32) {
		self.constraints
			.iter_mut()
			.chain(self.joints.values_mut())
			.for_each(|constraint| constraint.step(dt));
	}

	fn update_frame(&mut self, dt: f32, iteration: usize) {
		if dt == 0f32 {
			return;
		}
		for b in self.bodies.values() {
			b.write().update(dt, self.gravity, self.max_dp);
		}
		for constraint in self
			.constraints
			.iter_mut()
			.chain(self.joints.values_mut())
		{
			constraint.pre_iteration();
		}
		for _ in 0..iteration {
			self.solve_constraints(dt);
		}
		for constraint in self
			.constraints
			.iter_mut()
			.chain(self.joints.values_mut())
		{
			constraint.post_iteration(dt);
		}
		if let Some(posbox) = self.posbox.as_ref() {
			for b in self.bodies.values() {
				posbox.apply(&mut b.write().pos);
			}
		}
	}

	pub fn run(&mut self) {
		for _ in 0..self.ppr {
			self.update_frame(self.dt, self.iteration);
		}
	}
}
