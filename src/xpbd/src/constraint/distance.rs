use protocol::BodyId;

use crate::body::BRef;
use crate::constraint::body_list::BodyList;
use crate::constraint::{rp, CRef, Constraint};

#[derive(Clone)]
pub struct DistanceConstraint {
	ps: BodyList,
	l0: f32,
	lambda: f32,
	compliance: f32,
}

impl DistanceConstraint {
	pub fn new(p1: BRef, p2: BRef) -> Self {
		let pos1 = p1.read().get_pos();
		let pos2 = p2.read().get_pos();
		let l0 = (pos1 - pos2).magnitude();
		Self::new_with_l0(p1, p2, l0)
	}

	pub fn new_with_l0(p1: BRef, p2: BRef, l0: f32) -> Self {
		Self {
			ps: BodyList::new(vec![p1, p2]),
			l0,
			lambda: 0f32,
			compliance: 1e-7,
		}
	}

	pub fn with_compliance(mut self, c: f32) -> Self {
		self.compliance = c;
		self
	}

	pub fn build(self) -> CRef {
		Box::new(self)
	}
}

impl Constraint for DistanceConstraint {
	fn pre_iteration(&mut self) {
		self.lambda = 0f32;
	}

	fn step(&mut self, dt: f32) {
		let (mut p1, mut p2) = self.ps.write_pair();
		let imass1 = p1.get_imass();
		let imass2 = p2.get_imass();
		let imass = imass1 + imass2;
		if imass == 0.0 {
			return;
		}
		let dp = p1.get_pos() - p2.get_pos();
		let l = dp.magnitude();
		if !l.is_normal() {
			p1.add_pos(rp());
			p2.add_pos(rp());
			return;
		}
		let dl = l - self.l0;
		let compliance_t = self.compliance / dt.powi(2);
		let dlambda =
			(-dl - compliance_t * self.lambda) / (imass + compliance_t);
		let correct = dlambda * dp / l;
		self.lambda += dlambda;

		p1.add_pos(correct * imass1);
		p2.add_pos(-correct * imass2);
	}

	fn bodies(&self) -> Vec<BodyId> {
		self.ps.ids()
	}
}
