use protocol::joint_desc::{Motion, ProjectionMode, SixDofJointDesc};
use protocol::BodyId;

use crate::body::{BRef, Body};
use crate::constraint::body_list::BodyList;
use crate::constraint::{CRef, Constraint};
use crate::{Q, V3};

/// Configurable link between an owning body and a connected body.
///
/// Linear axes are resolved in the owner's local frame. Limited axes share
/// one radial travel limit, locked axes are driven to zero and free axes are
/// ignored. The position drive is a soft XPBD constraint whose accumulated
/// impulse is capped by the drive's max force. Projection snaps the
/// connected body back inside the limits when the solver leaves it too far
/// outside.
#[derive(Clone)]
pub struct SixDofConstraint {
	bodies: BodyList,
	desc: SixDofJointDesc,
	lambda_drive: f32,
}

impl SixDofConstraint {
	pub fn new(owner: BRef, connected: BRef, desc: SixDofJointDesc) -> Self {
		Self {
			bodies: BodyList::new(vec![owner, connected]),
			desc,
			lambda_drive: 0.0,
		}
	}

	pub fn desc(&self) -> &SixDofJointDesc {
		&self.desc
	}

	pub fn build(self) -> CRef {
		Box::new(self)
	}

	fn weights(&self, a: &Body, b: &Body) -> (f32, f32) {
		(
			a.get_imass() / self.desc.mass_scale.max(f32::EPSILON),
			b.get_imass() / self.desc.connected_mass_scale.max(f32::EPSILON),
		)
	}

	// connected anchor relative to owner anchor, owner local frame
	fn offset(&self, a: &Body, b: &Body) -> V3 {
		let pa = a.pos + a.rot * self.desc.anchor;
		let pb = b.pos + b.rot * self.desc.connected_anchor;
		a.rot.inverse() * (pb - pa)
	}

	fn linear_error(&self, d: V3) -> V3 {
		let mut locked = V3::zeros();
		let mut limited = V3::zeros();
		for i in 0..3 {
			match self.desc.linear_motion[i] {
				Motion::Locked => locked[i] = d[i],
				Motion::Limited => limited[i] = d[i],
				Motion::Free => {}
			}
		}
		let l = limited.magnitude();
		let limit = self.desc.linear_limit.limit;
		if l > limit && l > 0.0 {
			locked + limited * ((l - limit) / l)
		} else {
			locked
		}
	}

	// relative rotation clamped into the angular limits
	fn clamped_rotation(&self, rel: Q) -> Q {
		let limit = self.desc.angular_limit.limit.to_radians();
		let mut s = rel.scaled_axis();
		for i in 0..3 {
			match self.desc.angular_motion[i] {
				Motion::Locked => s[i] = 0.0,
				Motion::Limited => s[i] = s[i].clamp(-limit, limit),
				Motion::Free => {}
			}
		}
		Q::from_scaled_axis(s)
	}

	fn correct_linear(a: &mut Body, b: &mut Body, err: V3, wa: f32, wb: f32) {
		let w = wa + wb;
		let e = a.rot * err;
		a.add_pos(e * (wa / w));
		b.add_pos(-e * (wb / w));
	}

	fn correct_angular(a: &mut Body, b: &mut Body, target: Q, wa: f32, wb: f32) {
		let w = wa + wb;
		let rel = a.rot.inverse() * b.rot;
		let new_rel = rel.try_slerp(&target, wb / w, 1e-6).unwrap_or(target);
		b.rot = a.rot * new_rel;
		if wa > 0.0 {
			a.rot = b.rot * target.inverse();
		}
	}
}

impl Constraint for SixDofConstraint {
	fn pre_iteration(&mut self) {
		self.lambda_drive = 0.0;
	}

	fn step(&mut self, dt: f32) {
		let (mut a, mut b) = self.bodies.write_pair();
		let (wa, wb) = self.weights(&a, &b);
		let w = wa + wb;
		if w == 0.0 {
			return;
		}

		// hard travel limit
		let err = self.linear_error(self.offset(&a, &b));
		if err.magnitude() > 0.0 {
			Self::correct_linear(&mut a, &mut b, err, wa, wb);
		}

		// soft position drive toward the anchor
		let drive = self.desc.linear_drive;
		let d = self.offset(&a, &b);
		let c = d.magnitude();
		if drive.spring > 0.0 && c > f32::EPSILON {
			let compliance_t = 1.0 / (drive.spring * dt.powi(2));
			let mut dlambda =
				(-c - compliance_t * self.lambda_drive) / (w + compliance_t);
			let cap = drive.max_force * dt.powi(2);
			let total = (self.lambda_drive + dlambda).clamp(-cap, cap);
			dlambda = total - self.lambda_drive;
			self.lambda_drive = total;
			let n = a.rot * (d / c);
			a.add_pos(-n * dlambda * wa);
			b.add_pos(n * dlambda * wb);
		}

		// angular limit, then angular drive
		let rel = a.rot.inverse() * b.rot;
		let target = self.clamped_rotation(rel);
		if rel.angle_to(&target) > f32::EPSILON {
			Self::correct_angular(&mut a, &mut b, target, wa, wb);
		}
		let drive = self.desc.angular_drive;
		let rel = a.rot.inverse() * b.rot;
		let angle = rel.angle();
		if drive.spring > 0.0 && angle > f32::EPSILON {
			let k = drive.spring * dt.powi(2) * w;
			let mut frac = k / (1.0 + k);
			let reach = drive.max_force / drive.spring;
			if angle * frac > reach {
				frac = reach / angle;
			}
			let target = Q::identity()
				.try_slerp(&rel, 1.0 - frac, 1e-6)
				.unwrap_or(rel);
			Self::correct_angular(&mut a, &mut b, target, wa, wb);
		}
	}

	fn post_iteration(&mut self, dt: f32) {
		let (mut a, mut b) = self.bodies.write_pair();
		let (wa, wb) = self.weights(&a, &b);
		let w = wa + wb;
		if w == 0.0 {
			return;
		}

		// damper acts on the relative velocity once per frame
		let damper = self.desc.linear_drive.damper;
		if damper > 0.0 {
			let vrel = (b.pos - b.ppos) - (a.pos - a.ppos);
			let k = (damper * dt * w).min(1.0);
			a.ppos -= vrel * k * (wa / w);
			b.ppos += vrel * k * (wb / w);
		}

		let projection = self.desc.projection;
		if projection.mode != ProjectionMode::PositionAndRotation || wb == 0.0 {
			return;
		}
		let err = self.linear_error(self.offset(&a, &b));
		if err.magnitude() > projection.distance {
			let e = a.rot * err;
			b.offset_pos(-e);
		}
		let rel = a.rot.inverse() * b.rot;
		let target = self.clamped_rotation(rel);
		if rel.angle_to(&target).to_degrees() > projection.angle {
			b.rot = a.rot * target;
			b.prot = b.rot;
		}
	}

	fn bodies(&self) -> Vec<BodyId> {
		self.bodies.ids()
	}
}
