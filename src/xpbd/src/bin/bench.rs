use std::time::SystemTime;

use protocol::joint_desc::{
	JointDrive, Motion, Projection, ProjectionMode, SixDofJointDesc, SoftLimit,
};
use xpbd::physical_model::PhysicalModel;
use xpbd::posbox::Posbox;
use xpbd::pworld::PWorld;
use xpbd::V3;

fn cuff_desc(z: f32) -> SixDofJointDesc {
	SixDofJointDesc {
		anchor: V3::new(0., 0., z),
		connected_anchor: V3::zeros(),
		auto_connected_anchor: false,
		axis: V3::x(),
		secondary_axis: V3::y(),
		world_space: false,
		linear_motion: [Motion::Limited; 3],
		angular_motion: [Motion::Limited; 3],
		linear_drive: JointDrive {
			spring: 1000.,
			damper: 50.,
			max_force: 1000.,
		},
		angular_drive: JointDrive {
			spring: 500.,
			damper: 25.,
			max_force: 500.,
		},
		linear_limit: SoftLimit {
			limit: 0.025,
			bounciness: 0.,
			contact_distance: 0.001,
		},
		angular_limit: SoftLimit {
			limit: 5.,
			bounciness: 0.,
			contact_distance: 0.001,
		},
		projection: Projection {
			mode: ProjectionMode::PositionAndRotation,
			distance: 0.001,
			angle: 1.,
		},
		mass_scale: 1.,
		connected_mass_scale: 10.,
	}
}

// humanoids cuffed wrist to wrist in a line
fn main() {
	let mut pworld = PWorld::default().with_posbox(Posbox::floor(100., 100.));
	let mut prev = None;
	for n in 0..9 {
		let ids = pworld.add_model(
			PhysicalModel::new_humanoid(1.0, 1e-6),
			V3::new(1.5 * n as f32, 0., 0.),
		);
		let model = PhysicalModel::new_humanoid(1.0, 1e-6);
		let left = model.find("LeftWrist").map(|i| ids[i]);
		let right = model.find("RightWrist").map(|i| ids[i]);
		if let (Some(owner), Some(wrist)) = (prev, left) {
			if let Err(e) = pworld.add_joint(owner, wrist, cuff_desc(-0.05)) {
				eprintln!("ERROR: {}", e);
			}
		}
		prev = right;
	}
	let start = SystemTime::now();
	let rframes = 100;
	for _ in 0..rframes {
		pworld.run();
	}
	let time = rframes as f32 * pworld.dt * pworld.ppr as f32;
	let duration = SystemTime::now()
		.duration_since(start)
		.map(|d| d.as_micros())
		.unwrap_or_default();
	eprintln!("{:?} {:.3}%", pworld.len(), duration as f32 / time / 1e4);
}
