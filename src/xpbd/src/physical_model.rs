use crate::body::BodyTemplate;
use crate::V3;

#[derive(Clone, Debug)]
pub struct LinkTemplate {
	pub bodies: [usize; 2],
	pub compliance: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PhysicalModel {
	pub bodies: Vec<BodyTemplate>,
	pub links: Vec<LinkTemplate>,
}

// name, position, parent
const SPINE: [(&str, [f32; 3], Option<usize>); 3] = [
	("Head", [0.0, 1.7, 0.0], None),
	("Torso", [0.0, 1.4, 0.0], Some(0)),
	("Pelvis", [0.0, 1.0, 0.0], Some(1)),
];

// one side of the body, x is mirrored for the right side
const LIMBS: [(&str, [f32; 3], &str); 10] = [
	("Shoulder", [0.2, 1.45, 0.0], "Torso"),
	("Arm", [0.3, 1.3, 0.0], "Shoulder"),
	("Elbow", [0.35, 1.15, 0.0], "Arm"),
	("Wrist", [0.4, 0.95, 0.0], "Elbow"),
	("Hand", [0.42, 0.88, 0.0], "Wrist"),
	("Hip", [0.1, 1.0, 0.0], "Pelvis"),
	("Leg", [0.1, 0.75, 0.0], "Hip"),
	("Knee", [0.1, 0.5, 0.0], "Leg"),
	("Foot", [0.1, 0.05, 0.0], "Knee"),
	("Toe", [0.1, 0.02, 0.1], "Foot"),
];

impl PhysicalModel {
	/// A stick ragdoll whose limb names follow the `{Left|Right}{Region}`
	/// convention. Wrists are pinned bones without dynamics of their own.
	pub fn new_humanoid(mass: f32, compliance: f32) -> Self {
		let imass = 1.0 / mass;
		let mut bodies: Vec<BodyTemplate> = vec![];
		let mut links = vec![];
		for (name, pos, parent) in SPINE.iter() {
			bodies.push(BodyTemplate::new(*name, imass, V3::from(*pos)));
			if let Some(parent) = parent {
				links.push(LinkTemplate {
					bodies: [*parent, bodies.len() - 1],
					compliance,
				});
			}
		}
		for (side, sign) in [("Left", -1.0f32), ("Right", 1.0)] {
			for (region, pos, parent) in LIMBS.iter() {
				let pos = V3::new(pos[0] * sign, pos[1], pos[2]);
				let mut template =
					BodyTemplate::new(format!("{}{}", side, region), imass, pos);
				if *region == "Wrist" {
					template = template.pinned();
				}
				bodies.push(template);
				let child = bodies.len() - 1;
				let sided = format!("{}{}", side, parent);
				let parent = bodies
					.iter()
					.position(|b| b.name == *parent || b.name == sided);
				if let Some(parent) = parent {
					links.push(LinkTemplate {
						bodies: [parent, child],
						compliance,
					});
				}
			}
		}
		Self { bodies, links }
	}

	pub fn find(&self, name: &str) -> Option<usize> {
		self.bodies.iter().position(|b| b.name == name)
	}
}
