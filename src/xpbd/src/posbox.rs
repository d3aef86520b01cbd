use crate::V3;

pub struct Posbox {
	pub min: V3,
	pub max: V3,
}

impl Posbox {
	// floor at y = 0, walls far away
	pub fn floor(half_extent: f32, height: f32) -> Self {
		Self {
			min: V3::new(-half_extent, 0.0, -half_extent),
			max: V3::new(half_extent, height, half_extent),
		}
	}

	pub fn apply(&self, pos: &mut V3) -> bool {
		let mut flag = false;
		for i in 0..3 {
			if pos[i] < self.min[i] {
				pos[i] = self.min[i];
				flag = true;
			} else if pos[i] > self.max[i] {
				pos[i] = self.max[i];
				flag = true;
			}
		}
		flag
	}
}
