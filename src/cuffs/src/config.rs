//! Configuration consumed by the restraint core.
//!
//! [`CuffConfig`] is read-only to the core. It can be derived from an item's
//! data record ([`CuffModule`], loaded from JSON) and then overlaid with the
//! user's option menu ([`crate::settings::CuffSettings`]).

use protocol::{Side, V3};
use serde::{Deserialize, Serialize};

use crate::error::{CuffError, Result};

/// Body region a cuff side targets.
#[derive(
	Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(from = "String", into = "String")]
pub enum LimbRegion {
	#[default]
	Hand,
	Foot,
	Arm,
	Leg,
	Elbow,
	Knee,
	Shoulder,
	Hip,
}

impl LimbRegion {
	pub const ALL: [LimbRegion; 8] = [
		LimbRegion::Hand,
		LimbRegion::Foot,
		LimbRegion::Arm,
		LimbRegion::Leg,
		LimbRegion::Elbow,
		LimbRegion::Knee,
		LimbRegion::Shoulder,
		LimbRegion::Hip,
	];

	pub fn name(self) -> &'static str {
		match self {
			LimbRegion::Hand => "Hand",
			LimbRegion::Foot => "Foot",
			LimbRegion::Arm => "Arm",
			LimbRegion::Leg => "Leg",
			LimbRegion::Elbow => "Elbow",
			LimbRegion::Knee => "Knee",
			LimbRegion::Shoulder => "Shoulder",
			LimbRegion::Hip => "Hip",
		}
	}

	/// Unknown names fall back to `Hand`.
	pub fn parse(name: &str) -> Self {
		Self::ALL
			.into_iter()
			.find(|r| r.name() == name)
			.unwrap_or_default()
	}

	/// Name of the limb body this region resolves to, e.g. `LeftHand`.
	pub fn trigger_name(self, side: Side) -> String {
		format!("{}{}", side.name(), self.name())
	}
}

impl From<String> for LimbRegion {
	fn from(name: String) -> Self {
		Self::parse(&name)
	}
}

impl From<LimbRegion> for String {
	fn from(region: LimbRegion) -> Self {
		region.name().to_string()
	}
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CuffConfig {
	/// Seconds after a reset during which contacts are ignored.
	pub cooldown: f32,
	/// Distance from the cuff body to each joint anchor along local z.
	pub joint_offset: f32,
	/// Linear travel limit of a cuff joint.
	pub joint_travel: f32,
	/// Mass scale of the cuffed limb relative to the cuff body.
	pub connected_mass: f32,
	pub spring: f32,
	pub damper: f32,
	/// Holder distance past which a fully restrained creature is knocked
	/// down again every tick.
	pub drag_distance: f32,
	pub max_chain: usize,
	pub multi_chain: bool,
	pub no_standup: bool,
	pub pacify: bool,
	/// Whether a reset lifts the no-standup tag from tracked creatures.
	pub reset_removes_no_standup: bool,
	pub left_target: String,
	pub right_target: String,
}

impl Default for CuffConfig {
	fn default() -> Self {
		Self {
			cooldown: 1.5,
			joint_offset: 0.05,
			joint_travel: 0.025,
			connected_mass: 10.0,
			spring: 1000.0,
			damper: 50.0,
			drag_distance: 2.0,
			max_chain: 3,
			multi_chain: true,
			no_standup: true,
			pacify: true,
			reset_removes_no_standup: true,
			left_target: LimbRegion::Hand.trigger_name(Side::Left),
			right_target: LimbRegion::Hand.trigger_name(Side::Right),
		}
	}
}

impl CuffConfig {
	/// Configuration described by an item's data record. Options the record
	/// does not carry keep their defaults.
	pub fn from_module(module: &CuffModule) -> Self {
		Self {
			cooldown: module.reset_delay_time,
			joint_offset: module.joint_offset_distance,
			joint_travel: module.joint_travel_distance,
			connected_mass: module.connected_mass_offset,
			drag_distance: module.drag_activation_distance,
			no_standup: module.use_no_standup_modifier,
			pacify: module.pacify_when_fully_cuffed,
			reset_removes_no_standup: module.use_no_standup_modifier,
			left_target: module.trigger_object_left_name.clone(),
			right_target: module.trigger_object_right_name.clone(),
			..Default::default()
		}
	}

	#[must_use]
	pub fn with_targets(
		mut self,
		left: impl Into<String>,
		right: impl Into<String>,
	) -> Self {
		self.left_target = left.into();
		self.right_target = right.into();
		self
	}

	#[must_use]
	pub fn with_chain(mut self, multi_chain: bool, max_chain: usize) -> Self {
		self.multi_chain = multi_chain;
		self.max_chain = max_chain;
		self
	}

	#[must_use]
	pub fn with_cooldown(mut self, cooldown: f32) -> Self {
		self.cooldown = cooldown;
		self
	}

	#[must_use]
	pub fn with_drag_distance(mut self, drag_distance: f32) -> Self {
		self.drag_distance = drag_distance;
		self
	}

	#[must_use]
	pub fn with_effects(mut self, no_standup: bool, pacify: bool) -> Self {
		self.no_standup = no_standup;
		self.pacify = pacify;
		self
	}

	pub fn target(&self, side: Side) -> &str {
		match side {
			Side::Left => &self.left_target,
			Side::Right => &self.right_target,
		}
	}

	// left wins when both sides name the same limb
	pub fn side_for(&self, limb: &str) -> Option<Side> {
		Side::BOTH.into_iter().find(|s| self.target(*s) == limb)
	}

	pub fn offset(&self, side: Side) -> V3 {
		match side {
			Side::Left => V3::new(0.0, 0.0, -self.joint_offset),
			Side::Right => V3::new(0.0, 0.0, self.joint_offset),
		}
	}

	/// Largest chain the admission policy allows.
	pub fn capacity(&self) -> usize {
		if self.multi_chain {
			self.max_chain
		} else {
			1
		}
	}

	pub fn validate(&self) -> Result<()> {
		let positive = [
			("joint_travel", self.joint_travel),
			("connected_mass", self.connected_mass),
			("spring", self.spring),
			("drag_distance", self.drag_distance),
		];
		for (name, value) in positive {
			if !(value > 0.0 && value.is_finite()) {
				return Err(CuffError::invalid_config(format!(
					"{} must be positive, got {}",
					name, value
				)));
			}
		}
		let non_negative = [
			("cooldown", self.cooldown),
			("joint_offset", self.joint_offset),
			("damper", self.damper),
		];
		for (name, value) in non_negative {
			if !(value >= 0.0 && value.is_finite()) {
				return Err(CuffError::invalid_config(format!(
					"{} must not be negative, got {}",
					name, value
				)));
			}
		}
		if self.max_chain == 0 {
			return Err(CuffError::invalid_config("max_chain must be at least 1"));
		}
		if self.left_target.is_empty() || self.right_target.is_empty() {
			return Err(CuffError::invalid_config("empty target limb name"));
		}
		Ok(())
	}
}

/// Per-item data record, as authored in the item catalog JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CuffModule {
	#[serde(rename = "handcuffID")]
	pub handcuff_id: String,

	pub reset_delay_time: f32,

	pub joint_offset_distance: f32,
	pub joint_travel_distance: f32,
	pub drag_activation_distance: f32,
	pub connected_mass_offset: f32,

	#[serde(alias = "useNoStadupModifier")]
	pub use_no_standup_modifier: bool,
	pub pacify_when_fully_cuffed: bool,

	pub unity_sound_ref: String,
	pub unity_body_right_ref: String,
	pub unity_body_left_ref: String,
	pub unity_body_middle_ref: String,

	pub trigger_object_right_name: String,
	pub trigger_object_left_name: String,
}

impl Default for CuffModule {
	fn default() -> Self {
		Self {
			handcuff_id: "WizardHandcuffs".into(),
			reset_delay_time: 0.5,
			joint_offset_distance: 0.1,
			joint_travel_distance: 0.05,
			drag_activation_distance: 2.0,
			connected_mass_offset: 1.0,
			use_no_standup_modifier: true,
			pacify_when_fully_cuffed: true,
			unity_sound_ref: "[SoundEffect]".into(),
			unity_body_right_ref: "[RightCuff]".into(),
			unity_body_left_ref: "[LeftCuff]".into(),
			unity_body_middle_ref: "[MiddleBody]".into(),
			trigger_object_right_name: "RightWrist".into(),
			trigger_object_left_name: "LeftWrist".into(),
		}
	}
}

impl CuffModule {
	pub fn from_json(s: &str) -> Result<Self> {
		Ok(serde_json::from_str(s)?)
	}

	pub fn cuff_ref(&self, side: Side) -> &str {
		match side {
			Side::Left => &self.unity_body_left_ref,
			Side::Right => &self.unity_body_right_ref,
		}
	}
}
