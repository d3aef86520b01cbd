// settings: the user facing option menu and its discrete value tables

use protocol::Side;
use serde::{Deserialize, Serialize};

use crate::config::{CuffConfig, LimbRegion};
use crate::error::{CuffError, Result};

#[derive(Clone, Debug, PartialEq)]
pub struct OptionValue<T> {
	pub label: String,
	pub value: T,
}

impl<T> OptionValue<T> {
	pub fn new(label: impl Into<String>, value: T) -> Self {
		Self {
			label: label.into(),
			value,
		}
	}
}

fn steps(
	count: usize,
	start: f32,
	step: f32,
	label: impl Fn(f32) -> String,
) -> Vec<OptionValue<f32>> {
	(0..count)
		.map(|i| {
			let value = start + i as f32 * step;
			OptionValue::new(label(value), value)
		})
		.collect()
}

pub fn delay_time_values() -> Vec<OptionValue<f32>> {
	steps(11, 0.5, 0.25, |v| format!("{:.2}s", v))
}

pub fn distance_values() -> Vec<OptionValue<f32>> {
	steps(11, 0.025, 0.025, |v| format!("{:.3}", v))
}

pub fn mass_values() -> Vec<OptionValue<f32>> {
	steps(11, 1.0, 1.0, |v| format!("{:.1}", v))
}

pub fn spring_values() -> Vec<OptionValue<f32>> {
	steps(11, 500.0, 100.0, |v| format!("{:.0}", v))
}

pub fn damper_values() -> Vec<OptionValue<f32>> {
	steps(11, 25.0, 5.0, |v| format!("{:.0}", v))
}

pub fn chain_length_values() -> Vec<OptionValue<usize>> {
	(2..=9)
		.map(|n| OptionValue::new(format!("{} creatures", n), n))
		.collect()
}

pub fn boolean_values() -> Vec<OptionValue<bool>> {
	vec![
		OptionValue::new("Enabled", true),
		OptionValue::new("Disabled", false),
	]
}

pub fn target_values() -> Vec<OptionValue<LimbRegion>> {
	LimbRegion::ALL
		.into_iter()
		.map(|r| OptionValue::new(r.name(), r))
		.collect()
}

fn check_f32(name: &str, value: f32, table: &[OptionValue<f32>]) -> Result<()> {
	if table.iter().any(|o| (o.value - value).abs() < 1e-4) {
		Ok(())
	} else {
		Err(CuffError::invalid_config(format!(
			"{} = {} is not one of the offered values",
			name, value
		)))
	}
}

/// Values picked in the option menu. Defaults match the menu's initial
/// selection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CuffSettings {
	pub use_no_standup_modifier: bool,
	pub pacify_when_fully_cuffed: bool,
	pub allow_multi_creature_chaining: bool,
	pub max_chain_length: usize,

	pub reset_delay_time: f32,
	pub joint_travel_distance: f32,
	pub joint_offset_distance: f32,
	pub connected_mass_offset: f32,
	pub drag_activation_distance: f32,
	pub spring_strength: f32,
	pub damper_strength: f32,

	pub left_trigger_type: LimbRegion,
	pub right_trigger_type: LimbRegion,
}

impl Default for CuffSettings {
	fn default() -> Self {
		Self {
			use_no_standup_modifier: true,
			pacify_when_fully_cuffed: true,
			allow_multi_creature_chaining: true,
			max_chain_length: 3,
			reset_delay_time: 1.5,
			joint_travel_distance: 0.025,
			joint_offset_distance: 0.05,
			connected_mass_offset: 10.0,
			drag_activation_distance: 2.0,
			spring_strength: 1000.0,
			damper_strength: 50.0,
			left_trigger_type: LimbRegion::Hand,
			right_trigger_type: LimbRegion::Hand,
		}
	}
}

impl CuffSettings {
	pub fn trigger_object_name(&self, side: Side) -> String {
		match side {
			Side::Left => self.left_trigger_type.trigger_name(side),
			Side::Right => self.right_trigger_type.trigger_name(side),
		}
	}

	/// Every menu value must come from its table. The drag distance has no
	/// table of its own and only needs to be positive.
	pub fn validate(&self) -> Result<()> {
		check_f32("reset_delay_time", self.reset_delay_time, &delay_time_values())?;
		check_f32(
			"joint_travel_distance",
			self.joint_travel_distance,
			&distance_values(),
		)?;
		check_f32(
			"joint_offset_distance",
			self.joint_offset_distance,
			&distance_values(),
		)?;
		check_f32("connected_mass_offset", self.connected_mass_offset, &mass_values())?;
		check_f32("spring_strength", self.spring_strength, &spring_values())?;
		check_f32("damper_strength", self.damper_strength, &damper_values())?;
		if !chain_length_values()
			.iter()
			.any(|o| o.value == self.max_chain_length)
		{
			return Err(CuffError::invalid_config(format!(
				"max_chain_length = {} is not one of the offered values",
				self.max_chain_length
			)));
		}
		if !(self.drag_activation_distance > 0.0) {
			return Err(CuffError::invalid_config(
				"drag_activation_distance must be positive",
			));
		}
		Ok(())
	}

	/// Overlays the menu selection onto `config`. Nothing is written when a
	/// value is rejected.
	pub fn apply(&self, config: &mut CuffConfig) -> Result<()> {
		self.validate()?;
		config.no_standup = self.use_no_standup_modifier;
		config.pacify = self.pacify_when_fully_cuffed;
		config.multi_chain = self.allow_multi_creature_chaining;
		config.max_chain = self.max_chain_length;
		config.cooldown = self.reset_delay_time;
		config.joint_travel = self.joint_travel_distance;
		config.joint_offset = self.joint_offset_distance;
		config.connected_mass = self.connected_mass_offset;
		config.drag_distance = self.drag_activation_distance;
		config.spring = self.spring_strength;
		config.damper = self.damper_strength;
		config.left_target = self.trigger_object_name(Side::Left);
		config.right_target = self.trigger_object_name(Side::Right);
		Ok(())
	}

	pub fn to_config(&self) -> Result<CuffConfig> {
		let mut config = CuffConfig::default();
		self.apply(&mut config)?;
		Ok(config)
	}
}
