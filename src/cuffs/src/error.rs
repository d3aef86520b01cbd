use protocol::{CreatureId, ItemId};
use thiserror::Error;
use xpbd::PhysicsError;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CuffError {
	/// A required item part could not be found during setup.
	#[error("missing component: {0}")]
	MissingComponent(String),

	#[error("body creation failed: {0}")]
	BodyCreation(String),

	#[error("joint creation failed: {0}")]
	JointCreation(String),

	#[error("physics: {0}")]
	Physics(#[from] PhysicsError),

	#[error("creature not found: {0}")]
	CreatureNotFound(CreatureId),

	#[error("item data not found: {0}")]
	ItemNotFound(String),

	#[error("spawn failed: {0}")]
	Spawn(String),

	#[error("snap of {item} failed: {reason}")]
	Snap { item: ItemId, reason: String },

	#[error("effect on {creature} failed: {reason}")]
	Effect { creature: CreatureId, reason: String },

	#[error("invalid configuration: {0}")]
	InvalidConfig(String),

	#[error("parse error: {0}")]
	Parse(String),
}

impl CuffError {
	pub fn missing(name: impl Into<String>) -> Self {
		Self::MissingComponent(name.into())
	}

	pub fn invalid_config(msg: impl Into<String>) -> Self {
		Self::InvalidConfig(msg.into())
	}

	pub fn effect(creature: CreatureId, reason: impl Into<String>) -> Self {
		Self::Effect {
			creature,
			reason: reason.into(),
		}
	}
}

impl From<serde_json::Error> for CuffError {
	fn from(e: serde_json::Error) -> Self {
		Self::Parse(e.to_string())
	}
}

pub type Result<T> = std::result::Result<T, CuffError>;
