use protocol::{BodyId, ColliderId, JointId};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PhysicsError {
	#[error("body not found: {0}")]
	BodyNotFound(BodyId),

	#[error("collider not found: {0}")]
	ColliderNotFound(ColliderId),

	#[error("joint not found: {0}")]
	JointNotFound(JointId),

	#[error("degenerate joint: {0}")]
	DegenerateJoint(String),
}

pub type Result<T> = std::result::Result<T, PhysicsError>;
