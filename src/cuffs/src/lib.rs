//! Restraint mechanic for ragdoll creatures: a pair of cuff anchors that
//! bind limbs with configurable joints, chain several creatures together and
//! suppress a fully restrained creature's behaviour.

pub mod anchor;
pub mod backend;
pub mod chain;
pub mod config;
pub mod controller;
pub mod effects;
pub mod error;
pub mod host;
pub mod joint_factory;
pub mod pouch;
pub mod settings;
pub mod sim;
pub mod state;

pub use config::{CuffConfig, CuffModule, LimbRegion};
pub use controller::RestraintController;
pub use error::{CuffError, Result};
pub use protocol::Side;
