pub mod body;
pub mod constraint;
pub mod error;
pub mod physical_model;
pub mod posbox;
pub mod pworld;

pub use error::{PhysicsError, Result};

pub type V3 = nalgebra::Vector3<f32>;
pub type Q = nalgebra::UnitQuaternion<f32>;
