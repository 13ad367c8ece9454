//! Core types describing physics entities, components, and shared data.

pub mod collider;
pub mod material;
pub mod rigidbody;
pub mod types;

pub use collider::{Aabb, ColliderShape};
pub use material::{ContactMaterial, MaterialId, MaterialTable, MaterialTableBuilder};
pub use rigidbody::{RigidBody, SleepState};
pub use types::{InertiaTensorExt, MassProperties, Transform, Velocity};
