//! Collision detection: sweep-and-prune broad phase, shape-pair narrow phase, contacts.

pub mod broadphase;
pub mod clipping;
pub mod contact;
pub mod narrowphase;

pub use broadphase::BroadPhase;
pub use contact::{CollisionEvent, Contact, ContactInfo, ContactManifold, ContactPoint};
pub use narrowphase::NarrowPhase;
