//! Drop Scene – rigid-body playground for Rust.
//!
//! Spheres and bricks fall onto an infinite floor under configurable gravity.
//! The crate pairs a small impulse-based physics world with a retained render
//! scene, copies body poses onto meshes every frame, and plays a hit sound for
//! hard impacts. Rendering and audio sit behind traits so a windowed backend
//! or a headless test can drive the same scene.

pub mod audio;
pub mod collision;
pub mod config;
pub mod core;
pub mod dynamics;
pub mod error;
pub mod render;
pub mod scene;
pub mod utils;
pub mod world;

pub use glam::{Mat3, Quat, Vec3};

pub use audio::{AudioClip, PlayRecord, RecordingClip, SilentClip};
pub use collision::{
    broadphase::BroadPhase,
    contact::{CollisionEvent, Contact, ContactInfo, ContactManifold, ContactPoint},
    narrowphase::NarrowPhase,
};
pub use config::SceneConfig;
pub use core::{
    collider::{Aabb, ColliderShape},
    material::{ContactMaterial, MaterialId, MaterialTable},
    rigidbody::{RigidBody, SleepState},
    types::{MassProperties, Transform, Velocity},
};
pub use dynamics::{
    integrator::Integrator,
    sleep::SleepManager,
    solver::{ContactSolver, SolverStepMetrics},
};
pub use error::{Result, SceneError};
pub use render::{
    Geometry, MeshDesc, MeshHandle, MeshInstance, NullRenderer, RenderScene, Renderer, SceneGraph,
    Surface,
};
pub use scene::{
    BodyRegistry, DropScene, FrameClock, FrameLoop, GravityPreset, ImpactSoundTrigger,
    ManualClock, ObjectKind, SceneCommand, TimeSource, TrackedObject, WallClock,
};
pub use utils::allocator::{Arena, EntityId};
pub use world::{CollisionCallback, ListenerId, PhysicsWorld};
