//! Configuration constants and the serde-loadable scene configuration.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default gravity vector applied in the physics world (Y-up).
pub const DEFAULT_GRAVITY: [f32; 3] = [0.0, -9.82, 0.0];

/// Fixed integration sub-step (in seconds).
pub const DEFAULT_TIME_STEP: f32 = 1.0 / 60.0;

/// Upper bound on fixed sub-steps run by a single `step` call.
pub const DEFAULT_MAX_SUBSTEPS: u32 = 3;

/// Number of constraint solver iterations performed per sub-step.
pub const DEFAULT_SOLVER_ITERATIONS: u32 = 10;

/// Default damping applied to linear velocity.
pub const DEFAULT_LINEAR_DAMPING: f32 = 0.01;

/// Default damping applied to angular velocity.
pub const DEFAULT_ANGULAR_DAMPING: f32 = 0.01;

/// Baumgarte factor used to push penetrating bodies apart.
pub const DEFAULT_BIAS_FACTOR: f32 = 0.2;

/// Penetration tolerated before positional correction kicks in.
pub const DEFAULT_PENETRATION_SLOP: f32 = 0.005;

/// Approach speed below which contacts are treated as perfectly inelastic.
pub const DEFAULT_RESTITUTION_THRESHOLD: f32 = 1.0;

/// Bodies slower than this are candidates for sleeping.
pub const DEFAULT_SLEEP_SPEED_LIMIT: f32 = 0.1;

/// Seconds a body has to stay below the speed limit before it sleeps.
pub const DEFAULT_SLEEP_TIME_LIMIT: f32 = 1.0;

/// Impact speed along the contact normal that has to be exceeded to play a hit sound.
pub const IMPACT_SOUND_THRESHOLD: f32 = 1.5;

/// Radius used by the "drop ball" action and the initial population.
pub const DEFAULT_SPHERE_RADIUS: f32 = 0.6;

pub const SPHERE_MASS: f32 = 10.0;

pub const BRICK_MASS: f32 = 100.0;

/// Visual dimensions of a brick; the collision box uses half of each.
pub const BRICK_SIZE: [f32; 3] = [2.0, 1.0, 0.5];

/// Spawns land uniformly in `[-SPAWN_SPREAD / 2, SPAWN_SPREAD / 2)` on x and z.
pub const SPAWN_SPREAD: f32 = 5.0;

pub const SPAWN_HEIGHT: f32 = 6.0;

/// Edge length of the visible floor mesh; the collision plane is infinite.
pub const FLOOR_SIZE: f32 = 100.0;

/// Tunables for a [`DropScene`](crate::scene::DropScene).
///
/// Every field has a default, so a TOML file only needs the keys it changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    pub gravity: Vec3,
    pub time_step: f32,
    pub max_substeps: u32,
    pub solver_iterations: u32,
    pub allow_sleep: bool,
    pub sphere_radius: f32,
    pub spawn_height: f32,
    pub spawn_spread: f32,
    pub initial_spheres: usize,
    pub initial_bricks: usize,
    pub impact_threshold: f32,
    /// Seed for spawn positions and hit volumes; `None` draws from the OS.
    pub seed: Option<u64>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::from_array(DEFAULT_GRAVITY),
            time_step: DEFAULT_TIME_STEP,
            max_substeps: DEFAULT_MAX_SUBSTEPS,
            solver_iterations: DEFAULT_SOLVER_ITERATIONS,
            allow_sleep: true,
            sphere_radius: DEFAULT_SPHERE_RADIUS,
            spawn_height: SPAWN_HEIGHT,
            spawn_spread: SPAWN_SPREAD,
            initial_spheres: 2,
            initial_bricks: 3,
            impact_threshold: IMPACT_SOUND_THRESHOLD,
            seed: None,
        }
    }
}

impl SceneConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Same scene with no initial objects, handy for tests and scripted runs.
    pub fn empty(mut self) -> Self {
        self.initial_spheres = 0;
        self.initial_bricks = 0;
        self
    }
}
