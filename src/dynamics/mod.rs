//! Simulation dynamics: integration, the contact solver, friction, and sleeping.

pub mod friction;
pub mod integrator;
pub mod sleep;
pub mod solver;

pub use friction::apply_friction;
pub use integrator::Integrator;
pub use sleep::SleepManager;
pub use solver::{ContactSolver, SolverStepMetrics};
