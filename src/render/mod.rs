//! Render boundary: a retained mesh store and the renderer invoked once per frame.
//!
//! GPU work lives outside this crate. [`SceneGraph`] keeps what a renderer
//! needs to draw the scene, and [`Renderer`] is the hook a backend implements.

pub mod scene_graph;

pub use scene_graph::{Geometry, MeshDesc, MeshHandle, MeshInstance, SceneGraph, Surface};

use glam::{Quat, Vec3};

/// Mesh-level operations the simulation performs on the render world.
pub trait RenderScene {
    fn add_mesh(&mut self, desc: MeshDesc) -> MeshHandle;

    /// Returns `false` if the handle no longer refers to a mesh.
    fn remove_mesh(&mut self, handle: MeshHandle) -> bool;

    fn set_pose(&mut self, handle: MeshHandle, position: Vec3, rotation: Quat);

    fn mesh_count(&self) -> usize;
}

/// Draws a synchronized scene. Called after every frame's pose copy.
pub trait Renderer {
    fn name(&self) -> &str;

    fn render(&mut self, scene: &SceneGraph);
}

/// Renderer that draws nothing and counts frames; used headless.
#[derive(Debug, Default)]
pub struct NullRenderer {
    frames: u64,
}

impl NullRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Renderer for NullRenderer {
    fn name(&self) -> &str {
        "null"
    }

    fn render(&mut self, _scene: &SceneGraph) {
        self.frames += 1;
    }
}
