use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::RenderScene;
use crate::{
    core::types::Transform,
    utils::allocator::{Arena, EntityId},
};

/// Handle of a mesh stored in a [`SceneGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MeshHandle(EntityId);

/// Shared unit geometries; instances size them through their scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Geometry {
    /// Radius 1, scaled uniformly by the sphere radius.
    UnitSphere,
    /// Edge length 1, scaled to the brick dimensions.
    UnitCube,
    /// Square in the XZ plane with the given edge length.
    Floor { size: u32 },
}

/// Surface look of a mesh; texture decoding belongs to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Surface {
    Ball,
    StoneBrick,
    Ground,
}

/// Everything needed to create a mesh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeshDesc {
    pub geometry: Geometry,
    pub surface: Surface,
    pub transform: Transform,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl MeshDesc {
    pub fn new(geometry: Geometry, surface: Surface) -> Self {
        Self {
            geometry,
            surface,
            transform: Transform::default(),
            cast_shadow: false,
            receive_shadow: false,
        }
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self
    }

    pub fn scaled(mut self, scale: Vec3) -> Self {
        self.transform.scale = scale;
        self
    }

    pub fn casting_shadow(mut self) -> Self {
        self.cast_shadow = true;
        self
    }

    pub fn receiving_shadow(mut self) -> Self {
        self.receive_shadow = true;
        self
    }
}

/// A mesh living in the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshInstance {
    pub desc: MeshDesc,
    /// Number of pose updates received, for diagnostics.
    pub pose_updates: u64,
}

impl MeshInstance {
    pub fn transform(&self) -> &Transform {
        &self.desc.transform
    }
}

/// In-memory retained scene: the render world as the simulation sees it.
#[derive(Default)]
pub struct SceneGraph {
    meshes: Arena<MeshInstance>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mesh(&self, handle: MeshHandle) -> Option<&MeshInstance> {
        self.meshes.get(handle.0)
    }

    pub fn meshes(&self) -> impl Iterator<Item = (MeshHandle, &MeshInstance)> + '_ {
        self.meshes.iter().map(|(id, mesh)| (MeshHandle(id), mesh))
    }

    pub fn contains(&self, handle: MeshHandle) -> bool {
        self.meshes.contains(handle.0)
    }
}

impl RenderScene for SceneGraph {
    fn add_mesh(&mut self, desc: MeshDesc) -> MeshHandle {
        MeshHandle(self.meshes.insert(MeshInstance {
            desc,
            pose_updates: 0,
        }))
    }

    fn remove_mesh(&mut self, handle: MeshHandle) -> bool {
        self.meshes.remove(handle.0).is_some()
    }

    fn set_pose(&mut self, handle: MeshHandle, position: Vec3, rotation: Quat) {
        if let Some(mesh) = self.meshes.get_mut(handle.0) {
            mesh.desc.transform.position = position;
            mesh.desc.transform.rotation = rotation;
            mesh.pose_updates += 1;
        }
    }

    fn mesh_count(&self) -> usize {
        self.meshes.len()
    }
}
