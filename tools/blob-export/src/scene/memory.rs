//! In-memory scene provider

use anyhow::{Context, Result};

use super::{MeshData, MeshHandle, SceneObject, SceneProvider};
use crate::config::Layer;

/// Scene assembled directly from [`MeshData`], for library callers that
/// triangulate geometry themselves.
#[derive(Debug, Default, Clone)]
pub struct MemoryScene {
    meshes: Vec<MeshData>,
    objects: Vec<(Layer, SceneObject)>,
}

impl MemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a mesh data block
    pub fn add_mesh(&mut self, mesh: MeshData) -> MeshHandle {
        self.meshes.push(mesh);
        MeshHandle(self.meshes.len() - 1)
    }

    /// Place an object referencing `mesh` on a layer
    pub fn add_object(&mut self, layer: Layer, name: impl Into<String>, mesh: MeshHandle) {
        self.objects.push((
            layer,
            SceneObject {
                name: name.into(),
                mesh,
            },
        ));
    }
}

impl SceneProvider for MemoryScene {
    fn objects(&self, layer: Layer) -> Result<Vec<SceneObject>> {
        Ok(self
            .objects
            .iter()
            .filter(|(l, _)| *l == layer)
            .map(|(_, object)| object.clone())
            .collect())
    }

    fn mesh(&self, object: &SceneObject) -> Result<MeshData> {
        self.meshes
            .get(object.mesh.0)
            .cloned()
            .with_context(|| format!("Object '{}' references a missing mesh", object.name))
    }
}
