//! Scene provider abstraction
//!
//! The exporters never walk an authoring scene themselves. A
//! [`SceneProvider`] lists the mesh-carrying objects of a layer and hands over
//! each referenced mesh already triangulated, with per-corner split normals
//! and optional per-corner color and UV layers.

mod gltf;
mod memory;

pub use self::gltf::GltfScene;
pub use self::memory::MemoryScene;

use anyhow::Result;
use hashbrown::HashSet;

use crate::config::Layer;
use crate::error::GeometryFault;

/// Stable identity of a mesh data block within one scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshHandle(pub usize);

/// Scene object referencing a mesh data block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneObject {
    pub name: String,
    pub mesh: MeshHandle,
}

/// One triangle corner: source vertex plus its split normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Corner {
    pub vertex: u32,
    pub normal: [f32; 3],
}

/// Triangle with its stored face normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub corners: [Corner; 3],
    pub normal: [f32; 3],
}

impl Triangle {
    pub fn vertices(&self) -> [u32; 3] {
        self.corners.map(|c| c.vertex)
    }
}

/// Triangulated mesh data block
///
/// `colors` and `texcoords` are per corner (three per triangle, in triangle
/// order) and are `None` when the mesh has no such layer at all.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub name: String,
    pub positions: Vec<[f32; 3]>,
    pub triangles: Vec<Triangle>,
    pub edges: Vec<[u32; 2]>,
    pub colors: Option<Vec<[f32; 4]>>,
    pub texcoords: Option<Vec<[f32; 2]>>,
}

impl MeshData {
    pub fn corner_count(&self) -> usize {
        self.triangles.len() * 3
    }

    /// Check that every reference and side layer lines up with the mesh
    pub fn validate(&self) -> Result<(), GeometryFault> {
        let count = self.positions.len();
        let out_of_range = |what, item, vertex| GeometryFault::VertexOutOfRange {
            mesh: self.name.clone(),
            what,
            item,
            vertex,
            count,
        };

        for (t, triangle) in self.triangles.iter().enumerate() {
            if let Some(&v) = triangle.vertices().iter().find(|&&v| v as usize >= count) {
                return Err(out_of_range("triangle", t, v));
            }
        }
        for (e, edge) in self.edges.iter().enumerate() {
            if let Some(&v) = edge.iter().find(|&&v| v as usize >= count) {
                return Err(out_of_range("edge", e, v));
            }
        }

        let corners = self.corner_count();
        let layers = [
            ("color", self.colors.as_ref().map(Vec::len)),
            ("texcoord", self.texcoords.as_ref().map(Vec::len)),
        ];
        for (attribute, len) in layers {
            if let Some(len) = len.filter(|&len| len != corners) {
                return Err(GeometryFault::CornerCount {
                    mesh: self.name.clone(),
                    attribute,
                    len,
                    corners,
                });
            }
        }

        Ok(())
    }
}

/// Source of triangulated scene geometry
pub trait SceneProvider {
    /// Mesh-carrying objects of a layer, in visitation order
    fn objects(&self, layer: Layer) -> Result<Vec<SceneObject>>;

    /// Triangulated data of the mesh an object references
    fn mesh(&self, object: &SceneObject) -> Result<MeshData>;
}

/// Meshes still waiting to be exported.
///
/// Several objects may share one mesh; the first object to reach the queue
/// exports it and later ones are skipped.
#[derive(Debug, Default)]
pub struct ExportQueue {
    pending: HashSet<MeshHandle>,
}

impl ExportQueue {
    pub fn new(objects: &[SceneObject]) -> Self {
        Self {
            pending: objects.iter().map(|o| o.mesh).collect(),
        }
    }

    /// Claim a mesh for export; `false` if it was already claimed
    pub fn take(&mut self, mesh: MeshHandle) -> bool {
        self.pending.remove(&mesh)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
