//! glTF/GLB scene provider
//!
//! Layer N selects the file's scene N-1. Objects are the scene's mesh nodes
//! in depth-first order; node transforms are ignored because exported mesh
//! data stays in object space.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glam::Vec3;
use gltf::mesh::Mode;
use hashbrown::HashSet;

use super::{Corner, MeshData, MeshHandle, SceneObject, SceneProvider, Triangle};
use crate::config::Layer;
use crate::error::{ConfigError, GeometryFault};

/// A loaded glTF document with its buffers
pub struct GltfScene {
    path: PathBuf,
    document: gltf::Document,
    buffers: Vec<gltf::buffer::Data>,
}

impl GltfScene {
    pub fn open(path: &Path) -> Result<Self> {
        let (document, buffers, _images) =
            gltf::import(path).with_context(|| format!("Failed to load glTF: {:?}", path))?;

        Ok(Self {
            path: path.to_path_buf(),
            document,
            buffers,
        })
    }

    /// Number of scenes, i.e. selectable layers
    pub fn layer_count(&self) -> usize {
        self.document.scenes().len()
    }
}

impl SceneProvider for GltfScene {
    fn objects(&self, layer: Layer) -> Result<Vec<SceneObject>> {
        let scene = self
            .document
            .scenes()
            .nth(layer.index())
            .ok_or(ConfigError::MissingLayer {
                layer: layer.get(),
                available: self.layer_count(),
            })?;

        let mut objects = Vec::new();
        for node in scene.nodes() {
            collect_objects(node, &mut objects);
        }
        Ok(objects)
    }

    fn mesh(&self, object: &SceneObject) -> Result<MeshData> {
        let mesh = self
            .document
            .meshes()
            .nth(object.mesh.0)
            .with_context(|| format!("Mesh {} not found in {:?}", object.mesh.0, self.path))?;

        let name = mesh
            .name()
            .map(str::to_owned)
            .unwrap_or_else(|| object.name.clone());

        read_mesh(&mesh, &self.buffers, name)
    }
}

/// Depth-first pre-order walk collecting mesh-carrying nodes
fn collect_objects(node: gltf::Node, objects: &mut Vec<SceneObject>) {
    if let Some(mesh) = node.mesh() {
        objects.push(SceneObject {
            name: node
                .name()
                .map(str::to_owned)
                .unwrap_or_else(|| format!("node{}", node.index())),
            mesh: MeshHandle(mesh.index()),
        });
    }
    for child in node.children() {
        collect_objects(child, objects);
    }
}

/// Concatenate a mesh's primitives into one triangulated data block
fn read_mesh(mesh: &gltf::Mesh, buffers: &[gltf::buffer::Data], name: String) -> Result<MeshData> {
    let mut data = MeshData {
        name,
        ..Default::default()
    };
    let mut colors: Vec<[f32; 4]> = Vec::new();
    let mut texcoords: Vec<[f32; 2]> = Vec::new();
    let mut triangle_primitives = 0usize;
    let mut color_primitives = 0usize;
    let mut texcoord_primitives = 0usize;
    let mut seen_edges: HashSet<(u32, u32)> = HashSet::new();

    for primitive in mesh.primitives() {
        let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

        let Some(positions) = reader.read_positions() else {
            tracing::warn!(
                "Mesh '{}': primitive {} has no positions, skipping",
                data.name,
                primitive.index()
            );
            continue;
        };
        let positions: Vec<[f32; 3]> = positions.collect();
        let vertex_count = positions.len();

        let base = u32::try_from(data.positions.len())
            .map_err(|_| GeometryFault::Overflow { what: "vertex" })?;
        u32::try_from(data.positions.len() + vertex_count)
            .map_err(|_| GeometryFault::Overflow { what: "vertex" })?;

        let indices: Vec<u32> = match reader.read_indices() {
            Some(indices) => indices.into_u32().collect(),
            None => (0..vertex_count as u32).collect(),
        };
        if let Some(&bad) = indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(GeometryFault::VertexOutOfRange {
                mesh: data.name.clone(),
                what: "primitive index",
                item: primitive.index(),
                vertex: bad,
                count: vertex_count,
            }
            .into());
        }

        match primitive.mode() {
            Mode::Triangles => {
                triangle_primitives += 1;
                let normals: Option<Vec<[f32; 3]>> = reader.read_normals().map(|n| n.collect());
                let prim_colors: Option<Vec<[f32; 4]>> =
                    reader.read_colors(0).map(|c| c.into_rgba_f32().collect());
                let prim_texcoords: Option<Vec<[f32; 2]>> =
                    reader.read_tex_coords(0).map(|t| t.into_f32().collect());
                color_primitives += prim_colors.is_some() as usize;
                texcoord_primitives += prim_texcoords.is_some() as usize;

                for tri in indices.chunks_exact(3) {
                    let verts = [tri[0], tri[1], tri[2]];
                    let p = verts.map(|v| Vec3::from(positions[v as usize]));
                    let geometric = (p[1] - p[0]).cross(p[2] - p[0]).normalize_or_zero();

                    let corner_normals = verts.map(|v| {
                        normals
                            .as_ref()
                            .and_then(|n| n.get(v as usize))
                            .map_or(geometric, |&n| Vec3::from(n))
                    });
                    data.triangles.push(Triangle {
                        corners: std::array::from_fn(|i| Corner {
                            vertex: base + verts[i],
                            normal: corner_normals[i].to_array(),
                        }),
                        // Face normal follows the corner order, as authored
                        normal: geometric.to_array(),
                    });

                    for v in verts {
                        if let Some(c) = &prim_colors {
                            colors.push(c.get(v as usize).copied().unwrap_or([1.0; 4]));
                        }
                        if let Some(t) = &prim_texcoords {
                            // glTF UVs start top-left; blobs use a bottom-left origin
                            let uv = t.get(v as usize).map_or([0.0, 0.0], |&[s, t]| [s, 1.0 - t]);
                            texcoords.push(uv);
                        }
                    }

                    for (a, b) in [(0, 1), (1, 2), (2, 0)] {
                        let edge = [base + verts[a], base + verts[b]];
                        if seen_edges.insert((edge[0].min(edge[1]), edge[0].max(edge[1]))) {
                            data.edges.push(edge);
                        }
                    }
                }
            }
            Mode::Lines => {
                for pair in indices.chunks_exact(2) {
                    let edge = [base + pair[0], base + pair[1]];
                    if seen_edges.insert((edge[0].min(edge[1]), edge[0].max(edge[1]))) {
                        data.edges.push(edge);
                    }
                }
            }
            other => {
                tracing::warn!(
                    "Mesh '{}': primitive {} uses unsupported mode {:?}, skipping",
                    data.name,
                    primitive.index(),
                    other
                );
                continue;
            }
        }

        data.positions.extend(positions);
    }

    data.colors = side_layer(&data.name, "color", colors, color_primitives, triangle_primitives);
    data.texcoords = side_layer(
        &data.name,
        "texcoord",
        texcoords,
        texcoord_primitives,
        triangle_primitives,
    );

    tracing::debug!(
        "Read mesh '{}': {} vertices, {} triangles, {} edges",
        data.name,
        data.positions.len(),
        data.triangles.len(),
        data.edges.len()
    );

    Ok(data)
}

/// A side layer counts only when every triangle primitive carries it
fn side_layer<T>(
    mesh: &str,
    attribute: &str,
    samples: Vec<T>,
    carrying: usize,
    triangle_primitives: usize,
) -> Option<Vec<T>> {
    if carrying == 0 || triangle_primitives == 0 {
        return None;
    }
    if carrying < triangle_primitives {
        tracing::warn!(
            "Mesh '{}': only {} of {} primitives have a {} layer, ignoring it",
            mesh,
            carrying,
            triangle_primitives,
            attribute
        );
        return None;
    }
    Some(samples)
}
