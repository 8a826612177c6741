//! GLTF JSON structure building.

use super::binary_packing::PackedBuffer;
use super::glb_assembly::assemble_glb;
use gltf_json as json;
use json::validation::Checked::Valid;
use std::collections::BTreeMap;

/// Vertex streams of one primitive
pub struct PrimitiveData<'a> {
    pub positions: &'a [[f32; 3]],
    pub normals: Option<&'a [[f32; 3]]>,
    pub colors: Option<&'a [[f32; 4]]>,
    pub texcoords: Option<&'a [[f32; 2]]>,
    pub indices: Option<&'a [u32]>,
    pub mode: json::mesh::Mode,
}

impl<'a> PrimitiveData<'a> {
    pub fn triangles(positions: &'a [[f32; 3]], indices: &'a [u32]) -> Self {
        Self {
            positions,
            normals: None,
            colors: None,
            texcoords: None,
            indices: Some(indices),
            mode: json::mesh::Mode::Triangles,
        }
    }

    pub fn lines(positions: &'a [[f32; 3]], indices: &'a [u32]) -> Self {
        Self {
            mode: json::mesh::Mode::Lines,
            ..Self::triangles(positions, indices)
        }
    }
}

/// Incrementally built multi-scene GLB
#[derive(Default)]
pub struct SceneBuilder {
    buffer: PackedBuffer,
    meshes: Vec<json::Mesh>,
    nodes: Vec<json::Node>,
    scenes: Vec<json::Scene>,
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mesh; returns its index
    pub fn mesh(&mut self, name: Option<&str>, primitives: &[PrimitiveData]) -> u32 {
        let primitives = primitives
            .iter()
            .map(|p| {
                let mut attributes = BTreeMap::new();
                attributes.insert(
                    Valid(json::mesh::Semantic::Positions),
                    json::Index::new(self.buffer.positions(p.positions)),
                );
                if let Some(normals) = p.normals {
                    attributes.insert(
                        Valid(json::mesh::Semantic::Normals),
                        json::Index::new(self.buffer.vec3s(normals)),
                    );
                }
                if let Some(colors) = p.colors {
                    attributes.insert(
                        Valid(json::mesh::Semantic::Colors(0)),
                        json::Index::new(self.buffer.vec4s(colors)),
                    );
                }
                if let Some(texcoords) = p.texcoords {
                    attributes.insert(
                        Valid(json::mesh::Semantic::TexCoords(0)),
                        json::Index::new(self.buffer.vec2s(texcoords)),
                    );
                }
                let indices = p
                    .indices
                    .map(|indices| json::Index::new(self.buffer.indices(indices)));

                json::mesh::Primitive {
                    attributes,
                    extensions: Default::default(),
                    extras: Default::default(),
                    indices,
                    material: None,
                    mode: Valid(p.mode),
                    targets: None,
                }
            })
            .collect();

        self.meshes.push(json::Mesh {
            extensions: Default::default(),
            extras: Default::default(),
            name: name.map(str::to_string),
            primitives,
            weights: None,
        });
        self.meshes.len() as u32 - 1
    }

    /// Add a node; returns its index
    pub fn node(&mut self, name: Option<&str>, mesh: Option<u32>, children: &[u32]) -> u32 {
        self.nodes.push(json::Node {
            camera: None,
            children: (!children.is_empty())
                .then(|| children.iter().map(|&c| json::Index::new(c)).collect()),
            extensions: Default::default(),
            extras: Default::default(),
            matrix: None,
            mesh: mesh.map(json::Index::new),
            name: name.map(str::to_string),
            rotation: None,
            scale: None,
            // Transforms are ignored by the exporter
            translation: Some([10.0, 0.0, 0.0]),
            skin: None,
            weights: None,
        });
        self.nodes.len() as u32 - 1
    }

    /// Add a scene (one export layer) with the given root nodes
    pub fn scene(&mut self, name: &str, nodes: &[u32]) {
        self.scenes.push(json::Scene {
            extensions: Default::default(),
            extras: Default::default(),
            name: Some(name.to_string()),
            nodes: nodes.iter().map(|&n| json::Index::new(n)).collect(),
        });
    }

    pub fn build(self) -> Vec<u8> {
        let buffers = vec![json::Buffer {
            byte_length: 0u64.into(), // Will be updated
            extensions: Default::default(),
            extras: Default::default(),
            name: None,
            uri: None,
        }];

        let root = json::Root {
            accessors: self.buffer.accessors,
            animations: Vec::new(),
            asset: json::Asset {
                copyright: None,
                extensions: Default::default(),
                extras: Default::default(),
                generator: Some("blob-export-test".to_string()),
                min_version: None,
                version: "2.0".to_string(),
            },
            buffers,
            buffer_views: self.buffer.views,
            cameras: Vec::new(),
            extensions: Default::default(),
            extras: Default::default(),
            extensions_required: Vec::new(),
            extensions_used: Vec::new(),
            images: Vec::new(),
            materials: Vec::new(),
            meshes: self.meshes,
            nodes: self.nodes,
            samplers: Vec::new(),
            scene: Some(json::Index::new(0)),
            scenes: self.scenes,
            skins: Vec::new(),
            textures: Vec::new(),
        };

        assemble_glb(&root, &self.buffer.data)
    }
}
