//! Triangle-soup encoder
//!
//! Writes one vertex record per triangle corner (or two per edge in
//! edges-only mode) with no welding: a position shared by two triangles is
//! written twice. Meshes are appended in visitation order, so each mesh's
//! vertex range starts where the previous one ended.

use blob_common::{
    pack_color_rgba_unorm8, AttributeSet, BlobWriter, FormatError, MeshIndexEntry, NameTable,
    DEFAULT_COLOR, DEFAULT_TEXCOORD, MESH_INDEX_MAGIC, STRINGS_MAGIC,
};

use crate::error::{ExportError, GeometryFault};
use crate::scene::MeshData;

/// Accumulates soup vertex data, names and index entries across meshes
#[derive(Debug)]
pub struct MeshSoupEncoder {
    attributes: AttributeSet,
    data: Vec<u8>,
    names: NameTable,
    index: Vec<MeshIndexEntry>,
    vertex_count: u32,
}

/// Finished soup buffers, ready for the blob writer
#[derive(Debug)]
pub struct MeshSoup {
    pub attributes: AttributeSet,
    pub data: Vec<u8>,
    pub names: NameTable,
    pub index: Vec<MeshIndexEntry>,
}

impl MeshSoupEncoder {
    pub fn new(attributes: AttributeSet) -> Self {
        Self {
            attributes,
            data: Vec::new(),
            names: NameTable::new(),
            index: Vec::new(),
            vertex_count: 0,
        }
    }

    pub fn attributes(&self) -> AttributeSet {
        self.attributes
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Append one mesh and its index entry
    pub fn add_mesh(&mut self, mesh: &MeshData) -> Result<(), ExportError> {
        mesh.validate()?;

        let emitted = if self.attributes.as_lines() {
            self.write_edges(mesh)
        } else {
            self.write_triangles(mesh)
        };

        let vertex_begin = self.vertex_count;
        let vertex_end = u32::try_from(emitted)
            .ok()
            .and_then(|n| vertex_begin.checked_add(n))
            .ok_or(GeometryFault::Overflow { what: "vertex" })?;

        let names = self.names.push(&mesh.name)?;
        self.index.push(MeshIndexEntry::new(
            names.start,
            names.end,
            vertex_begin,
            vertex_end,
        ));
        self.vertex_count = vertex_end;

        tracing::debug!(
            "Encoded '{}': vertices {}..{}",
            mesh.name,
            vertex_begin,
            vertex_end
        );
        Ok(())
    }

    fn write_triangles(&mut self, mesh: &MeshData) -> usize {
        let colors = if self.attributes.color() {
            if mesh.colors.is_none() {
                tracing::warn!(
                    "Trying to export color data, but mesh '{}' has no color layer; will output 0xffffffff",
                    mesh.name
                );
            }
            mesh.colors.as_deref()
        } else {
            None
        };
        let texcoords = if self.attributes.texcoord() {
            if mesh.texcoords.is_none() {
                tracing::warn!(
                    "Trying to export texcoord data, but mesh '{}' has no UV layer; will output (0.0, 0.0)",
                    mesh.name
                );
            }
            mesh.texcoords.as_deref()
        } else {
            None
        };

        self.data
            .reserve(mesh.corner_count() * self.attributes.stride());

        for (t, triangle) in mesh.triangles.iter().enumerate() {
            for (c, corner) in triangle.corners.iter().enumerate() {
                let sample = t * 3 + c;

                // Position (f32x3) - 12 bytes
                self.write_f32s(&mesh.positions[corner.vertex as usize]);

                // Normal (f32x3) - 12 bytes
                if self.attributes.normal() {
                    self.write_f32s(&corner.normal);
                }

                // Color (unorm8x4) - 4 bytes
                if self.attributes.color() {
                    let color = colors
                        .map(|c| pack_color_rgba_unorm8(c[sample]))
                        .unwrap_or(DEFAULT_COLOR);
                    self.data.extend_from_slice(&color);
                }

                // Texcoord (f32x2) - 8 bytes
                if self.attributes.texcoord() {
                    let uv = texcoords.map(|t| t[sample]).unwrap_or(DEFAULT_TEXCOORD);
                    self.write_f32s(&uv);
                }
            }
        }

        mesh.corner_count()
    }

    fn write_edges(&mut self, mesh: &MeshData) -> usize {
        self.data.reserve(mesh.edges.len() * 2 * self.attributes.stride());
        for edge in &mesh.edges {
            for &vertex in edge {
                self.write_f32s(&mesh.positions[vertex as usize]);
            }
        }
        mesh.edges.len() * 2
    }

    fn write_f32s(&mut self, values: &[f32]) {
        for f in values {
            self.data.extend_from_slice(&f.to_le_bytes());
        }
    }

    /// Cross-check the accumulated data against the vertex count
    pub fn finish(self) -> Result<MeshSoup, ExportError> {
        let stride = self.attributes.stride();
        if self.vertex_count as usize * stride != self.data.len() {
            return Err(GeometryFault::ByteCount {
                vertex_count: self.vertex_count,
                stride,
                len: self.data.len(),
            }
            .into());
        }

        Ok(MeshSoup {
            attributes: self.attributes,
            data: self.data,
            names: self.names,
            index: self.index,
        })
    }
}

impl MeshSoup {
    /// Lay out the blob: vertex data, then `str0`, then `idx0`
    pub fn to_blob(&self) -> Result<BlobWriter, FormatError> {
        let mut blob = BlobWriter::new();
        blob.write_chunk(self.attributes.magic(), &self.data)?;
        blob.write_chunk(STRINGS_MAGIC, self.names.as_bytes())?;
        blob.write_records(MESH_INDEX_MAGIC, &self.index)?;
        Ok(blob)
    }
}
