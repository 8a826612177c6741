//! Blob loaders
//!
//! Parse finished blobs back into name-addressable meshes, applying the same
//! checks the engine-side loader does: chunk order, record sizes, index
//! ranges within bounds, UTF-8 names, and no duplicated names.

use std::ops::Range;

use hashbrown::HashMap;

use crate::attributes::{AttributeSet, VertexLayout};
use crate::formats::{
    ChunkReader, FormatError, MESH_INDEX_MAGIC, MeshIndexEntry, NORMALS_MAGIC, POSITIONS_MAGIC,
    STRINGS_MAGIC, TRIANGLES_MAGIC, WALKMESH_INDEX_MAGIC, WalkmeshIndexEntry, display_magic,
};

fn check_range(
    entry: usize,
    what: &'static str,
    range: Range<u32>,
    limit: usize,
) -> Result<(), FormatError> {
    if range.start <= range.end && range.end as usize <= limit {
        Ok(())
    } else {
        Err(FormatError::InvalidRange {
            entry,
            what,
            begin: range.start,
            end: range.end,
            limit,
        })
    }
}

fn read_name(entry: usize, names: &[u8], range: Range<u32>) -> Result<String, FormatError> {
    check_range(entry, "name", range.clone(), names.len())?;
    std::str::from_utf8(&names[range.start as usize..range.end as usize])
        .map(str::to_owned)
        .map_err(|_| FormatError::InvalidName(entry))
}

fn warn_trailing(reader: &ChunkReader, kind: &str) {
    if reader.remaining() > 0 {
        tracing::warn!(
            "{} trailing bytes after {} blob index",
            reader.remaining(),
            kind
        );
    }
}

fn read_f32s<const N: usize>(bytes: &[u8]) -> [f32; N] {
    let mut out = [0.0f32; N];
    for (value, raw) in out.iter_mut().zip(bytes.chunks_exact(4)) {
        *value = f32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]);
    }
    out
}

// ============================================================================
// Triangle Soup
// ============================================================================

/// One named vertex range of a soup blob
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeshEntry {
    pub name: String,
    pub vertices: Range<u32>,
}

/// Decoded soup vertex record
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexRecord {
    pub position: [f32; 3],
    pub normal: Option<[f32; 3]>,
    pub color: Option<[u8; 4]>,
    pub texcoord: Option<[f32; 2]>,
}

/// Parsed triangle-soup blob (`<attributes> str0 idx0`)
#[derive(Debug, Clone)]
pub struct MeshBlob {
    pub attributes: AttributeSet,
    pub vertex_data: Vec<u8>,
    pub meshes: Vec<MeshEntry>,
    by_name: HashMap<String, usize>,
}

impl MeshBlob {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FormatError> {
        let mut reader = ChunkReader::new(bytes);

        let data = reader
            .next_chunk()?
            .ok_or_else(|| FormatError::MissingChunk("vertex data".to_string()))?;
        let attributes = AttributeSet::from_magic(data.magic)
            .ok_or_else(|| FormatError::UnknownAttributes(display_magic(&data.magic)))?;
        let stride = attributes.stride();
        if data.payload.len() % stride != 0 {
            return Err(FormatError::RecordSize {
                magic: display_magic(&data.magic),
                length: data.payload.len(),
                record: stride,
            });
        }
        let vertex_count = data.payload.len() / stride;

        let names = reader.expect(STRINGS_MAGIC)?;
        let index: Vec<MeshIndexEntry> = reader.expect_records(MESH_INDEX_MAGIC)?;
        warn_trailing(&reader, "mesh");

        let mut meshes = Vec::with_capacity(index.len());
        let mut by_name = HashMap::with_capacity(index.len());
        for (i, entry) in index.iter().enumerate() {
            let name = read_name(i, names, entry.names())?;
            check_range(i, "vertex", entry.vertices(), vertex_count)?;
            if by_name.insert(name.clone(), i).is_some() {
                return Err(FormatError::DuplicateName(name));
            }
            meshes.push(MeshEntry {
                name,
                vertices: entry.vertices(),
            });
        }

        Ok(Self {
            attributes,
            vertex_data: data.payload.to_vec(),
            meshes,
            by_name,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_data.len() / self.attributes.stride()
    }

    pub fn lookup(&self, name: &str) -> Option<&MeshEntry> {
        self.by_name.get(name).map(|&i| &self.meshes[i])
    }

    /// Raw vertex records of a range
    pub fn vertex_bytes(&self, vertices: Range<u32>) -> Option<&[u8]> {
        let stride = self.attributes.stride();
        self.vertex_data
            .get(vertices.start as usize * stride..vertices.end as usize * stride)
    }

    /// Decode one vertex record
    pub fn vertex(&self, index: usize) -> Option<VertexRecord> {
        let VertexLayout {
            stride,
            normal,
            color,
            texcoord,
        } = self.attributes.layout();
        let bytes = self
            .vertex_data
            .get(index * stride..(index + 1) * stride)?;

        Some(VertexRecord {
            position: read_f32s::<3>(bytes),
            normal: normal.map(|at| read_f32s::<3>(&bytes[at..])),
            color: color.map(|at| [bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]),
            texcoord: texcoord.map(|at| read_f32s::<2>(&bytes[at..])),
        })
    }
}

// ============================================================================
// Walkmesh
// ============================================================================

/// One named vertex and triangle range of a walkmesh blob
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkmeshEntry {
    pub name: String,
    pub vertices: Range<u32>,
    pub triangles: Range<u32>,
}

/// A single walkmesh with triangle indices local to its own vertices
#[derive(Debug, Clone, PartialEq)]
pub struct Walkmesh {
    pub vertices: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub triangles: Vec<[u32; 3]>,
}

/// Parsed walkmesh blob (`p... n... tri0 str0 idxA`)
#[derive(Debug, Clone)]
pub struct WalkmeshBlob {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub triangles: Vec<[u32; 3]>,
    pub meshes: Vec<WalkmeshEntry>,
    by_name: HashMap<String, usize>,
}

impl WalkmeshBlob {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FormatError> {
        let mut reader = ChunkReader::new(bytes);

        let positions: Vec<[f32; 3]> = reader.expect_records(POSITIONS_MAGIC)?;
        let normals: Vec<[f32; 3]> = reader.expect_records(NORMALS_MAGIC)?;
        let triangles: Vec<[u32; 3]> = reader.expect_records(TRIANGLES_MAGIC)?;
        let names = reader.expect(STRINGS_MAGIC)?;
        let index: Vec<WalkmeshIndexEntry> = reader.expect_records(WALKMESH_INDEX_MAGIC)?;
        warn_trailing(&reader, "walkmesh");

        if positions.len() != normals.len() {
            return Err(FormatError::NormalCountMismatch {
                positions: positions.len(),
                normals: normals.len(),
            });
        }

        let mut meshes = Vec::with_capacity(index.len());
        let mut by_name = HashMap::with_capacity(index.len());
        for (i, entry) in index.iter().enumerate() {
            let name = read_name(i, names, entry.names())?;
            check_range(i, "vertex", entry.vertices(), positions.len())?;
            check_range(i, "triangle", entry.triangles(), triangles.len())?;

            let vertices = entry.vertices();
            for t in entry.triangles() {
                if !triangles[t as usize].iter().all(|v| vertices.contains(v)) {
                    return Err(FormatError::TriangleOutsideMesh { name, triangle: t });
                }
            }

            if by_name.insert(name.clone(), i).is_some() {
                return Err(FormatError::DuplicateName(name));
            }
            meshes.push(WalkmeshEntry {
                name,
                vertices,
                triangles: entry.triangles(),
            });
        }

        Ok(Self {
            positions,
            normals,
            triangles,
            meshes,
            by_name,
        })
    }

    pub fn lookup(&self, name: &str) -> Option<&WalkmeshEntry> {
        self.by_name.get(name).map(|&i| &self.meshes[i])
    }

    /// Extract one walkmesh, rebasing triangle indices to its first vertex
    pub fn walkmesh(&self, name: &str) -> Option<Walkmesh> {
        let entry = self.lookup(name)?;
        let vertices = entry.vertices.start as usize..entry.vertices.end as usize;
        let base = entry.vertices.start;

        Some(Walkmesh {
            vertices: self.positions[vertices.clone()].to_vec(),
            normals: self.normals[vertices].to_vec(),
            triangles: self.triangles
                [entry.triangles.start as usize..entry.triangles.end as usize]
                .iter()
                .map(|tri| tri.map(|v| v - base))
                .collect(),
        })
    }
}
