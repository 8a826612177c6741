//! Walkmesh builder
//!
//! Welds triangle corners that reference the same source vertex into one
//! compact vertex, averages the split normals gathered at each compact
//! vertex, and rejects triangles whose winding disagrees with their stored
//! face normal.

use blob_common::{
    encode_uvec3s, encode_vec3s, BlobWriter, FormatError, NameTable, WalkmeshIndexEntry,
    NORMALS_MAGIC, POSITIONS_MAGIC, STRINGS_MAGIC, TRIANGLES_MAGIC, WALKMESH_INDEX_MAGIC,
};
use glam::Vec3;
use hashbrown::HashMap;

use crate::error::{ExportError, GeometryFault};
use crate::scene::{MeshData, Triangle};

/// Minimum dot product between stored and geometric face normals
pub const WINDING_THRESHOLD: f32 = 0.9;

/// Split normals farther than this from their vertex mean are reported
pub const NORMAL_DEVIATION_THRESHOLD: f32 = 0.001;

/// Dot product of a triangle's stored face normal with its geometric normal.
///
/// Degenerate triangles have a zero geometric normal and score 0.
pub fn winding_dot(positions: &[[f32; 3]], triangle: &Triangle) -> f32 {
    let [a, b, c] = triangle
        .vertices()
        .map(|v| Vec3::from(positions[v as usize]));
    let geometric = (b - a).cross(c - a).normalize_or_zero();
    Vec3::from(triangle.normal).dot(geometric)
}

/// Fail unless the triangle is CCW with respect to its stored normal
pub fn check_winding(
    mesh: &str,
    positions: &[[f32; 3]],
    index: usize,
    triangle: &Triangle,
) -> Result<(), GeometryFault> {
    let dot = winding_dot(positions, triangle);
    // NaN fails this comparison too
    if dot > WINDING_THRESHOLD {
        Ok(())
    } else {
        Err(GeometryFault::Winding {
            mesh: mesh.to_string(),
            triangle: index,
            dot,
        })
    }
}

/// Per-mesh vertex interning.
///
/// Compact vertices are numbered in first-use order starting at `base`, the
/// number of compact vertices already emitted by earlier meshes.
#[derive(Debug)]
pub struct VertexWelder<'a> {
    source: &'a [[f32; 3]],
    base: u32,
    first_use: HashMap<u32, u32>,
    positions: Vec<[f32; 3]>,
    normal_samples: Vec<Vec<Vec3>>,
}

/// A split normal that strays from its vertex's mean
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalDeviation {
    pub vertex: u32,
    pub sample: [f32; 3],
    pub mean: [f32; 3],
    pub samples: usize,
}

/// Compact vertices of one mesh, in creation order
#[derive(Debug, Clone, PartialEq)]
pub struct WeldedVertices {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub deviations: Vec<NormalDeviation>,
}

impl<'a> VertexWelder<'a> {
    pub fn new(source: &'a [[f32; 3]], base: u32) -> Self {
        Self {
            source,
            base,
            first_use: HashMap::new(),
            positions: Vec::new(),
            normal_samples: Vec::new(),
        }
    }

    /// Global compact index of `source`, creating it on first use.
    ///
    /// The caller guarantees `source` is a valid index and that
    /// `base + source.len()` fits in `u32`.
    pub fn intern(&mut self, source: u32, normal: [f32; 3]) -> u32 {
        let local = *self.first_use.entry(source).or_insert_with(|| {
            self.positions.push(self.source[source as usize]);
            self.normal_samples.push(Vec::new());
            (self.positions.len() - 1) as u32
        });
        self.normal_samples[local as usize].push(Vec3::from(normal));
        self.base + local
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Average the gathered normals. Means are not renormalized.
    pub fn finish(self) -> WeldedVertices {
        let mut normals = Vec::with_capacity(self.normal_samples.len());
        let mut deviations = Vec::new();

        for (local, samples) in self.normal_samples.iter().enumerate() {
            let mean = samples.iter().copied().sum::<Vec3>() / samples.len() as f32;
            for sample in samples {
                if sample.distance(mean) > NORMAL_DEVIATION_THRESHOLD {
                    deviations.push(NormalDeviation {
                        vertex: self.base + local as u32,
                        sample: sample.to_array(),
                        mean: mean.to_array(),
                        samples: samples.len(),
                    });
                }
            }
            normals.push(mean.to_array());
        }

        WeldedVertices {
            positions: self.positions,
            normals,
            deviations,
        }
    }
}

/// Accumulates welded walkmesh buffers across meshes
#[derive(Debug, Default)]
pub struct WalkmeshBuilder {
    positions: Vec<[f32; 3]>,
    normals: Vec<[f32; 3]>,
    triangles: Vec<[u32; 3]>,
    names: NameTable,
    index: Vec<WalkmeshIndexEntry>,
}

/// Finished walkmesh buffers, ready for the blob writer
#[derive(Debug)]
pub struct Walkmeshes {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub triangles: Vec<[u32; 3]>,
    pub names: NameTable,
    pub index: Vec<WalkmeshIndexEntry>,
}

impl WalkmeshBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    fn last_name(&self) -> String {
        self.index
            .last()
            .and_then(|e| self.names.as_bytes().get(e.name_begin as usize..e.name_end as usize))
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
            .unwrap_or_default()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Weld one mesh and append its index entry.
    ///
    /// Every triangle is winding-checked before anything is appended, so a
    /// rejected mesh leaves the builder unchanged.
    pub fn add_mesh(&mut self, mesh: &MeshData) -> Result<(), ExportError> {
        mesh.validate()?;

        for (t, triangle) in mesh.triangles.iter().enumerate() {
            check_winding(&mesh.name, &mesh.positions, t, triangle)?;
        }

        let overflow = |what| GeometryFault::Overflow { what };
        let vertex_begin = u32::try_from(self.positions.len()).map_err(|_| overflow("vertex"))?;
        u32::try_from(self.positions.len() + mesh.positions.len())
            .map_err(|_| overflow("vertex"))?;
        let triangle_begin =
            u32::try_from(self.triangles.len()).map_err(|_| overflow("triangle"))?;
        let triangle_end = u32::try_from(self.triangles.len() + mesh.triangles.len())
            .map_err(|_| overflow("triangle"))?;

        let mut welder = VertexWelder::new(&mesh.positions, vertex_begin);
        let mut triangles = Vec::with_capacity(mesh.triangles.len());
        for triangle in &mesh.triangles {
            triangles.push(
                triangle
                    .corners
                    .map(|corner| welder.intern(corner.vertex, corner.normal)),
            );
        }
        let welded = welder.finish();

        for deviation in &welded.deviations {
            tracing::warn!(
                "Mesh '{}': normal {:?} differs from average {:?} of {} at vertex {}",
                mesh.name,
                deviation.sample,
                deviation.mean,
                deviation.samples,
                deviation.vertex
            );
        }

        // Only reachable through a logic error; the run aborts without output
        if welded.positions.len() != welded.normals.len() {
            return Err(GeometryFault::NormalCount {
                mesh: mesh.name.clone(),
                positions: self.positions.len() + welded.positions.len(),
                normals: self.normals.len() + welded.normals.len(),
            }
            .into());
        }

        let names = self.names.push(&mesh.name)?;
        let vertex_end = vertex_begin + welded.positions.len() as u32;

        self.positions.extend(welded.positions);
        self.normals.extend(welded.normals);
        self.triangles.extend(triangles);
        self.index.push(WalkmeshIndexEntry::new(
            names,
            vertex_begin..vertex_end,
            triangle_begin..triangle_end,
        ));

        tracing::debug!(
            "Welded '{}': {} corners -> {} vertices, {} triangles",
            mesh.name,
            mesh.corner_count(),
            vertex_end - vertex_begin,
            triangle_end - triangle_begin
        );
        Ok(())
    }

    pub fn finish(self) -> Result<Walkmeshes, ExportError> {
        if self.positions.len() != self.normals.len() {
            return Err(GeometryFault::NormalCount {
                mesh: self.last_name(),
                positions: self.positions.len(),
                normals: self.normals.len(),
            }
            .into());
        }

        Ok(Walkmeshes {
            positions: self.positions,
            normals: self.normals,
            triangles: self.triangles,
            names: self.names,
            index: self.index,
        })
    }
}

impl Walkmeshes {
    /// Lay out the blob: `p...`, `n...`, `tri0`, `str0`, `idxA`
    pub fn to_blob(&self) -> Result<BlobWriter, FormatError> {
        let mut blob = BlobWriter::new();
        blob.write_chunk(POSITIONS_MAGIC, &encode_vec3s(&self.positions))?;
        blob.write_chunk(NORMALS_MAGIC, &encode_vec3s(&self.normals))?;
        blob.write_chunk(TRIANGLES_MAGIC, &encode_uvec3s(&self.triangles))?;
        blob.write_chunk(STRINGS_MAGIC, self.names.as_bytes())?;
        blob.write_records(WALKMESH_INDEX_MAGIC, &self.index)?;
        Ok(blob)
    }
}
