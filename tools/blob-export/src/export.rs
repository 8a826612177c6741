//! Export drivers
//!
//! A run visits the objects of one scene layer, feeds each distinct mesh to
//! the selected encoder, and assembles the whole blob in memory. The output
//! file is created only once every chunk is ready, so a failed run leaves no
//! file behind.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use blob_common::{
    display_magic, AttributeSet, BlobWriter, ChunkHeader, Magic, MESH_INDEX_MAGIC,
    NORMALS_MAGIC, POSITIONS_MAGIC, STRINGS_MAGIC, TRIANGLES_MAGIC, WALKMESH_INDEX_MAGIC,
};
use hashbrown::HashSet;

use crate::config::{resolve_output_attributes, Layer, SceneRef};
use crate::error::{ConfigError, ExportError, GeometryFault};
use crate::scene::{ExportQueue, GltfScene, MeshData, SceneProvider};
use crate::soup::MeshSoupEncoder;
use crate::walkmesh::WalkmeshBuilder;

/// Which blob a job produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    /// Unwelded triangle soup with the given vertex attributes
    Meshes(AttributeSet),
    /// Welded walkmesh
    Walkmeshes,
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportKind::Meshes(attributes) => {
                write!(f, "meshes ({})", display_magic(&attributes.magic()))
            }
            ExportKind::Walkmeshes => write!(f, "walkmeshes"),
        }
    }
}

/// One scene layer exported to one blob file
#[derive(Debug, Clone, PartialEq)]
pub struct ExportJob {
    pub kind: ExportKind,
    pub scene: SceneRef,
    pub output: PathBuf,
}

impl ExportJob {
    /// Soup export; the attribute set comes from the output suffix
    pub fn meshes(scene: SceneRef, output: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let output = output.into();
        let attributes = resolve_output_attributes(&output)?;
        Ok(Self {
            kind: ExportKind::Meshes(attributes),
            scene,
            output,
        })
    }

    pub fn walkmeshes(scene: SceneRef, output: impl Into<PathBuf>) -> Self {
        Self {
            kind: ExportKind::Walkmeshes,
            scene,
            output: output.into(),
        }
    }

    /// Load the scene, build the blob and write it out
    pub fn run(&self) -> Result<ExportSummary> {
        tracing::info!(
            "Will export {} referenced from layer {} of {:?} to {:?}",
            self.kind,
            self.scene.layer,
            self.scene.path,
            self.output
        );

        let scene = GltfScene::open(&self.scene.path)?;
        let blob = export_blob(&scene, self.scene.layer, self.kind)?;
        write_blob(&self.output, self.kind, blob)
    }
}

/// Build a blob of either kind from a scene layer
pub fn export_blob(
    provider: &dyn SceneProvider,
    layer: Layer,
    kind: ExportKind,
) -> Result<BlobWriter> {
    match kind {
        ExportKind::Meshes(attributes) => export_meshes(provider, layer, attributes),
        ExportKind::Walkmeshes => export_walkmeshes(provider, layer),
    }
}

/// Encode every mesh of a layer as triangle soup
pub fn export_meshes(
    provider: &dyn SceneProvider,
    layer: Layer,
    attributes: AttributeSet,
) -> Result<BlobWriter> {
    let mut encoder = MeshSoupEncoder::new(attributes);
    visit_meshes(provider, layer, |mesh| encoder.add_mesh(mesh))?;
    Ok(encoder.finish()?.to_blob()?)
}

/// Weld every mesh of a layer into a walkmesh blob
pub fn export_walkmeshes(provider: &dyn SceneProvider, layer: Layer) -> Result<BlobWriter> {
    let mut builder = WalkmeshBuilder::new();
    visit_meshes(provider, layer, |mesh| builder.add_mesh(mesh))?;
    Ok(builder.finish()?.to_blob()?)
}

/// Hand each distinct mesh of a layer to `add`, first object wins.
///
/// Blob names must be unique, so a second mesh reusing a name aborts the run.
fn visit_meshes(
    provider: &dyn SceneProvider,
    layer: Layer,
    mut add: impl FnMut(&MeshData) -> Result<(), ExportError>,
) -> Result<usize> {
    let objects = provider.objects(layer)?;
    let mut queue = ExportQueue::new(&objects);
    let mut names: HashSet<String> = HashSet::new();
    let mut exported = 0;

    for object in &objects {
        if !queue.take(object.mesh) {
            tracing::debug!(
                "Skipping '{}': mesh {} already exported",
                object.name,
                object.mesh.0
            );
            continue;
        }

        let mesh = provider.mesh(object)?;
        if !names.insert(mesh.name.clone()) {
            return Err(ExportError::from(GeometryFault::DuplicateName {
                mesh: mesh.name,
                object: object.name.clone(),
            })
            .into());
        }
        tracing::info!("Writing '{}'...", mesh.name);
        add(&mesh).with_context(|| format!("Failed to export mesh '{}'", mesh.name))?;
        exported += 1;
    }

    if exported == 0 {
        tracing::warn!("Layer {} has no mesh objects; writing an empty blob", layer);
    }
    Ok(exported)
}

/// Write an assembled blob and summarize it
pub fn write_blob(output: &Path, kind: ExportKind, blob: BlobWriter) -> Result<ExportSummary> {
    let chunks = blob.chunks().to_vec();
    let bytes = blob.into_bytes();

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {:?}", parent))?;
    }
    std::fs::write(output, &bytes)
        .with_context(|| format!("Failed to write output: {:?}", output))?;

    let summary = ExportSummary {
        output: output.to_path_buf(),
        kind,
        total: bytes.len(),
        chunks,
    };
    tracing::info!("{}", summary);
    Ok(summary)
}

/// Byte accounting of a written blob
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub output: PathBuf,
    pub kind: ExportKind,
    pub total: usize,
    pub chunks: Vec<ChunkHeader>,
}

impl ExportKind {
    /// Summary label of a chunk. A soup blob's vertex chunk is "data" even
    /// when its attribute magic is `p...`.
    fn chunk_label(self, magic: &Magic) -> &'static str {
        match (self, *magic) {
            (_, STRINGS_MAGIC) => "strings",
            (_, MESH_INDEX_MAGIC | WALKMESH_INDEX_MAGIC) => "index",
            (ExportKind::Meshes(_), _) => "data",
            (ExportKind::Walkmeshes, POSITIONS_MAGIC) => "positions",
            (ExportKind::Walkmeshes, NORMALS_MAGIC) => "normals",
            (ExportKind::Walkmeshes, TRIANGLES_MAGIC) => "triangles",
            (ExportKind::Walkmeshes, _) => "data",
        }
    }
}

impl fmt::Display for ExportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Wrote {} bytes [== ", self.total)?;
        for (i, chunk) in self.chunks.iter().enumerate() {
            if i > 0 {
                write!(f, " + ")?;
            }
            write!(
                f,
                "{} bytes of {}",
                chunk.total_size(),
                self.kind.chunk_label(&chunk.magic)
            )?;
        }
        write!(f, "] to '{}'", self.output.display())
    }
}
