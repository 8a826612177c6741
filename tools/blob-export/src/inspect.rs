//! Blob inspection
//!
//! Lists the chunks of an existing blob and decodes its index with the same
//! loaders a game would use.

use std::path::Path;

use anyhow::{Context, Result};
use blob_common::{
    display_magic, ChunkReader, MeshBlob, WalkmeshBlob, NORMALS_MAGIC, POSITIONS_MAGIC,
};

/// Decoded blob of either kind
#[derive(Debug)]
pub enum InspectedBlob {
    Meshes(MeshBlob),
    Walkmeshes(WalkmeshBlob),
}

/// Walkmesh blobs open with `p...` followed by `n...`; anything else is soup
pub fn is_walkmesh(bytes: &[u8]) -> bool {
    let mut reader = ChunkReader::new(bytes);
    let first = reader.next().and_then(Result::ok).map(|c| c.magic);
    let second = reader.next().and_then(Result::ok).map(|c| c.magic);
    first == Some(POSITIONS_MAGIC) && second == Some(NORMALS_MAGIC)
}

/// Decode a blob, detecting its kind
pub fn decode(bytes: &[u8]) -> Result<InspectedBlob> {
    if is_walkmesh(bytes) {
        Ok(InspectedBlob::Walkmeshes(
            WalkmeshBlob::from_bytes(bytes).context("Invalid walkmesh blob")?,
        ))
    } else {
        Ok(InspectedBlob::Meshes(
            MeshBlob::from_bytes(bytes).context("Invalid mesh blob")?,
        ))
    }
}

/// Print the chunks and index of a blob file
pub fn inspect_blob(path: &Path) -> Result<InspectedBlob> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read blob: {:?}", path))?;

    tracing::info!("{:?}: {} bytes", path, bytes.len());
    for chunk in ChunkReader::new(&bytes) {
        let chunk = chunk.with_context(|| format!("Malformed chunk in {:?}", path))?;
        tracing::info!(
            "  chunk '{}': {} bytes",
            display_magic(&chunk.magic),
            chunk.payload.len()
        );
    }

    let blob = decode(&bytes)?;
    match &blob {
        InspectedBlob::Meshes(meshes) => {
            let attributes = meshes.attributes;
            tracing::info!(
                "Mesh blob: {} vertices of {} bytes, {} meshes",
                meshes.vertex_count(),
                attributes.stride(),
                meshes.meshes.len()
            );
            for (i, mesh) in meshes.meshes.iter().enumerate() {
                tracing::info!(
                    "  [{}] '{}': vertices {}..{}",
                    i,
                    mesh.name,
                    mesh.vertices.start,
                    mesh.vertices.end
                );
            }
        }
        InspectedBlob::Walkmeshes(walkmeshes) => {
            tracing::info!(
                "Walkmesh blob: {} vertices, {} triangles, {} meshes",
                walkmeshes.positions.len(),
                walkmeshes.triangles.len(),
                walkmeshes.meshes.len()
            );
            for (i, mesh) in walkmeshes.meshes.iter().enumerate() {
                tracing::info!(
                    "  [{}] '{}': vertices {}..{}, triangles {}..{}",
                    i,
                    mesh.name,
                    mesh.vertices.start,
                    mesh.vertices.end,
                    mesh.triangles.start,
                    mesh.triangles.end
                );
            }
        }
    }

    Ok(blob)
}
