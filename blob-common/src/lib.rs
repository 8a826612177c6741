//! Shared mesh blob formats
//!
//! This crate provides the on-disk formats shared between:
//! - `blob-export` (asset pipeline)
//! - engine-side loaders and tooling (`blob-export inspect`)
//!
//! # Modules
//!
//! - [`attributes`] - Vertex attribute sets, strides and data chunk magics
//! - [`formats`] - Chunk container, index records and chunk magics
//! - [`loader`] - Parsers for finished soup and walkmesh blobs

pub mod attributes;
pub mod formats;
pub mod loader;

// Re-export commonly used attribute items
pub use attributes::{
    AttributeSet, COLOR_SIZE, DEFAULT_COLOR, DEFAULT_TEXCOORD, FILE_TYPES, NORMAL_SIZE,
    POSITION_SIZE, TEXCOORD_SIZE, VertexLayout, pack_color_rgba_unorm8,
};

// Re-export commonly used format items
pub use formats::{
    BinarySerializable, BlobWriter, Chunk, ChunkHeader, ChunkReader, FormatError,
    MESH_INDEX_MAGIC, Magic, MeshIndexEntry, NORMALS_MAGIC, NameTable, POSITIONS_MAGIC,
    STRINGS_MAGIC, TRIANGLES_MAGIC, WALKMESH_INDEX_MAGIC, WalkmeshIndexEntry, display_magic,
    encode_uvec3s, encode_vec3s,
};

// Re-export the loaders
pub use loader::{MeshBlob, MeshEntry, VertexRecord, Walkmesh, WalkmeshBlob, WalkmeshEntry};
