//! Chunked blob formats
//!
//! Two blob flavours share the chunk container:
//!
//! ```text
//! soup blob:      <attribute magic> str0 idx0
//! walkmesh blob:  p... n... tri0 str0 idxA
//! ```
//!
//! All integers are little-endian u32 and all floats little-endian binary32.
//! There is no header or version; the chunk order above is the format.

mod chunk;
mod index;
mod serialization;

pub use chunk::*;
pub use index::*;
pub use serialization::BinarySerializable;

/// Concatenated mesh names
pub const STRINGS_MAGIC: Magic = *b"str0";
/// Soup index (16-byte records)
pub const MESH_INDEX_MAGIC: Magic = *b"idx0";
/// Walkmesh index (24-byte records)
pub const WALKMESH_INDEX_MAGIC: Magic = *b"idxA";
/// Walkmesh positions (f32 × 3)
pub const POSITIONS_MAGIC: Magic = *b"p...";
/// Walkmesh normals (f32 × 3)
pub const NORMALS_MAGIC: Magic = *b"n...";
/// Walkmesh triangles (u32 × 3)
pub const TRIANGLES_MAGIC: Magic = *b"tri0";

/// Errors raised while writing or reading blobs
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormatError {
    #[error("chunk '{magic}' payload of {length} bytes does not fit a u32 length")]
    PayloadTooLarge { magic: String, length: usize },

    #[error("truncated chunk header at offset {offset} ({available} bytes left)")]
    TruncatedHeader { offset: usize, available: usize },

    #[error("chunk '{magic}' declares {length} bytes but only {available} remain")]
    TruncatedPayload {
        magic: String,
        length: u32,
        available: usize,
    },

    #[error("expected chunk '{expected}', found '{found}'")]
    UnexpectedChunk { expected: String, found: String },

    #[error("missing chunk '{0}'")]
    MissingChunk(String),

    #[error("chunk '{magic}' length {length} is not a multiple of {record}-byte records")]
    RecordSize {
        magic: String,
        length: usize,
        record: usize,
    },

    #[error("unknown vertex data magic '{0}'")]
    UnknownAttributes(String),

    #[error("{positions} positions but {normals} normals")]
    NormalCountMismatch { positions: usize, normals: usize },

    #[error("index entry {entry}: invalid {what} range {begin}..{end} (limit {limit})")]
    InvalidRange {
        entry: usize,
        what: &'static str,
        begin: u32,
        end: u32,
        limit: usize,
    },

    #[error("index entry {0}: mesh name is not valid UTF-8")]
    InvalidName(usize),

    #[error("triangle {triangle} of mesh '{name}' references vertices outside the mesh")]
    TriangleOutsideMesh { name: String, triangle: u32 },

    #[error("duplicated mesh name '{0}'")]
    DuplicateName(String),
}
