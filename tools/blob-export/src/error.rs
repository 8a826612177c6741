//! Export errors
//!
//! Configuration errors are raised before any geometry is read; geometry
//! faults abort a run before its output file is created. Neither is
//! recoverable at runtime.

use std::path::PathBuf;

use blob_common::FormatError;

/// Invalid invocation, manifest entry or scene selection
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("output '{}' must end in one of: {expected}", .path.display())]
    UnknownSuffix { path: PathBuf, expected: String },

    #[error("output '{}' matches several file types: {matches}", .path.display())]
    AmbiguousSuffix { path: PathBuf, matches: String },

    #[error("layer {0} is out of range (must be 1-20)")]
    LayerOutOfRange(u64),

    #[error("invalid layer '{0}'")]
    InvalidLayer(String),

    #[error("scene has no layer {layer} ({available} available)")]
    MissingLayer { layer: u32, available: usize },
}

/// Authoring-data or internal-consistency fault
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryFault {
    #[error(
        "mesh '{mesh}': triangle {triangle} is not CCW-oriented with respect to its face normal (dot {dot})"
    )]
    Winding {
        mesh: String,
        triangle: usize,
        dot: f32,
    },

    #[error("vertex data is {len} bytes, expected {vertex_count} vertices of {stride} bytes")]
    ByteCount {
        vertex_count: u32,
        stride: usize,
        len: usize,
    },

    #[error("{positions} positions but {normals} normals after mesh '{mesh}'")]
    NormalCount {
        mesh: String,
        positions: usize,
        normals: usize,
    },

    #[error("mesh '{mesh}': {what} {item} references vertex {vertex} of {count}")]
    VertexOutOfRange {
        mesh: String,
        what: &'static str,
        item: usize,
        vertex: u32,
        count: usize,
    },

    #[error("mesh '{mesh}': {attribute} layer has {len} samples for {corners} corners")]
    CornerCount {
        mesh: String,
        attribute: &'static str,
        len: usize,
        corners: usize,
    },

    #[error("mesh name '{mesh}' (object '{object}') is already used by another mesh")]
    DuplicateName { mesh: String, object: String },

    #[error("{what} count does not fit in u32")]
    Overflow { what: &'static str },
}

/// Any fault raised by the encoders
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExportError {
    #[error(transparent)]
    Geometry(#[from] GeometryFault),

    #[error(transparent)]
    Format(#[from] FormatError),
}
