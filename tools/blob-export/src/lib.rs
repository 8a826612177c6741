//! blob-export library
//!
//! Converts authored scene layers into chunked mesh blobs: unwelded
//! triangle soup with a configurable vertex layout, and welded walkmeshes.

pub mod config;
pub mod error;
pub mod export;
pub mod inspect;
pub mod manifest;
pub mod scene;
pub mod soup;
pub mod walkmesh;

// Re-export the on-disk format from blob-common
pub use blob_common::{AttributeSet, BlobWriter, FormatError, MeshBlob, WalkmeshBlob, FILE_TYPES};

pub use config::{resolve_output_attributes, Layer, SceneRef};
pub use error::{ConfigError, ExportError, GeometryFault};
pub use export::{export_blob, export_meshes, export_walkmeshes, ExportJob, ExportKind, ExportSummary};
pub use scene::{ExportQueue, GltfScene, MemoryScene, MeshData, MeshHandle, SceneObject, SceneProvider};
pub use soup::{MeshSoup, MeshSoupEncoder};
pub use walkmesh::{VertexWelder, WalkmeshBuilder, Walkmeshes};
