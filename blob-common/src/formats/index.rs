//! Name-indexed table of contents
//!
//! Mesh names are concatenated without separators into the `str0` chunk; the
//! index chunk records where each name starts and ends together with the
//! mesh's vertex (and, for walkmeshes, triangle) range.
//!
//! # `idx0` record (16 bytes)
//! ```text
//! 0x00: name_begin u32
//! 0x04: name_end u32
//! 0x08: vertex_begin u32
//! 0x0C: vertex_end u32
//! ```
//!
//! # `idxA` record (24 bytes)
//! ```text
//! 0x00: name_begin u32
//! 0x04: name_end u32
//! 0x08: vertex_begin u32
//! 0x0C: vertex_end u32
//! 0x10: triangle_begin u32
//! 0x14: triangle_end u32
//! ```

use std::ops::Range;

use super::FormatError;

fn read_u32s<const N: usize>(bytes: &[u8]) -> Option<[u32; N]> {
    let bytes = bytes.get(..N * 4)?;
    let mut out = [0u32; N];
    for (value, raw) in out.iter_mut().zip(bytes.chunks_exact(4)) {
        *value = u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]);
    }
    Some(out)
}

/// Triangle-soup index entry (16 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshIndexEntry {
    pub name_begin: u32,
    pub name_end: u32,
    pub vertex_begin: u32,
    pub vertex_end: u32,
}

impl MeshIndexEntry {
    pub const SIZE: usize = 16;

    pub fn new(name_begin: u32, name_end: u32, vertex_begin: u32, vertex_end: u32) -> Self {
        Self {
            name_begin,
            name_end,
            vertex_begin,
            vertex_end,
        }
    }

    /// Write entry to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&self.name_begin.to_le_bytes());
        bytes[4..8].copy_from_slice(&self.name_end.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.vertex_begin.to_le_bytes());
        bytes[12..16].copy_from_slice(&self.vertex_end.to_le_bytes());
        bytes
    }

    /// Read entry from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let [name_begin, name_end, vertex_begin, vertex_end] = read_u32s::<4>(bytes)?;
        Some(Self::new(name_begin, name_end, vertex_begin, vertex_end))
    }

    pub fn names(&self) -> Range<u32> {
        self.name_begin..self.name_end
    }

    pub fn vertices(&self) -> Range<u32> {
        self.vertex_begin..self.vertex_end
    }
}

/// Walkmesh index entry (24 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkmeshIndexEntry {
    pub name_begin: u32,
    pub name_end: u32,
    pub vertex_begin: u32,
    pub vertex_end: u32,
    pub triangle_begin: u32,
    pub triangle_end: u32,
}

impl WalkmeshIndexEntry {
    pub const SIZE: usize = 24;

    pub fn new(names: Range<u32>, vertices: Range<u32>, triangles: Range<u32>) -> Self {
        Self {
            name_begin: names.start,
            name_end: names.end,
            vertex_begin: vertices.start,
            vertex_end: vertices.end,
            triangle_begin: triangles.start,
            triangle_end: triangles.end,
        }
    }

    /// Write entry to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        let fields = [
            self.name_begin,
            self.name_end,
            self.vertex_begin,
            self.vertex_end,
            self.triangle_begin,
            self.triangle_end,
        ];
        for (slot, value) in bytes.chunks_exact_mut(4).zip(fields) {
            slot.copy_from_slice(&value.to_le_bytes());
        }
        bytes
    }

    /// Read entry from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let [nb, ne, vb, ve, tb, te] = read_u32s::<6>(bytes)?;
        Some(Self::new(nb..ne, vb..ve, tb..te))
    }

    pub fn names(&self) -> Range<u32> {
        self.name_begin..self.name_end
    }

    pub fn vertices(&self) -> Range<u32> {
        self.vertex_begin..self.vertex_end
    }

    pub fn triangles(&self) -> Range<u32> {
        self.triangle_begin..self.triangle_end
    }
}

/// Accumulates the `str0` chunk payload
#[derive(Debug, Default, Clone)]
pub struct NameTable {
    bytes: Vec<u8>,
}

impl NameTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a name and return its byte range
    pub fn push(&mut self, name: &str) -> Result<Range<u32>, FormatError> {
        let too_large = || FormatError::PayloadTooLarge {
            magic: super::display_magic(&super::STRINGS_MAGIC),
            length: self.bytes.len() + name.len(),
        };
        let begin = u32::try_from(self.bytes.len()).map_err(|_| too_large())?;
        let end = u32::try_from(self.bytes.len() + name.len()).map_err(|_| too_large())?;
        self.bytes.extend_from_slice(name.as_bytes());
        Ok(begin..end)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
