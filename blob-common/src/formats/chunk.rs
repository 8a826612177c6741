//! Chunked blob container
//!
//! A blob is a plain sequence of chunks with no file header, version or
//! terminator; the end of the file ends the blob.
//!
//! # Layout
//! ```text
//! 0x00: magic [u8; 4]    (ASCII tag, e.g. "str0")
//! 0x04: length u32       (payload bytes, little-endian)
//! 0x08: payload          (exactly `length` bytes, no padding)
//! ```

use super::FormatError;
use super::serialization::BinarySerializable;

/// Four-byte chunk tag
pub type Magic = [u8; 4];

/// Render a magic for messages (`p...`, `idx0`, or escaped bytes)
pub fn display_magic(magic: &Magic) -> String {
    magic.escape_ascii().to_string()
}

/// Chunk header (8 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    pub magic: Magic,
    pub length: u32,
}

impl ChunkHeader {
    pub const SIZE: usize = 8;

    pub fn new(magic: Magic, length: u32) -> Self {
        Self { magic, length }
    }

    /// Write header to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4..8].copy_from_slice(&self.length.to_le_bytes());
        bytes
    }

    /// Read header from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            magic: [bytes[0], bytes[1], bytes[2], bytes[3]],
            length: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
        })
    }

    /// Total on-disk size of the chunk (header + payload)
    pub fn total_size(&self) -> usize {
        Self::SIZE + self.length as usize
    }
}

/// In-memory blob assembled chunk by chunk.
///
/// Nothing touches the filesystem here; callers write [`BlobWriter::into_bytes`]
/// out once every chunk has been appended, so a failed export never leaves a
/// partial file behind.
#[derive(Debug, Default)]
pub struct BlobWriter {
    bytes: Vec<u8>,
    chunks: Vec<ChunkHeader>,
}

impl BlobWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one chunk in caller order
    pub fn write_chunk(&mut self, magic: Magic, payload: &[u8]) -> Result<(), FormatError> {
        let length = u32::try_from(payload.len()).map_err(|_| FormatError::PayloadTooLarge {
            magic: display_magic(&magic),
            length: payload.len(),
        })?;

        let header = ChunkHeader::new(magic, length);
        self.bytes.reserve(header.total_size());
        self.bytes.extend_from_slice(&header.to_bytes());
        self.bytes.extend_from_slice(payload);
        self.chunks.push(header);
        Ok(())
    }

    /// Append a chunk of fixed-size records
    pub fn write_records<T: BinarySerializable>(
        &mut self,
        magic: Magic,
        records: &[T],
    ) -> Result<(), FormatError> {
        let mut payload = Vec::with_capacity(records.len() * T::SIZE);
        for record in records {
            payload.extend_from_slice(&record.serialize());
        }
        self.write_chunk(magic, &payload)
    }

    /// Headers of the chunks written so far
    pub fn chunks(&self) -> &[ChunkHeader] {
        &self.chunks
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// One chunk borrowed from a blob
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    pub magic: Magic,
    pub payload: &'a [u8],
}

/// Sequential reader over the chunks of a blob
#[derive(Debug, Clone)]
pub struct ChunkReader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> ChunkReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    /// Bytes not yet consumed
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    /// Read the next chunk, or `None` at the end of the blob
    pub fn next_chunk(&mut self) -> Result<Option<Chunk<'a>>, FormatError> {
        let rest = &self.bytes[self.offset..];
        if rest.is_empty() {
            return Ok(None);
        }

        let header = ChunkHeader::from_bytes(rest).ok_or(FormatError::TruncatedHeader {
            offset: self.offset,
            available: rest.len(),
        })?;

        let payload = rest
            .get(ChunkHeader::SIZE..header.total_size())
            .ok_or_else(|| FormatError::TruncatedPayload {
                magic: display_magic(&header.magic),
                length: header.length,
                available: rest.len() - ChunkHeader::SIZE,
            })?;

        self.offset += header.total_size();
        Ok(Some(Chunk {
            magic: header.magic,
            payload,
        }))
    }

    /// Read the next chunk and require its magic
    pub fn expect(&mut self, magic: Magic) -> Result<&'a [u8], FormatError> {
        match self.next_chunk()? {
            Some(chunk) if chunk.magic == magic => Ok(chunk.payload),
            Some(chunk) => Err(FormatError::UnexpectedChunk {
                expected: display_magic(&magic),
                found: display_magic(&chunk.magic),
            }),
            None => Err(FormatError::MissingChunk(display_magic(&magic))),
        }
    }

    /// Read the next chunk as fixed-size records
    pub fn expect_records<T: BinarySerializable>(
        &mut self,
        magic: Magic,
    ) -> Result<Vec<T>, FormatError> {
        let payload = self.expect(magic)?;
        decode_records(magic, payload)
    }
}

impl<'a> Iterator for ChunkReader<'a> {
    type Item = Result<Chunk<'a>, FormatError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_chunk() {
            Ok(chunk) => chunk.map(Ok),
            Err(err) => {
                // Stop after the first malformed chunk
                self.offset = self.bytes.len();
                Some(Err(err))
            }
        }
    }
}

/// Split a payload into fixed-size records
pub fn decode_records<T: BinarySerializable>(
    magic: Magic,
    payload: &[u8],
) -> Result<Vec<T>, FormatError> {
    if payload.len() % T::SIZE != 0 {
        return Err(FormatError::RecordSize {
            magic: display_magic(&magic),
            length: payload.len(),
            record: T::SIZE,
        });
    }
    payload
        .chunks_exact(T::SIZE)
        .map(|bytes| {
            T::deserialize(bytes).ok_or_else(|| FormatError::RecordSize {
                magic: display_magic(&magic),
                length: payload.len(),
                record: T::SIZE,
            })
        })
        .collect()
}

/// Encode f32 triples as little-endian bytes
pub fn encode_vec3s(values: &[[f32; 3]]) -> Vec<u8> {
    let flat: &[f32] = bytemuck::cast_slice(values);
    let mut bytes = Vec::with_capacity(flat.len() * 4);
    for f in flat {
        bytes.extend_from_slice(&f.to_le_bytes());
    }
    bytes
}

/// Encode u32 triples as little-endian bytes
pub fn encode_uvec3s(values: &[[u32; 3]]) -> Vec<u8> {
    let flat: &[u32] = bytemuck::cast_slice(values);
    let mut bytes = Vec::with_capacity(flat.len() * 4);
    for i in flat {
        bytes.extend_from_slice(&i.to_le_bytes());
    }
    bytes
}
