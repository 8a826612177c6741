//! Binary serialization trait for fixed-size records.
//!
//! Index entries and vector records implement `BinarySerializable` so chunk
//! payloads can be written and split generically (see
//! [`BlobWriter::write_records`](super::BlobWriter::write_records) and
//! [`decode_records`](super::decode_records)). Each type keeps its own
//! `to_bytes()` returning a fixed-size array.

/// Trait for binary-serializable fixed-size records.
///
/// The trait uses `Vec<u8>` for the return type because associated const
/// generics in return types (`[u8; Self::SIZE]`) are not yet stable in Rust.
pub trait BinarySerializable: Sized {
    /// Size of the serialized record in bytes.
    const SIZE: usize;

    /// Serialize to bytes.
    fn serialize(&self) -> Vec<u8>;

    /// Deserialize from bytes.
    ///
    /// Returns `None` if the byte slice is too short.
    fn deserialize(bytes: &[u8]) -> Option<Self>;
}

impl BinarySerializable for super::MeshIndexEntry {
    const SIZE: usize = Self::SIZE;

    fn serialize(&self) -> Vec<u8> {
        self.to_bytes().to_vec()
    }

    fn deserialize(bytes: &[u8]) -> Option<Self> {
        Self::from_bytes(bytes)
    }
}

impl BinarySerializable for super::WalkmeshIndexEntry {
    const SIZE: usize = Self::SIZE;

    fn serialize(&self) -> Vec<u8> {
        self.to_bytes().to_vec()
    }

    fn deserialize(bytes: &[u8]) -> Option<Self> {
        Self::from_bytes(bytes)
    }
}

impl BinarySerializable for [f32; 3] {
    const SIZE: usize = 12;

    fn serialize(&self) -> Vec<u8> {
        self.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    fn deserialize(bytes: &[u8]) -> Option<Self> {
        let bytes = bytes.get(..Self::SIZE)?;
        let mut out = [0.0f32; 3];
        for (value, raw) in out.iter_mut().zip(bytes.chunks_exact(4)) {
            *value = f32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]);
        }
        Some(out)
    }
}

impl BinarySerializable for [u32; 3] {
    const SIZE: usize = 12;

    fn serialize(&self) -> Vec<u8> {
        self.iter().flat_map(|i| i.to_le_bytes()).collect()
    }

    fn deserialize(bytes: &[u8]) -> Option<Self> {
        let bytes = bytes.get(..Self::SIZE)?;
        let mut out = [0u32; 3];
        for (value, raw) in out.iter_mut().zip(bytes.chunks_exact(4)) {
            *value = u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]);
        }
        Some(out)
    }
}
