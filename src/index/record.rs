//! Key record layout
//!
//! A fixed 16-byte header followed by the variable-length key.

use bytes::{Buf, BufMut, BytesMut};

use crate::offset::{IndexOffset, StorageOffset};

/// Header size: KeyLen (8) + ValueOffset (8) = 16 bytes
pub const KEY_HEADER_SIZE: u64 = 16;

/// Position of the value offset field inside the header
pub const VALUE_OFFSET_FIELD: u64 = 8;

/// Fixed-size part of a key record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyRecordHeader {
    /// Number of key bytes following the header
    pub key_length: u64,
    /// Where the key's current value starts in the storage log
    pub value_offset: StorageOffset,
}

impl KeyRecordHeader {
    pub fn encode(&self) -> [u8; KEY_HEADER_SIZE as usize] {
        let mut out = [0u8; KEY_HEADER_SIZE as usize];
        let mut buf = &mut out[..];
        buf.put_u64_le(self.key_length);
        buf.put_u64_le(self.value_offset.get());
        out
    }

    pub fn decode(bytes: &[u8; KEY_HEADER_SIZE as usize]) -> Self {
        let mut buf = &bytes[..];
        let key_length = buf.get_u64_le();
        let value_offset = StorageOffset::new(buf.get_u64_le());
        Self {
            key_length,
            value_offset,
        }
    }
}

/// A complete key record as seen during replay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRecord {
    /// Where this record's header starts in the index log
    pub offset: IndexOffset,
    /// Current value offset stored in the header
    pub value_offset: StorageOffset,
    /// Key bytes
    pub key: Vec<u8>,
}

impl KeyRecord {
    /// Total on-disk size (header + key)
    pub fn encoded_len(&self) -> u64 {
        KEY_HEADER_SIZE + self.key.len() as u64
    }
}

/// Serialize a full record ready to be appended
pub(super) fn encode_record(key: &[u8], value_offset: StorageOffset) -> BytesMut {
    let header = KeyRecordHeader {
        key_length: key.len() as u64,
        value_offset,
    };
    let mut record = BytesMut::with_capacity(KEY_HEADER_SIZE as usize + key.len());
    record.put_slice(&header.encode());
    record.put_slice(key);
    record
}
