//! Index Log Replay
//!
//! Sequential iteration over every key record, front to back.

use std::fs::File;
use std::io::BufReader;

use crate::error::{DocError, Result};
use crate::io::{read_exact_or_short, read_full};
use crate::offset::IndexOffset;

use super::{KeyRecord, KeyRecordHeader, KEY_HEADER_SIZE};

/// Iterator over index log records in file order
///
/// Ends cleanly when no bytes remain at a header boundary. A partial header
/// (a torn append) also ends the replay. Once exhausted, the owning log's
/// append position is moved to the end of the last complete record so the
/// next append overwrites the torn bytes.
pub struct KeyRecords<'a> {
    reader: BufReader<&'a File>,
    /// Physical file length, bounds key lengths before allocating
    file_len: u64,
    /// Offset of the next header
    offset: u64,
    /// Append position of the owning log, set when replay finishes
    log_size: &'a mut u64,
    done: bool,
}

impl<'a> KeyRecords<'a> {
    /// `file` must already be positioned at offset 0
    pub(super) fn new(file: &'a File, file_len: u64, log_size: &'a mut u64) -> Self {
        Self {
            reader: BufReader::new(file),
            file_len,
            offset: 0,
            log_size,
            done: false,
        }
    }

    /// Offset of the next record (or of the replay end once exhausted)
    pub fn position(&self) -> IndexOffset {
        IndexOffset::new(self.offset)
    }

    fn finish(&mut self) {
        *self.log_size = self.offset;
        self.done = true;
    }

    fn corruption(&mut self, reason: String) -> Option<Result<KeyRecord>> {
        self.done = true;
        Some(Err(DocError::IndexCorruption {
            offset: self.offset,
            reason,
        }))
    }
}

impl<'a> Iterator for KeyRecords<'a> {
    type Item = Result<KeyRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut header_bytes = [0u8; KEY_HEADER_SIZE as usize];
        let read = match read_full(&mut self.reader, &mut header_bytes) {
            Ok(n) => n,
            Err(e) => {
                self.done = true;
                return Some(Err(DocError::Io(e)));
            }
        };

        if read == 0 {
            self.finish();
            return None;
        }
        if read < header_bytes.len() {
            tracing::warn!(
                offset = self.offset,
                torn_bytes = read,
                "Ignoring partial key record header at end of index log"
            );
            self.finish();
            return None;
        }

        let header = KeyRecordHeader::decode(&header_bytes);

        let remaining = self
            .file_len
            .saturating_sub(self.offset + KEY_HEADER_SIZE);
        if header.key_length > remaining {
            return self.corruption(format!(
                "key length {} exceeds the {} bytes left in the file",
                header.key_length, remaining
            ));
        }

        // Bounded by the file length above
        let mut key = vec![0u8; header.key_length as usize];
        match read_exact_or_short(&mut self.reader, &mut key) {
            Ok(()) => {}
            Err(DocError::ShortRead { expected, actual }) => {
                return self.corruption(format!(
                    "truncated key: expected {} bytes, got {}",
                    expected, actual
                ));
            }
            Err(e) => {
                self.done = true;
                return Some(Err(e));
            }
        }

        let record = KeyRecord {
            offset: IndexOffset::new(self.offset),
            value_offset: header.value_offset,
            key,
        };
        tracing::trace!(
            offset = %record.offset,
            value_offset = %record.value_offset,
            key_len = record.key.len(),
            "Replayed key record"
        );

        self.offset += record.encoded_len();
        Some(Ok(record))
    }
}
