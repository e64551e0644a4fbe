//! Low-level file I/O shared by both logs
//!
//! - exact-count reads that tell a clean EOF apart from a short read
//! - positioned writes
//! - the durability fence selected by [`SyncMode`]

use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};

use crate::config::SyncMode;
use crate::error::{DocError, Result};

/// Read until `buf` is full or the reader hits EOF.
///
/// Returns the number of bytes read; anything below `buf.len()` means EOF
/// was reached first. Interrupted reads are retried.
pub fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Read exactly `buf.len()` bytes or fail with [`DocError::ShortRead`].
pub fn read_exact_or_short<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<()> {
    let actual = read_full(reader, buf)?;
    if actual < buf.len() {
        return Err(DocError::ShortRead {
            expected: buf.len(),
            actual,
        });
    }
    Ok(())
}

/// Write all of `bytes` starting at absolute position `offset`.
pub fn write_all_at(file: &mut File, offset: u64, bytes: &[u8]) -> Result<()> {
    file.seek(SeekFrom::Start(offset))?;
    file.write_all(bytes)?;
    Ok(())
}

/// Block until previous writes to `file` are on stable storage.
pub fn fence(file: &File, mode: SyncMode) -> Result<()> {
    match mode {
        SyncMode::Data => file.sync_data()?,
        SyncMode::All => file.sync_all()?,
    }
    Ok(())
}
