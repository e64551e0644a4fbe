//! Storage Log
//!
//! Appends value records and reads them back by offset.

use std::fs::{File, OpenOptions};
use std::io::{Seek, SeekFrom};
use std::path::{Path, PathBuf};

use bytes::{Buf, BufMut, BytesMut};

use crate::config::SyncMode;
use crate::error::{DocError, Result};
use crate::io::{fence, read_exact_or_short, write_all_at};
use crate::offset::StorageOffset;

use super::LENGTH_PREFIX_SIZE;

/// Append-only log of length-prefixed values
pub struct StorageLog {
    /// Path of the backing file (for logging and errors)
    path: PathBuf,
    /// Read/write handle, held for the lifetime of the log
    file: File,
    /// Logical end of the log; the next record is written here
    size: u64,
    /// Fence issued after every append
    sync_mode: SyncMode,
}

impl StorageLog {
    /// Open the storage log, creating it if missing
    ///
    /// The file is not scanned. Its current length becomes the append
    /// position.
    pub fn open(path: &Path, sync_mode: SyncMode) -> Result<Self> {
        let open_err = |source| DocError::Open {
            path: path.to_path_buf(),
            source,
        };

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .open(path)
            .map_err(open_err)?;
        let size = file.metadata().map_err(open_err)?.len();

        tracing::debug!(path = %path.display(), size, "Opened storage log");

        Ok(Self {
            path: path.to_path_buf(),
            file,
            size,
            sync_mode,
        })
    }

    /// Append a value record and fence it
    ///
    /// Returns the offset of the record's length prefix. The size
    /// bookkeeping only advances once the fence has succeeded, so a failed
    /// append is overwritten by the next one.
    pub fn append(&mut self, value: &[u8]) -> Result<StorageOffset> {
        let offset = StorageOffset::new(self.size);

        let mut record = BytesMut::with_capacity(LENGTH_PREFIX_SIZE as usize + value.len());
        record.put_u64_le(value.len() as u64);
        record.put_slice(value);

        write_all_at(&mut self.file, offset.get(), &record)?;
        fence(&self.file, self.sync_mode)?;

        self.size += record.len() as u64;
        tracing::trace!(%offset, len = value.len(), "Appended value record");

        Ok(offset)
    }

    /// Read the value record starting at `offset`
    pub fn read(&mut self, offset: StorageOffset) -> Result<Vec<u8>> {
        self.file.seek(SeekFrom::Start(offset.get()))?;

        let mut prefix = [0u8; LENGTH_PREFIX_SIZE as usize];
        read_exact_or_short(&mut self.file, &mut prefix)?;
        let length = (&prefix[..]).get_u64_le();

        // Refuse lengths that cannot fit before allocating for them
        let out_of_bounds = || DocError::ValueOutOfBounds {
            offset: offset.get(),
            length,
            storage_size: self.size,
        };
        let end = offset
            .get()
            .checked_add(LENGTH_PREFIX_SIZE)
            .and_then(|start| start.checked_add(length))
            .ok_or_else(out_of_bounds)?;
        if end > self.size {
            return Err(out_of_bounds());
        }
        let length = usize::try_from(length).map_err(|_| out_of_bounds())?;

        let mut value = vec![0u8; length];
        read_exact_or_short(&mut self.file, &mut value)?;

        Ok(value)
    }

    /// Force a durability fence (used on close)
    pub fn sync(&self) -> Result<()> {
        fence(&self.file, self.sync_mode)
    }

    /// Logical size in bytes
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }
}
