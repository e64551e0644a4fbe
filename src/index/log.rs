//! Index Log
//!
//! Appends key records, patches value offsets in place, replays on open.

use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::config::SyncMode;
use crate::error::{DocError, Result};
use crate::io::{fence, write_all_at};
use crate::offset::{IndexOffset, StorageOffset};

use super::iterator::KeyRecords;
use super::record::{encode_record, KEY_HEADER_SIZE, VALUE_OFFSET_FIELD};

/// Append-only log of key records with one patchable field per record
pub struct IndexLog {
    /// Path of the backing file (for logging and errors)
    path: PathBuf,
    /// Read/write handle, held for the lifetime of the log
    file: File,
    /// Logical end of the log; new records are written here
    size: u64,
    /// Fence issued after every append or patch
    sync_mode: SyncMode,
}

impl IndexLog {
    /// Open the index log, creating it if missing
    ///
    /// Call [`IndexLog::records`] afterwards to replay existing records.
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

        tracing::debug!(path = %path.display(), size, "Opened index log");

        Ok(Self {
            path: path.to_path_buf(),
            file,
            size,
            sync_mode,
        })
    }

    /// Iterate over every record from the start of the file
    pub fn records(&mut self) -> Result<KeyRecords<'_>> {
        let Self { file, size, .. } = self;

        let file_len = file.metadata()?.len();
        file.seek(SeekFrom::Start(0))?;

        Ok(KeyRecords::new(&*file, file_len, size))
    }

    /// Append a new key record and fence it
    ///
    /// Returns the offset of the record header, which stays valid for the
    /// lifetime of the key.
    pub fn append(&mut self, key: &[u8], value_offset: StorageOffset) -> Result<IndexOffset> {
        let offset = IndexOffset::new(self.size);
        let record = encode_record(key, value_offset);

        write_all_at(&mut self.file, offset.get(), &record)?;
        fence(&self.file, self.sync_mode)?;

        self.size += record.len() as u64;
        tracing::trace!(%offset, %value_offset, "Appended key record");

        Ok(offset)
    }

    /// Rewrite the value offset field of the record at `record` and fence it
    ///
    /// The log does not grow. Only the 8 bytes of the field are written.
    pub fn patch_value_offset(
        &mut self,
        record: IndexOffset,
        value_offset: StorageOffset,
    ) -> Result<()> {
        if record.get() + KEY_HEADER_SIZE > self.size {
            return Err(DocError::Io(std::io::Error::new(
                ErrorKind::InvalidInput,
                format!("no key record header at {} (log size {})", record, self.size),
            )));
        }

        let field = record.advance(VALUE_OFFSET_FIELD);
        write_all_at(&mut self.file, field.get(), &value_offset.get().to_le_bytes())?;
        fence(&self.file, self.sync_mode)?;

        tracing::trace!(%record, %value_offset, "Patched value offset");
        Ok(())
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
