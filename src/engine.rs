//! Engine Module
//!
//! The storage engine that ties both logs and the in-memory index together.
//!
//! ## Responsibilities
//! - Create the data directory and both logs on first open
//! - Rebuild the in-memory index from the index log on startup
//! - Order every write: storage append → fence → index mutation → fence
//! - Serve reads from the in-memory index and the storage log only

use std::fs;
use std::path::Path;

use crate::codec::ValueCodec;
use crate::config::Config;
use crate::error::{DocError, Result};
use crate::index::IndexLog;
use crate::memindex::{IndexEntry, MemIndex};
use crate::storage::StorageLog;

/// The main storage engine
///
/// ## Ownership Model: Single Owner
///
/// `put` and `get` both take `&mut self`: writes move file cursors and so
/// do reads (every get seeks the storage log). There is no internal
/// locking. To share an engine across threads, wrap it in a `Mutex` on the
/// caller's side.
///
/// ## Crash Window
///
/// A put is not atomic across the two logs. A crash after the storage append
/// but before the index mutation leaves an unreferenced value in the storage
/// log, and the previous value for the key stays authoritative.
pub struct Engine {
    /// Engine configuration
    config: Config,

    /// Value bytes (append-only)
    storage: StorageLog,

    /// Key records pointing into storage (append + in-place patch)
    index: IndexLog,

    /// key → {index record offset, value offset}
    memindex: MemIndex,
}

impl Engine {
    // =========================================================================
    // Internal Path Constants
    // =========================================================================
    const STORAGE_FILENAME: &'static str = "storage";
    const INDEX_FILENAME: &'static str = "index";

    /// Open or create an engine with the given config
    ///
    /// On startup:
    /// 1. Create data directory if missing
    /// 2. Open/create the index log, then the storage log
    /// 3. Replay the index log into the in-memory index
    /// 4. Ready to serve requests
    ///
    /// The storage log is never scanned; the offsets recorded in the index
    /// log are trusted as-is.
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;

        // Step 1: Create data directory if it doesn't exist
        fs::create_dir_all(&config.data_dir).map_err(|source| DocError::Open {
            path: config.data_dir.clone(),
            source,
        })?;

        // Step 2: Open both logs (a failure here drops whatever was opened)
        let index_path = config.data_dir.join(Self::INDEX_FILENAME);
        let storage_path = config.data_dir.join(Self::STORAGE_FILENAME);

        let mut index = IndexLog::open(&index_path, config.sync_mode)?;
        let storage = StorageLog::open(&storage_path, config.sync_mode)?;

        // Step 3: Replay index log
        let mut memindex = MemIndex::new();
        for record in index.records()? {
            let record = record?;

            tracing::debug!(
                key = %String::from_utf8_lossy(&record.key),
                index_offset = %record.offset,
                value_offset = %record.value_offset,
                "Recovered key"
            );

            let entry = IndexEntry {
                index_offset: record.offset,
                value_offset: record.value_offset,
            };
            if let Some(previous) = memindex.insert(record.key, entry) {
                tracing::warn!(
                    previous = %previous.index_offset,
                    current = %entry.index_offset,
                    "Key recorded twice in index log, keeping the later record"
                );
            }
        }

        tracing::info!(
            data_dir = %config.data_dir.display(),
            keys = memindex.len(),
            storage_size = storage.size(),
            index_size = index.size(),
            "Engine opened"
        );

        Ok(Self {
            config,
            storage,
            index,
            memindex,
        })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified data directory
    pub fn open_path(path: &Path) -> Result<Self> {
        let config = Config::builder().data_dir(path).build();
        Self::open(config)
    }

    /// Put a key-value pair
    ///
    /// Steps:
    /// 1. Append value to storage log and fence it
    /// 2. Existing key: patch its index record in place and fence
    ///    New key: append an index record and fence
    /// 3. Update in-memory index
    ///
    /// On error nothing in memory has moved past the last step that
    /// completed. An appended but unreferenced value is left behind.
    pub fn put(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        // Step 1: Value must be durable before the index can point at it
        let value_offset = self.storage.append(value)?;

        // Step 2 + 3: Index log, then memory
        match self.memindex.get(key) {
            Some(entry) => {
                self.index
                    .patch_value_offset(entry.index_offset, value_offset)?;
                self.memindex.set_value_offset(key, value_offset);

                tracing::debug!(
                    key = %String::from_utf8_lossy(key),
                    %value_offset,
                    len = value.len(),
                    "Updated key"
                );
            }
            None => {
                let index_offset = self.index.append(key, value_offset)?;
                self.memindex.insert(
                    key.to_vec(),
                    IndexEntry {
                        index_offset,
                        value_offset,
                    },
                );

                tracing::debug!(
                    key = %String::from_utf8_lossy(key),
                    %index_offset,
                    %value_offset,
                    len = value.len(),
                    "Inserted key"
                );
            }
        }

        Ok(())
    }

    /// Get a value by key
    ///
    /// Returns `None` if the key was never written, and also if its value
    /// cannot be read back. Read failures are logged; use
    /// [`Engine::try_get`] to see them.
    pub fn get(&mut self, key: &[u8]) -> Option<Vec<u8>> {
        match self.try_get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(
                    key = %String::from_utf8_lossy(key),
                    error = %e,
                    "Read failed, reporting key as not found"
                );
                None
            }
        }
    }

    /// Get a value by key, keeping read failures distinct from absence
    ///
    /// Returns:
    /// - `Ok(Some(value))`: key found
    /// - `Ok(None)`: key never written
    /// - `Err(_)`: key known but its value could not be read
    pub fn try_get(&mut self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let Some(entry) = self.memindex.get(key) else {
            return Ok(None);
        };
        self.storage.read(entry.value_offset).map(Some)
    }

    /// Encode `value` with its [`ValueCodec`] and put it
    pub fn put_typed<T: ValueCodec>(&mut self, key: &[u8], value: &T) -> Result<()> {
        self.put(key, &value.encode())
    }

    /// Get a value and decode it with its [`ValueCodec`]
    ///
    /// Absence (or an unreadable value, as with [`Engine::get`]) is
    /// `Ok(None)`; bytes that don't fit `T` are `Err(MalformedValue)`.
    pub fn get_typed<T: ValueCodec>(&mut self, key: &[u8]) -> Result<Option<T>> {
        self.get(key).map(|bytes| T::decode(&bytes)).transpose()
    }

    /// Close the engine gracefully
    ///
    /// Fences both logs, then releases the file handles
    pub fn close(self) -> Result<()> {
        self.storage.sync()?;
        self.index.sync()?;

        tracing::info!(
            data_dir = %self.config.data_dir.display(),
            keys = self.memindex.len(),
            "Engine closed"
        );
        Ok(())
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Number of live keys
    pub fn len(&self) -> usize {
        self.memindex.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memindex.is_empty()
    }

    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.memindex.contains_key(key)
    }

    /// All live keys, in no particular order
    pub fn keys(&self) -> impl Iterator<Item = &[u8]> {
        self.memindex.keys()
    }

    /// On-disk location of a key, if present
    pub fn entry(&self, key: &[u8]) -> Option<IndexEntry> {
        self.memindex.get(key)
    }

    /// Storage log size in bytes
    pub fn storage_size(&self) -> u64 {
        self.storage.size()
    }

    /// Index log size in bytes
    pub fn index_size(&self) -> u64 {
        self.index.size()
    }

    /// Get the data directory path
    pub fn data_dir(&self) -> &Path {
        &self.config.data_dir
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
