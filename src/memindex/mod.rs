//! In-Memory Index Module
//!
//! Maps every live key to where its record and value live on disk.
//!
//! ## Responsibilities
//! - Rebuilt from the index log on startup
//! - Kept in sync on every put
//! - Serves all lookups so reads never touch the index log
//!
//! ## Data Structure Choice
//! A plain `HashMap`: point lookups only, no ordering needed. The engine is
//! single-owner, so there is no locking here.
//!
//! Only offsets are cached. Value bytes are always read from the storage log.

mod table;

pub use table::MemIndex;

use crate::offset::{IndexOffset, StorageOffset};

/// Location of one key on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexEntry {
    /// Header of the key's record in the index log (never moves)
    pub index_offset: IndexOffset,

    /// Most recent value record for the key in the storage log
    pub value_offset: StorageOffset,
}
