//! Index Module
//!
//! Append-only log mapping keys to value offsets in the storage log.
//!
//! ## Responsibilities
//! - Append one key record the first time a key is written
//! - Patch the value offset of an existing record in place on update
//! - Replay all records on startup to rebuild the in-memory index
//!
//! Because updates patch in place, each key owns exactly one record and a
//! record header never moves once written.
//!
//! ## File Format
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │ Key Record 1                                         │
//! │ ┌──────────────┬──────────────────┬───────────────┐  │
//! │ │ KeyLen (8)   │ ValueOffset (8)  │ Key (KeyLen)  │  │
//! │ └──────────────┴──────────────────┴───────────────┘  │
//! ├──────────────────────────────────────────────────────┤
//! │ Key Record 2                                         │
//! │   ... repeated for each distinct key ...             │
//! └──────────────────────────────────────────────────────┘
//! ```
//! Both header fields are little-endian u64. ValueOffset is the only field
//! ever rewritten.

mod iterator;
mod log;
mod record;

pub use iterator::KeyRecords;
pub use log::IndexLog;
pub use record::{KeyRecord, KeyRecordHeader, KEY_HEADER_SIZE, VALUE_OFFSET_FIELD};
