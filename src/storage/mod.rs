//! Storage Module
//!
//! Append-only log holding raw value bytes.
//!
//! ## Responsibilities
//! - Append length-prefixed value records at end of file
//! - Fence every append before the caller touches the index log
//! - Read a single value back given its offset
//!
//! Values are never overwritten. A superseded value simply stops being
//! referenced by the index log and stays on disk.
//!
//! ## File Format
//! ```text
//! ┌────────────────────────────────────────┐
//! │ Value Record 1                         │
//! │ ┌──────────────┬─────────────────────┐ │
//! │ │ Length (8)   │ Data (Length bytes) │ │
//! │ └──────────────┴─────────────────────┘ │
//! ├────────────────────────────────────────┤
//! │ Value Record 2                         │
//! │ ┌──────────────┬─────────────────────┐ │
//! │ │ Length (8)   │ Data (Length bytes) │ │
//! │ └──────────────┴─────────────────────┘ │
//! └────────────────────────────────────────┘
//! ```
//! Length is a little-endian u64.

mod log;

pub use log::StorageLog;

/// Size of the length prefix in front of every value
pub const LENGTH_PREFIX_SIZE: u64 = 8;
