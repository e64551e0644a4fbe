//! # dockv
//!
//! A minimal persistent key-value store with:
//! - Append-only storage log for value bytes
//! - Index log of key records, patched in place on update
//! - In-memory index rebuilt from the index log on startup
//! - A durability fence after every log mutation
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Engine                              │
//! │                (single owner, put / get)                     │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┼─────────────────────┐
//!          │            │                     │
//!          ▼            ▼                     ▼
//!   ┌─────────────┐ ┌─────────────┐   ┌─────────────┐
//!   │ Storage Log │ │  Index Log  │   │  MemIndex   │
//!   │  (values)   │ │   (keys)    │──▶│  (offsets)  │
//!   └─────────────┘ └─────────────┘   └─────────────┘
//!          ▲          replayed on open        │
//!          └──────────────────────────────────┘
//!                 reads go straight to storage
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use dockv::Engine;
//!
//! let mut engine = Engine::open_path(std::path::Path::new("./data"))?;
//! engine.put(b"key1", b"I am string")?;
//! assert_eq!(engine.get(b"key1"), Some(b"I am string".to_vec()));
//! engine.close()?;
//! # Ok::<(), dockv::DocError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod io;
pub mod offset;
pub mod storage;
pub mod index;
pub mod memindex;
pub mod codec;
pub mod engine;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{DocError, Result};
pub use config::{Config, SyncMode};
pub use codec::ValueCodec;
pub use engine::Engine;
pub use offset::{IndexOffset, StorageOffset};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of dockv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
