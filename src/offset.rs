//! Typed file offsets
//!
//! The storage log and the index log are separate address spaces. Keeping
//! their offsets in distinct newtypes means a storage offset can never be
//! handed to the index log (or vice versa) without an explicit conversion.

use std::fmt;

/// Byte offset of a value record inside the storage log
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct StorageOffset(u64);

/// Byte offset of a key record header inside the index log
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct IndexOffset(u64);

macro_rules! offset_impl {
    ($name:ident, $tag:literal) => {
        impl $name {
            pub const fn new(offset: u64) -> Self {
                Self(offset)
            }

            /// Raw byte position
            pub const fn get(self) -> u64 {
                self.0
            }

            /// Offset `len` bytes further into the same file
            pub const fn advance(self, len: u64) -> Self {
                Self(self.0 + len)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}@{}", $tag, self.0)
            }
        }
    };
}

offset_impl!(StorageOffset, "storage");
offset_impl!(IndexOffset, "index");
