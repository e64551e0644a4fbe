//! Typed value codecs
//!
//! The engine stores opaque bytes. These helpers turn common value types
//! into byte buffers and back, so callers don't hand-roll layouts.
//!
//! ## Encodings
//! - fixed-width integers: little-endian, exactly `size_of::<T>()` bytes
//! - integer arrays: elements back to back, no length prefix (the storage
//!   record already carries the byte length)
//! - strings: UTF-8 bytes
//! - raw bytes: unchanged

use bytes::{Buf, BufMut};

use crate::error::{DocError, Result};

/// Conversion between a typed value and the bytes stored for it
pub trait ValueCodec: Sized {
    /// Encode into the byte layout stored in the storage log
    fn encode(&self) -> Vec<u8>;

    /// Decode stored bytes, failing with [`DocError::MalformedValue`] when
    /// the layout does not fit the type
    fn decode(bytes: &[u8]) -> Result<Self>;
}

macro_rules! int_codec {
    ($ty:ty, $put:ident, $get:ident) => {
        impl ValueCodec for $ty {
            fn encode(&self) -> Vec<u8> {
                let mut buf = Vec::with_capacity(std::mem::size_of::<$ty>());
                buf.$put(*self);
                buf
            }

            fn decode(bytes: &[u8]) -> Result<Self> {
                const WIDTH: usize = std::mem::size_of::<$ty>();
                if bytes.len() != WIDTH {
                    return Err(DocError::MalformedValue(format!(
                        "expected {} bytes for {}, got {}",
                        WIDTH,
                        stringify!($ty),
                        bytes.len()
                    )));
                }
                let mut buf = bytes;
                Ok(buf.$get())
            }
        }

        impl ValueCodec for Vec<$ty> {
            fn encode(&self) -> Vec<u8> {
                let mut buf = Vec::with_capacity(self.len() * std::mem::size_of::<$ty>());
                for item in self {
                    buf.$put(*item);
                }
                buf
            }

            fn decode(bytes: &[u8]) -> Result<Self> {
                const WIDTH: usize = std::mem::size_of::<$ty>();
                if bytes.len() % WIDTH != 0 {
                    return Err(DocError::MalformedValue(format!(
                        "{} bytes is not a whole number of {} elements",
                        bytes.len(),
                        stringify!($ty)
                    )));
                }
                let mut buf = bytes;
                let mut items = Vec::with_capacity(bytes.len() / WIDTH);
                while buf.has_remaining() {
                    items.push(buf.$get());
                }
                Ok(items)
            }
        }
    };
}

int_codec!(i32, put_i32_le, get_i32_le);
int_codec!(u32, put_u32_le, get_u32_le);
int_codec!(i64, put_i64_le, get_i64_le);
int_codec!(u64, put_u64_le, get_u64_le);

impl ValueCodec for String {
    fn encode(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        String::from_utf8(bytes.to_vec())
            .map_err(|e| DocError::MalformedValue(format!("invalid UTF-8: {}", e)))
    }
}

impl ValueCodec for Vec<u8> {
    fn encode(&self) -> Vec<u8> {
        self.clone()
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(bytes.to_vec())
    }
}
