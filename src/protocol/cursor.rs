//! Sequential little-endian payload cursor

use super::{Error, MAX_PAYLOAD_SIZE, Result};

/// Append/read cursor over a fixed 255-byte payload buffer
///
/// Writes advance from offset zero up to the payload ceiling. Reads advance
/// up to the declared length set by [`PayloadCursor::from_payload`] or
/// [`PayloadCursor::set_len`]. There are no random seeks.
#[derive(Clone)]
pub struct PayloadCursor {
    buf: [u8; MAX_PAYLOAD_SIZE],
    index: usize,
    len: usize,
}

macro_rules! scalar_access {
    ($($put:ident, $get:ident => $ty:ty;)*) => {
        $(
            #[doc = concat!("Append a little-endian `", stringify!($ty), "`")]
            pub fn $put(&mut self, value: $ty) -> Result<()> {
                self.put_bytes(&value.to_le_bytes())
            }

            #[doc = concat!("Read a little-endian `", stringify!($ty), "`")]
            pub fn $get(&mut self) -> Result<$ty> {
                let mut raw = [0u8; std::mem::size_of::<$ty>()];
                self.get_bytes(&mut raw)?;
                Ok(<$ty>::from_le_bytes(raw))
            }
        )*
    };
}

impl PayloadCursor {
    /// Create an empty cursor for packing
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buf: [0u8; MAX_PAYLOAD_SIZE],
            index: 0,
            len: 0,
        }
    }

    /// Load received payload bytes for unpacking, zero-extended to `declared_len`
    ///
    /// Bytes past `declared_len` are ignored. Reads beyond the received bytes
    /// but within `declared_len` yield zeros.
    pub fn from_payload(payload: &[u8], declared_len: usize) -> Result<Self> {
        if declared_len > MAX_PAYLOAD_SIZE {
            return Err(Error::BufferOverflow {
                needed: declared_len,
                capacity: MAX_PAYLOAD_SIZE,
            });
        }
        let mut cursor = Self::new();
        let copied = payload.len().min(declared_len);
        cursor.buf[..copied].copy_from_slice(&payload[..copied]);
        cursor.len = declared_len;
        Ok(cursor)
    }

    /// Rewind to offset zero without clearing contents
    pub fn reset(&mut self) {
        self.index = 0;
    }

    /// Rewind and forget the declared length, ready for a fresh pack pass
    pub fn clear(&mut self) {
        self.index = 0;
        self.len = 0;
    }

    /// Current read/write offset
    #[must_use]
    pub const fn position(&self) -> usize {
        self.index
    }

    /// Bytes left before the payload ceiling
    #[must_use]
    pub const fn remaining_capacity(&self) -> usize {
        MAX_PAYLOAD_SIZE - self.index
    }

    /// Declared payload length available to reads
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Check whether nothing has been written or declared
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Set the declared length available to reads
    pub fn set_len(&mut self, len: usize) -> Result<()> {
        if len > MAX_PAYLOAD_SIZE {
            return Err(Error::BufferOverflow {
                needed: len,
                capacity: MAX_PAYLOAD_SIZE,
            });
        }
        self.len = len;
        Ok(())
    }

    /// Bytes written so far, or the declared payload when unpacking
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Append raw bytes
    pub fn put_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let end = self.index + bytes.len();
        if end > MAX_PAYLOAD_SIZE {
            return Err(Error::BufferOverflow {
                needed: end,
                capacity: MAX_PAYLOAD_SIZE,
            });
        }
        self.buf[self.index..end].copy_from_slice(bytes);
        self.index = end;
        self.len = self.len.max(end);
        Ok(())
    }

    /// Read raw bytes into `out`
    pub fn get_bytes(&mut self, out: &mut [u8]) -> Result<()> {
        let end = self.index + out.len();
        if end > self.len {
            return Err(Error::TruncatedPayload {
                needed: end,
                got: self.len,
            });
        }
        out.copy_from_slice(&self.buf[self.index..end]);
        self.index = end;
        Ok(())
    }

    scalar_access! {
        put_u8, get_u8 => u8;
        put_i8, get_i8 => i8;
        put_u16, get_u16 => u16;
        put_i16, get_i16 => i16;
        put_u32, get_u32 => u32;
        put_i32, get_i32 => i32;
        put_u64, get_u64 => u64;
        put_i64, get_i64 => i64;
        put_f32, get_f32 => f32;
        put_f64, get_f64 => f64;
    }
}

impl Default for PayloadCursor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PayloadCursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PayloadCursor")
            .field("index", &self.index)
            .field("len", &self.len)
            .field("bytes", &self.as_slice())
            .finish()
    }
}
