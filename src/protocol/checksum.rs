//! CRC-16/MCRF4XX checksum engine
//!
//! The checksum covers every frame byte after the start marker, followed by
//! the per-message CRC extra byte. The extra byte ties the checksum to the
//! message layout so that peers built from different schemas reject each
//! other's frames instead of misreading them.

use crc_any::CRCu16;

use super::{Error, FieldDef, Registry, Result};

/// Seed loaded by [`Checksum::reset`]
pub const CRC_SEED: u16 = 0xFFFF;

/// Incremental CRC-16/MCRF4XX accumulator
///
/// A scratch object: create one per frame, never share one across frames.
#[derive(Debug)]
pub struct Checksum {
    crc: CRCu16,
}

impl Checksum {
    /// Create an accumulator loaded with the seed
    #[must_use]
    pub fn new() -> Self {
        Self {
            crc: CRCu16::crc16mcrf4cc(),
        }
    }

    /// Reload the seed
    pub fn reset(&mut self) {
        self.crc.reset();
    }

    /// Fold one byte into the state
    #[inline]
    pub fn update(&mut self, byte: u8) {
        self.crc.digest(&[byte]);
    }

    /// Fold a byte slice into the state
    pub fn update_bytes(&mut self, bytes: &[u8]) {
        self.crc.digest(bytes);
    }

    /// Fold the CRC extra byte registered for `message_id`
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownMessageId`] when the registry has no entry;
    /// integrity cannot be established and the frame must be rejected.
    pub fn finish(&mut self, message_id: u32, registry: &Registry) -> Result<()> {
        let extra = registry
            .crc_extra(message_id)
            .ok_or(Error::UnknownMessageId { id: message_id })?;
        self.update(extra);
        Ok(())
    }

    /// Bits 0-7 of the state
    #[must_use]
    pub fn low_byte(&self) -> u8 {
        (self.value() & 0xFF) as u8
    }

    /// Bits 8-15 of the state
    #[must_use]
    pub fn high_byte(&self) -> u8 {
        (self.value() >> 8) as u8
    }

    /// Full 16-bit state
    #[must_use]
    pub fn value(&self) -> u16 {
        self.crc.get_crc()
    }
}

impl Default for Checksum {
    fn default() -> Self {
        Self::new()
    }
}

/// Derive the CRC extra byte for a message layout.
///
/// Folds `"NAME "`, then for every base field its C type and name (each
/// followed by a space) and, for arrays, the length byte. Extension fields
/// do not participate.
#[must_use]
pub fn crc_extra<'a>(name: &str, base_fields: impl IntoIterator<Item = &'a FieldDef>) -> u8 {
    let mut crc = Checksum::new();
    crc.update_bytes(name.as_bytes());
    crc.update(b' ');
    for field in base_fields {
        crc.update_bytes(field.scalar_type().c_name().as_bytes());
        crc.update(b' ');
        crc.update_bytes(field.name().as_bytes());
        crc.update(b' ');
        if field.is_array() {
            // Definition validation bounds array lengths to the payload ceiling.
            crc.update(field.array_len() as u8);
        }
    }
    crc.low_byte() ^ crc.high_byte()
}
