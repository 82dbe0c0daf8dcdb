//! Wire scalar types, protocol versions and header flags

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{STX_V1, STX_V2};

/// Scalar types that may appear on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ScalarType {
    /// `uint8_t`
    U8,
    /// `int8_t`
    I8,
    /// `uint16_t`
    U16,
    /// `int16_t`
    I16,
    /// `uint32_t`
    U32,
    /// `int32_t`
    I32,
    /// `uint64_t`
    U64,
    /// `int64_t`
    I64,
    /// `float`
    F32,
    /// `double`
    F64,
    /// `char`
    Char,
}

impl ScalarType {
    /// Width of one element on the wire, in bytes
    #[must_use]
    pub const fn wire_size(self) -> usize {
        match self {
            Self::U8 | Self::I8 | Self::Char => 1,
            Self::U16 | Self::I16 => 2,
            Self::U32 | Self::I32 | Self::F32 => 4,
            Self::U64 | Self::I64 | Self::F64 => 8,
        }
    }

    /// C type name, as folded into the CRC extra
    #[must_use]
    pub const fn c_name(self) -> &'static str {
        match self {
            Self::U8 => "uint8_t",
            Self::I8 => "int8_t",
            Self::U16 => "uint16_t",
            Self::I16 => "int16_t",
            Self::U32 => "uint32_t",
            Self::I32 => "int32_t",
            Self::U64 => "uint64_t",
            Self::I64 => "int64_t",
            Self::F32 => "float",
            Self::F64 => "double",
            Self::Char => "char",
        }
    }

    /// Parse a C type name
    #[must_use]
    pub fn from_c_name(name: &str) -> Option<Self> {
        match name {
            "uint8_t" | "uint8_t_mavlink_version" => Some(Self::U8),
            "int8_t" => Some(Self::I8),
            "uint16_t" => Some(Self::U16),
            "int16_t" => Some(Self::I16),
            "uint32_t" => Some(Self::U32),
            "int32_t" => Some(Self::I32),
            "uint64_t" => Some(Self::U64),
            "int64_t" => Some(Self::I64),
            "float" => Some(Self::F32),
            "double" => Some(Self::F64),
            "char" => Some(Self::Char),
            _ => None,
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.c_name())
    }
}

/// Protocol generation carried by a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ProtocolVersion {
    /// MAVLink 1: 6-byte header, 8-bit message ids, fixed-length payloads
    V1,
    /// MAVLink 2: 10-byte header, 24-bit message ids, trimmed payloads
    #[default]
    V2,
}

impl ProtocolVersion {
    /// Determine the version from a start-of-frame byte
    #[must_use]
    pub const fn from_start_byte(byte: u8) -> Option<Self> {
        match byte {
            STX_V1 => Some(Self::V1),
            STX_V2 => Some(Self::V2),
            _ => None,
        }
    }

    /// Start-of-frame byte
    #[must_use]
    pub const fn start_byte(self) -> u8 {
        match self {
            Self::V1 => STX_V1,
            Self::V2 => STX_V2,
        }
    }

    /// Header length including the start byte
    #[must_use]
    pub const fn header_len(self) -> usize {
        match self {
            Self::V1 => super::HEADER_SIZE_V1,
            Self::V2 => super::HEADER_SIZE_V2,
        }
    }

    /// Largest message id the header can carry
    #[must_use]
    pub const fn max_message_id(self) -> u32 {
        match self {
            Self::V1 => 0xFF,
            Self::V2 => super::MAX_MESSAGE_ID,
        }
    }

    /// Check whether this is MAVLink 2
    #[must_use]
    pub const fn is_v2(self) -> bool {
        matches!(self, Self::V2)
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V1 => write!(f, "v1"),
            Self::V2 => write!(f, "v2"),
        }
    }
}

/// Incompatibility flags (v2 header byte 2)
///
/// A receiver must drop frames carrying bits it does not understand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IncompatFlags(u8);

impl IncompatFlags {
    /// Frame is followed by a 13-byte signature
    pub const SIGNED: u8 = 1 << 0;
    /// Valid flag bits mask
    pub const VALID_MASK: u8 = Self::SIGNED;

    /// Create empty flags
    #[must_use]
    pub const fn new() -> Self {
        Self(0)
    }

    /// Create from byte, rejecting unknown bits
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        if value & !Self::VALID_MASK == 0 {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Convert to byte
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    /// Set a flag
    #[must_use]
    pub const fn with(mut self, flag: u8) -> Self {
        debug_assert!(flag & !Self::VALID_MASK == 0, "invalid flag bit");
        self.0 |= flag;
        self
    }

    /// Check if the signing bit is set
    #[must_use]
    pub const fn is_signed(self) -> bool {
        (self.0 & Self::SIGNED) != 0
    }
}

impl fmt::Display for IncompatFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_signed() {
            write!(f, "SIGNED")
        } else {
            write!(f, "NONE")
        }
    }
}
