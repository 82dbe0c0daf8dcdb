//! Codec error types

use thiserror::Error;

use super::ProtocolVersion;

/// Wire codec errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Message id has no entry in the registry
    #[error("unknown message id: {id}")]
    UnknownMessageId {
        /// Message id carried by the frame or message
        id: u32,
    },

    /// Checksum mismatch
    #[error("checksum mismatch: expected {expected:#06x}, got {found:#06x}")]
    ChecksumMismatch {
        /// Checksum recomputed over the received bytes
        expected: u16,
        /// Checksum carried in the frame trailer
        found: u16,
    },

    /// Declared length exceeds the bytes available
    #[error("truncated payload: need {needed} bytes, got {got}")]
    TruncatedPayload {
        /// Bytes required
        needed: usize,
        /// Bytes available
        got: usize,
    },

    /// Payload write would exceed the payload ceiling
    #[error("buffer overflow: need {needed} bytes (capacity {capacity})")]
    BufferOverflow {
        /// Bytes required
        needed: usize,
        /// Buffer capacity
        capacity: usize,
    },

    /// First byte is not a known start-of-frame marker
    #[error("invalid start byte: {found:#04x}")]
    InvalidStartByte {
        /// Byte found at offset 0
        found: u8,
    },

    /// Frame sets incompatibility flags this codec does not understand
    #[error("unsupported incompatibility flags: {flags:#04x}")]
    UnsupportedIncompatFlags {
        /// Raw flags byte
        flags: u8,
    },

    /// Message id cannot be represented in the requested protocol version
    #[error("message id {id} does not fit in a {version} frame")]
    MessageIdOutOfRange {
        /// Message id
        id: u32,
        /// Requested protocol version
        version: ProtocolVersion,
    },

    /// Value does not match the declared field type or array length
    #[error("field `{field}` expects {expected}")]
    FieldType {
        /// Field name
        field: String,
        /// Human-readable description of the expected shape
        expected: String,
    },

    /// Field name is not part of the message definition
    #[error("message {message} has no field `{field}`")]
    UnknownField {
        /// Message name
        message: String,
        /// Requested field name
        field: String,
    },

    /// Message definition rejected during validation
    #[error("invalid definition for {message}: {reason}")]
    InvalidDefinition {
        /// Message name
        message: String,
        /// Validation failure
        reason: String,
    },

    /// Registry already holds a definition for this id
    #[error("duplicate message id: {id}")]
    DuplicateMessage {
        /// Message id
        id: u32,
    },
}

impl Error {
    /// Whether the error concerns a single received frame only.
    ///
    /// A receive loop drops such frames and keeps running.
    #[must_use]
    pub const fn is_frame_local(&self) -> bool {
        matches!(
            self,
            Self::UnknownMessageId { .. }
                | Self::ChecksumMismatch { .. }
                | Self::TruncatedPayload { .. }
                | Self::InvalidStartByte { .. }
                | Self::UnsupportedIncompatFlags { .. }
        )
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
