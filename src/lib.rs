//! Table-driven MAVLink wire codec
//!
//! This library packs and unpacks MAVLink 1 and MAVLink 2 frames: header
//! construction, CRC-16/MCRF4XX integrity checks with per-message CRC extra
//! bytes, payload trimming, and field marshalling driven by message
//! definitions rather than generated per-message code.
//!
//! # Quick Start
//!
//! ```rust
//! use mavcodec::{ProtocolVersion, dialect};
//!
//! let registry = dialect::common();
//!
//! // Create a message
//! let msg = registry.message("HEARTBEAT")?.with("type", 2u8)?;
//!
//! // Encode to bytes
//! let bytes = msg.encode(&registry, ProtocolVersion::V2)?;
//!
//! // Decode from bytes
//! let decoded = mavcodec::Message::decode(&registry, &bytes)?;
//! assert_eq!(decoded, msg);
//! # Ok::<(), mavcodec::Error>(())
//! ```
//!
//! # Features
//!
//! - **Both protocol generations** - 8-bit ids for v1, 24-bit ids and extension fields for v2
//! - **Bit-exact framing** - header layout, CRC coverage and v2 zero trimming match the protocol
//! - **Schema as data** - a [`Registry`] of [`MessageDef`]s replaces per-message code
//! - **Receive-loop friendly** - every failure is a returned [`Error`], never a panic

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::cast_possible_truncation)]

pub mod dialect;
pub mod protocol;

pub use protocol::{
    Codec, CodecConfig, Error, FieldDef, Frame, MAX_PAYLOAD_SIZE, MavHeader, Message, MessageDef,
    ProtocolVersion, Registry, Result, ScalarType, Value, decode, encode,
};
