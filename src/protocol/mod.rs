//! MAVLink wire codec
//!
//! This module provides framing, checksums and table-driven field
//! marshalling for MAVLink 1 and MAVLink 2.

mod checksum;
mod codec;
mod config;
mod cursor;
mod definition;
mod error;
mod frame;
mod marshal;
mod message;
mod registry;
mod stats;
mod types;
mod value;

pub use checksum::{CRC_SEED, Checksum, crc_extra};
pub use codec::{Codec, decode, encode};
pub use config::CodecConfig;
pub use cursor::PayloadCursor;
pub use definition::{FieldDef, MessageDef, MessageDefBuilder};
pub use error::{Error, Result};
pub use frame::Frame;
pub use marshal::{pack_field, pack_fields, unpack_field, unpack_fields};
pub use message::{MavHeader, Message};
pub use registry::Registry;
pub use stats::StatsSnapshot;
pub use types::{IncompatFlags, ProtocolVersion, ScalarType};
pub use value::Value;

/// MAVLink 1 start-of-frame marker
pub const STX_V1: u8 = 0xFE;

/// MAVLink 2 start-of-frame marker
pub const STX_V2: u8 = 0xFD;

/// MAVLink 1 header size in bytes, start marker included
pub const HEADER_SIZE_V1: usize = 6;

/// MAVLink 2 header size in bytes, start marker included
pub const HEADER_SIZE_V2: usize = 10;

/// Checksum size in bytes
pub const CHECKSUM_SIZE: usize = 2;

/// MAVLink 2 signature size in bytes (link id, timestamp, truncated hash)
pub const SIGNATURE_SIZE: usize = 13;

/// Maximum payload size
pub const MAX_PAYLOAD_SIZE: usize = 255;

/// Largest MAVLink 2 message id (24 bits)
pub const MAX_MESSAGE_ID: u32 = 0x00FF_FFFF;
