//! Codec configuration

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::ProtocolVersion;

/// Settings for a [`Codec`](super::Codec)
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CodecConfig {
    /// System id stamped on messages created by the codec.
    pub system_id: u8,
    /// Component id stamped on messages created by the codec.
    pub component_id: u8,
    /// Compatibility flags written into MAVLink 2 headers.
    pub compat_flags: u8,
    /// Accept signed MAVLink 2 frames. The signature is carried through, not verified.
    pub accept_signed: bool,
    /// Protocol version used by [`Codec::send`](super::Codec::send).
    pub version: ProtocolVersion,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            system_id: 255,
            component_id: 190,
            compat_flags: 0,
            accept_signed: true,
            version: ProtocolVersion::V2,
        }
    }
}
