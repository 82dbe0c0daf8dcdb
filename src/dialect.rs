//! Bundled message definitions
//!
//! A subset of the MAVLink `common` message set, with fields listed in wire
//! order. CRC extra bytes are derived from the layouts and match the values
//! published with the message set.

use crate::protocol::{FieldDef, MessageDef, Registry, Result, ScalarType};

/// Registry holding the bundled `common` subset
#[must_use]
pub fn common() -> Registry {
    common_defs()
        .and_then(Registry::from_defs)
        .expect("bundled definitions validated by tests")
}

/// Definitions of the bundled `common` subset
pub fn common_defs() -> Result<Vec<MessageDef>> {
    use ScalarType::{Char, F32, U8, U16, U32, U64};

    Ok(vec![
        MessageDef::builder(0, "HEARTBEAT")
            .description("The heartbeat message shows that a system or component is present and responding.")
            .field(FieldDef::new("custom_mode", U32).with_description("Autopilot-specific flags"))
            .field(FieldDef::new("type", U8).with_description("Vehicle or component type"))
            .field(FieldDef::new("autopilot", U8).with_description("Autopilot type / class"))
            .field(FieldDef::new("base_mode", U8).with_description("System mode bitmap"))
            .field(FieldDef::new("system_status", U8).with_description("System status flag"))
            .field(FieldDef::new("mavlink_version", U8))
            .build()?,
        MessageDef::builder(2, "SYSTEM_TIME")
            .description("The system time is the time of the master clock.")
            .field(FieldDef::new("time_unix_usec", U64))
            .field(FieldDef::new("time_boot_ms", U32))
            .build()?,
        MessageDef::builder(4, "PING")
            .description("A ping message either requesting or responding to a ping.")
            .field(FieldDef::new("time_usec", U64))
            .field(FieldDef::new("seq", U32))
            .field(FieldDef::new("target_system", U8))
            .field(FieldDef::new("target_component", U8))
            .build()?,
        MessageDef::builder(22, "PARAM_VALUE")
            .description("Emit the value of an onboard parameter.")
            .field(FieldDef::new("param_value", F32))
            .field(FieldDef::new("param_count", U16))
            .field(FieldDef::new("param_index", U16))
            .field(FieldDef::array("param_id", Char, 16).with_description("Onboard parameter id"))
            .field(FieldDef::new("param_type", U8))
            .build()?,
        MessageDef::builder(30, "ATTITUDE")
            .description("The attitude in the aeronautical frame (right-handed, Z-down, X-front, Y-right).")
            .field(FieldDef::new("time_boot_ms", U32))
            .field(FieldDef::new("roll", F32))
            .field(FieldDef::new("pitch", F32))
            .field(FieldDef::new("yaw", F32))
            .field(FieldDef::new("rollspeed", F32))
            .field(FieldDef::new("pitchspeed", F32))
            .field(FieldDef::new("yawspeed", F32))
            .build()?,
        MessageDef::builder(76, "COMMAND_LONG")
            .description("Send a command with up to seven parameters to the MAV.")
            .field(FieldDef::new("param1", F32))
            .field(FieldDef::new("param2", F32))
            .field(FieldDef::new("param3", F32))
            .field(FieldDef::new("param4", F32))
            .field(FieldDef::new("param5", F32))
            .field(FieldDef::new("param6", F32))
            .field(FieldDef::new("param7", F32))
            .field(FieldDef::new("command", U16))
            .field(FieldDef::new("target_system", U8))
            .field(FieldDef::new("target_component", U8))
            .field(FieldDef::new("confirmation", U8))
            .build()?,
        MessageDef::builder(253, "STATUSTEXT")
            .description("Status text message.")
            .field(FieldDef::new("severity", U8))
            .field(FieldDef::array("text", Char, 50))
            .extension(FieldDef::new("id", U16).with_description("Unique (opaque) identifier for this statustext message"))
            .extension(FieldDef::new("chunk_seq", U8))
            .build()?,
        MessageDef::builder(300, "PROTOCOL_VERSION")
            .description("Version and capability of protocol version.")
            .field(FieldDef::new("version", U16))
            .field(FieldDef::new("min_version", U16))
            .field(FieldDef::new("max_version", U16))
            .field(FieldDef::array("spec_version_hash", U8, 8))
            .field(FieldDef::array("library_version_hash", U8, 8))
            .build()?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_published_crc_extras() {
        let registry = common();
        let expected = [
            (0, 50),
            (2, 137),
            (4, 237),
            (22, 220),
            (30, 39),
            (76, 152),
            (253, 83),
            (300, 217),
        ];
        for (id, crc) in expected {
            assert_eq!(registry.crc_extra(id), Some(crc), "message {id}");
        }
        assert_eq!(registry.len(), expected.len());
    }

    #[test]
    fn test_published_lengths() {
        let registry = common();
        assert_eq!(registry.payload_length(0), Some(9));
        assert_eq!(registry.payload_length(22), Some(25));
        assert_eq!(registry.payload_length(76), Some(33));
        assert_eq!(registry.min_payload_length(253), Some(51));
        assert_eq!(registry.payload_length(253), Some(54));
        assert_eq!(registry.payload_length(300), Some(22));
    }
}
