//! Typed message built on a definition

use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{
    Error, Frame, MessageDef, PayloadCursor, ProtocolVersion, Registry, Result, Value, marshal,
};

/// Sender identity and sequence carried in every frame header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MavHeader {
    /// ID of the sending system
    pub system_id: u8,
    /// ID of the sending component
    pub component_id: u8,
    /// Per-component send sequence, wraps at 255
    pub sequence: u8,
}

impl MavHeader {
    /// Create a header
    #[must_use]
    pub const fn new(system_id: u8, component_id: u8, sequence: u8) -> Self {
        Self {
            system_id,
            component_id,
            sequence,
        }
    }
}

/// Ground-station identity used when the caller does not pick one.
impl Default for MavHeader {
    fn default() -> Self {
        Self {
            system_id: 255,
            component_id: 190,
            sequence: 0,
        }
    }
}

/// Message instance: a definition plus one value per field
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    def: Arc<MessageDef>,
    header: MavHeader,
    values: Vec<Value>,
}

impl Message {
    /// Create a message with every field at its default
    #[must_use]
    pub fn new(def: Arc<MessageDef>) -> Self {
        let values = def.fields().iter().map(Value::default_for).collect();
        Self {
            def,
            header: MavHeader::default(),
            values,
        }
    }

    /// Create a message from a full value list in wire order
    pub fn from_values(def: Arc<MessageDef>, header: MavHeader, values: Vec<Value>) -> Result<Self> {
        if values.len() != def.fields().len() {
            return Err(Error::InvalidDefinition {
                message: def.name().to_owned(),
                reason: format!("expected {} values, got {}", def.fields().len(), values.len()),
            });
        }
        for (field, value) in def.fields().iter().zip(&values) {
            if !value.fits(field) {
                return Err(marshal::type_error(field));
            }
        }
        Ok(Self {
            def,
            header,
            values,
        })
    }

    /// Decode the payload of a parsed frame
    ///
    /// Base fields are read first, then extension fields for MAVLink 2. A
    /// MAVLink 2 payload shorter than the definition is zero-extended first,
    /// so fields lost to trimming read back as zero.
    pub fn unpack(def: Arc<MessageDef>, frame: &Frame) -> Result<Self> {
        let version = frame.version();
        let declared = def.payload_len(version);
        let payload = frame.payload();
        if version == ProtocolVersion::V1 && payload.len() < declared {
            return Err(Error::TruncatedPayload {
                needed: declared,
                got: payload.len(),
            });
        }
        let mut cursor = PayloadCursor::from_payload(payload, declared)?;
        let values = marshal::unpack_fields(&def, version, &mut cursor)?;
        Ok(Self {
            def,
            header: frame.header(),
            values,
        })
    }

    /// Builder-style header override
    #[must_use]
    pub fn with_header(mut self, header: MavHeader) -> Self {
        self.header = header;
        self
    }

    /// Builder-style field assignment
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Result<Self> {
        self.set(name, value)?;
        Ok(self)
    }

    /// Message definition
    #[must_use]
    pub fn def(&self) -> &Arc<MessageDef> {
        &self.def
    }

    /// Message id
    #[must_use]
    pub fn message_id(&self) -> u32 {
        self.def.id()
    }

    /// Message name
    #[must_use]
    pub fn name(&self) -> &str {
        self.def.name()
    }

    /// Header
    #[must_use]
    pub const fn header(&self) -> MavHeader {
        self.header
    }

    /// Mutable header
    pub fn header_mut(&mut self) -> &mut MavHeader {
        &mut self.header
    }

    /// Values in wire order
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Field value by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.def.field_index(name).map(|i| &self.values[i])
    }

    /// Assign a field value, checking its shape against the definition
    ///
    /// Scalar `char` fields take a [`Value::Char`], which an ASCII `char`
    /// converts into; a plain `u8` is a `uint8_t` value.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        let index = self
            .def
            .field_index(name)
            .ok_or_else(|| Error::UnknownField {
                message: self.def.name().to_owned(),
                field: name.to_owned(),
            })?;
        let field = &self.def.fields()[index];
        if !value.fits(field) {
            return Err(marshal::type_error(field));
        }
        self.values[index] = value;
        Ok(())
    }

    /// Encode into a frame for transmission
    pub fn encode(&self, registry: &Registry, version: ProtocolVersion) -> Result<Vec<u8>> {
        super::encode(registry, self, version)
    }

    /// Decode from received frame bytes
    pub fn decode(registry: &Registry, bytes: &[u8]) -> Result<Self> {
        super::decode(registry, bytes)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MAVLINK_MSG_ID_{} - sysid: {}, compid: {}",
            self.def.name(),
            self.header.system_id,
            self.header.component_id
        )?;
        for (field, value) in self.def.fields().iter().zip(&self.values) {
            write!(f, " {}: {value}", field.name())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{FieldDef, ScalarType};

    fn heartbeat() -> Arc<MessageDef> {
        Arc::new(
            MessageDef::builder(0, "HEARTBEAT")
                .field(FieldDef::new("custom_mode", ScalarType::U32))
                .field(FieldDef::new("type", ScalarType::U8))
                .field(FieldDef::new("autopilot", ScalarType::U8))
                .field(FieldDef::new("base_mode", ScalarType::U8))
                .field(FieldDef::new("system_status", ScalarType::U8))
                .field(FieldDef::new("mavlink_version", ScalarType::U8))
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn test_message_defaults() {
        let msg = Message::new(heartbeat());
        assert_eq!(msg.message_id(), 0);
        assert_eq!(msg.header(), MavHeader::new(255, 190, 0));
        assert_eq!(msg.get("custom_mode"), Some(&Value::U32(0)));
        assert_eq!(msg.get("missing"), None);
    }

    #[test]
    fn test_set_checks_type() {
        let mut msg = Message::new(heartbeat());
        msg.set("type", 2u8).unwrap();
        assert_eq!(msg.get("type"), Some(&Value::U8(2)));
        assert!(matches!(
            msg.set("type", 2u16),
            Err(Error::FieldType { .. })
        ));
        assert!(matches!(
            msg.set("nope", 1u8),
            Err(Error::UnknownField { .. })
        ));
    }

    #[test]
    fn test_display() {
        let msg = Message::new(heartbeat())
            .with_header(MavHeader::new(1, 1, 0))
            .with("type", 2u8)
            .unwrap();
        assert_eq!(
            msg.to_string(),
            "MAVLINK_MSG_ID_HEARTBEAT - sysid: 1, compid: 1 custom_mode: 0 type: 2 \
             autopilot: 0 base_mode: 0 system_status: 0 mavlink_version: 0"
        );
    }

    #[test]
    fn test_from_values_length_checked() {
        let result = Message::from_values(heartbeat(), MavHeader::default(), vec![Value::U32(1)]);
        assert!(matches!(result, Err(Error::InvalidDefinition { .. })));
    }

    #[test]
    fn test_type_errors_name_field_shape() {
        let def = Arc::new(
            MessageDef::builder(9, "SAMPLES")
                .field(FieldDef::array("samples", ScalarType::U16, 4))
                .field(FieldDef::new("flag", ScalarType::Char))
                .build()
                .unwrap(),
        );
        let mut msg = Message::new(Arc::clone(&def));
        assert_eq!(
            msg.set("samples", 1u16),
            Err(Error::FieldType {
                field: "samples".into(),
                expected: "uint16_t[4]".into(),
            })
        );
        let result = Message::from_values(
            def,
            MavHeader::default(),
            vec![Value::from(vec![1u16, 2]), Value::Char(b'x')],
        );
        assert_eq!(
            result.map(|_| ()),
            Err(Error::FieldType {
                field: "samples".into(),
                expected: "uint16_t[4]".into(),
            })
        );
    }

    #[test]
    fn test_set_char_field() {
        let def = Arc::new(
            MessageDef::builder(9, "FLAGGED")
                .field(FieldDef::new("flag", ScalarType::Char))
                .build()
                .unwrap(),
        );
        let msg = Message::new(def).with("flag", 'A').unwrap();
        assert_eq!(msg.get("flag"), Some(&Value::Char(b'A')));
        assert!(matches!(
            msg.with("flag", '\u{e9}'),
            Err(Error::FieldType { .. })
        ));
    }

    #[test]
    fn test_header_mut() {
        let mut msg = Message::new(heartbeat());
        msg.header_mut().sequence = 42;
        msg.header_mut().system_id = 3;
        assert_eq!(msg.header(), MavHeader::new(3, 190, 42));
    }
}
