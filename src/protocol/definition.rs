//! Message and field definitions
//!
//! Definitions come from the external schema. Fields are listed in wire
//! order: base fields first, then the extension fields that only travel in
//! MAVLink 2 frames.

use std::collections::HashSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{Error, MAX_MESSAGE_ID, MAX_PAYLOAD_SIZE, ProtocolVersion, Result, ScalarType, checksum};

/// Field descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FieldDef {
    name: String,
    scalar_type: ScalarType,
    array_len: usize,
    description: String,
}

impl FieldDef {
    /// Scalar field
    #[must_use]
    pub fn new(name: impl Into<String>, scalar_type: ScalarType) -> Self {
        Self::array(name, scalar_type, 0)
    }

    /// Fixed-length array, or a character buffer when `scalar_type` is `Char`
    #[must_use]
    pub fn array(name: impl Into<String>, scalar_type: ScalarType, array_len: usize) -> Self {
        Self {
            name: name.into(),
            scalar_type,
            array_len,
            description: String::new(),
        }
    }

    /// Attach a human-readable description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Field name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Element type
    #[must_use]
    pub const fn scalar_type(&self) -> ScalarType {
        self.scalar_type
    }

    /// Array length, 0 for scalars
    #[must_use]
    pub const fn array_len(&self) -> usize {
        self.array_len
    }

    /// Field description
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Check if the field is an array or character buffer
    #[must_use]
    pub const fn is_array(&self) -> bool {
        self.array_len > 0
    }

    /// Check if the field is a null-padded character buffer
    #[must_use]
    pub const fn is_text(&self) -> bool {
        self.array_len > 0 && matches!(self.scalar_type, ScalarType::Char)
    }

    /// Bytes occupied on the wire
    #[must_use]
    pub const fn wire_size(&self) -> usize {
        let count = if self.array_len == 0 { 1 } else { self.array_len };
        self.scalar_type.wire_size() * count
    }
}

/// Message definition
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MessageDef {
    id: u32,
    name: String,
    description: String,
    fields: Vec<FieldDef>,
    extensions_start: usize,
    crc_extra: u8,
    base_len: usize,
    full_len: usize,
}

impl MessageDef {
    /// Start building a definition
    #[must_use]
    pub fn builder(id: u32, name: impl Into<String>) -> MessageDefBuilder {
        MessageDefBuilder {
            id,
            name: name.into(),
            description: String::new(),
            base: Vec::new(),
            extensions: Vec::new(),
            crc_extra: None,
        }
    }

    /// Message id
    #[must_use]
    pub const fn id(&self) -> u32 {
        self.id
    }

    /// Message name (upper snake case)
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Message description
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// All fields in wire order
    #[must_use]
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Fields present in both protocol versions
    #[must_use]
    pub fn base_fields(&self) -> &[FieldDef] {
        &self.fields[..self.extensions_start]
    }

    /// Fields present only in MAVLink 2 frames
    #[must_use]
    pub fn extension_fields(&self) -> &[FieldDef] {
        &self.fields[self.extensions_start..]
    }

    /// Index of the first extension field
    #[must_use]
    pub const fn extensions_start(&self) -> usize {
        self.extensions_start
    }

    /// CRC extra byte
    #[must_use]
    pub const fn crc_extra(&self) -> u8 {
        self.crc_extra
    }

    /// Full wire length, extensions included
    #[must_use]
    pub const fn wire_length(&self) -> usize {
        self.full_len
    }

    /// Wire length of the base fields
    #[must_use]
    pub const fn base_wire_length(&self) -> usize {
        self.base_len
    }

    /// Untrimmed payload length for the given protocol version
    #[must_use]
    pub const fn payload_len(&self, version: ProtocolVersion) -> usize {
        match version {
            ProtocolVersion::V1 => self.base_len,
            ProtocolVersion::V2 => self.full_len,
        }
    }

    /// Position of a field by name
    #[must_use]
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name == name)
    }
}

/// Builder for [`MessageDef`]
#[derive(Debug, Clone)]
pub struct MessageDefBuilder {
    id: u32,
    name: String,
    description: String,
    base: Vec<FieldDef>,
    extensions: Vec<FieldDef>,
    crc_extra: Option<u8>,
}

impl MessageDefBuilder {
    /// Set the description
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Append a base field
    #[must_use]
    pub fn field(mut self, field: FieldDef) -> Self {
        self.base.push(field);
        self
    }

    /// Append an extension field
    #[must_use]
    pub fn extension(mut self, field: FieldDef) -> Self {
        self.extensions.push(field);
        self
    }

    /// Use a CRC extra supplied by the schema instead of deriving it
    #[must_use]
    pub fn crc_extra(mut self, crc_extra: u8) -> Self {
        self.crc_extra = Some(crc_extra);
        self
    }

    /// Validate and build the definition
    pub fn build(self) -> Result<MessageDef> {
        let invalid = |reason: String| Error::InvalidDefinition {
            message: self.name.clone(),
            reason,
        };

        if self.name.is_empty() {
            return Err(invalid("empty message name".into()));
        }
        if self.id > MAX_MESSAGE_ID {
            return Err(invalid(format!("id {} exceeds {MAX_MESSAGE_ID}", self.id)));
        }

        let mut seen = HashSet::new();
        for field in self.base.iter().chain(&self.extensions) {
            if field.name.is_empty() {
                return Err(invalid("empty field name".into()));
            }
            if field.array_len > MAX_PAYLOAD_SIZE {
                return Err(invalid(format!(
                    "field `{}` array length {} exceeds {MAX_PAYLOAD_SIZE}",
                    field.name, field.array_len
                )));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(invalid(format!("duplicate field `{}`", field.name)));
            }
        }

        let base_len: usize = self.base.iter().map(FieldDef::wire_size).sum();
        let full_len = base_len + self.extensions.iter().map(FieldDef::wire_size).sum::<usize>();
        if full_len > MAX_PAYLOAD_SIZE {
            return Err(Error::BufferOverflow {
                needed: full_len,
                capacity: MAX_PAYLOAD_SIZE,
            });
        }

        let crc_extra = self
            .crc_extra
            .unwrap_or_else(|| checksum::crc_extra(&self.name, &self.base));
        let extensions_start = self.base.len();
        let mut fields = self.base;
        fields.extend(self.extensions);

        Ok(MessageDef {
            id: self.id,
            name: self.name,
            description: self.description,
            fields,
            extensions_start,
            crc_extra,
            base_len,
            full_len,
        })
    }
}
