//! Packet frame: header, payload and checksum
//!
//! # Wire Format
//!
//! ```text
//! MAVLink 1 (6-byte header):
//! +------+-----+-----+-------+--------+-------+-------------+--------+--------+
//! | 0xFE | len | seq | sysid | compid | msgid | payload ... | crc_lo | crc_hi |
//! +------+-----+-----+-------+--------+-------+-------------+--------+--------+
//!
//! MAVLink 2 (10-byte header):
//! +------+-----+----------+--------+-----+-------+--------+-----------------+
//! | 0xFD | len | incompat | compat | seq | sysid | compid | msgid (3, LE)   |
//! +------+-----+----------+--------+-----+-------+--------+-----------------+
//! | payload ... | crc_lo | crc_hi | [signature (13) if incompat & 0x01]    |
//! +-------------+--------+--------+-----------------------------------------+
//! ```
//!
//! The checksum covers every byte after the start marker up to the end of
//! the payload, then the message's CRC extra byte.

use bytes::Bytes;
use tracing::trace;

use super::{
    CHECKSUM_SIZE, Checksum, Error, IncompatFlags, MavHeader, Message, PayloadCursor,
    ProtocolVersion, Registry, Result, SIGNATURE_SIZE, marshal,
};

/// One packet on the wire
///
/// Created fresh for each outbound message or parsed fresh from each inbound
/// buffer; never reused across messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    version: ProtocolVersion,
    incompat_flags: IncompatFlags,
    compat_flags: u8,
    sequence: u8,
    system_id: u8,
    component_id: u8,
    message_id: u32,
    payload: Bytes,
    checksum: u16,
    signature: Option<[u8; SIGNATURE_SIZE]>,
}

impl Frame {
    /// Pack a message into a frame
    pub fn pack(registry: &Registry, message: &Message, version: ProtocolVersion) -> Result<Self> {
        Self::pack_with_flags(registry, message, version, 0)
    }

    /// Pack a message into a frame, writing `compat_flags` into a MAVLink 2 header
    ///
    /// # Errors
    ///
    /// Fails without producing a frame if the message id is not registered
    /// (no CRC extra), does not fit the version's id width, or a value does
    /// not match its field.
    pub fn pack_with_flags(
        registry: &Registry,
        message: &Message,
        version: ProtocolVersion,
        compat_flags: u8,
    ) -> Result<Self> {
        let message_id = message.message_id();
        if message_id > version.max_message_id() {
            return Err(Error::MessageIdOutOfRange {
                id: message_id,
                version,
            });
        }

        let mut cursor = PayloadCursor::new();
        marshal::pack_fields(message.def(), message.values(), version, &mut cursor)?;
        let written = cursor.as_slice();
        let payload_len = match version {
            ProtocolVersion::V1 => written.len(),
            ProtocolVersion::V2 => trimmed_len(written),
        };

        let header = message.header();
        let mut frame = Self {
            version,
            incompat_flags: IncompatFlags::new(),
            compat_flags: if version.is_v2() { compat_flags } else { 0 },
            sequence: header.sequence,
            system_id: header.system_id,
            component_id: header.component_id,
            message_id,
            payload: Bytes::copy_from_slice(&written[..payload_len]),
            checksum: 0,
            signature: None,
        };
        frame.checksum = frame.compute_checksum(registry)?;

        trace!(
            msgid = message_id,
            %version,
            len = payload_len,
            seq = frame.sequence,
            "packed frame"
        );
        Ok(frame)
    }

    /// Parse header, payload and trailer from received bytes
    ///
    /// The checksum is extracted but not verified; see [`Frame::verify`].
    /// Bytes after the end of the frame are ignored.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let Some(&start) = bytes.first() else {
            return Err(Error::TruncatedPayload { needed: 1, got: 0 });
        };
        let version =
            ProtocolVersion::from_start_byte(start).ok_or(Error::InvalidStartByte { found: start })?;

        let header_len = version.header_len();
        if bytes.len() < header_len {
            return Err(Error::TruncatedPayload {
                needed: header_len,
                got: bytes.len(),
            });
        }

        let payload_len = usize::from(bytes[1]);
        let (incompat, compat_flags, sequence, system_id, component_id, message_id) = match version
        {
            ProtocolVersion::V1 => (0, 0, bytes[2], bytes[3], bytes[4], u32::from(bytes[5])),
            ProtocolVersion::V2 => (
                bytes[2],
                bytes[3],
                bytes[4],
                bytes[5],
                bytes[6],
                u32::from_le_bytes([bytes[7], bytes[8], bytes[9], 0]),
            ),
        };
        let incompat_flags = IncompatFlags::from_u8(incompat)
            .ok_or(Error::UnsupportedIncompatFlags { flags: incompat })?;

        let crc_offset = header_len + payload_len;
        let signature_len = if incompat_flags.is_signed() {
            SIGNATURE_SIZE
        } else {
            0
        };
        let total = crc_offset + CHECKSUM_SIZE + signature_len;
        if bytes.len() < total {
            return Err(Error::TruncatedPayload {
                needed: total,
                got: bytes.len(),
            });
        }

        let checksum = u16::from_le_bytes([bytes[crc_offset], bytes[crc_offset + 1]]);
        let signature = incompat_flags.is_signed().then(|| {
            let mut signature = [0u8; SIGNATURE_SIZE];
            signature.copy_from_slice(&bytes[crc_offset + CHECKSUM_SIZE..total]);
            signature
        });

        trace!(msgid = message_id, %version, len = payload_len, "parsed frame");
        Ok(Self {
            version,
            incompat_flags,
            compat_flags,
            sequence,
            system_id,
            component_id,
            message_id,
            payload: Bytes::copy_from_slice(&bytes[header_len..crc_offset]),
            checksum,
            signature,
        })
    }

    /// Recompute the checksum and compare it with the received trailer
    pub fn verify(&self, registry: &Registry) -> Result<()> {
        let expected = self.compute_checksum(registry)?;
        if expected != self.checksum {
            return Err(Error::ChecksumMismatch {
                expected,
                found: self.checksum,
            });
        }
        Ok(())
    }

    /// Checksum over the header subset, the payload and the CRC extra byte
    pub fn compute_checksum(&self, registry: &Registry) -> Result<u16> {
        let mut crc = Checksum::new();
        // Payload length always fits: it was read from or trimmed to one byte.
        crc.update(self.payload.len() as u8);
        if self.version.is_v2() {
            crc.update(self.incompat_flags.as_u8());
            crc.update(self.compat_flags);
        }
        crc.update(self.sequence);
        crc.update(self.system_id);
        crc.update(self.component_id);
        let (id, width) = self.message_id_bytes();
        crc.update_bytes(&id[..width]);
        crc.update_bytes(&self.payload);
        crc.finish(self.message_id, registry)?;
        Ok(crc.value())
    }

    /// Serialize the frame
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let signature_len = self.signature.map_or(0, |_| SIGNATURE_SIZE);
        let mut bytes = Vec::with_capacity(
            self.version.header_len() + self.payload.len() + CHECKSUM_SIZE + signature_len,
        );

        bytes.push(self.version.start_byte());
        bytes.push(self.payload.len() as u8);
        if self.version.is_v2() {
            bytes.push(self.incompat_flags.as_u8());
            bytes.push(self.compat_flags);
        }
        bytes.push(self.sequence);
        bytes.push(self.system_id);
        bytes.push(self.component_id);
        let (id, width) = self.message_id_bytes();
        bytes.extend_from_slice(&id[..width]);
        bytes.extend_from_slice(&self.payload);
        bytes.extend_from_slice(&self.checksum.to_le_bytes());
        if let Some(signature) = &self.signature {
            bytes.extend_from_slice(signature);
        }

        bytes
    }

    fn message_id_bytes(&self) -> ([u8; 4], usize) {
        let width = match self.version {
            ProtocolVersion::V1 => 1,
            ProtocolVersion::V2 => 3,
        };
        (self.message_id.to_le_bytes(), width)
    }

    /// Protocol version
    #[must_use]
    pub const fn version(&self) -> ProtocolVersion {
        self.version
    }

    /// Incompatibility flags (always empty for MAVLink 1)
    #[must_use]
    pub const fn incompat_flags(&self) -> IncompatFlags {
        self.incompat_flags
    }

    /// Compatibility flags (always zero for MAVLink 1)
    #[must_use]
    pub const fn compat_flags(&self) -> u8 {
        self.compat_flags
    }

    /// Sequence number
    #[must_use]
    pub const fn sequence(&self) -> u8 {
        self.sequence
    }

    /// Sending system id
    #[must_use]
    pub const fn system_id(&self) -> u8 {
        self.system_id
    }

    /// Sending component id
    #[must_use]
    pub const fn component_id(&self) -> u8 {
        self.component_id
    }

    /// Sender identity and sequence
    #[must_use]
    pub const fn header(&self) -> MavHeader {
        MavHeader::new(self.system_id, self.component_id, self.sequence)
    }

    /// Message id
    #[must_use]
    pub const fn message_id(&self) -> u32 {
        self.message_id
    }

    /// Payload as carried on the wire (trimmed for MAVLink 2)
    #[must_use]
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Checksum carried in the trailer
    #[must_use]
    pub const fn checksum(&self) -> u16 {
        self.checksum
    }

    /// Raw signature block of a signed MAVLink 2 frame
    #[must_use]
    pub const fn signature(&self) -> Option<&[u8; SIGNATURE_SIZE]> {
        self.signature.as_ref()
    }

    /// Total encoded length
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        self.version.header_len()
            + self.payload.len()
            + CHECKSUM_SIZE
            + self.signature.map_or(0, |_| SIGNATURE_SIZE)
    }
}

/// Length of `payload` once trailing zero bytes are dropped, keeping at least one byte
fn trimmed_len(payload: &[u8]) -> usize {
    let mut len = payload.len();
    while len > 1 && payload[len - 1] == 0 {
        len -= 1;
    }
    len
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::protocol::{FieldDef, MessageDef, ScalarType, Value};

    fn sample_registry() -> (Registry, Arc<MessageDef>) {
        let def = MessageDef::builder(0, "SAMPLE")
            .field(FieldDef::new("value", ScalarType::U8))
            .field(FieldDef::array("samples", ScalarType::U16, 4))
            .build()
            .unwrap();
        let mut registry = Registry::new();
        registry.register(def).unwrap();
        let def = Arc::clone(registry.get(0).unwrap());
        (registry, def)
    }

    fn sample_message(def: Arc<MessageDef>) -> Message {
        Message::new(def)
            .with_header(MavHeader::new(1, 1, 5))
            .with("value", 7u8)
            .unwrap()
            .with("samples", vec![1u16, 2, 3, 0])
            .unwrap()
    }

    #[test]
    fn test_trimmed_len() {
        assert_eq!(trimmed_len(&[1, 0, 2, 0, 0]), 3);
        assert_eq!(trimmed_len(&[0, 0, 0]), 1);
        assert_eq!(trimmed_len(&[0]), 1);
        assert_eq!(trimmed_len(&[]), 0);
        assert_eq!(trimmed_len(&[5, 6]), 2);
    }

    #[test]
    fn test_v1_reference_frame() {
        let (registry, def) = sample_registry();
        let frame = Frame::pack(&registry, &sample_message(def), ProtocolVersion::V1).unwrap();
        assert_eq!(
            frame.to_bytes(),
            vec![
                0xFE, 0x09, 0x05, 0x01, 0x01, 0x00, // header
                0x07, 0x01, 0x00, 0x02, 0x00, 0x03, 0x00, 0x00, 0x00, // payload
                0x80, 0x18, // checksum
            ]
        );
        assert_eq!(frame.encoded_len(), 17);
    }

    #[test]
    fn test_v2_reference_frame_is_trimmed() {
        let (registry, def) = sample_registry();
        let frame = Frame::pack(&registry, &sample_message(def), ProtocolVersion::V2).unwrap();
        assert_eq!(
            frame.to_bytes(),
            vec![
                0xFD, 0x06, 0x00, 0x00, 0x05, 0x01, 0x01, 0x00, 0x00, 0x00, // header
                0x07, 0x01, 0x00, 0x02, 0x00, 0x03, // payload
                0x8B, 0x13, // checksum
            ]
        );
    }

    #[test]
    fn test_parse_then_verify() {
        let (registry, def) = sample_registry();
        let frame = Frame::pack(&registry, &sample_message(def), ProtocolVersion::V2).unwrap();
        let parsed = Frame::parse(&frame.to_bytes()).unwrap();
        assert_eq!(parsed, frame);
        parsed.verify(&registry).unwrap();
    }

    #[test]
    fn test_unknown_id_is_fatal_to_packing() {
        let (_, def) = sample_registry();
        let empty = Registry::new();
        let result = Frame::pack(&empty, &sample_message(def), ProtocolVersion::V1);
        assert_eq!(result, Err(Error::UnknownMessageId { id: 0 }));
    }

    #[test]
    fn test_v1_rejects_wide_ids() {
        let def = MessageDef::builder(300, "WIDE")
            .field(FieldDef::new("a", ScalarType::U8))
            .build()
            .unwrap();
        let mut registry = Registry::new();
        registry.register(def).unwrap();
        let msg = Message::new(Arc::clone(registry.get(300).unwrap()));
        assert_eq!(
            Frame::pack(&registry, &msg, ProtocolVersion::V1),
            Err(Error::MessageIdOutOfRange {
                id: 300,
                version: ProtocolVersion::V1
            })
        );
        let frame = Frame::pack(&registry, &msg, ProtocolVersion::V2).unwrap();
        assert_eq!(&frame.to_bytes()[7..10], &[0x2C, 0x01, 0x00]);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            Frame::parse(&[]),
            Err(Error::TruncatedPayload { needed: 1, got: 0 })
        );
        assert_eq!(
            Frame::parse(&[0x55, 0, 0]),
            Err(Error::InvalidStartByte { found: 0x55 })
        );
        assert_eq!(
            Frame::parse(&[0xFD, 0, 0]),
            Err(Error::TruncatedPayload { needed: 10, got: 3 })
        );
        // Declares 4 payload bytes but carries none.
        assert_eq!(
            Frame::parse(&[0xFE, 4, 0, 1, 1, 0, 0xAA, 0xBB]),
            Err(Error::TruncatedPayload { needed: 12, got: 8 })
        );
        assert_eq!(
            Frame::parse(&[0xFD, 0, 0x80, 0, 0, 1, 1, 0, 0, 0, 0, 0]),
            Err(Error::UnsupportedIncompatFlags { flags: 0x80 })
        );
    }

    #[test]
    fn test_signature_passthrough() {
        let (registry, def) = sample_registry();
        let frame = Frame::pack(&registry, &sample_message(def), ProtocolVersion::V2).unwrap();
        let mut bytes = frame.to_bytes();
        bytes[2] = IncompatFlags::SIGNED;
        // Fix up the checksum for the new flags byte.
        let mut crc = Checksum::new();
        crc.update_bytes(&bytes[1..bytes.len() - CHECKSUM_SIZE]);
        crc.finish(0, &registry).unwrap();
        let len = bytes.len();
        bytes[len - 2..].copy_from_slice(&crc.value().to_le_bytes());
        bytes.extend_from_slice(&[0xA5; SIGNATURE_SIZE]);

        let parsed = Frame::parse(&bytes).unwrap();
        parsed.verify(&registry).unwrap();
        assert!(parsed.incompat_flags().is_signed());
        assert_eq!(parsed.signature(), Some(&[0xA5; SIGNATURE_SIZE]));
        assert_eq!(parsed.to_bytes(), bytes);

        // Signature announced but missing.
        assert!(matches!(
            Frame::parse(&bytes[..len]),
            Err(Error::TruncatedPayload { .. })
        ));
    }

    #[test]
    fn test_all_zero_payload_keeps_one_byte() {
        let (registry, def) = sample_registry();
        let msg = Message::new(def).with("value", Value::U8(0)).unwrap();
        let frame = Frame::pack(&registry, &msg, ProtocolVersion::V2).unwrap();
        assert_eq!(frame.payload().as_ref(), &[0]);
    }
}
