//! Field marshalling
//!
//! One set of rules serves every message: definitions drive the walk over
//! fields, so no per-message code exists.

use super::{Error, FieldDef, MessageDef, PayloadCursor, ProtocolVersion, Result, ScalarType, Value};

/// Serialize every field of `def` into `cursor`
///
/// Extension fields are written only for MAVLink 2; under MAVLink 1 they are
/// absent from the wire form altogether.
pub fn pack_fields(
    def: &MessageDef,
    values: &[Value],
    version: ProtocolVersion,
    cursor: &mut PayloadCursor,
) -> Result<()> {
    if values.len() != def.fields().len() {
        return Err(Error::InvalidDefinition {
            message: def.name().to_owned(),
            reason: format!("expected {} values, got {}", def.fields().len(), values.len()),
        });
    }
    cursor.clear();
    let count = match version {
        ProtocolVersion::V1 => def.extensions_start(),
        ProtocolVersion::V2 => def.fields().len(),
    };
    for (field, value) in def.fields().iter().zip(values).take(count) {
        pack_field(cursor, field, value)?;
    }
    Ok(())
}

/// Read every field of `def` back out of `cursor`
///
/// Under MAVLink 1 extension fields are not read and take their defaults.
pub fn unpack_fields(
    def: &MessageDef,
    version: ProtocolVersion,
    cursor: &mut PayloadCursor,
) -> Result<Vec<Value>> {
    cursor.reset();
    let mut values = Vec::with_capacity(def.fields().len());
    for field in def.base_fields() {
        values.push(unpack_field(cursor, field)?);
    }
    for field in def.extension_fields() {
        let value = if version.is_v2() {
            unpack_field(cursor, field)?
        } else {
            Value::default_for(field)
        };
        values.push(value);
    }
    Ok(values)
}

/// Serialize one field
pub fn pack_field(cursor: &mut PayloadCursor, field: &FieldDef, value: &Value) -> Result<()> {
    if !value.fits(field) {
        return Err(type_error(field));
    }
    match value {
        Value::Text(text) => {
            let capacity = field.array_len();
            let bytes = text.as_bytes();
            let mut copied = bytes.len().min(capacity);
            while !text.is_char_boundary(copied) {
                copied -= 1;
            }
            cursor.put_bytes(&bytes[..copied])?;
            for _ in copied..capacity {
                cursor.put_u8(0)?;
            }
            Ok(())
        }
        Value::Array(items) => items.iter().try_for_each(|item| put_scalar(cursor, item)),
        scalar => put_scalar(cursor, scalar),
    }
}

/// Deserialize one field
pub fn unpack_field(cursor: &mut PayloadCursor, field: &FieldDef) -> Result<Value> {
    if field.is_text() {
        let mut raw = vec![0u8; field.array_len()];
        cursor.get_bytes(&mut raw)?;
        let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
        return Ok(Value::Text(String::from_utf8_lossy(&raw[..end]).into_owned()));
    }
    if field.is_array() {
        let items = (0..field.array_len())
            .map(|_| get_scalar(cursor, field.scalar_type()))
            .collect::<Result<Vec<_>>>()?;
        return Ok(Value::Array(items));
    }
    get_scalar(cursor, field.scalar_type())
}

fn put_scalar(cursor: &mut PayloadCursor, value: &Value) -> Result<()> {
    match *value {
        Value::U8(v) | Value::Char(v) => cursor.put_u8(v),
        Value::I8(v) => cursor.put_i8(v),
        Value::U16(v) => cursor.put_u16(v),
        Value::I16(v) => cursor.put_i16(v),
        Value::U32(v) => cursor.put_u32(v),
        Value::I32(v) => cursor.put_i32(v),
        Value::U64(v) => cursor.put_u64(v),
        Value::I64(v) => cursor.put_i64(v),
        Value::F32(v) => cursor.put_f32(v),
        Value::F64(v) => cursor.put_f64(v),
        Value::Array(_) | Value::Text(_) => unreachable!("shape checked by Value::fits"),
    }
}

fn get_scalar(cursor: &mut PayloadCursor, ty: ScalarType) -> Result<Value> {
    Ok(match ty {
        ScalarType::U8 => Value::U8(cursor.get_u8()?),
        ScalarType::I8 => Value::I8(cursor.get_i8()?),
        ScalarType::U16 => Value::U16(cursor.get_u16()?),
        ScalarType::I16 => Value::I16(cursor.get_i16()?),
        ScalarType::U32 => Value::U32(cursor.get_u32()?),
        ScalarType::I32 => Value::I32(cursor.get_i32()?),
        ScalarType::U64 => Value::U64(cursor.get_u64()?),
        ScalarType::I64 => Value::I64(cursor.get_i64()?),
        ScalarType::F32 => Value::F32(cursor.get_f32()?),
        ScalarType::F64 => Value::F64(cursor.get_f64()?),
        ScalarType::Char => Value::Char(cursor.get_u8()?),
    })
}

/// Shape mismatch error naming what `field` accepts
pub(crate) fn type_error(field: &FieldDef) -> Error {
    let expected = if field.is_text() {
        format!("text of up to {} bytes", field.array_len())
    } else if field.is_array() {
        format!("{}[{}]", field.scalar_type(), field.array_len())
    } else {
        field.scalar_type().to_string()
    };
    Error::FieldType {
        field: field.name().to_owned(),
        expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MessageDef {
        MessageDef::builder(0, "SAMPLE")
            .field(FieldDef::new("value", ScalarType::U8))
            .field(FieldDef::array("samples", ScalarType::U16, 4))
            .build()
            .unwrap()
    }

    #[test]
    fn test_scalar_then_array_layout() {
        let def = sample();
        let values = vec![Value::U8(7), Value::from(vec![1u16, 2, 3, 0])];
        let mut cursor = PayloadCursor::new();
        pack_fields(&def, &values, ProtocolVersion::V1, &mut cursor).unwrap();
        assert_eq!(cursor.as_slice(), &[0x07, 0x01, 0x00, 0x02, 0x00, 0x03, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn test_text_null_padding() {
        let field = FieldDef::array("name", ScalarType::Char, 6);
        let mut cursor = PayloadCursor::new();
        pack_field(&mut cursor, &field, &Value::from("abc")).unwrap();
        assert_eq!(cursor.as_slice(), b"abc\0\0\0");

        cursor.reset();
        assert_eq!(unpack_field(&mut cursor, &field).unwrap(), Value::from("abc"));
    }

    #[test]
    fn test_text_exactly_fills_buffer() {
        let field = FieldDef::array("name", ScalarType::Char, 4);
        let mut cursor = PayloadCursor::new();
        pack_field(&mut cursor, &field, &Value::from("abcd")).unwrap();
        assert_eq!(cursor.as_slice(), b"abcd");
        cursor.reset();
        assert_eq!(unpack_field(&mut cursor, &field).unwrap(), Value::from("abcd"));
    }

    #[test]
    fn test_text_truncated_to_capacity() {
        let field = FieldDef::array("name", ScalarType::Char, 3);
        let mut cursor = PayloadCursor::new();
        pack_field(&mut cursor, &field, &Value::from("abcdef")).unwrap();
        assert_eq!(cursor.as_slice(), b"abc");
    }

    #[test]
    fn test_text_truncation_keeps_whole_characters() {
        let field = FieldDef::array("name", ScalarType::Char, 2);
        let mut cursor = PayloadCursor::new();
        pack_field(&mut cursor, &field, &Value::from("a\u{e9}")).unwrap();
        assert_eq!(cursor.as_slice(), b"a\0");
        cursor.reset();
        assert_eq!(unpack_field(&mut cursor, &field).unwrap(), Value::from("a"));
    }

    #[test]
    fn test_type_error_names_shape() {
        let samples = FieldDef::array("samples", ScalarType::U16, 4);
        let text = FieldDef::array("text", ScalarType::Char, 8);
        let mut cursor = PayloadCursor::new();
        assert_eq!(
            pack_field(&mut cursor, &samples, &Value::U16(1)),
            Err(Error::FieldType {
                field: "samples".into(),
                expected: "uint16_t[4]".into(),
            })
        );
        assert_eq!(
            pack_field(&mut cursor, &text, &Value::U8(1)),
            Err(Error::FieldType {
                field: "text".into(),
                expected: "text of up to 8 bytes".into(),
            })
        );
    }

    #[test]
    fn test_text_stops_at_first_zero() {
        let field = FieldDef::array("name", ScalarType::Char, 5);
        let mut cursor = PayloadCursor::from_payload(b"ab\0cd", 5).unwrap();
        assert_eq!(unpack_field(&mut cursor, &field).unwrap(), Value::from("ab"));
        assert_eq!(cursor.position(), 5);
    }

    #[test]
    fn test_type_mismatch_rejected() {
        let def = sample();
        let values = vec![Value::U16(7), Value::from(vec![1u16, 2, 3, 0])];
        let mut cursor = PayloadCursor::new();
        let err = pack_fields(&def, &values, ProtocolVersion::V2, &mut cursor).unwrap_err();
        assert_eq!(
            err,
            Error::FieldType {
                field: "value".into(),
                expected: "uint8_t".into()
            }
        );
    }

    #[test]
    fn test_extensions_omitted_under_v1() {
        let def = MessageDef::builder(1, "EXT")
            .field(FieldDef::new("a", ScalarType::U16))
            .extension(FieldDef::new("b", ScalarType::U32))
            .build()
            .unwrap();
        let values = vec![Value::U16(0x0102), Value::U32(0xAABB_CCDD)];

        let mut cursor = PayloadCursor::new();
        pack_fields(&def, &values, ProtocolVersion::V1, &mut cursor).unwrap();
        assert_eq!(cursor.as_slice(), &[0x02, 0x01]);

        let decoded = unpack_fields(&def, ProtocolVersion::V1, &mut cursor).unwrap();
        assert_eq!(decoded, vec![Value::U16(0x0102), Value::U32(0)]);

        pack_fields(&def, &values, ProtocolVersion::V2, &mut cursor).unwrap();
        assert_eq!(cursor.as_slice(), &[0x02, 0x01, 0xDD, 0xCC, 0xBB, 0xAA]);
        let decoded = unpack_fields(&def, ProtocolVersion::V2, &mut cursor).unwrap();
        assert_eq!(decoded, values);
    }
}
