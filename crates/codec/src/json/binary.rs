//! Binary `jsonb` payloads: a version byte followed by one CBOR data item.
//!
//! The value conversions follow `json-joy-json-pack`'s `cbor/convert.rs`,
//! except that CBOR items with no JSON counterpart (byte strings, tags,
//! non-text keys, out-of-range integers, non-finite floats) are rejected
//! instead of coerced.

use std::convert::TryFrom;
use std::io::Cursor;

use ciborium::value::Value as CborValue;
use serde_json::{Map, Number, Value};

use super::{JsonFormat, MAX_DEPTH};
use crate::error::{EncodeError, ParseError, Position};
use crate::sql_type::SqlType;

/// Leading byte of every `jsonb` payload.
pub const JSONB_VERSION: u8 = 1;

pub fn encode(value: &Value) -> Result<Vec<u8>, EncodeError> {
    let cbor = json_to_cbor(value)?;
    let mut out = vec![JSONB_VERSION];
    ciborium::ser::into_writer(&cbor, &mut out).map_err(|e| EncodeError::Unrepresentable {
        sql_type: SqlType::Jsonb,
        message: e.to_string(),
    })?;
    Ok(out)
}

/// Decodes a whole payload. Offsets in errors count the version byte.
pub fn decode(bytes: &[u8]) -> Result<Value, ParseError> {
    let (&version, body) = bytes
        .split_first()
        .ok_or_else(|| parse_error("empty payload").at(Position::Offset(0)))?;
    if version != JSONB_VERSION {
        return Err(
            parse_error(format!("unsupported jsonb version {version}")).at(Position::Offset(0)),
        );
    }

    let mut cursor = Cursor::new(body);
    let decoded = ciborium::de::from_reader_with_recursion_limit::<CborValue, _>(
        &mut cursor,
        MAX_DEPTH,
    );
    let cbor = decoded.map_err(|e| {
        let offset = match &e {
            ciborium::de::Error::Syntax(offset) => Some(*offset),
            ciborium::de::Error::Semantic(offset, _) => *offset,
            _ => None,
        };
        tracing::debug!(?offset, "malformed jsonb payload");
        let err = match e {
            ciborium::de::Error::RecursionLimitExceeded => {
                parse_error(format!("nested deeper than {MAX_DEPTH} levels"))
            }
            e => parse_error(e.to_string()),
        };
        match offset {
            Some(offset) => err.at(Position::Offset(offset + 1)),
            None => err,
        }
    })?;

    let consumed = cursor.position() as usize;
    if consumed != body.len() {
        return Err(
            parse_error("trailing bytes after value").at(Position::Offset(consumed + 1)),
        );
    }
    cbor_to_json(cbor)
}

fn parse_error(message: impl Into<String>) -> ParseError {
    ParseError::new(JsonFormat::Jsonb, message)
}

fn json_to_cbor(v: &Value) -> Result<CborValue, EncodeError> {
    Ok(match v {
        Value::Null => CborValue::Null,
        Value::Bool(b) => CborValue::Bool(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                CborValue::Integer(i.into())
            } else if let Some(u) = n.as_u64() {
                CborValue::Integer(u.into())
            } else if let Some(f) = n.as_f64() {
                CborValue::Float(f)
            } else {
                return Err(EncodeError::Unrepresentable {
                    sql_type: SqlType::Jsonb,
                    message: format!("number {n} does not fit a 64-bit value"),
                });
            }
        }
        Value::String(s) => CborValue::Text(s.clone()),
        Value::Array(arr) => CborValue::Array(
            arr.iter()
                .map(json_to_cbor)
                .collect::<Result<_, EncodeError>>()?,
        ),
        Value::Object(map) => CborValue::Map(
            map.iter()
                .map(|(k, v)| json_to_cbor(v).map(|v| (CborValue::Text(k.clone()), v)))
                .collect::<Result<_, EncodeError>>()?,
        ),
    })
}

fn cbor_to_json(v: CborValue) -> Result<Value, ParseError> {
    Ok(match v {
        CborValue::Null => Value::Null,
        CborValue::Bool(b) => Value::Bool(b),
        CborValue::Integer(i) => {
            let signed: i128 = i.into();
            let out_of_range = || parse_error(format!("integer {signed} out of range"));
            if signed >= 0 {
                Value::from(u64::try_from(signed).map_err(|_| out_of_range())?)
            } else {
                Value::from(i64::try_from(signed).map_err(|_| out_of_range())?)
            }
        }
        CborValue::Float(f) => Number::from_f64(f)
            .map(Value::Number)
            .ok_or_else(|| parse_error(format!("non-finite number {f}")))?,
        CborValue::Text(s) => Value::String(s),
        CborValue::Array(items) => Value::Array(
            items
                .into_iter()
                .map(cbor_to_json)
                .collect::<Result<_, ParseError>>()?,
        ),
        CborValue::Map(entries) => {
            let mut out = Map::new();
            for (k, v) in entries {
                let CborValue::Text(key) = k else {
                    return Err(parse_error("object key is not a string"));
                };
                out.insert(key, cbor_to_json(v)?);
            }
            Value::Object(out)
        }
        CborValue::Bytes(_) => return Err(parse_error("byte strings have no JSON counterpart")),
        CborValue::Tag(tag, _) => {
            return Err(parse_error(format!("tag {tag} has no JSON counterpart")))
        }
        _ => return Err(parse_error("unsupported CBOR item")),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payload_starts_with_version() {
        let bytes = encode(&json!(null)).unwrap();
        assert_eq!(bytes, vec![JSONB_VERSION, 0xf6]);
        assert_eq!(decode(&bytes).unwrap(), json!(null));
    }

    #[test]
    fn integers_keep_their_range() {
        let value = json!([u64::MAX, i64::MIN, -1, 0.5]);
        assert_eq!(decode(&encode(&value).unwrap()).unwrap(), value);
    }

    #[test]
    fn rejects_unknown_version() {
        let err = decode(&[2, 0xf6]).unwrap_err();
        assert_eq!(err.position, Some(Position::Offset(0)));
        assert_eq!(err.format, JsonFormat::Jsonb);
    }

    #[test]
    fn rejects_empty_and_truncated() {
        assert!(decode(&[]).is_err());
        // text of length 5 with only 2 bytes present
        assert!(decode(&[JSONB_VERSION, 0x65, b'a', b'b']).is_err());
    }

    #[test]
    fn rejects_trailing_bytes() {
        let err = decode(&[JSONB_VERSION, 0xf6, 0xf6]).unwrap_err();
        assert_eq!(err.position, Some(Position::Offset(2)));
    }

    #[test]
    fn nesting_limit() {
        let mut bytes = vec![JSONB_VERSION];
        bytes.extend(std::iter::repeat(0x81).take(MAX_DEPTH));
        bytes.push(0xf6);
        assert!(decode(&bytes).is_ok());

        bytes.insert(1, 0x81);
        let err = decode(&bytes).unwrap_err();
        assert!(err.message.contains("nested deeper"));
    }

    #[test]
    fn rejects_items_without_json_counterpart() {
        // byte string h'01'
        assert!(decode(&[JSONB_VERSION, 0x41, 0x01]).is_err());
        // map with integer key {1: null}
        assert!(decode(&[JSONB_VERSION, 0xa1, 0x01, 0xf6]).is_err());
    }
}
