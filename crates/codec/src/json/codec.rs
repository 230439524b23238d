use ciborium::value::Value as CborValue;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::{binary, text, JsonFormat, MAX_DEPTH};
use crate::codec::Codec;
use crate::error::{DecodeError, EncodeError};
use crate::raw::RawValue;
use crate::sql_type::SqlType;

/// Textual `json` column holding any JSON value.
pub fn json() -> Codec<Value> {
    json_value(JsonFormat::Json)
}

/// Binary `jsonb` column holding any JSON value.
pub fn jsonb() -> Codec<Value> {
    json_value(JsonFormat::Jsonb)
}

pub fn json_value(format: JsonFormat) -> Codec<Value> {
    Codec::simple(
        format.sql_type(),
        move |value: &Value| write(format, value),
        move |raw: &RawValue| read(format, raw),
    )
}

/// Single-column codec storing a whole `T` as one JSON document.
///
/// Tuples and sequences become JSON arrays, so `(42, "foo")` is stored as
/// `[42,"foo"]` in one column. Compare with
/// `int4().product(&text())`, which spreads the pair over two columns.
pub fn json_of<T>(format: JsonFormat) -> Codec<T>
where
    T: Serialize + DeserializeOwned + 'static,
{
    let sql_type = format.sql_type();
    Codec::simple(
        sql_type,
        move |t: &T| {
            reject_non_finite(sql_type, t)?;
            let value = serde_json::to_value(t).map_err(|e| EncodeError::Unrepresentable {
                sql_type,
                message: e.to_string(),
            })?;
            write(format, &value)
        },
        move |raw: &RawValue| {
            let value = read(format, raw)?;
            serde_json::from_value::<T>(value.clone()).map_err(|e| DecodeError::Invalid {
                offset: 0,
                sql_type,
                text: value.to_string(),
                message: e.to_string(),
            })
        },
    )
}

// `serde_json::to_value` writes NaN and infinities as `null`; ciborium keeps
// them as floats.
fn reject_non_finite<T: Serialize>(sql_type: SqlType, t: &T) -> Result<(), EncodeError> {
    let cbor = CborValue::serialized(t).map_err(|e| EncodeError::Unrepresentable {
        sql_type,
        message: e.to_string(),
    })?;
    let mut pending = vec![&cbor];
    while let Some(item) = pending.pop() {
        match item {
            CborValue::Float(f) if !f.is_finite() => {
                return Err(EncodeError::Unrepresentable {
                    sql_type,
                    message: format!("non-finite number {f} has no JSON form"),
                })
            }
            CborValue::Array(items) => pending.extend(items),
            CborValue::Map(entries) => pending.extend(entries.iter().flat_map(|(k, v)| [k, v])),
            CborValue::Tag(_, inner) => pending.push(&**inner),
            _ => {}
        }
    }
    Ok(())
}

fn exceeds_max_depth(value: &Value) -> bool {
    let mut pending = vec![(value, 0usize)];
    while let Some((item, depth)) = pending.pop() {
        match item {
            Value::Array(items) => {
                if depth >= MAX_DEPTH {
                    return true;
                }
                pending.extend(items.iter().map(|child| (child, depth + 1)));
            }
            Value::Object(map) => {
                if depth >= MAX_DEPTH {
                    return true;
                }
                pending.extend(map.values().map(|child| (child, depth + 1)));
            }
            _ => {}
        }
    }
    false
}

fn write(format: JsonFormat, value: &Value) -> Result<RawValue, EncodeError> {
    if exceeds_max_depth(value) {
        return Err(EncodeError::Unrepresentable {
            sql_type: format.sql_type(),
            message: format!("nested deeper than {MAX_DEPTH} levels"),
        });
    }
    match format {
        JsonFormat::Json => text::stringify(format, value).map(RawValue::Text),
        JsonFormat::Jsonb => binary::encode(value).map(RawValue::Binary),
    }
}

fn read(format: JsonFormat, raw: &RawValue) -> Result<Value, DecodeError> {
    let parsed = match (format, raw) {
        (_, RawValue::Null) => {
            return Err(DecodeError::UnexpectedNull {
                offset: 0,
                sql_type: format.sql_type(),
            })
        }
        (_, RawValue::Text(s)) => text::parse(format, s),
        (JsonFormat::Json, RawValue::Binary(bytes)) => text::parse_bytes(format, bytes),
        (JsonFormat::Jsonb, RawValue::Binary(bytes)) => binary::decode(bytes),
    };
    parsed.map_err(|source| DecodeError::Parse { offset: 0, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::int4;
    use serde_json::json;
    use std::collections::BTreeMap;

    #[test]
    fn each_variant_uses_its_wire_format() {
        let value = json!({"a": 1});
        assert!(matches!(json().encode(&value).unwrap()[0], RawValue::Text(_)));
        assert!(matches!(jsonb().encode(&value).unwrap()[0], RawValue::Binary(_)));
    }

    #[test]
    fn jsonb_reads_text_rendition() {
        let decoded = jsonb().decode(&[RawValue::text(r#"{"a": [1, 2]}"#)]).unwrap();
        assert_eq!(decoded, json!({"a": [1, 2]}));
    }

    #[test]
    fn malformed_text_is_a_parse_error() {
        let err = json().decode(&[RawValue::text("{\"a\":")]).unwrap_err();
        let parse = err.parse_error().expect("parse error");
        assert_eq!(parse.format, JsonFormat::Json);
        assert_eq!(parse.text.as_deref(), Some("{\"a\":"));
    }

    #[test]
    fn null_column_needs_opt() {
        assert!(matches!(
            json().decode(&[RawValue::Null]),
            Err(DecodeError::UnexpectedNull { .. })
        ));
        assert_eq!(jsonb().opt().decode(&[RawValue::Null]), Ok(None));
    }

    #[test]
    fn typed_shape_mismatch_is_invalid() {
        let codec = json_of::<(i32, String)>(JsonFormat::Json);
        let err = codec.decode(&[RawValue::text(r#"{"x": 1}"#)]).unwrap_err();
        assert!(matches!(err, DecodeError::Invalid { .. }));
    }

    #[test]
    fn non_string_keys_are_unrepresentable() {
        let codec = json_of::<BTreeMap<Vec<u8>, i32>>(JsonFormat::Jsonb);
        let mut map = BTreeMap::new();
        map.insert(vec![1u8], 1);
        assert!(matches!(
            codec.encode(&map),
            Err(EncodeError::Unrepresentable { .. })
        ));
    }

    fn nested(depth: usize) -> Value {
        let mut value = json!(true);
        for _ in 0..depth {
            value = Value::Array(vec![value]);
        }
        value
    }

    #[test]
    fn non_finite_floats_are_unrepresentable() {
        for format in [JsonFormat::Json, JsonFormat::Jsonb] {
            let codec = json_of::<f64>(format);
            for x in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
                assert!(matches!(
                    codec.encode(&x),
                    Err(EncodeError::Unrepresentable { .. })
                ));
            }
            assert_eq!(codec.decode(&codec.encode(&1.5).unwrap()), Ok(1.5));

            let optional = json_of::<Option<f64>>(format);
            assert!(optional.encode(&Some(f64::INFINITY)).is_err());
            assert_eq!(optional.decode(&optional.encode(&None).unwrap()), Ok(None));

            let nested = json_of::<BTreeMap<String, Vec<f32>>>(format);
            let mut map = BTreeMap::new();
            map.insert("xs".to_string(), vec![1.0, f32::NAN]);
            assert!(nested.encode(&map).is_err());
        }
    }

    #[test]
    fn both_variants_share_the_nesting_limit() {
        for format in [JsonFormat::Json, JsonFormat::Jsonb] {
            let codec = json_value(format);
            let deepest = nested(MAX_DEPTH);
            let slots = codec.encode(&deepest).unwrap();
            assert_eq!(codec.decode(&slots), Ok(deepest));

            assert!(matches!(
                codec.encode(&nested(MAX_DEPTH + 1)),
                Err(EncodeError::Unrepresentable { .. })
            ));
        }

        let too_deep_text = format!(
            "{}true{}",
            "[".repeat(MAX_DEPTH + 1),
            "]".repeat(MAX_DEPTH + 1)
        );
        for codec in [json(), jsonb()] {
            let err = codec.decode(&[RawValue::text(too_deep_text.as_str())]).unwrap_err();
            assert!(err.parse_error().is_some());
        }

        let mut too_deep_cbor = vec![binary::JSONB_VERSION];
        too_deep_cbor.extend(std::iter::repeat(0x81).take(MAX_DEPTH + 1));
        too_deep_cbor.push(0xf5);
        let err = jsonb().decode(&[RawValue::binary(too_deep_cbor)]).unwrap_err();
        assert!(err.parse_error().is_some());
    }

    #[test]
    fn composes_with_scalar_columns() {
        let codec = int4().product(&jsonb());
        assert_eq!(codec.arity(), 2);
        let slots = codec.encode(&(1, json!([true]))).unwrap();
        assert_eq!(codec.decode(&slots), Ok((1, json!([true]))));
    }
}
