//! Single-column codecs for scalar types.
//!
//! Scalars travel in the text wire format, except `bytea` which is sent in
//! binary.

use std::fmt::Display;
use std::str::FromStr;

use crate::codec::Codec;
use crate::error::{DecodeError, EncodeError};
use crate::raw::{RawValue, WireFormat};
use crate::sql_type::SqlType;

/// Text content of a single non-null text slot.
pub(crate) fn read_text(sql_type: SqlType, raw: &RawValue) -> Result<&str, DecodeError> {
    match raw {
        RawValue::Text(s) => Ok(s),
        RawValue::Null => Err(DecodeError::UnexpectedNull {
            offset: 0,
            sql_type,
        }),
        RawValue::Binary(_) => Err(DecodeError::WrongFormat {
            offset: 0,
            sql_type,
            found: WireFormat::Binary,
        }),
    }
}

fn invalid(sql_type: SqlType, text: &str, message: impl Display) -> DecodeError {
    DecodeError::Invalid {
        offset: 0,
        sql_type,
        text: text.to_string(),
        message: message.to_string(),
    }
}

fn parsed<A>(sql_type: SqlType) -> Codec<A>
where
    A: Display + FromStr + 'static,
    A::Err: Display,
{
    Codec::simple(
        sql_type,
        |a: &A| Ok(RawValue::Text(a.to_string())),
        move |raw: &RawValue| {
            let s = read_text(sql_type, raw)?;
            s.trim()
                .parse::<A>()
                .map_err(|e| invalid(sql_type, s, e))
        },
    )
}

pub fn bool() -> Codec<bool> {
    Codec::simple(
        SqlType::Bool,
        |b: &bool| Ok(RawValue::text(if *b { "t" } else { "f" })),
        |raw: &RawValue| {
            let s = read_text(SqlType::Bool, raw)?;
            match s {
                "t" | "true" => Ok(true),
                "f" | "false" => Ok(false),
                _ => Err(invalid(SqlType::Bool, s, "expected t or f")),
            }
        },
    )
}

pub fn int2() -> Codec<i16> {
    parsed(SqlType::Int2)
}

pub fn int4() -> Codec<i32> {
    parsed(SqlType::Int4)
}

pub fn int8() -> Codec<i64> {
    parsed(SqlType::Int8)
}

macro_rules! float_codec {
    ($name:ident, $ty:ty, $sql_type:expr) => {
        pub fn $name() -> Codec<$ty> {
            Codec::simple(
                $sql_type,
                |v: &$ty| {
                    let text = if v.is_nan() {
                        "NaN".to_string()
                    } else if *v == <$ty>::INFINITY {
                        "Infinity".to_string()
                    } else if *v == <$ty>::NEG_INFINITY {
                        "-Infinity".to_string()
                    } else {
                        v.to_string()
                    };
                    Ok(RawValue::Text(text))
                },
                |raw: &RawValue| {
                    let s = read_text($sql_type, raw)?;
                    // Rust accepts "inf", "infinity" and "nan" in any case.
                    s.trim()
                        .parse::<$ty>()
                        .map_err(|e| invalid($sql_type, s, e))
                },
            )
        }
    };
}

float_codec!(float4, f32, SqlType::Float4);
float_codec!(float8, f64, SqlType::Float8);

fn string_codec(sql_type: SqlType) -> Codec<String> {
    Codec::simple(
        sql_type,
        move |s: &String| {
            if s.contains('\0') {
                return Err(EncodeError::Unrepresentable {
                    sql_type,
                    message: "string contains a NUL character".into(),
                });
            }
            Ok(RawValue::Text(s.clone()))
        },
        move |raw: &RawValue| read_text(sql_type, raw).map(str::to_string),
    )
}

pub fn text() -> Codec<String> {
    string_codec(SqlType::Text)
}

pub fn varchar() -> Codec<String> {
    string_codec(SqlType::Varchar)
}

/// Byte strings, sent in binary. Decoding also accepts the `\x` hex text form.
pub fn bytea() -> Codec<Vec<u8>> {
    Codec::simple(
        SqlType::Bytea,
        |b: &Vec<u8>| Ok(RawValue::Binary(b.clone())),
        |raw: &RawValue| match raw {
            RawValue::Binary(b) => Ok(b.clone()),
            RawValue::Text(s) => {
                decode_hex(s).ok_or_else(|| invalid(SqlType::Bytea, s, "expected \\x hex"))
            }
            RawValue::Null => Err(DecodeError::UnexpectedNull {
                offset: 0,
                sql_type: SqlType::Bytea,
            }),
        },
    )
}

fn decode_hex(s: &str) -> Option<Vec<u8>> {
    let hex = s.strip_prefix("\\x")?.as_bytes();
    if hex.len() % 2 != 0 {
        return None;
    }
    hex.chunks(2)
        .map(|pair| {
            let pair = std::str::from_utf8(pair).ok()?;
            u8::from_str_radix(pair, 16).ok()
        })
        .collect()
}
