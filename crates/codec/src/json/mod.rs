//! JSON column codecs.
//!
//! Two wire variants share one logical model (`serde_json::Value`):
//!
//! - `json`: compact JSON text in a text slot.
//! - `jsonb`: a version byte ([`binary::JSONB_VERSION`]) followed by exactly
//!   one CBOR (RFC 8949) data item, in a binary slot.
//!
//! Decoding either variant yields values that are structurally equal; key
//! order, number formatting and whitespace are not preserved.
//!
//! Arrays and objects may nest at most [`MAX_DEPTH`] levels deep. Deeper
//! values are refused when encoding and rejected when decoding, whichever
//! variant is used.

pub mod binary;
mod codec;
pub mod text;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::raw::WireFormat;
use crate::sql_type::SqlType;

pub use codec::{json, json_of, json_value, jsonb};

/// Deepest array/object nesting accepted by both variants.
pub const MAX_DEPTH: usize = 127;

/// Selects the JSON storage variant of a codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonFormat {
    /// Textual `json`.
    Json,
    /// Binary `jsonb`.
    Jsonb,
}

impl JsonFormat {
    pub fn name(self) -> &'static str {
        match self {
            JsonFormat::Json => "json",
            JsonFormat::Jsonb => "jsonb",
        }
    }

    pub fn sql_type(self) -> SqlType {
        match self {
            JsonFormat::Json => SqlType::Json,
            JsonFormat::Jsonb => SqlType::Jsonb,
        }
    }

    /// Wire format used when encoding.
    pub fn wire_format(self) -> WireFormat {
        match self {
            JsonFormat::Json => WireFormat::Text,
            JsonFormat::Jsonb => WireFormat::Binary,
        }
    }

    pub fn from_sql_type(sql_type: SqlType) -> Option<Self> {
        match sql_type {
            SqlType::Json => Some(JsonFormat::Json),
            SqlType::Jsonb => Some(JsonFormat::Jsonb),
            _ => None,
        }
    }
}

impl fmt::Display for JsonFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown json format {0:?}, expected \"json\" or \"jsonb\"")]
pub struct UnknownJsonFormat(pub String);

impl FromStr for JsonFormat {
    type Err = UnknownJsonFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(JsonFormat::Json),
            "jsonb" => Ok(JsonFormat::Jsonb),
            _ => Err(UnknownJsonFormat(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_names() {
        assert_eq!("jsonb".parse::<JsonFormat>(), Ok(JsonFormat::Jsonb));
        assert_eq!(" JSON ".parse::<JsonFormat>(), Ok(JsonFormat::Json));
        assert!("bson".parse::<JsonFormat>().is_err());
        assert_eq!(JsonFormat::Jsonb.sql_type().oid(), 3802);
        assert_eq!(JsonFormat::from_sql_type(SqlType::Json), Some(JsonFormat::Json));
        assert_eq!(JsonFormat::from_sql_type(SqlType::Text), None);
    }
}
