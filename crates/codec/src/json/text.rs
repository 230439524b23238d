//! Textual JSON payloads.

use serde_json::Value;

use super::JsonFormat;
use crate::error::{EncodeError, ParseError, Position};

/// Serializes `value` as compact JSON text.
pub fn stringify(format: JsonFormat, value: &Value) -> Result<String, EncodeError> {
    serde_json::to_string(value).map_err(|e| EncodeError::Unrepresentable {
        sql_type: format.sql_type(),
        message: e.to_string(),
    })
}

/// Parses one JSON document; trailing non-whitespace is an error.
pub fn parse(format: JsonFormat, text: &str) -> Result<Value, ParseError> {
    serde_json::from_str(text).map_err(|e| {
        tracing::debug!(%format, line = e.line(), column = e.column(), "malformed json text");
        ParseError::new(format, message_of(&e))
            .at(Position::LineColumn {
                line: e.line(),
                column: e.column(),
            })
            .with_text(text)
    })
}

/// Parses UTF-8 bytes holding JSON text.
pub fn parse_bytes(format: JsonFormat, bytes: &[u8]) -> Result<Value, ParseError> {
    let text = std::str::from_utf8(bytes).map_err(|e| {
        ParseError::new(format, "payload is not valid UTF-8").at(Position::Offset(e.valid_up_to()))
    })?;
    parse(format, text)
}

// serde_json appends " at line L column C"; the position is kept separately.
fn message_of(e: &serde_json::Error) -> String {
    let message = e.to_string();
    match message.rfind(" at line ") {
        Some(i) => message[..i].to_string(),
        None => message,
    }
}
