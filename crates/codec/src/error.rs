//! Error types for encoding parameters and decoding rows.

use std::fmt;

use thiserror::Error;

use crate::json::JsonFormat;
use crate::raw::WireFormat;
use crate::sql_type::SqlType;

/// Which operand of a product a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}

/// Location of a syntax error inside a JSON payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// Line and column of a textual payload, both counted from 1. A column
    /// of 0 means the error was detected at the start of the line, right
    /// after the preceding newline.
    LineColumn { line: usize, column: usize },
    /// Byte offset into a binary payload.
    Offset(usize),
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::LineColumn { line, column } => write!(f, "line {line} column {column}"),
            Position::Offset(offset) => write!(f, "byte {offset}"),
        }
    }
}

/// A JSON payload that is not well formed for its wire variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub format: JsonFormat,
    pub message: String,
    pub position: Option<Position>,
    /// Offending payload, when it is text.
    pub text: Option<String>,
}

impl ParseError {
    pub fn new(format: JsonFormat, message: impl Into<String>) -> Self {
        Self {
            format,
            message: message.into(),
            position: None,
            text: None,
        }
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed {} payload", self.format)?;
        if let Some(position) = &self.position {
            write!(f, " at {position}")?;
        }
        write!(f, ": {}", self.message)?;
        if let Some(text) = &self.text {
            write!(f, " in {text:?}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

/// Failure to turn a row into a typed value.
///
/// Offsets in leaf variants are relative to the slice the failing decoder
/// received; [`DecodeError::column`] resolves the absolute column.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("row has {actual} columns, decoder expects {expected}")]
    RowLength { expected: usize, actual: usize },

    #[error("column {offset}: unexpected NULL for {sql_type}")]
    UnexpectedNull { offset: usize, sql_type: SqlType },

    #[error("column {offset}: {sql_type} cannot be read from {found} wire format")]
    WrongFormat {
        offset: usize,
        sql_type: SqlType,
        found: WireFormat,
    },

    #[error("column {offset}: invalid {sql_type} value {text:?}: {message}")]
    Invalid {
        offset: usize,
        sql_type: SqlType,
        text: String,
        message: String,
    },

    #[error("column {offset}: {source}")]
    Parse { offset: usize, source: ParseError },

    #[error("value rejected: {0}")]
    Rejected(String),

    #[error("{side} decoder starting at column {start}: {source}")]
    Product {
        side: Side,
        start: usize,
        source: Box<DecodeError>,
    },
}

impl DecodeError {
    pub(crate) fn within(self, side: Side, start: usize) -> Self {
        DecodeError::Product {
            side,
            start,
            source: Box::new(self),
        }
    }

    /// Absolute column of the failing slot, when the failure concerns one slot.
    pub fn column(&self) -> Option<usize> {
        match self {
            DecodeError::UnexpectedNull { offset, .. }
            | DecodeError::WrongFormat { offset, .. }
            | DecodeError::Invalid { offset, .. }
            | DecodeError::Parse { offset, .. } => Some(*offset),
            DecodeError::Product { start, source, .. } => source.column().map(|c| start + c),
            DecodeError::RowLength { .. } | DecodeError::Rejected(_) => None,
        }
    }

    /// The innermost failure, past every product wrapper.
    pub fn root_cause(&self) -> &DecodeError {
        match self {
            DecodeError::Product { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// The JSON parse failure at the root of this error, if any.
    pub fn parse_error(&self) -> Option<&ParseError> {
        match self.root_cause() {
            DecodeError::Parse { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Failure to turn a typed value into parameter slots.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    #[error("encoder produced {actual} slots, declared {expected}")]
    SlotCount { expected: usize, actual: usize },

    #[error("value not representable as {sql_type}: {message}")]
    Unrepresentable { sql_type: SqlType, message: String },

    #[error("{side} encoder starting at slot {start}: {source}")]
    Product {
        side: Side,
        start: usize,
        source: Box<EncodeError>,
    },
}

impl EncodeError {
    pub(crate) fn within(self, side: Side, start: usize) -> Self {
        EncodeError::Product {
            side,
            start,
            source: Box::new(self),
        }
    }

    pub fn root_cause(&self) -> &EncodeError {
        match self {
            EncodeError::Product { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// An encoder and decoder paired into a codec disagree on their slots.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("encoder slots {encoder:?} do not match decoder slots {decoder:?}")]
pub struct ArityMismatch {
    pub encoder: Vec<SqlType>,
    pub decoder: Vec<SqlType>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_resolves_through_nested_products() {
        let leaf = DecodeError::UnexpectedNull {
            offset: 0,
            sql_type: SqlType::Int4,
        };
        let err = leaf.within(Side::Right, 1).within(Side::Right, 2);
        assert_eq!(err.column(), Some(3));
        assert!(matches!(
            err.root_cause(),
            DecodeError::UnexpectedNull { .. }
        ));
    }

    #[test]
    fn row_length_has_no_column() {
        let err = DecodeError::RowLength {
            expected: 2,
            actual: 3,
        };
        assert_eq!(err.column(), None);
        assert_eq!(err.to_string(), "row has 3 columns, decoder expects 2");
    }

    #[test]
    fn parse_error_display_includes_position() {
        let err = ParseError::new(JsonFormat::Json, "EOF while parsing")
            .at(Position::LineColumn { line: 1, column: 4 });
        assert_eq!(
            err.to_string(),
            "malformed json payload at line 1 column 4: EOF while parsing"
        );
    }
}
