//! [`RawValue`]: a single wire slot, as bound to a parameter or read from a column.

use std::fmt;

/// Wire representation of a non-null slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireFormat {
    Text,
    Binary,
}

impl fmt::Display for WireFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireFormat::Text => f.write_str("text"),
            WireFormat::Binary => f.write_str("binary"),
        }
    }
}

/// One parameter slot or column value in its wire form.
///
/// The execution engine binds encoder output slot by slot and hands each
/// received row to a decoder as a slice of these.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RawValue {
    /// SQL `NULL`
    Null,
    /// Text wire format
    Text(String),
    /// Binary wire format
    Binary(Vec<u8>),
}

impl RawValue {
    pub fn text(s: impl Into<String>) -> Self {
        RawValue::Text(s.into())
    }

    pub fn binary(bytes: impl Into<Vec<u8>>) -> Self {
        RawValue::Binary(bytes.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, RawValue::Null)
    }

    /// Wire format of the slot, `None` for `NULL`.
    pub fn format(&self) -> Option<WireFormat> {
        match self {
            RawValue::Null => None,
            RawValue::Text(_) => Some(WireFormat::Text),
            RawValue::Binary(_) => Some(WireFormat::Binary),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            RawValue::Binary(b) => Some(b),
            _ => None,
        }
    }
}

impl From<Option<String>> for RawValue {
    fn from(v: Option<String>) -> Self {
        v.map_or(RawValue::Null, RawValue::Text)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_of_each_variant() {
        assert_eq!(RawValue::Null.format(), None);
        assert_eq!(RawValue::text("1").format(), Some(WireFormat::Text));
        assert_eq!(RawValue::binary([1u8]).format(), Some(WireFormat::Binary));
    }

    #[test]
    fn optional_text_maps_none_to_null() {
        assert_eq!(RawValue::from(None::<String>), RawValue::Null);
        assert_eq!(RawValue::from(Some("x".to_string())), RawValue::text("x"));
    }
}
