//! [`Decoder`]: ordered column values to a typed value.

use std::fmt;
use std::sync::Arc;

use crate::error::{DecodeError, Side};
use crate::raw::RawValue;
use crate::sql_type::SqlType;

/// A compiled decoding function. Receives exactly `arity` columns.
pub type DecodeFn<B> = Arc<dyn Fn(&[RawValue]) -> Result<B, DecodeError> + Send + Sync>;

/// Turns exactly [`arity`](Decoder::arity) columns into a `B`, or fails.
pub struct Decoder<B> {
    types: Arc<[SqlType]>,
    run: DecodeFn<B>,
}

impl<B> Clone for Decoder<B> {
    fn clone(&self) -> Self {
        Self {
            types: Arc::clone(&self.types),
            run: Arc::clone(&self.run),
        }
    }
}

impl<B> fmt::Debug for Decoder<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Decoder").field("types", &self.types).finish()
    }
}

impl<B> Decoder<B> {
    pub fn arity(&self) -> usize {
        self.types.len()
    }

    /// Declared column types, in column order.
    pub fn types(&self) -> &[SqlType] {
        &self.types
    }
}

impl<B: 'static> Decoder<B> {
    /// Builds a decoder from its declared column types and a decoding function.
    ///
    /// The function is only ever called with a row of exactly `types.len()`
    /// columns; [`decode`](Decoder::decode) rejects every other length.
    pub fn new<F>(types: impl Into<Vec<SqlType>>, f: F) -> Self
    where
        F: Fn(&[RawValue]) -> Result<B, DecodeError> + Send + Sync + 'static,
    {
        let types: Vec<SqlType> = types.into();
        Self {
            types: Arc::from(types),
            run: Arc::new(f),
        }
    }

    pub fn decode(&self, row: &[RawValue]) -> Result<B, DecodeError> {
        if row.len() != self.arity() {
            tracing::debug!(
                expected = self.arity(),
                actual = row.len(),
                "row length does not match decoder arity"
            );
            return Err(DecodeError::RowLength {
                expected: self.arity(),
                actual: row.len(),
            });
        }
        (self.run)(row)
    }

    /// Decoder for `D` that converts every successfully decoded `B`.
    pub fn map<D, G>(&self, g: G) -> Decoder<D>
    where
        D: 'static,
        G: Fn(B) -> D + Send + Sync + 'static,
    {
        let inner = self.clone();
        Decoder {
            types: Arc::clone(&self.types),
            run: Arc::new(move |row: &[RawValue]| inner.decode(row).map(&g)),
        }
    }

    /// Like [`map`](Decoder::map), but the conversion may reject the value.
    pub fn emap<D, G>(&self, g: G) -> Decoder<D>
    where
        D: 'static,
        G: Fn(B) -> Result<D, String> + Send + Sync + 'static,
    {
        let inner = self.clone();
        Decoder {
            types: Arc::clone(&self.types),
            run: Arc::new(move |row: &[RawValue]| {
                inner.decode(row).and_then(|b| g(b).map_err(DecodeError::Rejected))
            }),
        }
    }

    /// Decodes a pair, splitting the row at this decoder's arity.
    ///
    /// The left half is decoded first; the first failure wins.
    pub fn product<D: 'static>(&self, other: &Decoder<D>) -> Decoder<(B, D)> {
        let left = self.clone();
        let right = other.clone();
        let split = left.arity();
        let types: Vec<SqlType> = left.types().iter().chain(right.types()).copied().collect();
        Decoder::new(types, move |row: &[RawValue]| {
            let (head, tail) = row.split_at(split);
            let b = left.decode(head).map_err(|e| e.within(Side::Left, 0))?;
            let d = right.decode(tail).map_err(|e| e.within(Side::Right, split))?;
            Ok((b, d))
        })
    }

    /// Decodes an all-`NULL` slice as `None`.
    ///
    /// A decoder with no columns has nothing to be `NULL`, so it always
    /// yields `Some`.
    pub fn opt(&self) -> Decoder<Option<B>> {
        let inner = self.clone();
        Decoder {
            types: Arc::clone(&self.types),
            run: Arc::new(move |row: &[RawValue]| {
                if !row.is_empty() && row.iter().all(RawValue::is_null) {
                    Ok(None)
                } else {
                    inner.decode(row).map(Some)
                }
            }),
        }
    }
}

impl Decoder<()> {
    /// Decoder with no columns.
    pub fn void() -> Self {
        Decoder::new(Vec::new(), |_: &[RawValue]| Ok(()))
    }
}
