//! [`Encoder`]: typed value to ordered parameter slots.

use std::fmt;
use std::sync::Arc;

use crate::error::{EncodeError, Side};
use crate::raw::RawValue;
use crate::sql_type::SqlType;

/// A compiled encoding function.
pub type EncodeFn<A> = Arc<dyn Fn(&A) -> Result<Vec<RawValue>, EncodeError> + Send + Sync>;

/// Turns an `A` into exactly [`arity`](Encoder::arity) parameter slots.
///
/// Encoders are immutable. Every combinator returns a new encoder sharing the
/// original's internals, so cloning and transforming are cheap.
pub struct Encoder<A> {
    types: Arc<[SqlType]>,
    run: EncodeFn<A>,
}

impl<A> Clone for Encoder<A> {
    fn clone(&self) -> Self {
        Self {
            types: Arc::clone(&self.types),
            run: Arc::clone(&self.run),
        }
    }
}

impl<A> fmt::Debug for Encoder<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Encoder").field("types", &self.types).finish()
    }
}

impl<A> Encoder<A> {
    pub fn arity(&self) -> usize {
        self.types.len()
    }

    /// Declared slot types, in parameter order.
    pub fn types(&self) -> &[SqlType] {
        &self.types
    }
}

impl<A: 'static> Encoder<A> {
    /// Builds an encoder from its declared slot types and an encoding function.
    ///
    /// The function must return one slot per declared type; any other count is
    /// reported by [`encode`](Encoder::encode) as [`EncodeError::SlotCount`].
    pub fn new<F>(types: impl Into<Vec<SqlType>>, f: F) -> Self
    where
        F: Fn(&A) -> Result<Vec<RawValue>, EncodeError> + Send + Sync + 'static,
    {
        let types: Vec<SqlType> = types.into();
        Self {
            types: Arc::from(types),
            run: Arc::new(f),
        }
    }

    pub fn encode(&self, value: &A) -> Result<Vec<RawValue>, EncodeError> {
        let slots = (self.run)(value)?;
        if slots.len() != self.arity() {
            return Err(EncodeError::SlotCount {
                expected: self.arity(),
                actual: slots.len(),
            });
        }
        Ok(slots)
    }

    /// Encoder for `C` that first converts to `A`. Arity is unchanged.
    pub fn contramap<C, F>(&self, f: F) -> Encoder<C>
    where
        C: 'static,
        F: Fn(&C) -> A + Send + Sync + 'static,
    {
        let inner = self.clone();
        Encoder {
            types: Arc::clone(&self.types),
            run: Arc::new(move |c: &C| inner.encode(&f(c))),
        }
    }

    /// Encodes a pair as this encoder's slots followed by `other`'s.
    pub fn product<B: 'static>(&self, other: &Encoder<B>) -> Encoder<(A, B)> {
        let left = self.clone();
        let right = other.clone();
        let split = left.arity();
        let types: Vec<SqlType> = left.types().iter().chain(right.types()).copied().collect();
        Encoder::new(types, move |(a, b): &(A, B)| {
            let mut slots = left.encode(a).map_err(|e| e.within(Side::Left, 0))?;
            slots.extend(right.encode(b).map_err(|e| e.within(Side::Right, split))?);
            Ok(slots)
        })
    }

    /// Encodes `None` as one `NULL` per slot.
    pub fn opt(&self) -> Encoder<Option<A>> {
        let inner = self.clone();
        let arity = self.arity();
        Encoder {
            types: Arc::clone(&self.types),
            run: Arc::new(move |value: &Option<A>| match value {
                Some(a) => inner.encode(a),
                None => Ok(vec![RawValue::Null; arity]),
            }),
        }
    }
}

impl Encoder<()> {
    /// Encoder with no slots, for statements without parameters.
    pub fn void() -> Self {
        Encoder::new(Vec::new(), |_: &()| Ok(Vec::new()))
    }
}
