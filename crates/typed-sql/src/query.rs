//! [`Query`]: command text with a parameter encoder and a row decoder.

use std::fmt;
use std::sync::Arc;

use typed_sql_codec::{Decoder, Encoder, RawValue};

use crate::command::Command;
use crate::profunctor::Profunctor;
use crate::{Error, Result};

/// A statement that takes an `A` and returns rows of `B`.
///
/// The number of placeholders in the text must equal the encoder's arity and
/// the number of selected columns the decoder's. Whoever builds the query
/// guarantees this; it is not checked here.
///
/// Queries are immutable. Transformations build a new query over the same
/// text.
pub struct Query<A, B> {
    sql: Arc<str>,
    encoder: Encoder<A>,
    decoder: Decoder<B>,
}

impl<A, B> Clone for Query<A, B> {
    fn clone(&self) -> Self {
        Self {
            sql: Arc::clone(&self.sql),
            encoder: self.encoder.clone(),
            decoder: self.decoder.clone(),
        }
    }
}

impl<A, B> fmt::Debug for Query<A, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("sql", &self.sql)
            .field("encoder", &self.encoder)
            .field("decoder", &self.decoder)
            .finish()
    }
}

impl<A: 'static, B: 'static> Query<A, B> {
    pub fn new(sql: impl Into<Arc<str>>, encoder: Encoder<A>, decoder: Decoder<B>) -> Self {
        Self {
            sql: sql.into(),
            encoder,
            decoder,
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn encoder(&self) -> &Encoder<A> {
        &self.encoder
    }

    pub fn decoder(&self) -> &Decoder<B> {
        &self.decoder
    }

    pub fn contramap<C, F>(&self, f: F) -> Query<C, B>
    where
        C: 'static,
        F: Fn(&C) -> A + Send + Sync + 'static,
    {
        self.lmap(f)
    }

    /// Same as `dimap(Clone::clone, g)`, without requiring `A: Clone`.
    pub fn map<D, G>(&self, g: G) -> Query<A, D>
    where
        D: 'static,
        G: Fn(B) -> D + Send + Sync + 'static,
    {
        Query {
            sql: Arc::clone(&self.sql),
            encoder: self.encoder.clone(),
            decoder: self.decoder.map(g),
        }
    }

    /// Parameters to bind, in placeholder order.
    pub fn encode(&self, args: &A) -> Result<Vec<RawValue>> {
        let params = self.encoder.encode(args)?;
        tracing::trace!(sql = %self.sql, params = params.len(), "encoded query parameters");
        Ok(params)
    }

    pub fn decode_row(&self, row: &[RawValue]) -> Result<B> {
        Ok(self.decoder.decode(row)?)
    }

    /// Decodes every row, stopping at the first failure.
    pub fn decode_rows<R>(&self, rows: impl IntoIterator<Item = R>) -> Result<Vec<B>>
    where
        R: AsRef<[RawValue]>,
    {
        rows.into_iter()
            .enumerate()
            .map(|(index, row)| {
                self.decoder.decode(row.as_ref()).map_err(|source| {
                    tracing::debug!(sql = %self.sql, index, error = %source, "row decoding failed");
                    Error::Row { index, source }
                })
            })
            .collect()
    }

    /// The same statement run for its effect, ignoring any rows.
    pub fn command(&self) -> Command<A> {
        Command::new(Arc::clone(&self.sql), self.encoder.clone())
    }
}

impl<A: 'static, B: 'static> Profunctor for Query<A, B> {
    type In = A;
    type Out = B;
    type Mapped<C: 'static, D: 'static> = Query<C, D>;

    fn dimap<C, D, F, G>(&self, f: F, g: G) -> Query<C, D>
    where
        C: 'static,
        D: 'static,
        F: Fn(&C) -> A + Send + Sync + 'static,
        G: Fn(B) -> D + Send + Sync + 'static,
    {
        Query {
            sql: Arc::clone(&self.sql),
            encoder: self.encoder.contramap(f),
            decoder: self.decoder.map(g),
        }
    }
}
