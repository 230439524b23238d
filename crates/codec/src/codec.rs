//! [`Codec`]: an encoder and decoder for the same type over the same slots.

use std::fmt;

use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::error::{ArityMismatch, DecodeError, EncodeError};
use crate::raw::RawValue;
use crate::sql_type::SqlType;

pub struct Codec<A> {
    encoder: Encoder<A>,
    decoder: Decoder<A>,
}

impl<A> fmt::Debug for Codec<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Codec")
            .field("types", &self.encoder.types())
            .finish()
    }
}

impl<A> Clone for Codec<A> {
    fn clone(&self) -> Self {
        Self {
            encoder: self.encoder.clone(),
            decoder: self.decoder.clone(),
        }
    }
}

impl<A: 'static> Codec<A> {
    /// Pairs an encoder with a decoder. Both must declare the same slot types.
    pub fn new(encoder: Encoder<A>, decoder: Decoder<A>) -> Result<Self, ArityMismatch> {
        if encoder.types() != decoder.types() {
            return Err(ArityMismatch {
                encoder: encoder.types().to_vec(),
                decoder: decoder.types().to_vec(),
            });
        }
        Ok(Self { encoder, decoder })
    }

    /// Single-slot codec from a pair of slot functions.
    pub fn simple<E, D>(sql_type: SqlType, encode: E, decode: D) -> Self
    where
        E: Fn(&A) -> Result<RawValue, EncodeError> + Send + Sync + 'static,
        D: Fn(&RawValue) -> Result<A, DecodeError> + Send + Sync + 'static,
    {
        Self {
            encoder: Encoder::new([sql_type], move |a: &A| Ok(vec![encode(a)?])),
            decoder: Decoder::new([sql_type], move |row: &[RawValue]| decode(&row[0])),
        }
    }

    pub fn encoder(&self) -> &Encoder<A> {
        &self.encoder
    }

    pub fn decoder(&self) -> &Decoder<A> {
        &self.decoder
    }

    pub fn into_parts(self) -> (Encoder<A>, Decoder<A>) {
        (self.encoder, self.decoder)
    }

    pub fn arity(&self) -> usize {
        self.encoder.arity()
    }

    pub fn types(&self) -> &[SqlType] {
        self.encoder.types()
    }

    pub fn encode(&self, value: &A) -> Result<Vec<RawValue>, EncodeError> {
        self.encoder.encode(value)
    }

    pub fn decode(&self, row: &[RawValue]) -> Result<A, DecodeError> {
        self.decoder.decode(row)
    }

    /// Codec for `B` given conversions both ways.
    pub fn imap<B, F, G>(&self, f: F, g: G) -> Codec<B>
    where
        B: 'static,
        F: Fn(A) -> B + Send + Sync + 'static,
        G: Fn(&B) -> A + Send + Sync + 'static,
    {
        Codec {
            encoder: self.encoder.contramap(g),
            decoder: self.decoder.map(f),
        }
    }

    /// Like [`imap`](Codec::imap), but decoding may reject the value.
    pub fn eimap<B, F, G>(&self, f: F, g: G) -> Codec<B>
    where
        B: 'static,
        F: Fn(A) -> Result<B, String> + Send + Sync + 'static,
        G: Fn(&B) -> A + Send + Sync + 'static,
    {
        Codec {
            encoder: self.encoder.contramap(g),
            decoder: self.decoder.emap(f),
        }
    }

    pub fn product<B: 'static>(&self, other: &Codec<B>) -> Codec<(A, B)> {
        Codec {
            encoder: self.encoder.product(&other.encoder),
            decoder: self.decoder.product(&other.decoder),
        }
    }

    pub fn opt(&self) -> Codec<Option<A>> {
        Codec {
            encoder: self.encoder.opt(),
            decoder: self.decoder.opt(),
        }
    }
}

impl<A: 'static> From<Codec<A>> for Encoder<A> {
    fn from(codec: Codec<A>) -> Self {
        codec.encoder
    }
}

impl<A: 'static> From<Codec<A>> for Decoder<A> {
    fn from(codec: Codec<A>) -> Self {
        codec.decoder
    }
}

/// Codec with no slots.
pub fn void() -> Codec<()> {
    Codec {
        encoder: Encoder::void(),
        decoder: Decoder::void(),
    }
}
