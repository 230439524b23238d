//! Typed parameter encoders and row decoders for SQL statements.
//!
//! # Overview
//!
//! An [`Encoder<A>`] turns a value into a fixed number of parameter slots and a
//! [`Decoder<B>`] turns a fixed number of columns into a value. Both carry the
//! declared [`SqlType`] of every slot, so arity is always known without a
//! value at hand. They compose:
//!
//! - `contramap` / `map` change the Rust type, never the arity.
//! - `product` concatenates slots; the arity is the sum.
//!
//! A [`Codec<A>`] pairs an encoder and decoder over the same slots. Scalar
//! codecs live in [`primitive`], JSON codecs in [`json`].
//!
//! # Example
//!
//! ```
//! use typed_sql_codec::{primitive::{int4, text}, RawValue};
//!
//! let codec = int4().product(&text());
//! let slots = codec.encode(&(42, "foo".to_string())).unwrap();
//! assert_eq!(slots, vec![RawValue::text("42"), RawValue::text("foo")]);
//! assert_eq!(codec.decode(&slots).unwrap(), (42, "foo".to_string()));
//! ```

mod codec;
mod decoder;
mod encoder;
mod error;
pub mod json;
pub mod primitive;
mod raw;
mod sql_type;

pub use codec::{void, Codec};
pub use decoder::{DecodeFn, Decoder};
pub use encoder::{EncodeFn, Encoder};
pub use error::{ArityMismatch, DecodeError, EncodeError, ParseError, Position, Side};
pub use json::{json, json_of, json_value, jsonb, JsonFormat};
pub use raw::{RawValue, WireFormat};
pub use sql_type::{SqlType, UnknownSqlType};
