//! Typed SQL statements.
//!
//! A [`Query<A, B>`] pairs command text with an [`Encoder<A>`] for its
//! parameters and a [`Decoder<B>`] for its rows. Queries are immutable values
//! closed under [`Profunctor::dimap`]: the input type can be pre-transformed
//! and the row type post-transformed without touching the text.
//!
//! Sending parameters and receiving rows is left to an execution engine,
//! which uses [`Query::encode`] and [`Query::decode_rows`] (or the encoder and
//! decoder directly, together with their arity).
//!
//! # Example
//!
//! ```
//! use typed_sql::{primitive::{int4, text}, Profunctor, Query, RawValue};
//!
//! let q = Query::new(
//!     "select id, name from users where id = $1",
//!     int4().encoder().clone(),
//!     int4().product(&text()).decoder().clone(),
//! );
//! let names = q.dimap(|id: &u8| i32::from(*id), |(_, name)| name);
//!
//! assert_eq!(names.encode(&7).unwrap(), vec![RawValue::text("7")]);
//! let row = [RawValue::text("7"), RawValue::text("ann")];
//! assert_eq!(names.decode_row(&row).unwrap(), "ann");
//! ```

mod command;
mod error;
mod profunctor;
mod query;

pub use command::Command;
pub use error::{Error, Result};
pub use profunctor::Profunctor;
pub use query::Query;

pub use typed_sql_codec::{
    json, json_of, json_value, jsonb, primitive, void, ArityMismatch, Codec, DecodeError,
    Decoder, EncodeError, Encoder, JsonFormat, ParseError, Position, RawValue, Side, SqlType,
    WireFormat,
};
