use thiserror::Error;
use typed_sql_codec::{DecodeError, EncodeError};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("encoding parameters failed: {0}")]
    Encode(
        #[from]
        #[source]
        EncodeError,
    ),
    #[error("decoding row failed: {0}")]
    Decode(
        #[from]
        #[source]
        DecodeError,
    ),
    #[error("decoding row {index} failed: {source}")]
    Row { index: usize, source: DecodeError },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
