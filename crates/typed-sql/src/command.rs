use std::fmt;
use std::sync::Arc;

use typed_sql_codec::{Encoder, RawValue};

use crate::Result;

/// A statement that takes an `A` and returns no rows.
pub struct Command<A> {
    sql: Arc<str>,
    encoder: Encoder<A>,
}

impl<A> Clone for Command<A> {
    fn clone(&self) -> Self {
        Self {
            sql: Arc::clone(&self.sql),
            encoder: self.encoder.clone(),
        }
    }
}

impl<A> fmt::Debug for Command<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("sql", &self.sql)
            .field("encoder", &self.encoder)
            .finish()
    }
}

impl<A: 'static> Command<A> {
    pub fn new(sql: impl Into<Arc<str>>, encoder: Encoder<A>) -> Self {
        Self {
            sql: sql.into(),
            encoder,
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn encoder(&self) -> &Encoder<A> {
        &self.encoder
    }

    pub fn contramap<C, F>(&self, f: F) -> Command<C>
    where
        C: 'static,
        F: Fn(&C) -> A + Send + Sync + 'static,
    {
        Command {
            sql: Arc::clone(&self.sql),
            encoder: self.encoder.contramap(f),
        }
    }

    pub fn encode(&self, args: &A) -> Result<Vec<RawValue>> {
        Ok(self.encoder.encode(args)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use typed_sql_codec::primitive::{int4, text};

    #[test]
    fn contramap_reorders_arguments() {
        let insert = Command::new(
            "insert into users (id, name) values ($1, $2)",
            int4().product(&text()).encoder().clone(),
        );
        let swapped = insert.contramap(|(name, id): &(String, i32)| (*id, name.clone()));
        assert_eq!(swapped.sql(), insert.sql());
        assert_eq!(
            swapped.encode(&("bob".to_string(), 9)).unwrap(),
            vec![RawValue::text("9"), RawValue::text("bob")]
        );
    }
}
