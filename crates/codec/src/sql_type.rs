//! Declared storage types of encoder and decoder slots.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Storage type tag attached to every slot of an encoder or decoder.
///
/// The schema checker compares these against the catalog; this crate only
/// uses them to derive arity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlType {
    Bool,
    Int2,
    Int4,
    Int8,
    Float4,
    Float8,
    Text,
    Varchar,
    Bytea,
    Json,
    Jsonb,
}

impl SqlType {
    pub const ALL: [SqlType; 11] = [
        SqlType::Bool,
        SqlType::Int2,
        SqlType::Int4,
        SqlType::Int8,
        SqlType::Float4,
        SqlType::Float8,
        SqlType::Text,
        SqlType::Varchar,
        SqlType::Bytea,
        SqlType::Json,
        SqlType::Jsonb,
    ];

    /// Catalog type name.
    pub fn name(self) -> &'static str {
        match self {
            SqlType::Bool => "bool",
            SqlType::Int2 => "int2",
            SqlType::Int4 => "int4",
            SqlType::Int8 => "int8",
            SqlType::Float4 => "float4",
            SqlType::Float8 => "float8",
            SqlType::Text => "text",
            SqlType::Varchar => "varchar",
            SqlType::Bytea => "bytea",
            SqlType::Json => "json",
            SqlType::Jsonb => "jsonb",
        }
    }

    /// PostgreSQL type OID.
    pub fn oid(self) -> u32 {
        match self {
            SqlType::Bool => 16,
            SqlType::Int2 => 21,
            SqlType::Int4 => 23,
            SqlType::Int8 => 20,
            SqlType::Float4 => 700,
            SqlType::Float8 => 701,
            SqlType::Text => 25,
            SqlType::Varchar => 1043,
            SqlType::Bytea => 17,
            SqlType::Json => 114,
            SqlType::Jsonb => 3802,
        }
    }

    pub fn from_oid(oid: u32) -> Option<SqlType> {
        SqlType::ALL.into_iter().find(|t| t.oid() == oid)
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sql type: {0}")]
pub struct UnknownSqlType(pub String);

impl FromStr for SqlType {
    type Err = UnknownSqlType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Common SQL spellings alongside the catalog names.
        let t = match s.trim().to_ascii_lowercase().as_str() {
            "bool" | "boolean" => SqlType::Bool,
            "int2" | "smallint" => SqlType::Int2,
            "int4" | "int" | "integer" => SqlType::Int4,
            "int8" | "bigint" => SqlType::Int8,
            "float4" | "real" => SqlType::Float4,
            "float8" | "double precision" => SqlType::Float8,
            "text" => SqlType::Text,
            "varchar" | "character varying" => SqlType::Varchar,
            "bytea" => SqlType::Bytea,
            "json" => SqlType::Json,
            "jsonb" => SqlType::Jsonb,
            _ => return Err(UnknownSqlType(s.to_string())),
        };
        Ok(t)
    }
}
