//! Contains routines for parsing and validating an Avro schema.
//! Schemas in avro are written as JSON and can be provided as .avsc files
//! or as JSON strings. The parsed schema tree is what the converters walk.

pub mod common;
#[cfg(test)]
mod tests;
pub mod parser;

pub use common::{EnumSchema, Field, Name, RecordSchema};
pub use parser::Registry;

use crate::error::{AvroCastErr, AvroCastResult};
use crate::value::Record;
use serde_json::{self, Value as JsonValue};
use std::fmt::Debug;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;

/// A node of the schema tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Variant {
    /// `"null"`
    Null,
    /// `"boolean"`
    Boolean,
    /// `"int"`
    Int,
    /// `"long"`
    Long,
    /// `"float"`
    Float,
    /// `"double"`
    Double,
    /// `"string"`
    Str,
    /// A named enumeration.
    Enum(Arc<EnumSchema>),
    /// An array with its item schema.
    Array(Box<Variant>),
    /// A string keyed map with its value schema.
    Map(Box<Variant>),
    /// A named record.
    Record(Arc<RecordSchema>),
    /// Alternatives, tried in declaration order.
    Union(Vec<Variant>),
    /// Reference by fullname to a named type defined elsewhere in the schema.
    Named(String),
}

impl Variant {
    /// A short name for the kind of schema, used in error messages.
    pub fn kind(&self) -> &str {
        match self {
            Variant::Null => "null",
            Variant::Boolean => "boolean",
            Variant::Int => "int",
            Variant::Long => "long",
            Variant::Float => "float",
            Variant::Double => "double",
            Variant::Str => "string",
            Variant::Enum(e) => e.fullname(),
            Variant::Array(_) => "array",
            Variant::Map(_) => "map",
            Variant::Record(r) => r.fullname(),
            Variant::Union(_) => "union",
            Variant::Named(name) => name,
        }
    }
}

/// A parsed avro schema: the root of the schema tree together with the
/// named types it defines.
#[derive(Debug, Clone)]
pub struct Schema {
    // typed version of the schema walked by the converters.
    pub(crate) variant: Variant,
    // Schema context that has a lookup table to resolve named schema references
    pub(crate) cxt: Arc<Registry>,
}

impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        self.variant == other.variant
    }
}

impl std::str::FromStr for Schema {
    type Err = AvroCastErr;
    /// Parse an avro schema from a JSON string
    /// One can use Rust's raw string syntax (r##""##) to pass schema.
    fn from_str(schema: &str) -> Result<Self, Self::Err> {
        let schema_json =
            serde_json::from_str(schema).map_err(|e| AvroCastErr::SchemaParseErr(e.into()))?;
        Schema::parse_imp(schema_json)
    }
}

impl Schema {
    /// Parses an avro schema from a JSON schema in a file.
    /// Alternatively, one can use the [`FromStr`](https://doc.rust-lang.org/std/str/trait.FromStr.html)
    /// impl to create the Schema from a JSON string:
    /// ```
    /// use std::str::FromStr;
    /// use avrocast::Schema;
    ///
    /// let schema = Schema::from_str(r##""null""##).unwrap();
    /// ```
    pub fn from_path<P: AsRef<Path> + Debug>(path: P) -> AvroCastResult<Self> {
        let schema_file = OpenOptions::new()
            .read(true)
            .open(&path)
            .map_err(AvroCastErr::SchemaParseErr)?;
        let value = serde_json::from_reader(schema_file)
            .map_err(|e| AvroCastErr::SchemaParseErr(e.into()))?;
        Schema::parse_imp(value)
    }

    fn parse_imp(schema_json: JsonValue) -> AvroCastResult<Self> {
        let mut parser = Registry::new();
        let variant = parser.parse_schema(&schema_json, None)?;
        Ok(Schema {
            variant,
            cxt: Arc::new(parser),
        })
    }

    /// The schema a record value was built with.
    pub fn of_record(record: &Record) -> Self {
        Schema {
            variant: Variant::Record(record.schema().clone()),
            cxt: record.names().clone(),
        }
    }

    /// Root of the schema tree.
    pub fn variant(&self) -> &Variant {
        &self.variant
    }

    /// Named types defined by this schema.
    pub fn names(&self) -> &Arc<Registry> {
        &self.cxt
    }

    /// The root record definition. Whole-object conversions need one.
    pub fn record(&self) -> AvroCastResult<&Arc<RecordSchema>> {
        match self.cxt.resolve(&self.variant)? {
            Variant::Record(rec) => Ok(rec),
            other => Err(AvroCastErr::InvalidSchema(other.kind().to_string())),
        }
    }
}
