//! Avrocast converts native Rust objects into [Apache Avro](https://avro.apache.org/docs/current/spec.html)
//! generic records and back, driven by an avro schema.
//!
//! Types take part by describing themselves with the [`reflect_record!`],
//! [`reflect_enum!`] and [`reflect_trait!`] macros. The converters then walk
//! the schema together with the object graph:
//!
//! * record fields bind to members of the same name, unless [`BindingHooks`]
//!   choose otherwise, and fields unknown to either side are skipped, so
//!   that data written with an older or newer schema can still be read;
//! * a missing (`None`) value is written as the field's default;
//! * union alternatives are picked by record name for objects, and by the
//!   first alternative of a compatible kind for everything else;
//! * a `Box<dyn Trait>` member is rebuilt as the type registered under the
//!   stored record's name, looked up in a [`TypeRegistry`].
//!
//! ## Converting a record
//!
//!```rust
//! use avrocast::{from_record, reflect_record, to_record};
//! use anyhow::Error;
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Reading {
//!     sensor: String,
//!     celsius: f64,
//!     note: Option<String>,
//! }
//!
//! reflect_record!("weather.Reading" => Reading {
//!     sensor: String,
//!     celsius: f64,
//!     note: Option<String>,
//! });
//!
//! fn main() -> Result<(), Error> {
//!     let schema = r##"
//!     {
//!         "type": "record",
//!         "name": "Reading",
//!         "namespace": "weather",
//!         "fields": [
//!             {"name": "sensor", "type": "string"},
//!             {"name": "celsius", "type": "double"},
//!             {"name": "note", "type": ["string", "null"], "default": "none"}
//!         ]
//!     }
//!     "##;
//!
//!     let reading = Reading { sensor: "roof".to_string(), celsius: 21.5, note: None };
//!     let value = to_record(&reading, schema)?;
//!     // the unset note was written as the field default
//!     assert_eq!(value.as_record()?.get("note").unwrap().as_string()?, "none");
//!
//!     let back: Reading = from_record(&value)?;
//!     assert_eq!(back.note.as_deref(), Some("none"));
//!     Ok(())
//! }
//!```

#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

#[macro_use]
pub mod reflect;

pub mod config;
mod convert;
mod error;
mod hooks;
pub mod registry;
pub mod schema;
mod value;

pub use convert::{Converter, ConverterBuilder};
pub use error::{AvroCastErr, AvroCastResult};
pub use hooks::{BindingHooks, NoHooks};
pub use registry::TypeRegistry;
pub use schema::Schema;
pub use value::{EnumValue, Map, Record, Value};

use reflect::{FromNative, Reflect, Typed};
use std::str::FromStr;

#[doc(hidden)]
pub mod __macro_exports {
    pub use inventory;
    pub use std::any::{Any, TypeId};
    pub use std::borrow::Cow;
}

/// Converts `obj` into a record of the root record of the schema given as
/// JSON text, using the default [`Converter`].
pub fn to_record(obj: &dyn Reflect, schema: &str) -> AvroCastResult<Value> {
    let schema = Schema::from_str(schema)?;
    to_record_with_schema(obj, &schema)
}

/// Converts `obj` into a record of the root record of `schema`, using the
/// default [`Converter`].
pub fn to_record_with_schema(obj: &dyn Reflect, schema: &Schema) -> AvroCastResult<Value> {
    Converter::default().to_record(obj, schema)
}

/// Builds a `T` from a record value, reading it with the schema it was
/// written with.
pub fn from_record<T: Typed + FromNative>(value: &Value) -> AvroCastResult<T> {
    Converter::default().from_record(value, None)
}

/// Builds a `T` from a record value, reading it with `schema`.
pub fn from_record_with_schema<T: Typed + FromNative>(
    value: &Value,
    schema: &Schema,
) -> AvroCastResult<T> {
    Converter::default().from_record(value, Some(schema))
}
