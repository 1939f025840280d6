#![allow(missing_docs)]

use std::io::{Error, ErrorKind};

#[inline(always)]
pub(crate) fn io_err(msg: &str) -> Error {
    Error::new(ErrorKind::Other, msg)
}

pub type AvroCastResult<T> = Result<T, AvroCastErr>;

/// Errors returned from avrocast
#[derive(thiserror::Error, Debug)]
pub enum AvroCastErr {
    // Schema parse errors
    #[error("Failed to parse avro schema")]
    SchemaParseErr(#[source] std::io::Error),
    #[error("Unknown schema, expecting a required `type` field in schema")]
    SchemaParseFailed,
    #[error("Record schema does not a have a required field named `name`")]
    RecordNameNotFound,
    #[error("Record schema does not a have a required field named `type`")]
    RecordTypeNotFound,
    #[error("Expected record field to be a json array")]
    ExpectedFieldsJsonArray,
    #[error("Record's field json schema must be an object")]
    InvalidRecordFieldType,
    #[error("Could not parse name from json value")]
    NameParseFailed,
    #[error("Duplicate definition of named schema `{0}`")]
    DuplicateSchema(String),
    #[error("Duplicate field name `{0}` in record schema")]
    DuplicateField(String),
    #[error("Named schema `{0}` was not found in schema registry")]
    NamedSchemaNotFound(String),
    #[error("Invalid default value for given schema: {0}")]
    DefaultValueParse(String),
    #[error("Failed to parse symbol from enum's symbols field")]
    EnumSymbolParseErr,
    #[error("Enum schema must contain required `symbols` field")]
    EnumSymbolsMissing,
    #[error("Unions cannot have duplicate schemas or immediate unions")]
    DuplicateSchemaInUnion,
    #[error("Expected the avro schema to be as one of json string, object or an array")]
    UnknownSchema,
    #[error("Primitve schema must be a string")]
    InvalidPrimitiveSchema,
    #[error("Schema type `{0}` is outside the record/array/map/union/enum/null/primitive model")]
    UnsupportedSchema(String),
    #[error("Name `{0}` must be [A-Za-z_] and subsequently contain only [A-Za-z0-9_]")]
    InvalidName(String),
    #[error("Namespace `{0}` must either be empty or follow the grammer <name>[(<dot><name>)*")]
    InvalidNamespace(String),

    // Conversion errors
    #[error("Expected a record schema at the root, found: {0}")]
    InvalidSchema(String),
    #[error("No registered type found for `{0}`")]
    TypeNotFound(String),
    #[error("Type `{0}` has no constructor")]
    NotInstantiable(String),
    #[error("No union alternative accepts a {0} value")]
    UnionMismatch(String),
    #[error("Value does not match schema. expected: {expected}, found: {found}")]
    SchemaDataMismatch { expected: String, found: String },
    #[error("Enum symbol `{0}` not present in enum schema `symbols` field")]
    EnumSymbolNotPresent(String),
    #[error("Cannot assign a {found} value to a `{expected}` member")]
    InvalidNativeValue { expected: &'static str, found: String },
    #[error("Recursion limit of {0} exceeded while walking the schema")]
    RecursionLimit(usize),
    #[error("Failed building the Converter: {0}")]
    ConverterBuildFailed(&'static str),

    // Value errors
    #[error("Expected value not found in variant instance")]
    ExpectedVariantNotFound,
    #[error("Field `{0}` not found in record")]
    FieldNotFound(String),
}
