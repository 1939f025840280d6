//! Represents the generic avro value tree produced and consumed by the converters.

use crate::error::{AvroCastErr, AvroCastResult};
use crate::schema::{EnumSchema, RecordSchema, Registry, Schema, Variant};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// Convenient type alias for map initialization.
pub type Map = HashMap<String, Value>;

/// The [Record](https://avro.apache.org/docs/current/spec.html#schema_record) avro type.
///
/// A record carries the schema it was built with. Values are stored by field
/// position and can be looked up by field name through that schema.
#[derive(Debug, Clone)]
pub struct Record {
    schema: Arc<RecordSchema>,
    names: Arc<Registry>,
    values: Vec<Value>,
}

impl Record {
    /// Creates a record of the given schema with every field set to null.
    /// `names` resolves the named references found in the record's fields.
    pub fn new(schema: Arc<RecordSchema>, names: Arc<Registry>) -> Self {
        let values = vec![Value::Null; schema.len()];
        Record {
            schema,
            names,
            values,
        }
    }

    /// Creates an empty record from the root record of `schema`.
    pub fn from_schema(schema: &Schema) -> AvroCastResult<Self> {
        Ok(Record::new(schema.record()?.clone(), schema.names().clone()))
    }

    /// Fullname of the record's schema.
    pub fn name(&self) -> &str {
        self.schema.fullname()
    }

    /// The record's embedded schema.
    pub fn schema(&self) -> &Arc<RecordSchema> {
        &self.schema
    }

    pub(crate) fn names(&self) -> &Arc<Registry> {
        &self.names
    }

    /// Value of the field named `field_name`, if the schema has such a field.
    pub fn get(&self, field_name: &str) -> Option<&Value> {
        self.schema
            .field(field_name)
            .and_then(|f| self.values.get(f.position()))
    }

    /// Value at a field position.
    pub fn get_at(&self, position: usize) -> Option<&Value> {
        self.values.get(position)
    }

    /// Sets the field named `field_name`. The value must be valid for the
    /// field's schema.
    pub fn put<T: Into<Value>>(&mut self, field_name: &str, value: T) -> AvroCastResult<()> {
        let field = self
            .schema
            .field(field_name)
            .ok_or_else(|| AvroCastErr::FieldNotFound(field_name.to_string()))?;
        let value = value.into();
        value.validate(field.ty(), &self.names)?;
        let position = field.position();
        self.set_at(position, value)
    }

    /// Sets the field at `position`. The value must be valid for the field's
    /// schema.
    pub fn put_at<T: Into<Value>>(&mut self, position: usize, value: T) -> AvroCastResult<()> {
        let field = self
            .schema
            .fields()
            .nth(position)
            .ok_or_else(|| AvroCastErr::FieldNotFound(position.to_string()))?;
        let value = value.into();
        value.validate(field.ty(), &self.names)?;
        self.set_at(position, value)
    }

    // Values built against the field schema skip validation.
    pub(crate) fn set_at(&mut self, position: usize, value: Value) -> AvroCastResult<()> {
        let slot = self
            .values
            .get_mut(position)
            .ok_or_else(|| AvroCastErr::FieldNotFound(position.to_string()))?;
        *slot = value;
        Ok(())
    }

    /// Field names and values in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.schema
            .fields()
            .map(|f| f.name())
            .zip(self.values.iter())
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True for a record without fields.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name() && self.values == other.values
    }
}

/// An enum symbol tagged with the enum schema it belongs to.
#[derive(Debug, Clone)]
pub struct EnumValue {
    schema: Arc<EnumSchema>,
    symbol: String,
}

impl EnumValue {
    /// Fails if `symbol` is not one of the schema symbols.
    pub fn new(schema: Arc<EnumSchema>, symbol: &str) -> AvroCastResult<Self> {
        if !schema.contains(symbol) {
            return Err(AvroCastErr::EnumSymbolNotPresent(symbol.to_string()));
        }
        Ok(EnumValue {
            schema,
            symbol: symbol.to_string(),
        })
    }

    /// Fullname of the enum schema.
    pub fn name(&self) -> &str {
        self.schema.fullname()
    }

    /// The symbol.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }
}

impl PartialEq for EnumValue {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name() && self.symbol == other.symbol
    }
}

/// Represents an Avro value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A null value.
    Null,
    /// A boolean value.
    Boolean(bool),
    /// An i32 integer value.
    Int(i32),
    /// An i64 long value.
    Long(i64),
    /// A f32 float value.
    Float(f32),
    /// A f64 float value.
    Double(f64),
    /// Rust strings map directly to avro strings
    Str(String),
    /// An enumeration symbol.
    Enum(EnumValue),
    /// An array of `Value`s
    Array(Vec<Value>),
    /// A string keyed map of `Value`s
    Map(Map),
    /// A record value.
    Record(Record),
}

impl Value {
    /// A short name for the kind of value, used in error messages.
    pub fn kind(&self) -> &str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Int(_) => "int",
            Value::Long(_) => "long",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::Str(_) => "string",
            Value::Enum(e) => e.name(),
            Value::Array(_) => "array",
            Value::Map(_) => "map",
            Value::Record(r) => r.name(),
        }
    }

    /// True for `Value::Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Checks that the value is valid for `schema`. Ints may be promoted to
    /// long, float or double, longs to float or double and floats to double.
    pub fn validate(&self, schema: &Variant, cxt: &Registry) -> AvroCastResult<()> {
        let mismatch = || AvroCastErr::SchemaDataMismatch {
            expected: schema.kind().to_string(),
            found: self.kind().to_string(),
        };
        match (self, schema) {
            (value, Variant::Named(_)) => value.validate(cxt.resolve(schema)?, cxt),
            (value, Variant::Union(variants)) => {
                if variants.iter().any(|v| value.validate(v, cxt).is_ok()) {
                    Ok(())
                } else {
                    Err(AvroCastErr::UnionMismatch(value.kind().to_string()))
                }
            }
            (Value::Null, Variant::Null)
            | (Value::Boolean(_), Variant::Boolean)
            | (Value::Int(_), Variant::Int)
            | (Value::Int(_), Variant::Long)
            | (Value::Int(_), Variant::Float)
            | (Value::Int(_), Variant::Double)
            | (Value::Long(_), Variant::Long)
            | (Value::Long(_), Variant::Float)
            | (Value::Long(_), Variant::Double)
            | (Value::Float(_), Variant::Float)
            | (Value::Float(_), Variant::Double)
            | (Value::Double(_), Variant::Double)
            | (Value::Str(_), Variant::Str) => Ok(()),
            (Value::Enum(e), Variant::Enum(schema)) if e.name() == schema.fullname() => Ok(()),
            (Value::Array(items), Variant::Array(items_schema)) => items
                .iter()
                .try_for_each(|v| v.validate(items_schema, cxt)),
            (Value::Map(map), Variant::Map(values_schema)) => map
                .values()
                .try_for_each(|v| v.validate(values_schema, cxt)),
            (Value::Record(rec), Variant::Record(schema)) if rec.name() == schema.fullname() => {
                for field in schema.fields() {
                    match rec.get(field.name()) {
                        Some(v) => v.validate(field.ty(), cxt)?,
                        None => return Err(AvroCastErr::FieldNotFound(field.name().to_string())),
                    }
                }
                Ok(())
            }
            _ => Err(mismatch()),
        }
    }
}

// Records serialize as maps of field name to value, enums as their symbol.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i32(*i),
            Value::Long(l) => serializer.serialize_i64(*l),
            Value::Float(f) => serializer.serialize_f32(*f),
            Value::Double(d) => serializer.serialize_f64(*d),
            Value::Str(s) => serializer.serialize_str(s),
            Value::Enum(e) => serializer.serialize_str(e.symbol()),
            Value::Array(items) => items.serialize(serializer),
            Value::Map(map) => map.serialize(serializer),
            Value::Record(rec) => rec.serialize(serializer),
        }
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

///////////////////////////////////////////////////////////////////////////////
/// From impls for Value
///////////////////////////////////////////////////////////////////////////////

impl From<()> for Value {
    fn from(_v: ()) -> Value {
        Value::Null
    }
}

impl From<String> for Value {
    fn from(v: String) -> Value {
        Value::Str(v)
    }
}

impl<'a> From<&'a str> for Value {
    fn from(value: &'a str) -> Value {
        Value::Str(value.to_string())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Value {
        Value::Boolean(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Value {
        Value::Int(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Value {
        Value::Long(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Value {
        Value::Float(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Value {
        Value::Double(value)
    }
}

impl From<Record> for Value {
    fn from(value: Record) -> Value {
        Value::Record(value)
    }
}

impl From<EnumValue> for Value {
    fn from(value: EnumValue) -> Value {
        Value::Enum(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Value {
        Value::Array(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<HashMap<String, T>> for Value {
    fn from(v: HashMap<String, T>) -> Value {
        Value::Map(v.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

///////////////////////////////////////////////////////////////////////////////
/// Value -> Rust value
///////////////////////////////////////////////////////////////////////////////

impl Value {
    /// Try to retrieve an avro null
    pub fn as_null(&self) -> AvroCastResult<()> {
        if let Value::Null = self {
            Ok(())
        } else {
            Err(AvroCastErr::ExpectedVariantNotFound)
        }
    }
    /// Try to retrieve an avro boolean
    pub fn as_boolean(&self) -> AvroCastResult<&bool> {
        if let Value::Boolean(b) = self {
            Ok(b)
        } else {
            Err(AvroCastErr::ExpectedVariantNotFound)
        }
    }
    /// Try to retrieve an avro int
    pub fn as_int(&self) -> AvroCastResult<&i32> {
        if let Value::Int(v) = self {
            Ok(v)
        } else {
            Err(AvroCastErr::ExpectedVariantNotFound)
        }
    }
    /// Try to retrieve an avro long
    pub fn as_long(&self) -> AvroCastResult<&i64> {
        if let Value::Long(v) = self {
            Ok(v)
        } else {
            Err(AvroCastErr::ExpectedVariantNotFound)
        }
    }
    /// Try to retrieve an avro float
    pub fn as_float(&self) -> AvroCastResult<&f32> {
        if let Value::Float(v) = self {
            Ok(v)
        } else {
            Err(AvroCastErr::ExpectedVariantNotFound)
        }
    }
    /// Try to retrieve an avro double
    pub fn as_double(&self) -> AvroCastResult<&f64> {
        if let Value::Double(v) = self {
            Ok(v)
        } else {
            Err(AvroCastErr::ExpectedVariantNotFound)
        }
    }
    /// Try to retrieve an avro string
    pub fn as_string(&self) -> AvroCastResult<&str> {
        if let Value::Str(v) = self {
            Ok(v)
        } else {
            Err(AvroCastErr::ExpectedVariantNotFound)
        }
    }
    /// Try to retrieve an avro record
    pub fn as_record(&self) -> AvroCastResult<&Record> {
        if let Value::Record(v) = self {
            Ok(v)
        } else {
            Err(AvroCastErr::ExpectedVariantNotFound)
        }
    }
    /// Try to retrieve the symbol of an avro enum
    pub fn as_enum(&self) -> AvroCastResult<&str> {
        if let Value::Enum(v) = self {
            Ok(v.symbol())
        } else {
            Err(AvroCastErr::ExpectedVariantNotFound)
        }
    }
    /// Try to retrieve an avro array
    pub fn as_array(&self) -> AvroCastResult<&[Value]> {
        if let Value::Array(v) = self {
            Ok(v)
        } else {
            Err(AvroCastErr::ExpectedVariantNotFound)
        }
    }
    /// Try to retrieve an avro map
    pub fn as_map(&self) -> AvroCastResult<&HashMap<String, Value>> {
        if let Value::Map(v) = self {
            Ok(v)
        } else {
            Err(AvroCastErr::ExpectedVariantNotFound)
        }
    }
}
