use super::common::{validate_name, EnumSchema, Field, Name, RecordSchema};
use super::Variant;
use crate::error::io_err;
use crate::error::AvroCastErr;
use crate::error::AvroCastResult;
use crate::value::{EnumValue, Record, Value};
use indexmap::IndexMap;
use serde_json::{Map, Value as JsonValue};
use std::collections::HashMap;
use std::convert::TryFrom;
use std::sync::Arc;

/// A { fullname -> schema } lookup table of every named type defined by a schema.
///
/// `Named` references found in a schema tree are resolved through it.
/// While parsing, a record is registered under a placeholder before its
/// fields are parsed, so that it may refer to itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Registry {
    cxt: HashMap<String, Variant>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self {
            cxt: HashMap::new(),
        }
    }

    /// Returns the definition registered under `fullname`.
    pub fn get(&self, fullname: &str) -> Option<&Variant> {
        self.cxt.get(fullname)
    }

    /// Follows a `Named` reference to its definition. Any other variant is returned as is.
    pub fn resolve<'a>(&'a self, variant: &'a Variant) -> AvroCastResult<&'a Variant> {
        match variant {
            Variant::Named(name) => match self.cxt.get(name) {
                // a placeholder of a record still being parsed
                Some(Variant::Named(_)) | None => {
                    Err(AvroCastErr::NamedSchemaNotFound(name.to_string()))
                }
                Some(resolved) => Ok(resolved),
            },
            other => Ok(other),
        }
    }

    /// Number of named types.
    pub fn len(&self) -> usize {
        self.cxt.len()
    }

    /// True when the schema defines no named types.
    pub fn is_empty(&self) -> bool {
        self.cxt.is_empty()
    }

    pub(crate) fn parse_schema(
        &mut self,
        value: &JsonValue,
        enclosing_namespace: Option<&str>,
    ) -> AvroCastResult<Variant> {
        match value {
            // Parse a complex schema
            JsonValue::Object(ref schema) => self.parse_object(schema, enclosing_namespace),
            // Parse a primitive schema, could also be a named schema reference
            JsonValue::String(ref schema) => self.parse_primitive(schema, enclosing_namespace),
            // Parse a union schema
            JsonValue::Array(ref schema) => self.parse_union(schema, enclosing_namespace),
            _ => Err(AvroCastErr::UnknownSchema),
        }
    }

    fn parse_union(
        &mut self,
        schema: &[JsonValue],
        enclosing_namespace: Option<&str>,
    ) -> AvroCastResult<Variant> {
        let mut alternatives = Vec::with_capacity(schema.len());
        for s in schema {
            let parsed = self.parse_schema(s, enclosing_namespace)?;
            if let Variant::Union(_) = parsed {
                return Err(AvroCastErr::DuplicateSchemaInUnion);
            }
            // Only exact duplicates are rejected; two array alternatives with different
            // item schemas are kept and the first one wins during conversion.
            if alternatives.contains(&parsed) {
                return Err(AvroCastErr::DuplicateSchemaInUnion);
            }
            alternatives.push(parsed);
        }
        Ok(Variant::Union(alternatives))
    }

    // A dotted reference is a fullname, otherwise the enclosing namespace is tried first.
    fn lookup_fullname(&self, name: &str, enclosing_namespace: Option<&str>) -> Option<String> {
        if name.contains('.') {
            return Some(name.to_string()).filter(|n| self.cxt.contains_key(n));
        }
        enclosing_namespace
            .map(|ns| format!("{}.{}", ns, name))
            .filter(|n| self.cxt.contains_key(n))
            .or_else(|| Some(name.to_string()).filter(|n| self.cxt.contains_key(n)))
    }

    fn parse_primitive(
        &mut self,
        schema: &str,
        enclosing_namespace: Option<&str>,
    ) -> AvroCastResult<Variant> {
        match schema {
            "null" => Ok(Variant::Null),
            "boolean" => Ok(Variant::Boolean),
            "int" => Ok(Variant::Int),
            "long" => Ok(Variant::Long),
            "double" => Ok(Variant::Double),
            "float" => Ok(Variant::Float),
            "string" => Ok(Variant::Str),
            "bytes" | "fixed" => Err(AvroCastErr::UnsupportedSchema(schema.to_string())),
            other if !other.is_empty() => match self.lookup_fullname(other, enclosing_namespace) {
                Some(name) => Ok(Variant::Named(name)),
                None => Err(AvroCastErr::NamedSchemaNotFound(other.to_string())),
            },
            _ => Err(AvroCastErr::InvalidPrimitiveSchema),
        }
    }

    fn parse_record_fields(
        &mut self,
        fields: &[JsonValue],
        enclosing_namespace: Option<&str>,
    ) -> AvroCastResult<IndexMap<String, Field>> {
        let mut fields_parsed = IndexMap::with_capacity(fields.len());
        for (position, field_obj) in fields.iter().enumerate() {
            let o = match field_obj {
                JsonValue::Object(o) => o,
                _ => return Err(AvroCastErr::InvalidRecordFieldType),
            };
            let name = o
                .get("name")
                .and_then(|a| a.as_str())
                .ok_or(AvroCastErr::RecordNameNotFound)?;
            let ty = o.get("type").ok_or(AvroCastErr::RecordTypeNotFound)?;
            let ty = self.parse_schema(ty, enclosing_namespace)?;

            let default = match o.get("default") {
                Some(v) => Some(self.parse_default(v, &ty)?),
                None => None,
            };

            if fields_parsed.contains_key(name) {
                return Err(AvroCastErr::DuplicateField(name.to_string()));
            }
            fields_parsed.insert(name.to_string(), Field::new(name, position, ty, default)?);
        }

        Ok(fields_parsed)
    }

    fn parse_object(
        &mut self,
        value: &Map<String, JsonValue>,
        enclosing_namespace: Option<&str>,
    ) -> AvroCastResult<Variant> {
        let ty = match value.get("type") {
            Some(JsonValue::String(s)) => s.as_str(),
            // {"type": {...}} and {"type": [...]} wrap another schema
            Some(other @ JsonValue::Object(_)) | Some(other @ JsonValue::Array(_)) => {
                return self.parse_schema(other, enclosing_namespace)
            }
            _ => return Err(AvroCastErr::SchemaParseFailed),
        };

        match ty {
            "record" => {
                let rec_name = Name::from_json(value, enclosing_namespace)?;
                let fullname = rec_name.fullname().to_string();
                if self.cxt.contains_key(&fullname) {
                    return Err(AvroCastErr::DuplicateSchema(fullname));
                }

                // Insert a named reference to support recursive schema definitions.
                self.cxt
                    .insert(fullname.clone(), Variant::Named(fullname.clone()));

                let fields = if let Some(JsonValue::Array(ref fields_vec)) = value.get("fields") {
                    fields_vec
                } else {
                    return Err(AvroCastErr::ExpectedFieldsJsonArray);
                };

                // Most tightly enclosing namespace, which is this record's namespace
                let namespace = rec_name.namespace().or(enclosing_namespace).map(str::to_string);
                let fields = self.parse_record_fields(fields, namespace.as_deref())?;

                let rec = Variant::Record(Arc::new(RecordSchema {
                    name: rec_name,
                    fields,
                }));
                self.cxt.insert(fullname, rec.clone());
                Ok(rec)
            }
            "enum" => {
                let name = Name::from_json(value, enclosing_namespace)?;
                let fullname = name.fullname().to_string();
                if self.cxt.contains_key(&fullname) {
                    return Err(AvroCastErr::DuplicateSchema(fullname));
                }

                let symbols = match value.get("symbols") {
                    Some(JsonValue::Array(sym)) => {
                        let mut symbols = Vec::with_capacity(sym.len());
                        for v in sym {
                            let symbol = v.as_str().ok_or(AvroCastErr::EnumSymbolParseErr)?;
                            validate_name(symbol)?;
                            symbols.push(symbol.to_string());
                        }
                        symbols
                    }
                    Some(other) => {
                        return Err(AvroCastErr::SchemaParseErr(io_err(&format!(
                            "enum symbols must be an array, found: {}",
                            other
                        ))))
                    }
                    None => return Err(AvroCastErr::EnumSymbolsMissing),
                };

                let enum_schema = Variant::Enum(Arc::new(EnumSchema { name, symbols }));
                self.cxt.insert(fullname, enum_schema.clone());
                Ok(enum_schema)
            }
            "array" => {
                let item_missing_err = AvroCastErr::SchemaParseErr(io_err(
                    "Array schema must have `items` field defined",
                ));
                let items_schema = value.get("items").ok_or(item_missing_err)?;
                let parsed_items = self.parse_schema(items_schema, enclosing_namespace)?;
                Ok(Variant::Array(Box::new(parsed_items)))
            }
            "map" => {
                let values_missing_err = AvroCastErr::SchemaParseErr(io_err(
                    "Map schema must have `values` field defined",
                ));
                let values_schema = value.get("values").ok_or(values_missing_err)?;
                let parsed_values = self.parse_schema(values_schema, enclosing_namespace)?;
                Ok(Variant::Map(Box::new(parsed_values)))
            }
            // primitives, possibly carrying a logicalType we don't interpret
            other => self.parse_primitive(other, enclosing_namespace),
        }
    }

    // Parses a default value against the schema of its field.
    // A union default is parsed against the first alternative.
    pub(crate) fn parse_default(
        &self,
        default_value: &JsonValue,
        schema_variant: &Variant,
    ) -> AvroCastResult<Value> {
        let invalid = || AvroCastErr::DefaultValueParse(default_value.to_string());
        match (default_value, schema_variant) {
            (d, Variant::Union(variants)) => {
                let first_variant = variants.first().ok_or_else(invalid)?;
                self.parse_default(d, first_variant)
            }
            (d, Variant::Named(_)) => self.parse_default(d, self.resolve(schema_variant)?),
            (JsonValue::Null, Variant::Null) => Ok(Value::Null),
            (JsonValue::Bool(v), Variant::Boolean) => Ok(Value::Boolean(*v)),
            (JsonValue::Number(n), Variant::Int) => n
                .as_i64()
                .and_then(|n| i32::try_from(n).ok())
                .map(Value::Int)
                .ok_or_else(invalid),
            (JsonValue::Number(n), Variant::Long) => n.as_i64().map(Value::Long).ok_or_else(invalid),
            (JsonValue::Number(n), Variant::Float) => {
                n.as_f64().map(|n| Value::Float(n as f32)).ok_or_else(invalid)
            }
            (JsonValue::Number(n), Variant::Double) => {
                n.as_f64().map(Value::Double).ok_or_else(invalid)
            }
            (JsonValue::String(n), Variant::Str) => Ok(Value::Str(n.clone())),
            (JsonValue::String(n), Variant::Enum(schema)) => {
                Ok(Value::Enum(EnumValue::new(schema.clone(), n)?))
            }
            (JsonValue::Object(v), Variant::Record(schema)) => {
                // A snapshot of the names known so far is enough: a named type
                // must be defined before it is referenced.
                let mut record = Record::new(schema.clone(), Arc::new(self.clone()));
                for field in schema.fields() {
                    let value = match (v.get(field.name()), field.default()) {
                        (Some(json), _) => self.parse_default(json, field.ty())?,
                        (None, Some(default)) => default.clone(),
                        (None, None) => return Err(invalid()),
                    };
                    record.set_at(field.position(), value)?;
                }
                Ok(Value::Record(record))
            }
            (JsonValue::Array(arr), Variant::Array(items)) => {
                let mut default_arr_items: Vec<Value> = Vec::with_capacity(arr.len());
                for v in arr {
                    default_arr_items.push(self.parse_default(v, items)?);
                }
                Ok(Value::Array(default_arr_items))
            }
            (JsonValue::Object(map), Variant::Map(values_schema)) => {
                let mut values = HashMap::with_capacity(map.len());
                for (k, v) in map {
                    values.insert(k.to_string(), self.parse_default(v, values_schema)?);
                }
                Ok(Value::Map(values))
            }
            (_d, _s) => Err(invalid()),
        }
    }
}
