// This module contains definition of types that are common across a subset of
// the schema tree: names, record fields, record and enum definitions.

use crate::error::{AvroCastErr, AvroCastResult};
use crate::schema::Variant;
use crate::value::Value;
use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use std::fmt::{self, Display};
use std::str::FromStr;

///////////////////////////////////////////////////////////////////////////////
/// Name implementation for named types: record, enum
///////////////////////////////////////////////////////////////////////////////

fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

pub(crate) fn validate_name(name: &str) -> AvroCastResult<()> {
    if is_valid_identifier(name) {
        Ok(())
    } else {
        Err(AvroCastErr::InvalidName(name.to_string()))
    }
}

// Follows the grammer: <empty> | <name>[(<dot><name>)*]
pub(crate) fn validate_namespace(s: &str) -> AvroCastResult<()> {
    if s.is_empty() || s.split('.').all(is_valid_identifier) {
        Ok(())
    } else {
        Err(AvroCastErr::InvalidNamespace(s.to_string()))
    }
}

/// The `fullname` of a named avro type, i.e. record and enum.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Name {
    name: String,
    namespace: Option<String>,
    fullname: String,
}

impl Name {
    // A dotted `name` is already a fullname and the given namespace is ignored.
    // An empty namespace is the null namespace.
    pub(crate) fn new(name: &str, namespace: Option<&str>) -> AvroCastResult<Self> {
        let (namespace, name) = match name.rfind('.') {
            Some(idx) => (Some(&name[..idx]), &name[idx + 1..]),
            None => (namespace.filter(|ns| !ns.is_empty()), name),
        };
        validate_name(name)?;
        if let Some(ns) = namespace {
            validate_namespace(ns)?;
            if ns.is_empty() {
                return Err(AvroCastErr::InvalidNamespace(ns.to_string()));
            }
        }
        let fullname = match namespace {
            Some(ns) => format!("{}.{}", ns, name),
            None => name.to_string(),
        };
        Ok(Self {
            name: name.to_string(),
            namespace: namespace.map(str::to_string),
            fullname,
        })
    }

    pub(crate) fn from_json(
        json: &serde_json::map::Map<String, JsonValue>,
        enclosing_namespace: Option<&str>,
    ) -> AvroCastResult<Self> {
        let name = match json.get("name") {
            Some(JsonValue::String(s)) => s,
            _ => return Err(AvroCastErr::NameParseFailed),
        };
        let namespace = match json.get("namespace") {
            Some(JsonValue::String(ns)) => Some(ns.as_str()),
            Some(_) => return Err(AvroCastErr::NameParseFailed),
            None => enclosing_namespace,
        };
        Name::new(name, namespace)
    }

    /// The unqualified name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The namespace, if any.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// `namespace.name`, or the bare name without a namespace.
    pub fn fullname(&self) -> &str {
        &self.fullname
    }
}

impl Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fullname)
    }
}

impl FromStr for Name {
    type Err = AvroCastErr;

    fn from_str(s: &str) -> Result<Self, AvroCastErr> {
        Name::new(s, None)
    }
}

///////////////////////////////////////////////////////////////////////////////
/// Record field definition.
///////////////////////////////////////////////////////////////////////////////

/// A record field: name, position within the record, type and default value.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub(crate) name: String,
    pub(crate) position: usize,
    pub(crate) ty: Variant,
    pub(crate) default: Option<Value>,
}

impl Field {
    pub(crate) fn new(
        name: &str,
        position: usize,
        ty: Variant,
        default: Option<Value>,
    ) -> AvroCastResult<Self> {
        // field names follow the same rules as type names
        validate_name(name)?;
        Ok(Field {
            name: name.to_string(),
            position,
            ty,
            default,
        })
    }

    /// Field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Zero based position of the field in its record.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Schema of the field's values.
    pub fn ty(&self) -> &Variant {
        &self.ty
    }

    /// Default value, parsed against the field's schema.
    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

///////////////////////////////////////////////////////////////////////////////
/// Named type definitions
///////////////////////////////////////////////////////////////////////////////

/// A record definition with its fields in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSchema {
    pub(crate) name: Name,
    pub(crate) fields: IndexMap<String, Field>,
}

impl RecordSchema {
    /// Name of the record.
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// Shorthand for `self.name().fullname()`.
    pub fn fullname(&self) -> &str {
        self.name.fullname()
    }

    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.values()
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True for a record with no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// An enum definition.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumSchema {
    pub(crate) name: Name,
    pub(crate) symbols: Vec<String>,
}

impl EnumSchema {
    /// Name of the enum.
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// Shorthand for `self.name().fullname()`.
    pub fn fullname(&self) -> &str {
        self.name.fullname()
    }

    /// Symbols in declaration order.
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Whether `symbol` is one of this enum's symbols.
    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.iter().any(|s| s == symbol)
    }
}
