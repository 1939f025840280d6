//! Conversions between reflected native objects and avro record values.
//!
//! [`Converter`] bundles what a conversion needs besides the object and the
//! schema: the [`BindingHooks`], the [`TypeRegistry`] used to instantiate
//! abstract members and the maximum nesting depth.

mod de;
mod ser;

use crate::config::MAX_DEPTH;
use crate::error::{AvroCastErr, AvroCastResult};
use crate::hooks::{BindingHooks, NoHooks};
use crate::reflect::{FromNative, Member, Native, NativeType, Object, Reflect, TypeInfo, Typed};
use crate::registry::{TypeFilter, TypeRegistry};
use crate::schema::{Field, Schema};
use crate::value::Value;
use de::RecordReader;
use log::debug;
use ser::RecordWriter;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Converts native objects to avro records and back.
///
/// A converter is cheap to clone and can be shared between threads.
///
/// ```
/// use avrocast::{reflect_record, Converter, Schema};
/// use std::str::FromStr;
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
/// reflect_record!("geometry.Point" => Point { x: i32, y: i32 });
///
/// let schema = Schema::from_str(r##"
///     {"type": "record", "name": "geometry.Point", "fields": [
///         {"name": "x", "type": "int"},
///         {"name": "y", "type": "int"}
///     ]}
/// "##).unwrap();
///
/// let converter = Converter::builder().max_depth(16).build().unwrap();
/// let value = converter.to_record(&Point { x: 1, y: 2 }, &schema).unwrap();
/// let point: Point = converter.from_record(&value, Some(&schema)).unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
#[derive(Clone)]
pub struct Converter {
    hooks: Arc<dyn BindingHooks>,
    registry: Arc<TypeRegistry>,
    max_depth: usize,
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Converter")
            .field("registry", &self.registry)
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

impl Default for Converter {
    fn default() -> Self {
        Converter {
            hooks: Arc::new(NoHooks),
            registry: TypeRegistry::global(),
            max_depth: MAX_DEPTH,
        }
    }
}

impl Converter {
    /// Starts configuring a converter.
    pub fn builder() -> ConverterBuilder {
        ConverterBuilder::new()
    }

    /// The registry abstract members are resolved with.
    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    /// Converts `obj` into a record of the root record of `schema`.
    pub fn to_record(&self, obj: &dyn Reflect, schema: &Schema) -> AvroCastResult<Value> {
        let record_schema = schema.record()?;
        let mut writer = RecordWriter::new(schema.names(), &*self.hooks, self.max_depth);
        writer.write_record(obj, record_schema).map(Value::Record)
    }

    /// Same as [`to_record`](Converter::to_record) with the schema given as
    /// JSON text.
    pub fn to_record_str(&self, obj: &dyn Reflect, schema: &str) -> AvroCastResult<Value> {
        let schema = Schema::from_str(schema)?;
        self.to_record(obj, &schema)
    }

    /// Builds a `T` from a record value.
    ///
    /// Fields are read as described by `schema`, or by the record's own
    /// schema when `None`. Fields of `schema` the record was not written
    /// with are left at their zero value.
    pub fn from_record<T>(&self, value: &Value, schema: Option<&Schema>) -> AvroCastResult<T>
    where
        T: Typed + FromNative,
    {
        let record = value.as_record()?;
        let schema = match schema {
            Some(schema) => Cow::Borrowed(schema),
            None => Cow::Owned(Schema::of_record(record)),
        };
        let record_schema = schema.record()?;

        let info = match T::native_type() {
            NativeType::Object(info) => info,
            other => {
                return Err(AvroCastErr::InvalidNativeValue {
                    expected: "record type",
                    found: other.to_string(),
                })
            }
        };
        self.registry.refresh(info);

        let mut reader = RecordReader::new(
            schema.names(),
            &*self.hooks,
            &self.registry,
            self.max_depth,
        );
        let obj = reader.read_record(record, info, record_schema)?;
        T::from_native(Native::Object(Object::Owned(obj)))
    }

    /// Same as [`from_record`](Converter::from_record) with the schema given
    /// as JSON text.
    pub fn from_record_str<T>(&self, value: &Value, schema: &str) -> AvroCastResult<T>
    where
        T: Typed + FromNative,
    {
        let schema = Schema::from_str(schema)?;
        self.from_record(value, Some(&schema))
    }
}

/// Configures a [`Converter`].
#[derive(Default)]
pub struct ConverterBuilder {
    hooks: Option<Arc<dyn BindingHooks>>,
    filter: Option<TypeFilter>,
    registry: Option<Arc<TypeRegistry>>,
    max_depth: Option<usize>,
}

impl ConverterBuilder {
    /// A builder with no hooks, the global registry and the default depth.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binding hooks consulted for every record field.
    pub fn hooks<H: BindingHooks + 'static>(mut self, hooks: H) -> Self {
        self.hooks = Some(Arc::new(hooks));
        self
    }

    /// Restricts the concrete types an abstract member may be read as. The
    /// converter gets a private registry holding only accepted types.
    pub fn type_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&TypeInfo) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Arc::new(filter));
        self
    }

    /// Resolves abstract members with `registry` instead of the global one.
    pub fn registry(mut self, registry: Arc<TypeRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Maximum nesting depth of a conversion.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Creates the converter.
    pub fn build(self) -> AvroCastResult<Converter> {
        let max_depth = self.max_depth.unwrap_or(MAX_DEPTH);
        if max_depth == 0 {
            return Err(AvroCastErr::ConverterBuildFailed("max_depth must be positive"));
        }
        let registry = match (self.registry, self.filter) {
            (Some(_), Some(_)) => {
                return Err(AvroCastErr::ConverterBuildFailed(
                    "a type filter cannot be applied to a shared registry",
                ))
            }
            (Some(registry), None) => registry,
            (None, Some(filter)) => {
                Arc::new(TypeRegistry::with_filter(move |info: &TypeInfo| filter(info)))
            }
            (None, None) => TypeRegistry::global(),
        };
        Ok(Converter {
            hooks: self.hooks.unwrap_or_else(|| Arc::new(NoHooks)),
            registry,
            max_depth,
        })
    }
}

// Member bound to each (type, field) pair, resolved once per conversion.
pub(crate) struct Members<'h> {
    hooks: &'h dyn BindingHooks,
    cache: HashMap<&'static str, HashMap<String, Option<Member>>>,
}

impl<'h> Members<'h> {
    pub(crate) fn new(hooks: &'h dyn BindingHooks) -> Self {
        Members {
            hooks,
            cache: HashMap::new(),
        }
    }

    pub(crate) fn resolve(&mut self, info: &'static TypeInfo, field: &Field) -> Option<Member> {
        let by_field = self.cache.entry(info.full_name()).or_default();
        if let Some(member) = by_field.get(field.name()) {
            return *member;
        }
        let member = self
            .hooks
            .resolve_member(info, field)
            .or_else(|| info.member(field.name()).copied());
        if member.is_none() {
            debug!(
                "no member of `{}` binds field `{}`, skipped",
                info.full_name(),
                field.name()
            );
        }
        by_field.insert(field.name().to_string(), member);
        member
    }
}
