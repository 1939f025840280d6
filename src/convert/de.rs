use super::Members;
use crate::error::{AvroCastErr, AvroCastResult};
use crate::hooks::BindingHooks;
use crate::reflect::{from_ticks, Native, NativeType, Object, Reflect, TypeInfo};
use crate::registry::TypeRegistry;
use crate::schema::{RecordSchema, Registry, Variant};
use crate::value::{Record, Value};
use indexmap::IndexMap;
use log::{debug, trace};
use std::borrow::Cow;

/// Walks a record tree along a schema and rebuilds the native objects.
pub(crate) struct RecordReader<'c> {
    names: &'c Registry,
    hooks: &'c dyn BindingHooks,
    members: Members<'c>,
    types: &'c TypeRegistry,
    max_depth: usize,
    depth: usize,
}

fn mismatch(expected: impl ToString, found: &Value) -> AvroCastErr {
    AvroCastErr::SchemaDataMismatch {
        expected: expected.to_string(),
        found: found.kind().to_string(),
    }
}

impl<'c> RecordReader<'c> {
    pub(crate) fn new(
        names: &'c Registry,
        hooks: &'c dyn BindingHooks,
        types: &'c TypeRegistry,
        max_depth: usize,
    ) -> Self {
        RecordReader {
            names,
            hooks,
            members: Members::new(hooks),
            types,
            max_depth,
            depth: 0,
        }
    }

    /// Builds an instance of `info`, or of the type registered under the
    /// schema's name when `info` is abstract.
    pub(crate) fn read_record(
        &mut self,
        record: &Record,
        info: &'static TypeInfo,
        schema: &RecordSchema,
    ) -> AvroCastResult<Box<dyn Reflect>> {
        let info = if info.is_abstract() {
            self.types.refresh(info);
            self.types.resolve(schema.fullname())?
        } else {
            info
        };
        trace!("reading record `{}` into `{}`", record.name(), info.full_name());
        let mut obj = info
            .construct()
            .ok_or_else(|| AvroCastErr::NotInstantiable(info.full_name().to_string()))?;

        for field in schema.fields() {
            let stored = match record.get(field.name()) {
                Some(stored) => stored,
                None => {
                    debug!(
                        "field `{}` is not part of record `{}`, skipped",
                        field.name(),
                        record.name()
                    );
                    continue;
                }
            };
            let member = match self.members.resolve(info, field) {
                Some(member) => member,
                None => continue,
            };
            let stored = match (stored, field.default()) {
                (Value::Null, Some(default)) => default,
                (stored, _) => stored,
            };
            let native = self.read(stored, member.native_type(), field.ty())?;
            let native = self.hooks.post_deserialize(field.name(), native);
            member.set(obj.as_mut(), native)?;
        }
        Ok(obj)
    }

    fn read(
        &mut self,
        value: &Value,
        ty: NativeType,
        schema: &Variant,
    ) -> AvroCastResult<Native<'static>> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(AvroCastErr::RecursionLimit(self.max_depth));
        }
        let native = self.read_inner(value, ty, schema);
        self.depth -= 1;
        native
    }

    fn read_inner(
        &mut self,
        value: &Value,
        ty: NativeType,
        schema: &Variant,
    ) -> AvroCastResult<Native<'static>> {
        let names = self.names;
        let ty = match (value, ty) {
            (Value::Null, _) => return Ok(Native::Null),
            (_, NativeType::Nullable(inner)) => return self.read_inner(value, inner(), schema),
            (_, ty) => ty,
        };

        let native = match (value, schema) {
            (value, Variant::Named(_)) => {
                return self.read_inner(value, ty, names.resolve(schema)?)
            }
            (value, Variant::Union(variants)) => {
                let variant = resolve_union(value, variants, names)?;
                return self.read_inner(value, ty, variant);
            }
            (Value::Record(record), Variant::Record(rec_schema)) => match ty {
                NativeType::Object(info) => {
                    Native::Object(Object::Owned(self.read_record(record, info, rec_schema)?))
                }
                other => return Err(mismatch(other, value)),
            },
            (Value::Enum(e), Variant::Enum(_)) => match ty {
                NativeType::Enum(info) => {
                    let symbol = info
                        .parse(e.symbol())
                        .ok_or_else(|| AvroCastErr::EnumSymbolNotPresent(e.symbol().to_string()))?;
                    Native::Enum(Cow::Borrowed(symbol))
                }
                NativeType::String => Native::Str(Cow::Owned(e.symbol().to_string())),
                other => return Err(mismatch(other, value)),
            },
            (Value::Array(items), Variant::Array(items_schema)) => {
                let item_ty = ty.item_type().ok_or_else(|| mismatch(ty, value))?;
                Native::Seq(
                    items
                        .iter()
                        .map(|item| self.read(item, item_ty, items_schema))
                        .collect::<AvroCastResult<Vec<_>>>()?,
                )
            }
            (Value::Map(map), Variant::Map(values_schema)) => {
                let value_ty = ty.value_type().ok_or_else(|| mismatch(ty, value))?;
                let mut entries = IndexMap::with_capacity(map.len());
                for (key, item) in map {
                    let item = self.read(item, value_ty, values_schema)?;
                    entries.insert(Cow::Owned(key.clone()), item);
                }
                Native::Map(entries)
            }
            (Value::Long(ticks), Variant::Long) if matches!(ty, NativeType::DateTime) => {
                Native::DateTime(from_ticks(*ticks)?)
            }
            (Value::Boolean(b), Variant::Boolean) => Native::Boolean(*b),
            (Value::Int(i), Variant::Int)
            | (Value::Int(i), Variant::Long)
            | (Value::Int(i), Variant::Float)
            | (Value::Int(i), Variant::Double) => Native::Int(*i),
            (Value::Long(l), Variant::Long)
            | (Value::Long(l), Variant::Float)
            | (Value::Long(l), Variant::Double) => Native::Long(*l),
            (Value::Float(f), Variant::Float) | (Value::Float(f), Variant::Double) => {
                Native::Float(*f)
            }
            (Value::Double(d), Variant::Double) => Native::Double(*d),
            (Value::Str(s), Variant::Str) => match ty {
                NativeType::Enum(info) => {
                    let symbol = info
                        .parse(s)
                        .ok_or_else(|| AvroCastErr::EnumSymbolNotPresent(s.to_string()))?;
                    Native::Enum(Cow::Borrowed(symbol))
                }
                _ => Native::Str(Cow::Owned(s.clone())),
            },
            (_, Variant::Null) => Native::Null,
            (value, schema) => return Err(mismatch(schema.kind(), value)),
        };
        Ok(native)
    }
}

// Picks the alternative a stored value was written as. Records and enums
// select the alternative of their own name, everything else the first
// alternative of a compatible kind.
fn resolve_union<'a>(
    value: &Value,
    union_variants: &'a [Variant],
    cxt: &'a Registry,
) -> AvroCastResult<&'a Variant> {
    for variant in union_variants {
        let variant = cxt.resolve(variant)?;
        match (value, variant) {
            (Value::Record(record), Variant::Record(schema)) => {
                if record.name() == schema.fullname() {
                    return Ok(variant);
                }
            }
            (Value::Enum(e), Variant::Enum(schema)) => {
                if e.name() == schema.fullname() {
                    return Ok(variant);
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
            | (Value::Str(_), Variant::Str)
            | (Value::Array(_), Variant::Array(_))
            | (Value::Map(_), Variant::Map(_)) => return Ok(variant),
            _ => {}
        }
    }
    Err(AvroCastErr::UnionMismatch(value.kind().to_string()))
}
