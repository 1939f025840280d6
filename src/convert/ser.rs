use super::Members;
use crate::error::{AvroCastErr, AvroCastResult};
use crate::hooks::BindingHooks;
use crate::reflect::{to_ticks, Native, Reflect};
use crate::schema::{RecordSchema, Registry, Variant};
use crate::value::{EnumValue, Map, Record, Value};
use log::trace;
use std::sync::Arc;

/// Walks a native object graph along a schema and builds the record tree.
pub(crate) struct RecordWriter<'c> {
    names: &'c Arc<Registry>,
    hooks: &'c dyn BindingHooks,
    members: Members<'c>,
    max_depth: usize,
    depth: usize,
}

impl<'c> RecordWriter<'c> {
    pub(crate) fn new(
        names: &'c Arc<Registry>,
        hooks: &'c dyn BindingHooks,
        max_depth: usize,
    ) -> Self {
        RecordWriter {
            names,
            hooks,
            members: Members::new(hooks),
            max_depth,
            depth: 0,
        }
    }

    pub(crate) fn write_record(
        &mut self,
        obj: &dyn Reflect,
        schema: &Arc<RecordSchema>,
    ) -> AvroCastResult<Record> {
        let info = obj.type_info();
        trace!("writing `{}` as record `{}`", info.full_name(), schema.fullname());
        let mut record = Record::new(schema.clone(), self.names.clone());

        for field in schema.fields() {
            let member = match self.members.resolve(info, field) {
                Some(member) => member,
                None => continue,
            };
            let native = match self.hooks.pre_serialize(obj, field.name()) {
                Some(native) => native,
                None => member.get(obj),
            };
            let value = match (native, field.default()) {
                (Native::Null, Some(default)) => default.clone(),
                (native, _) => self.write(native, field.ty())?,
            };
            record.set_at(field.position(), value)?;
        }
        Ok(record)
    }

    fn write(&mut self, native: Native<'_>, schema: &Variant) -> AvroCastResult<Value> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(AvroCastErr::RecursionLimit(self.max_depth));
        }
        let value = self.write_inner(native, schema);
        self.depth -= 1;
        value
    }

    fn write_inner(&mut self, native: Native<'_>, schema: &Variant) -> AvroCastResult<Value> {
        let names = self.names;
        let value = match (native, schema) {
            (Native::Null, _) | (_, Variant::Null) => Value::Null,
            (native, Variant::Named(_)) => return self.write_inner(native, names.resolve(schema)?),
            (native, Variant::Union(variants)) => {
                let variant = resolve_union(&native, variants, names)?;
                return self.write_inner(native, variant);
            }
            (Native::Object(obj), Variant::Record(rec)) => {
                Value::Record(self.write_record(obj.as_reflect(), rec)?)
            }
            (Native::Enum(symbol), Variant::Enum(schema))
            | (Native::Str(symbol), Variant::Enum(schema)) => {
                Value::Enum(EnumValue::new(schema.clone(), &symbol)?)
            }
            (Native::Seq(items), Variant::Array(items_schema)) => Value::Array(
                items
                    .into_iter()
                    .map(|item| self.write(item, items_schema))
                    .collect::<AvroCastResult<Vec<_>>>()?,
            ),
            (Native::Map(entries), Variant::Map(values_schema)) => {
                let mut map = Map::with_capacity(entries.len());
                for (key, native) in entries {
                    map.insert(key.into_owned(), self.write(native, values_schema)?);
                }
                Value::Map(map)
            }
            (Native::Boolean(b), Variant::Boolean) => Value::Boolean(b),
            (Native::Int(i), Variant::Int) => Value::Int(i),
            // int is promotable to long, float or double ---
            (Native::Int(i), Variant::Long) => Value::Long(i64::from(i)),
            (Native::Int(i), Variant::Float) => Value::Float(i as f32),
            (Native::Int(i), Variant::Double) => Value::Double(f64::from(i)),
            // ---
            (Native::Long(l), Variant::Long) => Value::Long(l),
            (Native::Long(l), Variant::Float) => Value::Float(l as f32),
            (Native::Long(l), Variant::Double) => Value::Double(l as f64),
            (Native::Float(f), Variant::Float) => Value::Float(f),
            // float is promotable to double ---
            (Native::Float(f), Variant::Double) => Value::Double(f64::from(f)),
            (Native::Double(d), Variant::Double) => Value::Double(d),
            (Native::Str(s), Variant::Str) | (Native::Enum(s), Variant::Str) => {
                Value::Str(s.into_owned())
            }
            (Native::DateTime(dt), Variant::Long) => Value::Long(to_ticks(&dt)),
            (native, schema) => {
                return Err(AvroCastErr::SchemaDataMismatch {
                    expected: schema.kind().to_string(),
                    found: native.kind().to_string(),
                })
            }
        };
        Ok(value)
    }
}

// Picks the alternative a native value is written as. Objects select the
// record of their own name, everything else the first alternative of a
// compatible kind.
fn resolve_union<'a>(
    native: &Native<'_>,
    union_variants: &'a [Variant],
    cxt: &'a Registry,
) -> AvroCastResult<&'a Variant> {
    for variant in union_variants {
        let variant = cxt.resolve(variant)?;
        match (native, variant) {
            (Native::Object(obj), Variant::Record(rec)) => {
                if obj.type_info().full_name() == rec.fullname() {
                    return Ok(variant);
                }
            }
            (Native::Null, Variant::Null)
            | (Native::Boolean(_), Variant::Boolean)
            | (Native::Int(_), Variant::Int)
            | (Native::Int(_), Variant::Long)
            | (Native::Int(_), Variant::Float)
            | (Native::Int(_), Variant::Double)
            | (Native::Long(_), Variant::Long)
            | (Native::Long(_), Variant::Float)
            | (Native::Long(_), Variant::Double)
            | (Native::Float(_), Variant::Float)
            | (Native::Float(_), Variant::Double)
            | (Native::Double(_), Variant::Double)
            | (Native::Str(_), Variant::Str)
            | (Native::DateTime(_), Variant::Long)
            | (Native::Enum(_), Variant::Enum(_))
            | (Native::Seq(_), Variant::Array(_))
            | (Native::Map(_), Variant::Map(_)) => return Ok(variant),
            _ => {}
        }
    }
    Err(AvroCastErr::UnionMismatch(native.kind().to_string()))
}
