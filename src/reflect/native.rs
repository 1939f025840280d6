use super::{NativeType, Reflect, TypeInfo, Typed};
use crate::config::{NANOS_PER_TICK, TICKS_PER_SECOND};
use crate::error::{AvroCastErr, AvroCastResult};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::convert::TryFrom;
use std::hash::{BuildHasher, Hash};

/// A native value read from or written to a member.
///
/// Values read from an object borrow from it; values produced while
/// reconstructing objects are owned (`Native<'static>`).
#[derive(Debug)]
pub enum Native<'a> {
    /// A missing value: `None`, or nothing to report.
    Null,
    /// `bool`
    Boolean(bool),
    /// `i32`
    Int(i32),
    /// `i64`
    Long(i64),
    /// `f32`
    Float(f32),
    /// `f64`
    Double(f64),
    /// A string.
    Str(Cow<'a, str>),
    /// A point in time.
    DateTime(DateTime<Utc>),
    /// The variant name of a fieldless enum.
    Enum(Cow<'a, str>),
    /// An array or list.
    Seq(Vec<Native<'a>>),
    /// A string keyed map, in iteration order of the source.
    Map(IndexMap<Cow<'a, str>, Native<'a>>),
    /// A reflected object.
    Object(Object<'a>),
}

/// A reflected object, either borrowed from its owner or boxed.
#[derive(Debug)]
pub enum Object<'a> {
    /// Borrowed from the object graph being read.
    Borrowed(&'a dyn Reflect),
    /// A newly constructed object.
    Owned(Box<dyn Reflect>),
}

impl Object<'_> {
    /// The object as a `&dyn Reflect`.
    pub fn as_reflect(&self) -> &dyn Reflect {
        match self {
            Object::Borrowed(obj) => *obj,
            Object::Owned(obj) => obj.as_reflect(),
        }
    }

    /// Descriptor of the object's concrete type.
    pub fn type_info(&self) -> &'static TypeInfo {
        self.as_reflect().type_info()
    }

    /// The boxed object, or `None` when it is borrowed.
    pub fn into_owned(self) -> Option<Box<dyn Reflect>> {
        match self {
            Object::Borrowed(_) => None,
            Object::Owned(obj) => Some(obj),
        }
    }
}

impl Native<'_> {
    /// A short name for the kind of value, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Native::Null => "null",
            Native::Boolean(_) => "bool",
            Native::Int(_) => "int",
            Native::Long(_) => "long",
            Native::Float(_) => "float",
            Native::Double(_) => "double",
            Native::Str(_) => "string",
            Native::DateTime(_) => "DateTime",
            Native::Enum(_) => "enum",
            Native::Seq(_) => "sequence",
            Native::Map(_) => "map",
            Native::Object(obj) => obj.type_info().full_name(),
        }
    }

    /// True for `Native::Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Native::Null)
    }
}

/// Reads a native value out of a member.
pub trait IntoNative {
    /// Views `self` as a native value.
    fn to_native(&self) -> Native<'_>;
}

/// Builds a member value from a native value.
///
/// Numbers are converted leniently between integer and floating point kinds
/// as long as the value fits. `Native::Null` gives the type's zero value,
/// except for `Option` which gives `None`.
pub trait FromNative: Sized {
    /// Converts `native` into `Self`.
    fn from_native(native: Native<'_>) -> AvroCastResult<Self>;
}

pub(crate) fn invalid(expected: &'static str, found: &Native<'_>) -> AvroCastErr {
    AvroCastErr::InvalidNativeValue {
        expected,
        found: found.kind().to_string(),
    }
}

///////////////////////////////////////////////////////////////////////////////
/// Date/time ticks
///////////////////////////////////////////////////////////////////////////////

/// Number of 100 nanosecond ticks since the Unix epoch.
pub fn to_ticks(dt: &DateTime<Utc>) -> i64 {
    dt.timestamp()
        .saturating_mul(TICKS_PER_SECOND)
        .saturating_add(i64::from(dt.timestamp_subsec_nanos()) / NANOS_PER_TICK)
}

/// Inverse of [`to_ticks`].
pub fn from_ticks(ticks: i64) -> AvroCastResult<DateTime<Utc>> {
    let secs = ticks.div_euclid(TICKS_PER_SECOND);
    let nanos = ticks.rem_euclid(TICKS_PER_SECOND) * NANOS_PER_TICK;
    u32::try_from(nanos)
        .ok()
        .and_then(|nanos| DateTime::from_timestamp(secs, nanos))
        .ok_or_else(|| invalid("DateTime", &Native::Long(ticks)))
}

///////////////////////////////////////////////////////////////////////////////
/// Primitive impls
///////////////////////////////////////////////////////////////////////////////

impl Typed for bool {
    fn native_type() -> NativeType {
        NativeType::Boolean
    }
}

impl IntoNative for bool {
    fn to_native(&self) -> Native<'_> {
        Native::Boolean(*self)
    }
}

impl FromNative for bool {
    fn from_native(native: Native<'_>) -> AvroCastResult<Self> {
        match native {
            Native::Boolean(b) => Ok(b),
            Native::Null => Ok(false),
            other => Err(invalid("bool", &other)),
        }
    }
}

impl Typed for i32 {
    fn native_type() -> NativeType {
        NativeType::Int
    }
}

impl IntoNative for i32 {
    fn to_native(&self) -> Native<'_> {
        Native::Int(*self)
    }
}

impl FromNative for i32 {
    fn from_native(native: Native<'_>) -> AvroCastResult<Self> {
        match native {
            Native::Int(i) => Ok(i),
            Native::Long(l) => i32::try_from(l).map_err(|_| invalid("i32", &Native::Long(l))),
            Native::Null => Ok(0),
            other => Err(invalid("i32", &other)),
        }
    }
}

impl Typed for i64 {
    fn native_type() -> NativeType {
        NativeType::Long
    }
}

impl IntoNative for i64 {
    fn to_native(&self) -> Native<'_> {
        Native::Long(*self)
    }
}

impl FromNative for i64 {
    fn from_native(native: Native<'_>) -> AvroCastResult<Self> {
        match native {
            Native::Int(i) => Ok(i64::from(i)),
            Native::Long(l) => Ok(l),
            Native::Null => Ok(0),
            other => Err(invalid("i64", &other)),
        }
    }
}

// Integers narrower than the avro kind they are stored as.
macro_rules! narrow_int {
    ($($ty:ty => $kind:ident($wide:ty)),* $(,)?) => {
        $(
            impl Typed for $ty {
                fn native_type() -> NativeType {
                    NativeType::$kind
                }
            }

            impl IntoNative for $ty {
                fn to_native(&self) -> Native<'_> {
                    Native::$kind(<$wide>::from(*self))
                }
            }

            impl FromNative for $ty {
                fn from_native(native: Native<'_>) -> AvroCastResult<Self> {
                    let wide = <i64 as FromNative>::from_native(native)?;
                    <$ty>::try_from(wide)
                        .map_err(|_| invalid(stringify!($ty), &Native::Long(wide)))
                }
            }
        )*
    };
}

narrow_int!(i8 => Int(i32), i16 => Int(i32), u8 => Int(i32), u16 => Int(i32), u32 => Long(i64));

impl Typed for f32 {
    fn native_type() -> NativeType {
        NativeType::Float
    }
}

impl IntoNative for f32 {
    fn to_native(&self) -> Native<'_> {
        Native::Float(*self)
    }
}

impl FromNative for f32 {
    fn from_native(native: Native<'_>) -> AvroCastResult<Self> {
        match native {
            Native::Float(f) => Ok(f),
            Native::Double(d) => Ok(d as f32),
            Native::Int(i) => Ok(i as f32),
            Native::Long(l) => Ok(l as f32),
            Native::Null => Ok(0.0),
            other => Err(invalid("f32", &other)),
        }
    }
}

impl Typed for f64 {
    fn native_type() -> NativeType {
        NativeType::Double
    }
}

impl IntoNative for f64 {
    fn to_native(&self) -> Native<'_> {
        Native::Double(*self)
    }
}

impl FromNative for f64 {
    fn from_native(native: Native<'_>) -> AvroCastResult<Self> {
        match native {
            Native::Double(d) => Ok(d),
            Native::Float(f) => Ok(f64::from(f)),
            Native::Int(i) => Ok(f64::from(i)),
            Native::Long(l) => Ok(l as f64),
            Native::Null => Ok(0.0),
            other => Err(invalid("f64", &other)),
        }
    }
}

impl Typed for String {
    fn native_type() -> NativeType {
        NativeType::String
    }
}

impl IntoNative for String {
    fn to_native(&self) -> Native<'_> {
        Native::Str(Cow::Borrowed(self))
    }
}

impl FromNative for String {
    fn from_native(native: Native<'_>) -> AvroCastResult<Self> {
        match native {
            Native::Str(s) | Native::Enum(s) => Ok(s.into_owned()),
            Native::Null => Ok(String::new()),
            other => Err(invalid("String", &other)),
        }
    }
}

impl Typed for DateTime<Utc> {
    fn native_type() -> NativeType {
        NativeType::DateTime
    }
}

impl IntoNative for DateTime<Utc> {
    fn to_native(&self) -> Native<'_> {
        Native::DateTime(*self)
    }
}

impl FromNative for DateTime<Utc> {
    fn from_native(native: Native<'_>) -> AvroCastResult<Self> {
        match native {
            Native::DateTime(dt) => Ok(dt),
            Native::Long(ticks) => from_ticks(ticks),
            Native::Null => Ok(DateTime::<Utc>::default()),
            other => Err(invalid("DateTime", &other)),
        }
    }
}

///////////////////////////////////////////////////////////////////////////////
/// Container impls
///////////////////////////////////////////////////////////////////////////////

impl<T: Typed> Typed for Option<T> {
    fn native_type() -> NativeType {
        NativeType::Nullable(T::native_type)
    }
}

impl<T: IntoNative> IntoNative for Option<T> {
    fn to_native(&self) -> Native<'_> {
        match self {
            Some(v) => v.to_native(),
            None => Native::Null,
        }
    }
}

impl<T: FromNative> FromNative for Option<T> {
    fn from_native(native: Native<'_>) -> AvroCastResult<Self> {
        match native {
            Native::Null => Ok(None),
            other => T::from_native(other).map(Some),
        }
    }
}

fn seq_from_native<T: FromNative>(native: Native<'_>) -> AvroCastResult<Vec<T>> {
    match native {
        Native::Seq(items) => items.into_iter().map(T::from_native).collect(),
        Native::Null => Ok(Vec::new()),
        other => Err(invalid("sequence", &other)),
    }
}

impl<T: Typed> Typed for Vec<T> {
    fn native_type() -> NativeType {
        NativeType::List(T::native_type)
    }
}

impl<T: IntoNative> IntoNative for Vec<T> {
    fn to_native(&self) -> Native<'_> {
        Native::Seq(self.iter().map(IntoNative::to_native).collect())
    }
}

impl<T: FromNative> FromNative for Vec<T> {
    fn from_native(native: Native<'_>) -> AvroCastResult<Self> {
        seq_from_native(native)
    }
}

impl<T: Typed> Typed for Box<[T]> {
    fn native_type() -> NativeType {
        NativeType::Array(T::native_type)
    }
}

impl<T: IntoNative> IntoNative for Box<[T]> {
    fn to_native(&self) -> Native<'_> {
        Native::Seq(self.iter().map(IntoNative::to_native).collect())
    }
}

impl<T: FromNative> FromNative for Box<[T]> {
    fn from_native(native: Native<'_>) -> AvroCastResult<Self> {
        seq_from_native(native).map(Vec::into_boxed_slice)
    }
}

// A boxed value converts as the value, so recursive records can be declared.
impl<T: Typed> Typed for Box<T> {
    fn native_type() -> NativeType {
        T::native_type()
    }
}

impl<T: IntoNative> IntoNative for Box<T> {
    fn to_native(&self) -> Native<'_> {
        (**self).to_native()
    }
}

impl<T: FromNative> FromNative for Box<T> {
    fn from_native(native: Native<'_>) -> AvroCastResult<Self> {
        T::from_native(native).map(Box::new)
    }
}

/// A map key. Avro map keys are strings, so keys are written with their
/// string form and parsed back from it.
pub trait MapKey: Sized {
    /// The key as written in the record.
    fn to_key(&self) -> Cow<'_, str>;
    /// Parses a stored key.
    fn from_key(key: Cow<'_, str>) -> AvroCastResult<Self>;
}

impl MapKey for String {
    fn to_key(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_str())
    }

    fn from_key(key: Cow<'_, str>) -> AvroCastResult<Self> {
        Ok(key.into_owned())
    }
}

macro_rules! parsed_key {
    ($($ty:ty),* $(,)?) => {
        $(
            impl MapKey for $ty {
                fn to_key(&self) -> Cow<'_, str> {
                    Cow::Owned(self.to_string())
                }

                fn from_key(key: Cow<'_, str>) -> AvroCastResult<Self> {
                    key.parse().map_err(|_| AvroCastErr::InvalidNativeValue {
                        expected: stringify!($ty),
                        found: format!("map key `{}`", key),
                    })
                }
            }
        )*
    };
}

parsed_key!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, bool, char);

fn map_to_native<'a, K: MapKey + 'a, T: IntoNative + 'a>(
    entries: impl Iterator<Item = (&'a K, &'a T)>,
) -> Native<'a> {
    Native::Map(
        entries
            .map(|(k, v)| (k.to_key(), v.to_native()))
            .collect(),
    )
}

fn map_from_native<K: MapKey, T: FromNative, M: FromIterator<(K, T)>>(
    native: Native<'_>,
) -> AvroCastResult<M> {
    match native {
        Native::Map(entries) => entries
            .into_iter()
            .map(|(k, v)| Ok((K::from_key(k)?, T::from_native(v)?)))
            .collect(),
        Native::Null => Ok(std::iter::empty::<(K, T)>().collect()),
        other => Err(invalid("map", &other)),
    }
}

impl<K: MapKey, T: Typed, S> Typed for HashMap<K, T, S> {
    fn native_type() -> NativeType {
        NativeType::Map(T::native_type)
    }
}

impl<K: MapKey, T: IntoNative, S> IntoNative for HashMap<K, T, S> {
    fn to_native(&self) -> Native<'_> {
        map_to_native(self.iter())
    }
}

impl<K, T, S> FromNative for HashMap<K, T, S>
where
    K: MapKey + Eq + Hash,
    T: FromNative,
    S: BuildHasher + Default,
{
    fn from_native(native: Native<'_>) -> AvroCastResult<Self> {
        map_from_native(native)
    }
}

impl<K: MapKey, T: Typed> Typed for IndexMap<K, T> {
    fn native_type() -> NativeType {
        NativeType::Map(T::native_type)
    }
}

impl<K: MapKey, T: IntoNative> IntoNative for IndexMap<K, T> {
    fn to_native(&self) -> Native<'_> {
        map_to_native(self.iter())
    }
}

impl<K: MapKey + Eq + Hash, T: FromNative> FromNative for IndexMap<K, T> {
    fn from_native(native: Native<'_>) -> AvroCastResult<Self> {
        map_from_native(native)
    }
}

impl<K: MapKey, T: Typed> Typed for BTreeMap<K, T> {
    fn native_type() -> NativeType {
        NativeType::Map(T::native_type)
    }
}

impl<K: MapKey, T: IntoNative> IntoNative for BTreeMap<K, T> {
    fn to_native(&self) -> Native<'_> {
        map_to_native(self.iter())
    }
}

impl<K: MapKey + Ord, T: FromNative> FromNative for BTreeMap<K, T> {
    fn from_native(native: Native<'_>) -> AvroCastResult<Self> {
        map_from_native(native)
    }
}
