//! Runtime type descriptors for native Rust types.
//!
//! A type takes part in conversions by implementing [`Reflect`], which hands
//! out a static [`TypeInfo`]: the type's fully qualified name, the crate and
//! module that define it, a no-arg constructor and one [`Member`] accessor per
//! field. [`Typed`] describes the declared type of a member and [`Native`] is
//! the dynamic value moved through a member.
//!
//! These are rarely implemented by hand; the [`reflect_record!`](crate::reflect_record),
//! [`reflect_enum!`](crate::reflect_enum) and [`reflect_trait!`](crate::reflect_trait)
//! macros generate them and register record types with the
//! [`TypeRegistry`](crate::TypeRegistry).

#[macro_use]
mod macros;
mod native;

pub use native::{from_ticks, to_ticks, FromNative, IntoNative, MapKey, Native, Object};

use crate::error::AvroCastResult;
use once_cell::sync::OnceCell;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

/// A native type that can be walked by the converters.
pub trait Reflect: Any + Send + Sync + fmt::Debug {
    /// Descriptor of the concrete type.
    fn type_info(&self) -> &'static TypeInfo;
    /// Upcasts to `&dyn Reflect`, also from another trait object.
    fn as_reflect(&self) -> &dyn Reflect;
    /// Returns `self` as `&dyn Any`.
    fn as_any(&self) -> &dyn Any;
    /// Returns `self` as `&mut dyn Any`.
    fn as_any_mut(&mut self) -> &mut dyn Any;
    /// Converts a boxed value into `Box<dyn Any>`.
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl dyn Reflect {
    /// Returns a reference to the value if it is of type `T`.
    pub fn downcast_ref<T: Reflect>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Returns a mutable reference to the value if it is of type `T`.
    pub fn downcast_mut<T: Reflect>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }

    /// Moves the value out of the box if it is of type `T`.
    pub fn downcast<T: Reflect>(self: Box<Self>) -> Option<Box<T>> {
        self.into_any().downcast::<T>().ok()
    }
}

/// Static description of the declared type of a member.
pub trait Typed {
    /// The declared type.
    fn native_type() -> NativeType;
}

///////////////////////////////////////////////////////////////////////////////
/// Type descriptors
///////////////////////////////////////////////////////////////////////////////

/// The declared type of a member. Nested types are described lazily so that
/// recursive structures are representable.
#[derive(Clone, Copy)]
pub enum NativeType {
    /// `bool`
    Boolean,
    /// `i32` and the smaller integers
    Int,
    /// `i64` and `u32`
    Long,
    /// `f32`
    Float,
    /// `f64`
    Double,
    /// `String`
    String,
    /// `chrono::DateTime<Utc>`
    DateTime,
    /// A fieldless enum.
    Enum(&'static EnumInfo),
    /// A fixed-size sequence, `Box<[T]>`.
    Array(fn() -> NativeType),
    /// A growable sequence, `Vec<T>`.
    List(fn() -> NativeType),
    /// A string keyed map.
    Map(fn() -> NativeType),
    /// `Option<T>`
    Nullable(fn() -> NativeType),
    /// A reflected record type, or an abstract type standing for all the
    /// types implementing a trait.
    Object(&'static TypeInfo),
}

impl NativeType {
    /// Item type of an array or list.
    pub fn item_type(&self) -> Option<NativeType> {
        match self {
            NativeType::Array(item) | NativeType::List(item) => Some(item()),
            _ => None,
        }
    }

    /// Value type of a map.
    pub fn value_type(&self) -> Option<NativeType> {
        match self {
            NativeType::Map(value) => Some(value()),
            _ => None,
        }
    }
}

impl fmt::Display for NativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NativeType::Boolean => f.pad("bool"),
            NativeType::Int => f.pad("int"),
            NativeType::Long => f.pad("long"),
            NativeType::Float => f.pad("float"),
            NativeType::Double => f.pad("double"),
            NativeType::String => f.pad("string"),
            NativeType::DateTime => f.pad("DateTime"),
            NativeType::Enum(info) => f.pad(info.full_name()),
            NativeType::Array(item) => write!(f, "[{}]", item()),
            NativeType::List(item) => write!(f, "List<{}>", item()),
            NativeType::Map(value) => write!(f, "Map<string, {}>", value()),
            NativeType::Nullable(inner) => write!(f, "{}?", inner()),
            NativeType::Object(info) => f.pad(info.full_name()),
        }
    }
}

impl fmt::Debug for NativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// A fieldless enum: its fully qualified name and its variant names.
#[derive(Debug)]
pub struct EnumInfo {
    full_name: &'static str,
    symbols: &'static [&'static str],
}

impl EnumInfo {
    #[doc(hidden)]
    pub const fn new(full_name: &'static str, symbols: &'static [&'static str]) -> Self {
        EnumInfo { full_name, symbols }
    }

    /// `namespace.Name`, or the bare name.
    pub fn full_name(&self) -> &'static str {
        self.full_name
    }

    /// Variant names in declaration order.
    pub fn symbols(&self) -> &'static [&'static str] {
        self.symbols
    }

    /// Finds the variant named `symbol`, ignoring ASCII case.
    pub fn parse(&self, symbol: &str) -> Option<&'static str> {
        self.symbols
            .iter()
            .copied()
            .find(|s| s.eq_ignore_ascii_case(symbol))
    }
}

type Upcast = fn(Box<dyn Reflect>, TypeId) -> Option<Box<dyn Any>>;

/// Descriptor of a reflected type.
///
/// A concrete type has a constructor and members. An abstract type has
/// neither; it names a trait whose implementors are found through the
/// [`TypeRegistry`](crate::TypeRegistry).
pub struct TypeInfo {
    full_name: &'static str,
    module_path: &'static str,
    construct: Option<fn() -> Box<dyn Reflect>>,
    members: &'static [Member],
    upcast: Option<Upcast>,
    // member name -> index into `members`, built on first lookup
    index: OnceCell<HashMap<&'static str, usize>>,
}

impl TypeInfo {
    #[doc(hidden)]
    pub const fn concrete(
        full_name: &'static str,
        module_path: &'static str,
        members: &'static [Member],
        construct: fn() -> Box<dyn Reflect>,
        upcast: Upcast,
    ) -> Self {
        TypeInfo {
            full_name,
            module_path,
            construct: Some(construct),
            members,
            upcast: Some(upcast),
            index: OnceCell::new(),
        }
    }

    #[doc(hidden)]
    pub const fn abstract_type(full_name: &'static str, module_path: &'static str) -> Self {
        TypeInfo {
            full_name,
            module_path,
            construct: None,
            members: &[],
            upcast: None,
            index: OnceCell::new(),
        }
    }

    /// `namespace.Name`, or the bare name without a namespace.
    pub fn full_name(&self) -> &'static str {
        self.full_name
    }

    /// The unqualified name.
    pub fn name(&self) -> &'static str {
        match self.full_name.rfind('.') {
            Some(idx) => &self.full_name[idx + 1..],
            None => self.full_name,
        }
    }

    /// The namespace, if any.
    pub fn namespace(&self) -> Option<&'static str> {
        self.full_name.rfind('.').map(|idx| &self.full_name[..idx])
    }

    /// Module that defines the type.
    pub fn module_path(&self) -> &'static str {
        self.module_path
    }

    /// Crate that defines the type.
    pub fn crate_name(&self) -> &'static str {
        self.module_path
            .split("::")
            .next()
            .unwrap_or(self.module_path)
    }

    /// True for trait descriptors, which cannot be instantiated.
    pub fn is_abstract(&self) -> bool {
        self.construct.is_none()
    }

    /// A new default instance, or `None` for an abstract type.
    pub fn construct(&self) -> Option<Box<dyn Reflect>> {
        self.construct.map(|construct| construct())
    }

    /// All members in declaration order.
    pub fn members(&self) -> &'static [Member] {
        self.members
    }

    /// The member named `name`.
    pub fn member(&self, name: &str) -> Option<&'static Member> {
        let members = self.members;
        let index = self.index.get_or_init(|| {
            members
                .iter()
                .enumerate()
                .map(|(idx, m)| (m.name, idx))
                .collect()
        });
        index.get(name).map(|&idx| &members[idx])
    }

    /// Converts an instance of this type into `Box<Target>` (boxed again as
    /// `Box<dyn Any>`), where `target` is `TypeId::of::<Box<Target>>()` for one
    /// of the traits the type was registered with.
    pub fn upcast(&self, obj: Box<dyn Reflect>, target: TypeId) -> Option<Box<dyn Any>> {
        self.upcast.and_then(|upcast| upcast(obj, target))
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo")
            .field("full_name", &self.full_name)
            .field("module_path", &self.module_path)
            .field("abstract", &self.is_abstract())
            .field("members", &self.members)
            .finish()
    }
}

///////////////////////////////////////////////////////////////////////////////
/// Member accessors
///////////////////////////////////////////////////////////////////////////////

/// Reads a member. A missing value is `Native::Null`.
pub type Getter = for<'a> fn(&'a dyn Reflect) -> Native<'a>;
/// Writes a member.
pub type Setter = fn(&mut dyn Reflect, Native<'static>) -> AvroCastResult<()>;

/// A get/set pair for one member of a reflected type.
#[derive(Clone, Copy)]
pub struct Member {
    name: &'static str,
    ty: fn() -> NativeType,
    getter: Getter,
    setter: Setter,
}

impl Member {
    /// Creates an accessor. Binding hooks use this to expose members the
    /// type does not declare, such as private backing fields.
    pub const fn new(
        name: &'static str,
        ty: fn() -> NativeType,
        getter: Getter,
        setter: Setter,
    ) -> Self {
        Member {
            name,
            ty,
            getter,
            setter,
        }
    }

    /// Member name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Declared type of the member.
    pub fn native_type(&self) -> NativeType {
        (self.ty)()
    }

    /// Reads the member of `obj`.
    pub fn get<'a>(&self, obj: &'a dyn Reflect) -> Native<'a> {
        (self.getter)(obj)
    }

    /// Writes the member of `obj`.
    pub fn set(&self, obj: &mut dyn Reflect, value: Native<'static>) -> AvroCastResult<()> {
        (self.setter)(obj, value)
    }
}

impl fmt::Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Member")
            .field("name", &self.name)
            .field("ty", &self.native_type())
            .finish()
    }
}
