/// Implements [`Reflect`](crate::reflect::Reflect) and the member conversions
/// for a struct, and registers it with the [`TypeRegistry`](crate::TypeRegistry)
/// under its fully qualified name.
///
/// The struct must implement `Default`, which serves as its no-arg
/// constructor. Listing traits after `as` lets a `Box<dyn Trait>` member hold
/// the type; each trait needs a [`reflect_trait!`](crate::reflect_trait).
///
/// ```
/// use avrocast::reflect_record;
///
/// #[derive(Debug, Default)]
/// struct Point {
///     x: i32,
///     y: i32,
///     label: Option<String>,
/// }
///
/// reflect_record!("geometry.Point" => Point { x: i32, y: i32, label: Option<String> });
/// ```
#[macro_export]
macro_rules! reflect_record {
    (
        $full_name:literal => $ty:ty $( as [ $( $iface:ty ),+ ] )? {
            $( $field:ident : $fty:ty ),* $(,)?
        }
    ) => {
        const _: () = {
            use $crate::__macro_exports::{Any, TypeId};
            use $crate::reflect::{FromNative, IntoNative, Member, Native, NativeType, Object};
            use $crate::reflect::{Reflect, TypeInfo, Typed};

            fn __construct() -> Box<dyn Reflect> {
                Box::new(<$ty as Default>::default())
            }

            #[allow(unused_variables)]
            fn __upcast(obj: Box<dyn Reflect>, target: TypeId) -> Option<Box<dyn Any>> {
                $( $(
                    if target == TypeId::of::<Box<$iface>>() {
                        let this: Box<$ty> = obj.into_any().downcast::<$ty>().ok()?;
                        let upcast: Box<$iface> = this;
                        return Some(Box::new(upcast));
                    }
                )+ )?
                None
            }

            const MEMBERS: &[Member] = &[
                $({
                    fn get(obj: &dyn Reflect) -> Native<'_> {
                        match obj.as_any().downcast_ref::<$ty>() {
                            Some(this) => IntoNative::to_native(&this.$field),
                            None => Native::Null,
                        }
                    }
                    fn set(
                        obj: &mut dyn Reflect,
                        value: Native<'static>,
                    ) -> $crate::AvroCastResult<()> {
                        let found = obj.type_info().full_name();
                        match obj.as_any_mut().downcast_mut::<$ty>() {
                            Some(this) => {
                                this.$field = <$fty as FromNative>::from_native(value)?;
                                Ok(())
                            }
                            None => Err($crate::AvroCastErr::InvalidNativeValue {
                                expected: $full_name,
                                found: found.to_string(),
                            }),
                        }
                    }
                    Member::new(stringify!($field), <$fty as Typed>::native_type, get, set)
                },)*
            ];

            static INFO: TypeInfo =
                TypeInfo::concrete($full_name, module_path!(), MEMBERS, __construct, __upcast);

            impl Typed for $ty {
                fn native_type() -> NativeType {
                    NativeType::Object(&INFO)
                }
            }

            impl Reflect for $ty {
                fn type_info(&self) -> &'static TypeInfo {
                    &INFO
                }
                fn as_reflect(&self) -> &dyn Reflect {
                    self
                }
                fn as_any(&self) -> &dyn Any {
                    self
                }
                fn as_any_mut(&mut self) -> &mut dyn Any {
                    self
                }
                fn into_any(self: Box<Self>) -> Box<dyn Any> {
                    self
                }
            }

            impl IntoNative for $ty {
                fn to_native(&self) -> Native<'_> {
                    Native::Object(Object::Borrowed(self))
                }
            }

            impl FromNative for $ty {
                fn from_native(native: Native<'_>) -> $crate::AvroCastResult<Self> {
                    match native {
                        Native::Null => Ok(<$ty as Default>::default()),
                        Native::Object(Object::Owned(obj)) => {
                            let found = obj.type_info().full_name();
                            obj.into_any()
                                .downcast::<$ty>()
                                .map(|this| *this)
                                .map_err(|_| $crate::AvroCastErr::InvalidNativeValue {
                                    expected: $full_name,
                                    found: found.to_string(),
                                })
                        }
                        other => Err($crate::AvroCastErr::InvalidNativeValue {
                            expected: $full_name,
                            found: other.kind().to_string(),
                        }),
                    }
                }
            }

            $crate::__macro_exports::inventory::submit! {
                $crate::registry::TypeRegistration::new(&INFO)
            }
        };
    };
}

/// Implements the member conversions for a fieldless enum. Variants are
/// stored as their name and parsed back ignoring ASCII case. The enum must
/// implement `Default`, which a null value converts to.
///
/// ```
/// use avrocast::reflect_enum;
///
/// #[derive(Debug, Default, Clone, Copy, PartialEq)]
/// enum Suit {
///     #[default]
///     Spades,
///     Hearts,
/// }
///
/// reflect_enum!("cards.Suit" => Suit { Spades, Hearts });
/// ```
#[macro_export]
macro_rules! reflect_enum {
    ($full_name:literal => $ty:ty { $( $variant:ident ),+ $(,)? }) => {
        const _: () = {
            use $crate::__macro_exports::Cow;
            use $crate::reflect::{EnumInfo, FromNative, IntoNative, Native, NativeType, Typed};

            static INFO: EnumInfo = EnumInfo::new($full_name, &[$( stringify!($variant) ),+]);

            impl Typed for $ty {
                fn native_type() -> NativeType {
                    NativeType::Enum(&INFO)
                }
            }

            impl IntoNative for $ty {
                fn to_native(&self) -> Native<'_> {
                    let symbol = match self {
                        $( Self::$variant => stringify!($variant), )+
                    };
                    Native::Enum(Cow::Borrowed(symbol))
                }
            }

            impl FromNative for $ty {
                fn from_native(native: Native<'_>) -> $crate::AvroCastResult<Self> {
                    match native {
                        Native::Null => Ok(<$ty as Default>::default()),
                        Native::Enum(symbol) | Native::Str(symbol) => {
                            $(
                                if symbol.eq_ignore_ascii_case(stringify!($variant)) {
                                    return Ok(Self::$variant);
                                }
                            )+
                            Err($crate::AvroCastErr::EnumSymbolNotPresent(symbol.into_owned()))
                        }
                        other => Err($crate::AvroCastErr::InvalidNativeValue {
                            expected: $full_name,
                            found: other.kind().to_string(),
                        }),
                    }
                }
            }
        };
    };
}

/// Declares an abstract type for a trait object, so that `Box<dyn Trait>`
/// members can be converted. Concrete types opt in by listing the trait in
/// [`reflect_record!`](crate::reflect_record). The trait must have
/// [`Reflect`](crate::reflect::Reflect) as a supertrait.
///
/// When a record is read into a `Box<dyn Trait>` member, the concrete type is
/// looked up by the record's schema name among the types registered by the
/// crate that declares the trait.
///
/// ```
/// use avrocast::{reflect::Reflect, reflect_record, reflect_trait};
///
/// trait Animal: Reflect {}
/// reflect_trait!("zoo.Animal" => dyn Animal);
///
/// #[derive(Debug, Default)]
/// struct Cat {
///     lives: i32,
/// }
/// impl Animal for Cat {}
/// reflect_record!("zoo.Cat" => Cat as [dyn Animal] { lives: i32 });
/// ```
#[macro_export]
macro_rules! reflect_trait {
    ($full_name:literal => $iface:ty) => {
        const _: () = {
            use $crate::__macro_exports::TypeId;
            use $crate::reflect::{FromNative, IntoNative, Native, NativeType, Object};
            use $crate::reflect::{Reflect, TypeInfo, Typed};

            static INFO: TypeInfo = TypeInfo::abstract_type($full_name, module_path!());

            impl Typed for Box<$iface> {
                fn native_type() -> NativeType {
                    NativeType::Object(&INFO)
                }
            }

            impl IntoNative for Box<$iface> {
                fn to_native(&self) -> Native<'_> {
                    Native::Object(Object::Borrowed((**self).as_reflect()))
                }
            }

            impl FromNative for Box<$iface> {
                fn from_native(native: Native<'_>) -> $crate::AvroCastResult<Self> {
                    match native {
                        Native::Object(Object::Owned(obj)) => {
                            let info = obj.type_info();
                            info.upcast(obj, TypeId::of::<Box<$iface>>())
                                .and_then(|any| any.downcast::<Box<$iface>>().ok())
                                .map(|boxed| *boxed)
                                .ok_or_else(|| $crate::AvroCastErr::InvalidNativeValue {
                                    expected: $full_name,
                                    found: info.full_name().to_string(),
                                })
                        }
                        other => Err($crate::AvroCastErr::InvalidNativeValue {
                            expected: $full_name,
                            found: other.kind().to_string(),
                        }),
                    }
                }
            }
        };
    };
}
