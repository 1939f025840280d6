//! Caller supplied overrides for how record fields bind to native members.
//!
//! Hooks are only needed when a type's natural shape does not match the
//! schema, for example a field stored in a private backing member, or a
//! value that is encoded before it is written and decoded after it is read.

use crate::reflect::{Member, Native, Reflect, TypeInfo};
use crate::schema::Field;

/// A strategy consulted by the converters for every record field.
///
/// Every method has a default that keeps the standard behaviour, so an
/// implementation only overrides what it needs.
pub trait BindingHooks: Send + Sync {
    /// Chooses the member bound to `field` of type `info`, in both
    /// directions. `None` binds the member of the same name.
    ///
    /// Results are cached per type and field for the duration of a single
    /// conversion.
    fn resolve_member(&self, info: &'static TypeInfo, field: &Field) -> Option<Member> {
        let _ = (info, field);
        None
    }

    /// Supplies the value written for `field_name` of `obj` instead of
    /// reading the member. `None` falls back to the member.
    fn pre_serialize<'a>(&self, obj: &'a dyn Reflect, field_name: &str) -> Option<Native<'a>> {
        let _ = (obj, field_name);
        None
    }

    /// Transforms a converted value right before it is stored in the member
    /// bound to `field_name`.
    fn post_deserialize(&self, field_name: &str, value: Native<'static>) -> Native<'static> {
        let _ = field_name;
        value
    }
}

/// Hooks that keep the standard behaviour everywhere.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHooks;

impl BindingHooks for NoHooks {}
