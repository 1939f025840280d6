//! Lookup of concrete native types by their fully qualified name.
//!
//! Every type declared with [`reflect_record!`](crate::reflect_record) is
//! submitted to a link-time collection. A [`TypeRegistry`] indexes the
//! subset of those types defined by the same crate as a seed type, which is
//! how an abstract `Box<dyn Trait>` member finds the implementors that live
//! next to the trait.

use crate::error::{AvroCastErr, AvroCastResult};
use crate::reflect::TypeInfo;
use log::debug;
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// Static registration of a reflected type, collected across the whole binary.
#[derive(Debug)]
pub struct TypeRegistration {
    info: &'static TypeInfo,
}

impl TypeRegistration {
    #[doc(hidden)]
    pub const fn new(info: &'static TypeInfo) -> Self {
        TypeRegistration { info }
    }

    /// The registered type.
    pub fn info(&self) -> &'static TypeInfo {
        self.info
    }
}

inventory::collect!(TypeRegistration);

/// Decides whether a candidate type may be registered.
pub type TypeFilter = Arc<dyn Fn(&TypeInfo) -> bool + Send + Sync>;

static GLOBAL: Lazy<Arc<TypeRegistry>> = Lazy::new(|| Arc::new(TypeRegistry::new()));

/// A cache of concrete types keyed by fully qualified name.
///
/// The cache only grows. Scanning is idempotent: a seed type, and the crate
/// it lives in, are scanned at most once per registry.
pub struct TypeRegistry {
    types: RwLock<HashMap<&'static str, &'static TypeInfo>>,
    seen_seeds: RwLock<HashSet<&'static str>>,
    seen_crates: RwLock<HashSet<&'static str>>,
    filter: Option<TypeFilter>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let types = self.types.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("TypeRegistry")
            .field("types", &types.keys().collect::<Vec<_>>())
            .field("filtered", &self.filter.is_some())
            .finish()
    }
}

impl TypeRegistry {
    /// An empty registry accepting every candidate.
    pub fn new() -> Self {
        TypeRegistry {
            types: RwLock::new(HashMap::new()),
            seen_seeds: RwLock::new(HashSet::new()),
            seen_crates: RwLock::new(HashSet::new()),
            filter: None,
        }
    }

    /// An empty registry that only registers types accepted by `filter`.
    pub fn with_filter<F>(filter: F) -> Self
    where
        F: Fn(&TypeInfo) -> bool + Send + Sync + 'static,
    {
        TypeRegistry {
            filter: Some(Arc::new(filter)),
            ..Self::new()
        }
    }

    /// The process wide registry used by converters that are not given one.
    pub fn global() -> Arc<TypeRegistry> {
        GLOBAL.clone()
    }

    fn accepts(&self, info: &TypeInfo) -> bool {
        !info.is_abstract() && self.filter.as_ref().map_or(true, |f| f(info))
    }

    /// Registers `seed` if it is concrete, then every type registered by the
    /// crate that defines it. Repeated calls for a known seed are no-ops.
    ///
    /// The type map stays write-locked until the scan is done, so a caller
    /// that finds the seed already seen also finds its types.
    pub fn refresh(&self, seed: &'static TypeInfo) {
        let mut types = self.types.write().unwrap_or_else(PoisonError::into_inner);
        {
            let mut seeds = self.seen_seeds.write().unwrap_or_else(PoisonError::into_inner);
            if !seeds.insert(seed.full_name()) {
                return;
            }
        }
        if self.accepts(seed) {
            types.entry(seed.full_name()).or_insert(seed);
        }

        let crate_name = seed.crate_name();
        {
            let mut crates = self.seen_crates.write().unwrap_or_else(PoisonError::into_inner);
            if !crates.insert(crate_name) {
                return;
            }
        }

        debug!("scanning types registered by crate `{}`", crate_name);
        for registration in inventory::iter::<TypeRegistration> {
            let info = registration.info();
            if info.crate_name() == crate_name && self.accepts(info) {
                types.entry(info.full_name()).or_insert(info);
            }
        }
    }

    /// Registers a single type, subject to the filter. Returns whether the
    /// type is now known under its name.
    pub fn register(&self, info: &'static TypeInfo) -> bool {
        if !self.accepts(info) {
            return false;
        }
        let mut types = self.types.write().unwrap_or_else(PoisonError::into_inner);
        types.entry(info.full_name()).or_insert(info);
        true
    }

    /// The concrete type registered under `full_name`.
    pub fn resolve(&self, full_name: &str) -> AvroCastResult<&'static TypeInfo> {
        let types = self.types.read().unwrap_or_else(PoisonError::into_inner);
        types
            .get(full_name)
            .copied()
            .ok_or_else(|| AvroCastErr::TypeNotFound(full_name.to_string()))
    }

    /// Whether a type is registered under `full_name`.
    pub fn contains(&self, full_name: &str) -> bool {
        let types = self.types.read().unwrap_or_else(PoisonError::into_inner);
        types.contains_key(full_name)
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.types.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// True when nothing has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
