//! Full property surface of a type.
//!
//! The per-property lookups of [`crate::Reflector`] only look for the accessor of one named
//! property. A [`TypeIntrospector`] instead enumerates every property a type exposes; its result
//! is what [`crate::Reflector::property_names`] returns and caches.
//!
//! [`ClassInspector`] is the default implementation. It walks the public methods of a type,
//! classifies each of them and groups getters and setters by the property name derived from the
//! method name.

use std::collections::{BTreeMap, BTreeSet};

use crate::{
    metadata::{method::MethodRc, typesystem::TypeRc},
    reflect::accessor::AccessorKind,
    Result,
};

/// Enumerates all properties of a type
pub trait TypeIntrospector: Send + Sync {
    /// The names of all properties of `ty`.
    ///
    /// Called by [`crate::Reflector::property_names_of`] while the [`crate::PropertyCache`] lock
    /// is held. That lock is not reentrant, so an implementation must not ask a cached
    /// reflector for the property names of another type; it deadlocks.
    ///
    /// # Errors
    /// Implementation specific
    fn property_names(&self, ty: &TypeRc) -> Result<BTreeSet<String>>;
}

/// The accessors of one property
#[derive(Debug, Clone)]
pub struct PropertyDetails {
    /// Property name
    pub name: String,
    /// Getters, in public method order
    pub getters: Vec<MethodRc>,
    /// Setters, in public method order
    pub setters: Vec<MethodRc>,
}

impl PropertyDetails {
    fn new(name: String) -> Self {
        PropertyDetails {
            name,
            getters: Vec::new(),
            setters: Vec::new(),
        }
    }

    /// Kind of the first getter, [`AccessorKind::None`] for write-only properties
    #[must_use]
    pub fn getter_kind(&self) -> AccessorKind {
        self.getters
            .first()
            .map_or(AccessorKind::None, |getter| AccessorKind::of(getter))
    }

    /// [`AccessorKind::Setter`] for a single setter, [`AccessorKind::Overloaded`] for several
    #[must_use]
    pub fn setter_kind(&self) -> AccessorKind {
        match self.setters.len() {
            0 => AccessorKind::None,
            1 => AccessorKind::Setter,
            _ => AccessorKind::Overloaded,
        }
    }

    /// Returns `true` if the property has a getter
    #[must_use]
    pub fn is_readable(&self) -> bool {
        !self.getters.is_empty()
    }

    /// Returns `true` if the property has a setter
    #[must_use]
    pub fn is_writable(&self) -> bool {
        !self.setters.is_empty()
    }
}

/// All properties of one type
#[derive(Debug, Clone)]
pub struct ClassDetails {
    /// Simple name of the inspected type
    pub type_name: String,
    /// Properties by name
    pub properties: BTreeMap<String, PropertyDetails>,
}

impl ClassDetails {
    /// The property names
    #[must_use]
    pub fn property_names(&self) -> BTreeSet<String> {
        self.properties.keys().cloned().collect()
    }

    /// The details of one property
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&PropertyDetails> {
        self.properties.get(name)
    }
}

/// Derives properties from the accessor methods of a type
#[derive(Debug, Default, Clone, Copy)]
pub struct ClassInspector;

impl ClassInspector {
    /// Create an inspector
    #[must_use]
    pub fn new() -> Self {
        ClassInspector
    }

    /// Group the accessors of `ty` by property
    #[must_use]
    pub fn inspect(&self, ty: &TypeRc) -> ClassDetails {
        let mut properties: BTreeMap<String, PropertyDetails> = BTreeMap::new();

        for method in ty.public_methods() {
            let kind = AccessorKind::of(method);
            let Some(name) = kind.property_name(&method.name) else {
                continue;
            };

            let details = properties
                .entry(name)
                .or_insert_with_key(|name| PropertyDetails::new(name.clone()));
            if kind.is_getter() {
                details.getters.push(method.clone());
            } else {
                details.setters.push(method.clone());
            }
        }

        ClassDetails {
            type_name: ty.name.clone(),
            properties,
        }
    }
}

impl TypeIntrospector for ClassInspector {
    fn property_names(&self, ty: &TypeRc) -> Result<BTreeSet<String>> {
        Ok(self.inspect(ty).property_names())
    }
}
