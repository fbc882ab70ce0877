//! Bean-style property reflection over registered types.
//!
//! [`Reflector`] is the entry point. It locates the getter or setter of a named property by
//! naming convention, wraps it in a typed handle, enumerates and caches the full property surface
//! of a type, and answers annotation and string conversion queries.
//!
//! # Architecture
//!
//! - [`accessor`]: Classification of methods as getters and setters, property name codec
//! - [`config`]: Options for setter matching and caching
//! - [`introspect`]: Enumeration of the full property surface of a type
//! - [`cache`]: Weak-keyed memoization of property names
//! - [`property`]: The typed [`PropertyAccessor`] and [`PropertyMutator`] handles
//! - setter overload resolution, used by the writeable property lookups
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use propscope::{metadata::typesystem::{PrimitiveKind, TypeRegistry}, Reflector};
//!
//! #[derive(Default)]
//! struct Point { x: i32, label: Option<String> }
//!
//! let registry = Arc::new(TypeRegistry::new()?);
//! let point = registry
//!     .class("geom", "Point")
//!     .binds::<Point>()
//!     .getter("getX", &registry.primitive(PrimitiveKind::I32), |p: &Point| p.x)
//!     .nullable_setter("setLabel", &registry.string_type(), |p: &mut Point, v: Option<String>| {
//!         p.label = v;
//!     })
//!     .build()?;
//!
//! let reflector = Reflector::with_registry(registry.clone());
//! let mut p = Point { x: 5, label: None };
//!
//! let x = reflector.readable_property::<Point, i32>("x")?;
//! assert_eq!(x.get_value(&p)?, 5);
//!
//! let label = reflector
//!     .writeable_property_if_exists(&point, "label", Some(&registry.string_type()))?
//!     .expect("setLabel exists");
//! label.set(&mut p, "hi".to_string())?;
//! assert_eq!(p.label.as_deref(), Some("hi"));
//!
//! assert!(reflector
//!     .writeable_property_if_exists(&point, "color", Some(&registry.string_type()))?
//!     .is_none());
//! # Ok::<(), propscope::Error>(())
//! ```

pub mod accessor;
pub mod cache;
pub mod config;
pub mod introspect;
mod overload;
pub mod property;

use std::{any::Any, fmt, sync::Arc};

use tracing::debug;

pub use accessor::AccessorKind;
pub use cache::{PropertyCache, PropertyNames};
pub use config::{NullSetterResolution, ReflectionConfig};
pub use introspect::{ClassDetails, ClassInspector, PropertyDetails, TypeIntrospector};
pub use property::{PropertyAccessor, PropertyMutator};

use crate::{
    error::PropertyLookup,
    metadata::{
        annotations::{find_annotation, AnnotationKind, AnnotationRc},
        method::MethodRc,
        typesystem::{TypeRc, TypeRegistry, TO_STRING},
    },
    reflect::accessor::{method_name, GET_PREFIX, IS_PREFIX, SET_PREFIX},
    Error, Result,
};

/// Property lookups, property surfaces and annotation queries over one [`TypeRegistry`]
pub struct Reflector {
    registry: Arc<TypeRegistry>,
    introspector: Arc<dyn TypeIntrospector>,
    cache: Arc<PropertyCache>,
    own_cache: bool,
    config: ReflectionConfig,
}

impl Reflector {
    /// Create a reflector over a new registry holding only the built-in types
    ///
    /// # Errors
    /// Returns an error if the built-in types could not be registered
    pub fn new() -> Result<Self> {
        Ok(Reflector::with_registry(Arc::new(TypeRegistry::new()?)))
    }

    /// Create a reflector over `registry`, using the [`ClassInspector`], the process-wide
    /// [`PropertyCache::global`] and the default configuration
    #[must_use]
    pub fn with_registry(registry: Arc<TypeRegistry>) -> Self {
        Reflector {
            registry,
            introspector: Arc::new(ClassInspector::new()),
            cache: PropertyCache::global(),
            own_cache: false,
            config: ReflectionConfig::default(),
        }
    }

    /// Replace the introspector computing property surfaces.
    ///
    /// The global cache only holds what the [`ClassInspector`] computes, so unless a cache was
    /// given with [`Reflector::with_cache`] the reflector switches to a cache of its own.
    #[must_use]
    pub fn with_introspector(mut self, introspector: Arc<dyn TypeIntrospector>) -> Self {
        self.introspector = introspector;
        if !self.own_cache {
            self.cache = Arc::new(PropertyCache::new());
            self.own_cache = true;
        }
        self
    }

    /// Replace the property name cache.
    ///
    /// The cache must only be shared between reflectors using equivalent introspectors.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<PropertyCache>) -> Self {
        self.cache = cache;
        self.own_cache = true;
        self
    }

    /// Replace the configuration
    #[must_use]
    pub fn with_config(mut self, config: ReflectionConfig) -> Self {
        self.config = config;
        self
    }

    /// The registry types are resolved in
    #[must_use]
    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    /// The active configuration
    #[must_use]
    pub fn config(&self) -> &ReflectionConfig {
        &self.config
    }

    /// The property name cache
    #[must_use]
    pub fn cache(&self) -> &Arc<PropertyCache> {
        &self.cache
    }

    /// The readable property `name` of the type bound to `T`, with values of type `F`.
    ///
    /// # Errors
    /// Returns [`Error::TypeNotRegistered`] if `T` is not bound to a registered type, see
    /// [`Reflector::readable_property_in`] otherwise
    pub fn readable_property<T: Any, F: Any>(&self, name: &str) -> Result<PropertyAccessor<T, F>> {
        let ty = self.registry.resolve::<T>()?;
        self.readable_property_in(&ty, name)
    }

    /// The readable property `name` of `ty`, read from instances of `T` with values of type `F`.
    ///
    /// The first public method of `ty` that is a `get` getter named `get<Name>` or a boolean
    /// `is` getter named `is<Name>` is used.
    ///
    /// # Errors
    /// Returns [`Error::InvalidPropertyName`] for an empty name and [`Error::NoSuchProperty`]
    /// if there is no such getter
    pub fn readable_property_in<T: Any, F: Any>(
        &self,
        ty: &TypeRc,
        name: &str,
    ) -> Result<PropertyAccessor<T, F>> {
        match find_getter(ty, name)? {
            Some(method) => Ok(PropertyAccessor::new(
                name,
                method,
                ty.clone(),
                self.registry.clone(),
            )),
            None => {
                debug!(fullname = %ty.fullname(), property = name, "no getter found");
                Err(Error::NoSuchProperty {
                    lookup: PropertyLookup::Getter {
                        property: name.to_string(),
                    },
                    type_name: ty.name.clone(),
                })
            }
        }
    }

    /// The writable property `name` of `ty` accepting values of `value_type`, or null values
    /// if `value_type` is `None`. Returns `None` if there is no such setter.
    ///
    /// # Errors
    /// Returns [`Error::InvalidPropertyName`] for an empty name
    pub fn writeable_property_if_exists(
        &self,
        ty: &TypeRc,
        name: &str,
        value_type: Option<&TypeRc>,
    ) -> Result<Option<PropertyMutator>> {
        let setter = method_name(SET_PREFIX, name)?;
        let mutator = overload::find_setter(ty, &setter, value_type, &self.config).map(|method| {
            PropertyMutator::new(
                name,
                method,
                ty.clone(),
                self.registry.clone(),
                self.config.primitive_widening,
            )
        });
        Ok(mutator)
    }

    /// The writable property `name` of `ty` accepting values of `value_type`, or null values
    /// if `value_type` is `None`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidPropertyName`] for an empty name and [`Error::NoSuchProperty`]
    /// if there is no such setter
    pub fn writeable_property(
        &self,
        ty: &TypeRc,
        name: &str,
        value_type: Option<&TypeRc>,
    ) -> Result<PropertyMutator> {
        if let Some(mutator) = self.writeable_property_if_exists(ty, name, value_type)? {
            return Ok(mutator);
        }

        debug!(
            fullname = %ty.fullname(),
            property = name,
            value_type = ?value_type.map(|value_type| value_type.fullname()),
            "no setter found"
        );
        Err(Error::NoSuchProperty {
            lookup: PropertyLookup::Setter {
                property: name.to_string(),
                value_type: value_type.map(|value_type| value_type.name.clone()),
            },
            type_name: ty.name.clone(),
        })
    }

    /// The names of all properties of the runtime type of `instance`
    ///
    /// # Errors
    /// Returns [`Error::TypeNotRegistered`] if the type of `instance` is not registered, or the
    /// error of the introspector
    pub fn property_names(&self, instance: &dyn Any) -> Result<PropertyNames> {
        let ty = self.registry.type_of(instance)?;
        self.property_names_of(&ty)
    }

    /// The names of all properties of `ty`, memoized in the cache unless disabled by
    /// [`ReflectionConfig::cache_property_names`]
    ///
    /// # Errors
    /// Returns the error of the introspector, or [`Error::LockError`] if the cache lock is
    /// poisoned
    pub fn property_names_of(&self, ty: &TypeRc) -> Result<PropertyNames> {
        if !self.config.cache_property_names {
            return Ok(Arc::new(self.introspector.property_names(ty)?));
        }
        self.cache
            .get_or_compute(ty, |ty| self.introspector.property_names(ty))
    }

    /// The annotation of `kind` on `ty`, searched through superclasses and, for inherited
    /// kinds, through implemented interfaces
    #[must_use]
    pub fn get_annotation(&self, ty: &TypeRc, kind: &AnnotationKind) -> Option<AnnotationRc> {
        find_annotation(ty.clone(), kind)
    }

    /// Returns `true` if the runtime type of `instance` inherits the string conversion of the
    /// root object type instead of overriding it
    ///
    /// # Errors
    /// Returns [`Error::TypeNotRegistered`] if the type of `instance` is not registered
    pub fn has_default_string_representation(&self, instance: &dyn Any) -> Result<bool> {
        let ty = self.registry.type_of(instance)?;
        let method = ty
            .find_method(TO_STRING, &[])
            .ok_or_else(|| internal_error!("type {} has no {} method", ty.fullname(), TO_STRING))?;

        Ok(method
            .declaring_type()
            .is_some_and(|declaring| declaring.is_root()))
    }
}

impl fmt::Debug for Reflector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reflector")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// The first `get<Name>` or boolean `is<Name>` getter of `ty`
fn find_getter(ty: &TypeRc, name: &str) -> Result<Option<MethodRc>> {
    let getter = method_name(GET_PREFIX, name)?;
    let iser = method_name(IS_PREFIX, name)?;

    Ok(ty
        .public_methods()
        .iter()
        .find(|method| match AccessorKind::of(method) {
            AccessorKind::GetGetter => method.name == getter,
            AccessorKind::IsGetter => method.name == iser,
            _ => false,
        })
        .cloned())
}
