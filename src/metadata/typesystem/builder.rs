//! Builder for classes and interfaces.
//!
//! This module provides the [`TypeBuilder`] struct, which offers a fluent API for declaring a
//! class or an interface: its superclass, implemented interfaces, annotations, the Rust type it
//! is bound to and its methods. [`TypeBuilder::build`] validates the declaration and registers
//! the type in its [`TypeRegistry`].
//!
//! # Example
//!
//! ```rust
//! use propscope::metadata::typesystem::{PrimitiveKind, TypeRegistry};
//!
//! #[derive(Default)]
//! struct Shape { id: i32 }
//! #[derive(Default)]
//! struct Circle { shape: Shape, radius: f64 }
//!
//! let registry = TypeRegistry::new()?;
//! let shape = registry
//!     .class("geom", "Shape")
//!     .binds::<Shape>()
//!     .getter("getId", &registry.primitive(PrimitiveKind::I32), |s: &Shape| s.id)
//!     .build()?;
//! let circle = registry
//!     .class("geom", "Circle")
//!     .extends_via(&shape, |c: &Circle| &c.shape, |c: &mut Circle| &mut c.shape)
//!     .getter("getRadius", &registry.primitive(PrimitiveKind::F64), |c: &Circle| c.radius)
//!     .build()?;
//!
//! assert!(shape.is_assignable_from(&circle));
//! # Ok::<(), propscope::Error>(())
//! ```

use std::{
    any::{type_name, Any, TypeId},
    sync::Arc,
};

use crate::{
    error::BoxError,
    metadata::{
        annotations::Annotation,
        method::MethodBuilder,
        typesystem::{
            registry::TO_STRING, MutUpcast, RefUpcast, ReflectType, TypeFlavor, TypeParts,
            TypeRc, TypeRegistry, Upcast,
        },
    },
    Error::TypeError,
    Result,
};

/// An upcast together with the Rust types it converts between
struct PendingUpcast {
    source: TypeId,
    target: TypeId,
    target_name: &'static str,
    upcast: Upcast,
}

/// Provides a fluent API for declaring and registering a type
pub struct TypeBuilder<'r> {
    /// Type registry the type is registered in
    registry: &'r TypeRegistry,
    namespace: String,
    name: String,
    flavor: TypeFlavor,
    base: Option<TypeRc>,
    upcast: Option<PendingUpcast>,
    interfaces: Vec<TypeRc>,
    annotations: Vec<Annotation>,
    methods: Vec<MethodBuilder>,
    rust_type: Option<TypeId>,
}

impl<'r> TypeBuilder<'r> {
    /// Create a new builder for a class or an interface
    ///
    /// ## Arguments
    /// * 'registry'  - The type registry to register the type in
    /// * 'namespace' - Namespace of the type, may be empty
    /// * 'name'      - Simple name of the type
    /// * 'flavor'    - [`TypeFlavor::Class`] or [`TypeFlavor::Interface`]
    pub(crate) fn new(
        registry: &'r TypeRegistry,
        namespace: String,
        name: String,
        flavor: TypeFlavor,
    ) -> Self {
        TypeBuilder {
            registry,
            namespace,
            name,
            flavor,
            base: None,
            upcast: None,
            interfaces: Vec::new(),
            annotations: Vec::new(),
            methods: Vec::new(),
            rust_type: None,
        }
    }

    /// Bind the type to the Rust type `T`, so that instances of `T` resolve to it
    #[must_use]
    pub fn binds<T: Any>(mut self) -> Self {
        self.rust_type = Some(TypeId::of::<T>());
        self
    }

    /// Set the superclass. Without a superclass, classes derive from the root object type.
    ///
    /// Use this when the subclass is bound to the same Rust type as its superclass, or when
    /// inherited methods accept any receiver.
    #[must_use]
    pub fn extends(mut self, base: &TypeRc) -> Self {
        self.base = Some(base.clone());
        self
    }

    /// Set the superclass and describe how an `L` (this type) is viewed as a `B` (the
    /// superclass's Rust type). Also binds this type to `L`.
    #[must_use]
    pub fn extends_via<L, B, R, M>(mut self, base: &TypeRc, upcast_ref: R, upcast_mut: M) -> Self
    where
        L: Any,
        B: Any,
        R: Fn(&L) -> &B + Send + Sync + 'static,
        M: Fn(&mut L) -> &mut B + Send + Sync + 'static,
    {
        let by_ref: RefUpcast = Arc::new(ref_upcast(move |receiver: &dyn Any| {
            receiver
                .downcast_ref::<L>()
                .map(|instance| upcast_ref(instance) as &dyn Any)
        }));
        let by_mut: MutUpcast = Arc::new(mut_upcast(move |receiver: &mut dyn Any| {
            receiver
                .downcast_mut::<L>()
                .map(|instance| upcast_mut(instance) as &mut dyn Any)
        }));

        self.base = Some(base.clone());
        self.rust_type = Some(TypeId::of::<L>());
        self.upcast = Some(PendingUpcast {
            source: TypeId::of::<L>(),
            target: TypeId::of::<B>(),
            target_name: type_name::<B>(),
            upcast: Upcast { by_ref, by_mut },
        });
        self
    }

    /// Add an implemented interface (or, for interfaces, an extended interface)
    #[must_use]
    pub fn implements(mut self, interface: &TypeRc) -> Self {
        self.interfaces.push(interface.clone());
        self
    }

    /// Add an annotation
    #[must_use]
    pub fn annotate(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Add a method
    #[must_use]
    pub fn method(mut self, method: MethodBuilder) -> Self {
        self.methods.push(method);
        self
    }

    /// Add a public abstract method without parameters returning nothing
    #[must_use]
    pub fn abstract_method(self, name: impl Into<String>) -> Self {
        self.method(MethodBuilder::new(name))
    }

    /// Add a getter, see [`MethodBuilder::getter`]
    #[must_use]
    pub fn getter<T, R, F>(self, name: impl Into<String>, return_type: &TypeRc, f: F) -> Self
    where
        T: Any,
        R: Any + Send + Sync,
        F: Fn(&T) -> R + Send + Sync + 'static,
    {
        self.method(MethodBuilder::getter(name, return_type, f))
    }

    /// Add a getter returning null for `None`, see [`MethodBuilder::nullable_getter`]
    #[must_use]
    pub fn nullable_getter<T, R, F>(
        self,
        name: impl Into<String>,
        return_type: &TypeRc,
        f: F,
    ) -> Self
    where
        T: Any,
        R: Any + Send + Sync,
        F: Fn(&T) -> Option<R> + Send + Sync + 'static,
    {
        self.method(MethodBuilder::nullable_getter(name, return_type, f))
    }

    /// Add a fallible getter, see [`MethodBuilder::try_getter`]
    #[must_use]
    pub fn try_getter<T, R, E, F>(self, name: impl Into<String>, return_type: &TypeRc, f: F) -> Self
    where
        T: Any,
        R: Any + Send + Sync,
        E: Into<BoxError>,
        F: Fn(&T) -> std::result::Result<R, E> + Send + Sync + 'static,
    {
        self.method(MethodBuilder::try_getter(name, return_type, f))
    }

    /// Add a setter, see [`MethodBuilder::setter`]
    #[must_use]
    pub fn setter<T, P, F>(self, name: impl Into<String>, param_type: &TypeRc, f: F) -> Self
    where
        T: Any,
        P: Any,
        F: Fn(&mut T, P) + Send + Sync + 'static,
    {
        self.method(MethodBuilder::setter(name, param_type, f))
    }

    /// Add a setter accepting null, see [`MethodBuilder::nullable_setter`]
    #[must_use]
    pub fn nullable_setter<T, P, F>(self, name: impl Into<String>, param_type: &TypeRc, f: F) -> Self
    where
        T: Any,
        P: Any,
        F: Fn(&mut T, Option<P>) + Send + Sync + 'static,
    {
        self.method(MethodBuilder::nullable_setter(name, param_type, f))
    }

    /// Add a fallible setter, see [`MethodBuilder::try_setter`]
    #[must_use]
    pub fn try_setter<T, P, E, F>(self, name: impl Into<String>, param_type: &TypeRc, f: F) -> Self
    where
        T: Any,
        P: Any,
        E: Into<BoxError>,
        F: Fn(&mut T, P) -> std::result::Result<(), E> + Send + Sync + 'static,
    {
        self.method(MethodBuilder::try_setter(name, param_type, f))
    }

    /// Override the string conversion inherited from the root object type
    #[must_use]
    pub fn to_string_method<T, F>(self, f: F) -> Self
    where
        T: Any,
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        let string = self.registry.string_type();
        self.method(MethodBuilder::getter(TO_STRING, &string, f))
    }

    /// Validate the declaration and register the type
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeError`] for invalid hierarchies (an interface extending a class,
    /// a class extending an interface, a primitive or `String`, implementing a non-interface, an
    /// upcast that does not match the bound Rust types) and [`crate::Error::TypeInsert`] if the
    /// name or the bound Rust type is already registered
    pub fn build(self) -> Result<TypeRc> {
        let fullname = if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        };

        let base = match self.flavor {
            TypeFlavor::Interface => {
                if let Some(base) = &self.base {
                    return Err(TypeError(format!(
                        "Interface {fullname} cannot extend class {}",
                        base.fullname()
                    )));
                }
                None
            }
            _ => {
                let base = self
                    .base
                    .clone()
                    .unwrap_or_else(|| self.registry.object_type());
                if !matches!(base.flavor, TypeFlavor::Object | TypeFlavor::Class) {
                    return Err(TypeError(format!(
                        "Class {fullname} cannot extend {}",
                        base.fullname()
                    )));
                }
                Some(base)
            }
        };

        if let Some(invalid) = self.interfaces.iter().find(|ty| !ty.is_interface()) {
            return Err(TypeError(format!(
                "{fullname} cannot implement {}, which is not an interface",
                invalid.fullname()
            )));
        }

        let upcast = match self.upcast {
            Some(pending) => {
                let base_binding = base.as_ref().and_then(|base| base.rust_type());
                if base_binding != Some(pending.target) {
                    return Err(TypeError(format!(
                        "Superclass of {fullname} is not bound to {}",
                        pending.target_name
                    )));
                }
                if self.rust_type != Some(pending.source) {
                    return Err(TypeError(format!(
                        "{fullname} is not bound to the Rust type its upcast converts from"
                    )));
                }
                Some(pending.upcast)
            }
            None => None,
        };

        let parts = TypeParts {
            token: self.registry.next_token(self.flavor),
            namespace: self.namespace,
            name: self.name,
            flavor: self.flavor,
            base,
            interfaces: self.interfaces,
            annotations: self.annotations,
            rust_type: self.rust_type,
            upcast,
        };
        let methods = self.methods;
        let new_type = ReflectType::new_cyclic(parts, |weak| {
            methods
                .into_iter()
                .map(|method| method.build(weak))
                .collect()
        });

        self.registry.insert(&new_type)?;
        Ok(new_type)
    }
}

fn ref_upcast<F>(f: F) -> F
where
    F: Fn(&dyn Any) -> Option<&dyn Any>,
{
    f
}

fn mut_upcast<F>(f: F) -> F
where
    F: Fn(&mut dyn Any) -> Option<&mut dyn Any>,
{
    f
}
