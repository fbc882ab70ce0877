//! Runtime type system for reflective property access.
//!
//! Rust has no runtime reflection, so every type that should be reachable through the property
//! lookups is registered once in a [`TypeRegistry`], together with its superclass, the
//! interfaces it implements, its methods and its annotations. The registry pre-registers the
//! root `Object` type, the primitive types and `String`.
//!
//! # Key Components
//!
//! - [`ReflectType`]: One registered class, interface or built-in type
//! - [`TypeRegistry`]: Thread-safe registry indexed by token, full name and Rust `TypeId`
//! - [`TypeBuilder`]: Fluent construction and registration of classes and interfaces
//! - [`TypeRef`]: Weak handle used by method signatures
//! - [`PrimitiveKind`]: The primitive value types and their widening rules
//!
//! # Type System Features
//!
//! - **Inheritance**: Single superclass chain rooted at `Object`, multiple interfaces
//! - **Method enumeration**: Public methods in a deterministic order, overridden methods hidden
//! - **Receiver adaptation**: Subclass instances are upcast to the receiver an inherited method
//!   expects
//! - **Unloading**: Types can be removed from the registry again
//!
//! # Examples
//!
//! ```rust,no_run
//! use propscope::metadata::typesystem::{PrimitiveKind, TypeRegistry};
//!
//! struct Point { x: i32 }
//!
//! let registry = TypeRegistry::new()?;
//! let point = registry
//!     .class("geom", "Point")
//!     .binds::<Point>()
//!     .getter("getX", &registry.primitive(PrimitiveKind::I32), |p: &Point| p.x)
//!     .build()?;
//!
//! assert_eq!(point.fullname(), "geom.Point");
//! assert!(point.base().is_some_and(|base| base.is_root()));
//! # Ok::<(), propscope::Error>(())
//! ```

mod base;
mod builder;
mod primitives;
mod registry;

use std::{
    any::{Any, TypeId},
    fmt,
    sync::{Arc, OnceLock, Weak},
};

pub use base::{TypeFlavor, TypeRef};
pub use builder::TypeBuilder;
pub use primitives::PrimitiveKind;
pub use registry::{Object, TypeRegistry, TO_STRING};

use crate::metadata::{
    annotations::{Annotation, AnnotationKind, AnnotationList, AnnotationRc},
    method::{MethodDescriptor, MethodRc},
    token::TypeToken,
};

/// Reference to a `ReflectType`
pub type TypeRc = Arc<ReflectType>;

/// Upcasts a subclass instance to the Rust struct of its superclass
pub(crate) type RefUpcast = Arc<dyn Fn(&dyn Any) -> Option<&dyn Any> + Send + Sync>;
/// Mutable counterpart of [`RefUpcast`]
pub(crate) type MutUpcast = Arc<dyn Fn(&mut dyn Any) -> Option<&mut dyn Any> + Send + Sync>;

/// How a subclass instance is viewed as an instance of its superclass
#[derive(Clone)]
pub(crate) struct Upcast {
    pub(crate) by_ref: RefUpcast,
    pub(crate) by_mut: MutUpcast,
}

/// A registered type: the root object type, a primitive, `String`, a class or an interface.
///
/// Types are immutable once built, apart from their annotation list which may grow. Identity is
/// pointer identity: two `ReflectType`s are equal only if they are the same registration.
pub struct ReflectType {
    /// Token
    pub token: TypeToken,
    /// Namespace, empty for built-in types
    pub namespace: String,
    /// Simple name
    pub name: String,
    /// The `TypeFlavor`
    pub flavor: TypeFlavor,
    /// Annotations declared directly on this type
    pub annotations: AnnotationList,
    base: Option<TypeRc>,
    interfaces: Vec<TypeRc>,
    methods: Vec<MethodRc>,
    rust_type: Option<TypeId>,
    upcast: Option<Upcast>,
    public_methods: OnceLock<Vec<MethodRc>>,
}

impl ReflectType {
    /// The full name, `namespace.name` or just `name` for types without namespace
    #[must_use]
    pub fn fullname(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }

    /// The direct superclass. `None` for the root object type, primitives and interfaces
    #[must_use]
    pub fn base(&self) -> Option<TypeRc> {
        self.base.clone()
    }

    /// All superclasses, nearest first
    #[must_use]
    pub fn superclasses(&self) -> Vec<TypeRc> {
        let mut chain = Vec::new();
        let mut current = self.base.clone();
        while let Some(ty) = current {
            current = ty.base.clone();
            chain.push(ty);
        }
        chain
    }

    /// The directly implemented (or, for interfaces, extended) interfaces in declaration order
    #[must_use]
    pub fn interfaces(&self) -> &[TypeRc] {
        &self.interfaces
    }

    /// The methods declared directly on this type, in declaration order
    #[must_use]
    pub fn methods(&self) -> &[MethodRc] {
        &self.methods
    }

    /// The Rust type bound to this type, if any
    #[must_use]
    pub fn rust_type(&self) -> Option<TypeId> {
        self.rust_type
    }

    /// Returns `true` for the universal root object type
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.flavor == TypeFlavor::Object
    }

    /// Returns `true` for interfaces
    #[must_use]
    pub fn is_interface(&self) -> bool {
        self.flavor.is_interface()
    }

    /// Returns `true` for primitive types
    #[must_use]
    pub fn is_primitive(&self) -> bool {
        self.flavor.is_primitive()
    }

    /// Returns `true` if the type accepts a null value
    #[must_use]
    pub fn is_reference_type(&self) -> bool {
        self.flavor.is_reference_type()
    }

    /// The primitive kind, if this is a primitive type
    #[must_use]
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        self.flavor.to_primitive_kind()
    }

    /// Returns `true` for the primitive `boolean` type
    #[must_use]
    pub fn is_boolean(&self) -> bool {
        self.primitive_kind() == Some(PrimitiveKind::Boolean)
    }

    /// All public methods of this type, including inherited ones.
    ///
    /// The order is deterministic: public methods declared on this type in declaration order,
    /// then the public methods of the superclass (recursively) that are not overridden here, then
    /// the public methods of each implemented interface that are not already present. The result
    /// is computed once per type.
    pub fn public_methods(&self) -> &[MethodRc] {
        self.public_methods
            .get_or_init(|| self.collect_public_methods())
    }

    fn collect_public_methods(&self) -> Vec<MethodRc> {
        let mut methods: Vec<MethodRc> = self
            .methods
            .iter()
            .filter(|method| method.is_public())
            .cloned()
            .collect();

        let inherited = self
            .base
            .iter()
            .chain(self.interfaces.iter())
            .flat_map(|ty| ty.public_methods().iter());

        for method in inherited {
            if !methods
                .iter()
                .any(|present| present.has_same_signature(method))
            {
                methods.push(method.clone());
            }
        }

        methods
    }

    /// Find a public method by name and exact parameter types
    #[must_use]
    pub fn find_method(&self, name: &str, params: &[&TypeRc]) -> Option<MethodRc> {
        self.public_methods()
            .iter()
            .find(|method| {
                method.name == name
                    && method.param_count() == params.len()
                    && params.iter().enumerate().all(|(index, param)| {
                        method
                            .parameter_type(index)
                            .is_some_and(|declared| Arc::ptr_eq(&declared, param))
                    })
            })
            .cloned()
    }

    /// Returns `true` if this type implements `interface`, directly, through a superinterface
    /// or through a superclass
    #[must_use]
    pub fn implements(&self, interface: &ReflectType) -> bool {
        self.interfaces
            .iter()
            .any(|direct| direct.as_ref() == interface || direct.implements(interface))
            || self
                .base
                .as_ref()
                .is_some_and(|base| base.implements(interface))
    }

    /// Returns `true` if `other` is this type or one of its superclasses
    fn is_superclass_of(&self, other: &ReflectType) -> bool {
        other == self || other.superclasses().iter().any(|ty| ty.as_ref() == self)
    }

    /// Returns `true` if a value of type `other` can be assigned to a variable of this type
    /// without conversion.
    ///
    /// Primitives are only assignable from themselves. The root object type is assignable from
    /// every reference type, an interface from every type implementing it and a class from
    /// itself and its subclasses.
    #[must_use]
    pub fn is_assignable_from(&self, other: &ReflectType) -> bool {
        if self == other {
            return true;
        }
        if self.is_primitive() || other.is_primitive() {
            return false;
        }

        match self.flavor {
            TypeFlavor::Object => true,
            TypeFlavor::Interface => other.implements(self),
            TypeFlavor::String | TypeFlavor::Class => self.is_superclass_of(other),
            TypeFlavor::Primitive(_) => false,
        }
    }

    /// The annotation of `kind` declared directly on this type
    #[must_use]
    pub fn declared_annotation(&self, kind: &AnnotationKind) -> Option<AnnotationRc> {
        self.annotations
            .iter()
            .find(|(_, annotation)| annotation.kind.matches(kind))
            .map(|(_, annotation)| annotation.clone())
    }

    /// Add an annotation to this type
    pub fn annotate(&self, annotation: Annotation) {
        self.annotations.push(Arc::new(annotation));
    }

    /// View `receiver` as the Rust type `target` expects, following the upcasts of the
    /// superclass chain.
    ///
    /// Returns the receiver unchanged if `target` is `None` or already matches, and `None` if
    /// no upcast leads to `target`.
    #[must_use]
    pub fn adapt_ref<'a>(
        &self,
        receiver: &'a dyn Any,
        target: Option<TypeId>,
    ) -> Option<&'a dyn Any> {
        let Some(target) = target else {
            return Some(receiver);
        };
        if (*receiver).type_id() == target {
            return Some(receiver);
        }

        let upcast = self.upcast.as_ref()?;
        let base = self.base.as_ref()?;
        base.adapt_ref((upcast.by_ref)(receiver)?, Some(target))
    }

    /// Mutable counterpart of [`ReflectType::adapt_ref`]
    #[must_use]
    pub fn adapt_mut<'a>(
        &self,
        receiver: &'a mut dyn Any,
        target: Option<TypeId>,
    ) -> Option<&'a mut dyn Any> {
        let Some(target) = target else {
            return Some(receiver);
        };
        if (*receiver).type_id() == target {
            return Some(receiver);
        }

        let upcast = self.upcast.as_ref()?;
        let base = self.base.as_ref()?;
        base.adapt_mut((upcast.by_mut)(receiver)?, Some(target))
    }
}

impl PartialEq for ReflectType {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl Eq for ReflectType {}

impl fmt::Display for ReflectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl fmt::Debug for ReflectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReflectType")
            .field("token", &self.token)
            .field("fullname", &self.fullname())
            .field("flavor", &self.flavor)
            .field("base", &self.base.as_ref().map(|base| base.fullname()))
            .field(
                "interfaces",
                &self
                    .interfaces
                    .iter()
                    .map(|interface| interface.fullname())
                    .collect::<Vec<_>>(),
            )
            .field(
                "methods",
                &self
                    .methods
                    .iter()
                    .map(|method| method.name.as_str())
                    .collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

/// Everything a [`TypeBuilder`] hands over to create a [`ReflectType`]
pub(crate) struct TypeParts {
    pub(crate) token: TypeToken,
    pub(crate) namespace: String,
    pub(crate) name: String,
    pub(crate) flavor: TypeFlavor,
    pub(crate) base: Option<TypeRc>,
    pub(crate) interfaces: Vec<TypeRc>,
    pub(crate) annotations: Vec<Annotation>,
    pub(crate) rust_type: Option<TypeId>,
    pub(crate) upcast: Option<Upcast>,
}

impl ReflectType {
    /// Create a type whose methods refer back to it through weak references
    pub(crate) fn new_cyclic<F>(parts: TypeParts, methods: F) -> TypeRc
    where
        F: FnOnce(&Weak<ReflectType>) -> Vec<MethodDescriptor>,
    {
        Arc::new_cyclic(|weak| ReflectType::assemble(parts, methods(weak)))
    }

    fn assemble(parts: TypeParts, methods: Vec<MethodDescriptor>) -> ReflectType {
        let annotations = boxcar::Vec::new();
        for annotation in parts.annotations {
            annotations.push(Arc::new(annotation));
        }

        ReflectType {
            token: parts.token,
            namespace: parts.namespace,
            name: parts.name,
            flavor: parts.flavor,
            annotations: Arc::new(annotations),
            base: parts.base,
            interfaces: parts.interfaces,
            methods: methods.into_iter().map(Arc::new).collect(),
            rust_type: parts.rust_type,
            upcast: parts.upcast,
            public_methods: OnceLock::new(),
        }
    }
}
