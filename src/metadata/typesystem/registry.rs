//! Central type registry.
//!
//! The `TypeRegistry` owns every registered [`ReflectType`] and resolves Rust values to their
//! runtime type. It is safe to share between threads and to register types concurrently.
//!
//! # Registry Architecture
//!
//! - **Token-based lookup**: Primary storage keyed by [`TypeToken`]s (`DashMap`)
//! - **Name-based lookup**: Secondary index by full name (`DashMap`)
//! - **Rust type lookup**: Secondary index by the bound `TypeId` (`DashMap`)
//!
//! # Built-in Types
//!
//! Every registry starts out with the root `Object` type, one type per [`PrimitiveKind`] and
//! `String`. `Object` declares the default `toString()`; the primitives and `String` override it.
//!
//! # Unloading
//!
//! [`TypeRegistry::unregister`] removes a type again. Once every other strong reference to it is
//! gone, the type is dropped and caches keyed on it forget it.

use std::{
    any::{type_name, Any, TypeId},
    fmt,
    sync::{
        atomic::{AtomicU32, Ordering},
        Arc, Weak,
    },
};

use dashmap::{mapref::entry::Entry, DashMap};
use strum::IntoEnumIterator;
use tracing::debug;

use crate::{
    metadata::{
        method::{receiver, MethodBuilder, MethodDescriptor},
        token::TypeToken,
        typesystem::{
            PrimitiveKind, ReflectType, TypeBuilder, TypeFlavor, TypeParts, TypeRc, TypeRef,
        },
        value::Value,
    },
    Error::TypeInsert,
    Result,
};

/// Name of the string conversion method every type inherits from the root object type
pub const TO_STRING: &str = "toString";

/// A plain instance of the root object type
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Object;

const ROW_OBJECT: u32 = 1;
const ROW_STRING: u32 = 2;
const ROW_FIRST_PRIMITIVE: u32 = 3;

/// Thread-safe registry of all runtime types
pub struct TypeRegistry {
    /// Primary storage
    types: DashMap<TypeToken, TypeRc>,
    /// Index by full name
    types_by_fullname: DashMap<String, TypeToken>,
    /// Index by bound Rust type
    types_by_rust_type: DashMap<TypeId, TypeToken>,
    next_class_row: AtomicU32,
    next_interface_row: AtomicU32,
    object: TypeRc,
    string: TypeRc,
    primitives: Vec<TypeRc>,
}

impl TypeRegistry {
    /// Create a registry holding the built-in types.
    ///
    /// # Errors
    /// Returns [`crate::Error::InternalConsistency`] if the built-in types could not be created
    pub fn new() -> Result<Self> {
        let mut root = None;
        let mut primitives = Vec::new();

        let string = Arc::new_cyclic(|string: &Weak<ReflectType>| {
            let object = ReflectType::new_cyclic(
                builtin_parts(ROW_OBJECT, "Object", TypeFlavor::Object, None, TypeId::of::<Object>()),
                |object| vec![default_to_string(object, string)],
            );
            primitives = PrimitiveKind::iter()
                .zip(ROW_FIRST_PRIMITIVE..)
                .map(|(kind, row)| {
                    ReflectType::new_cyclic(
                        builtin_parts(
                            row,
                            &kind.to_string(),
                            TypeFlavor::Primitive(kind),
                            None,
                            kind.rust_type(),
                        ),
                        |primitive| vec![primitive_to_string(kind, primitive, string)],
                    )
                })
                .collect();

            let methods = string_methods(string, &primitives);
            let parts = builtin_parts(
                ROW_STRING,
                "String",
                TypeFlavor::String,
                Some(object.clone()),
                TypeId::of::<String>(),
            );
            root = Some(object);
            ReflectType::assemble(parts, methods)
        });

        let object = root.ok_or_else(|| internal_error!("root object type was not created"))?;
        let registry = TypeRegistry {
            types: DashMap::new(),
            types_by_fullname: DashMap::new(),
            types_by_rust_type: DashMap::new(),
            next_class_row: AtomicU32::new(1),
            next_interface_row: AtomicU32::new(1),
            object,
            string,
            primitives,
        };

        registry.insert(&registry.object)?;
        registry.insert(&registry.string)?;
        for primitive in &registry.primitives {
            registry.insert(primitive)?;
        }

        Ok(registry)
    }

    /// The universal root object type
    #[must_use]
    pub fn object_type(&self) -> TypeRc {
        self.object.clone()
    }

    /// The built-in `String` type
    #[must_use]
    pub fn string_type(&self) -> TypeRc {
        self.string.clone()
    }

    /// The type of a primitive kind. Primitives are stored in declaration order of
    /// [`PrimitiveKind`]
    #[must_use]
    pub fn primitive(&self, kind: PrimitiveKind) -> TypeRc {
        self.primitives[kind as usize].clone()
    }

    /// Start building a class in this registry
    pub fn class(&self, namespace: impl Into<String>, name: impl Into<String>) -> TypeBuilder<'_> {
        TypeBuilder::new(self, namespace.into(), name.into(), TypeFlavor::Class)
    }

    /// Start building an interface in this registry
    pub fn interface(
        &self,
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> TypeBuilder<'_> {
        TypeBuilder::new(self, namespace.into(), name.into(), TypeFlavor::Interface)
    }

    /// Allocate the next token for a type of `flavor`
    pub(crate) fn next_token(&self, flavor: TypeFlavor) -> TypeToken {
        let row = match flavor {
            TypeFlavor::Interface => self.next_interface_row.fetch_add(1, Ordering::Relaxed),
            _ => self.next_class_row.fetch_add(1, Ordering::Relaxed),
        };
        TypeToken::from_parts(flavor.table(), row)
    }

    /// Insert a new type.
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeInsert`] if a type with the same full name, or bound to the
    /// same Rust type, is already registered
    pub fn insert(&self, new_type: &TypeRc) -> Result<()> {
        let fullname = new_type.fullname();
        match self.types_by_fullname.entry(fullname.clone()) {
            Entry::Occupied(_) => return Err(TypeInsert(fullname)),
            Entry::Vacant(entry) => {
                entry.insert(new_type.token);
            }
        }

        if let Some(rust_type) = new_type.rust_type() {
            match self.types_by_rust_type.entry(rust_type) {
                Entry::Occupied(_) => {
                    self.types_by_fullname.remove(&fullname);
                    return Err(TypeInsert(format!(
                        "{fullname} - Rust type is already bound to another type"
                    )));
                }
                Entry::Vacant(entry) => {
                    entry.insert(new_type.token);
                }
            }
        }

        self.types.insert(new_type.token, new_type.clone());
        debug!(token = %new_type.token, fullname = %fullname, "registered type");
        Ok(())
    }

    /// Remove a type from the registry.
    ///
    /// Built-in types cannot be removed. Returns the removed type, which is dropped once the
    /// caller, every subtype and every accessor release it.
    pub fn unregister(&self, token: TypeToken) -> Option<TypeRc> {
        if token.table() == TypeToken::TABLE_BUILTIN {
            return None;
        }

        let (_, removed) = self.types.remove(&token)?;
        self.types_by_fullname.remove(&removed.fullname());
        if let Some(rust_type) = removed.rust_type() {
            self.types_by_rust_type
                .remove_if(&rust_type, |_, bound| *bound == token);
        }

        debug!(token = %token, fullname = %removed.fullname(), "unregistered type");
        Some(removed)
    }

    /// Get a type by its token
    #[must_use]
    pub fn get(&self, token: &TypeToken) -> Option<TypeRc> {
        self.types.get(token).map(|entry| entry.value().clone())
    }

    /// Get a type by its full name, e.g. `geom.Point` or `String`
    #[must_use]
    pub fn get_by_fullname(&self, fullname: &str) -> Option<TypeRc> {
        let token = *self.types_by_fullname.get(fullname)?;
        self.get(&token)
    }

    /// Get the type bound to a Rust `TypeId`
    #[must_use]
    pub fn get_by_rust_type(&self, rust_type: TypeId) -> Option<TypeRc> {
        let token = *self.types_by_rust_type.get(&rust_type)?;
        self.get(&token)
    }

    /// Get the type bound to `T`.
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeNotRegistered`] if no type is bound to `T`
    pub fn resolve<T: Any>(&self) -> Result<TypeRc> {
        self.get_by_rust_type(TypeId::of::<T>())
            .ok_or_else(|| crate::Error::TypeNotRegistered(type_name::<T>().to_string()))
    }

    /// Get the runtime type of `instance`.
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeNotRegistered`] if no type is bound to the instance's Rust type
    pub fn type_of(&self, instance: &dyn Any) -> Result<TypeRc> {
        let rust_type = instance.type_id();
        self.get_by_rust_type(rust_type)
            .ok_or_else(|| crate::Error::TypeNotRegistered(format!("{rust_type:?}")))
    }

    /// Number of registered types, built-in types included
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if no types are registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// All registered types in token order
    #[must_use]
    pub fn all_types(&self) -> Vec<TypeRc> {
        let mut types: Vec<TypeRc> = self
            .types
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        types.sort_by_key(|ty| ty.token);
        types
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.types.len())
            .finish_non_exhaustive()
    }
}

fn builtin_parts(
    row: u32,
    name: &str,
    flavor: TypeFlavor,
    base: Option<TypeRc>,
    rust_type: TypeId,
) -> TypeParts {
    TypeParts {
        token: TypeToken::from_parts(TypeToken::TABLE_BUILTIN, row),
        namespace: String::new(),
        name: name.to_string(),
        flavor,
        base,
        interfaces: Vec::new(),
        annotations: Vec::new(),
        rust_type: Some(rust_type),
        upcast: None,
    }
}

/// `String toString()` of a built-in type, returning the built-in `String` type
fn to_string_method(
    declaring: &Weak<ReflectType>,
    string: &Weak<ReflectType>,
    method: MethodBuilder,
) -> MethodDescriptor {
    let mut descriptor = method.build(declaring);
    descriptor.return_type = Some(TypeRef::from_weak(string.clone()));
    descriptor
}

/// The default conversion, accepting any receiver
fn default_to_string(object: &Weak<ReflectType>, string: &Weak<ReflectType>) -> MethodDescriptor {
    to_string_method(
        object,
        string,
        MethodBuilder::new(TO_STRING)
            .shared(|target, _args| Ok(Value::new(format!("Object@{target:p}")))),
    )
}

fn primitive_to_string(
    kind: PrimitiveKind,
    primitive: &Weak<ReflectType>,
    string: &Weak<ReflectType>,
) -> MethodDescriptor {
    fn display<T: Any + fmt::Display>() -> MethodBuilder {
        MethodBuilder::new(TO_STRING)
            .receiver::<T>()
            .shared(|target, _args| Ok(Value::new(receiver::<T>(target)?.to_string())))
    }

    let method = match kind {
        PrimitiveKind::Boolean => display::<bool>(),
        PrimitiveKind::Char => display::<char>(),
        PrimitiveKind::I8 => display::<i8>(),
        PrimitiveKind::I16 => display::<i16>(),
        PrimitiveKind::I32 => display::<i32>(),
        PrimitiveKind::I64 => display::<i64>(),
        PrimitiveKind::F32 => display::<f32>(),
        PrimitiveKind::F64 => display::<f64>(),
    };
    to_string_method(primitive, string, method)
}

fn string_methods(string: &Weak<ReflectType>, primitives: &[TypeRc]) -> Vec<MethodDescriptor> {
    let mut methods = vec![to_string_method(
        string,
        string,
        MethodBuilder::new(TO_STRING)
            .receiver::<String>()
            .shared(|target, _args| Ok(Value::new(receiver::<String>(target)?.clone()))),
    )];

    let find = |kind| {
        primitives
            .iter()
            .find(|ty| ty.primitive_kind() == Some(kind))
    };
    if let Some(boolean) = find(PrimitiveKind::Boolean) {
        methods.push(
            MethodBuilder::getter("isEmpty", boolean, |s: &String| s.is_empty()).build(string),
        );
    }
    if let Some(int) = find(PrimitiveKind::I32) {
        methods.push(
            MethodBuilder::getter("length", int, |s: &String| {
                i32::try_from(s.chars().count()).unwrap_or(i32::MAX)
            })
            .build(string),
        );
    }
    methods
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_types() {
        let registry = TypeRegistry::new().expect("registry should build");
        assert_eq!(registry.len(), 2 + PrimitiveKind::iter().count());

        let object = registry.object_type();
        assert!(object.is_root());
        assert!(object.base().is_none());
        assert_eq!(object.token, TypeToken::from_parts(TypeToken::TABLE_BUILTIN, 1));

        let string = registry.string_type();
        assert_eq!(string.fullname(), "String");
        assert!(string.base().is_some_and(|base| base.is_root()));

        let to_string = object
            .find_method(TO_STRING, &[])
            .expect("root declares toString");
        assert!(to_string
            .return_type()
            .is_some_and(|ret| Arc::ptr_eq(&ret, &string)));

        let int = registry.primitive(PrimitiveKind::I32);
        assert_eq!(int.name, "int");
        assert!(int.base().is_none());
        assert_eq!(
            registry.get_by_rust_type(TypeId::of::<i32>()).map(|ty| ty.token),
            Some(int.token)
        );
    }

    #[test]
    fn test_builtin_to_string_bodies() {
        let registry = TypeRegistry::new().expect("registry should build");

        let int_to_string = registry
            .primitive(PrimitiveKind::I32)
            .find_method(TO_STRING, &[])
            .expect("int overrides toString");
        let rendered = int_to_string
            .invoke(&42i32, Vec::new())
            .expect("toString succeeds");
        assert_eq!(rendered.downcast::<String>().ok().as_deref(), Some("42"));

        let default = registry
            .object_type()
            .find_method(TO_STRING, &[])
            .expect("root declares toString");
        let rendered = default
            .invoke(&Object, Vec::new())
            .expect("toString succeeds")
            .downcast::<String>()
            .expect("toString returns a String");
        assert!(rendered.starts_with("Object@"));
    }

    #[test]
    fn test_resolve_and_type_of() {
        let registry = TypeRegistry::new().expect("registry should build");
        assert!(registry.resolve::<Object>().is_ok_and(|ty| ty.is_root()));
        assert!(registry
            .type_of(&String::from("x"))
            .is_ok_and(|ty| ty.flavor == TypeFlavor::String));
        assert!(matches!(
            registry.resolve::<Vec<u8>>(),
            Err(crate::Error::TypeNotRegistered(_))
        ));
    }

    #[test]
    fn test_insert_rejects_duplicates() {
        struct Thing;

        let registry = TypeRegistry::new().expect("registry should build");
        registry
            .class("app", "Thing")
            .binds::<Thing>()
            .build()
            .expect("first registration succeeds");

        assert!(matches!(
            registry.class("app", "Thing").build(),
            Err(TypeInsert(_))
        ));
        assert!(matches!(
            registry.class("app", "Other").binds::<Thing>().build(),
            Err(TypeInsert(_))
        ));
        assert!(registry.get_by_fullname("app.Other").is_none());
    }

    #[test]
    fn test_unregister() {
        struct Thing;

        let registry = TypeRegistry::new().expect("registry should build");
        let thing = registry
            .class("app", "Thing")
            .binds::<Thing>()
            .build()
            .expect("registration succeeds");
        assert_eq!(thing.token.table(), TypeToken::TABLE_CLASS);

        let removed = registry.unregister(thing.token).expect("type was registered");
        assert!(Arc::ptr_eq(&removed, &thing));
        assert!(registry.get(&thing.token).is_none());
        assert!(registry.get_by_fullname("app.Thing").is_none());
        assert!(registry.resolve::<Thing>().is_err());

        assert!(registry.unregister(registry.object_type().token).is_none());
        assert!(registry.unregister(thing.token).is_none());
    }

    #[test]
    fn test_tokens_are_allocated_per_table() {
        let registry = TypeRegistry::new().expect("registry should build");
        let first = registry.class("app", "A").build().expect("builds");
        let second = registry.class("app", "B").build().expect("builds");
        let interface = registry.interface("app", "I").build().expect("builds");

        assert_eq!(first.token.row() + 1, second.token.row());
        assert_eq!(interface.token.table(), TypeToken::TABLE_INTERFACE);
        assert_eq!(interface.token.row(), 1);
    }
}
